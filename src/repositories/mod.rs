pub mod menu_repository;

pub use menu_repository::{MenuItemDocument, MenuRepository, MongoMenuRepository};

#[cfg(test)]
pub use menu_repository::MockMenuRepository;
