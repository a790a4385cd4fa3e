use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    CreateMenuItemRequest, MenuItem, NewMenuItem, ServiceError, ServiceResult,
    UpdateMenuItemRequest,
};
use crate::repositories::MenuRepository;

/// Service for managing menu items
pub struct MenuService {
    repository: Arc<dyn MenuRepository>,
}

impl MenuService {
    /// Create a new MenuService
    pub fn new(repository: Arc<dyn MenuRepository>) -> Self {
        Self { repository }
    }

    /// List every stored menu item
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ServiceResult<Vec<MenuItem>> {
        crate::info_with_trace!("Listing menu items");

        let items = self.repository.find_all().await?;

        crate::info_with_trace!("Found {} menu items", items.len());
        Ok(items)
    }

    /// Create a new menu item
    #[instrument(skip(self, request), fields(name = request.name.as_deref()))]
    pub async fn create_item(&self, request: CreateMenuItemRequest) -> ServiceResult<MenuItem> {
        crate::info_with_trace!("Creating new menu item");

        let item = validate_create_request(request)?;
        let created = self.repository.insert(item).await?;

        crate::info_with_trace!("Menu item created successfully with ID: {}", created.id);
        Ok(created)
    }

    /// Apply a partial update to an existing menu item
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_item(
        &self,
        id: &str,
        request: UpdateMenuItemRequest,
    ) -> ServiceResult<MenuItem> {
        crate::info_with_trace!("Updating menu item");

        match self.repository.update(id, request).await? {
            Some(item) => {
                crate::info_with_trace!("Menu item updated successfully");
                Ok(item)
            }
            None => {
                crate::warn_with_trace!("Menu item not found");
                Err(ServiceError::MenuItemNotFound { id: id.to_string() })
            }
        }
    }

    /// Permanently delete a menu item
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_item(&self, id: &str) -> ServiceResult<()> {
        crate::info_with_trace!("Deleting menu item");

        match self.repository.delete(id).await? {
            Some(_) => {
                crate::info_with_trace!("Menu item deleted successfully");
                Ok(())
            }
            None => {
                crate::warn_with_trace!("Menu item not found");
                Err(ServiceError::MenuItemNotFound { id: id.to_string() })
            }
        }
    }
}

/// Check the creation presence constraints and produce the insertable item.
///
/// A price of exactly zero is rejected alongside a missing price. The
/// original service used a falsy check that conflated the two; the behavior
/// is kept as documented.
fn validate_create_request(request: CreateMenuItemRequest) -> ServiceResult<NewMenuItem> {
    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(ServiceError::ValidationError {
                message: "Name and price are required".to_string(),
            })
        }
    };

    let price = match request.price {
        Some(price) if price != 0.0 => price,
        _ => {
            return Err(ServiceError::ValidationError {
                message: "Name and price are required".to_string(),
            })
        }
    };

    Ok(NewMenuItem {
        name,
        description: request.description,
        price,
    })
}
