// Re-export all model types
pub use self::errors::*;
pub use self::menu::*;

mod errors;
mod menu;
