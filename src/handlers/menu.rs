use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    CreateMenuItemRequest, DeleteMenuItemResponse, MenuItem, RepositoryError, ServiceError,
    UpdateMenuItemRequest,
};
use crate::services::MenuService;

/// Shared application state for the menu endpoints
#[derive(Clone)]
pub struct ApiState {
    pub menu_service: Arc<MenuService>,
}

/// Create the menu router with all CRUD endpoints
pub fn create_menu_router(menu_service: Arc<MenuService>) -> Router {
    let state = ApiState { menu_service };

    Router::new()
        .route("/menu", get(list_menu_items).post(create_menu_item))
        .route("/menu/:id", put(update_menu_item).delete(delete_menu_item))
        .with_state(state)
}

/// List all menu items
#[instrument(name = "list_menu_items", skip(state))]
pub async fn list_menu_items(
    State(state): State<ApiState>,
) -> Result<Json<Vec<MenuItem>>, (StatusCode, Json<Value>)> {
    info!("Listing menu items");

    match state.menu_service.list_items().await {
        Ok(items) => {
            info!("Successfully listed {} menu items", items.len());
            Ok(Json(items))
        }
        Err(err) => {
            error!("Failed to list menu items: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Create a new menu item
#[instrument(name = "create_menu_item", skip(state, request), fields(
    name = request.name.as_deref(),
    price = request.price,
))]
pub async fn create_menu_item(
    State(state): State<ApiState>,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), (StatusCode, Json<Value>)> {
    info!("Creating new menu item");

    match state.menu_service.create_item(request).await {
        Ok(item) => {
            info!("Successfully created menu item with ID: {}", item.id);
            Ok((StatusCode::CREATED, Json(item)))
        }
        Err(err) => {
            error!("Failed to create menu item: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Update an existing menu item
#[instrument(name = "update_menu_item", skip(state, request), fields(
    id = %id,
    name = request.name.as_deref(),
    price = request.price,
))]
pub async fn update_menu_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItem>, (StatusCode, Json<Value>)> {
    info!("Updating menu item with ID: {}", id);

    match state.menu_service.update_item(&id, request).await {
        Ok(item) => {
            info!("Successfully updated menu item: {}", item.name);
            Ok(Json(item))
        }
        Err(err) => {
            error!("Failed to update menu item {}: {}", id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// Delete a menu item
#[instrument(name = "delete_menu_item", skip(state), fields(id = %id))]
pub async fn delete_menu_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteMenuItemResponse>, (StatusCode, Json<Value>)> {
    info!("Deleting menu item with ID: {}", id);

    match state.menu_service.delete_item(&id).await {
        Ok(()) => {
            info!("Successfully deleted menu item: {}", id);
            Ok(Json(DeleteMenuItemResponse::new()))
        }
        Err(err) => {
            error!("Failed to delete menu item {}: {}", id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// Map a service error to an HTTP status and response body
pub fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        ServiceError::MenuItemNotFound { .. } => {
            (StatusCode::NOT_FOUND, "Menu item not found".to_string())
        }
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::Repository { source } => match source {
            RepositoryError::NotFound => {
                (StatusCode::NOT_FOUND, "Menu item not found".to_string())
            }
            RepositoryError::InvalidId { .. } => (StatusCode::BAD_REQUEST, source.to_string()),
            RepositoryError::ConnectionFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection failed".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let (status, body) = service_error_to_response(ServiceError::ValidationError {
            message: "Name and price are required".to_string(),
        });

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.0["error"]
            .as_str()
            .unwrap()
            .contains("Name and price are required"));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, body) = service_error_to_response(ServiceError::MenuItemNotFound {
            id: "665f1f77bcf86cd799439011".to_string(),
        });

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0["error"], "Menu item not found");
    }

    #[test]
    fn test_invalid_id_maps_to_bad_request() {
        let (status, _) = service_error_to_response(ServiceError::Repository {
            source: RepositoryError::InvalidId {
                id: "abc".to_string(),
            },
        });

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_connection_failure_maps_to_503() {
        let (status, _) = service_error_to_response(ServiceError::Repository {
            source: RepositoryError::ConnectionFailed,
        });

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_other_backend_errors_map_to_500() {
        let (status, body) = service_error_to_response(ServiceError::Repository {
            source: RepositoryError::Backend {
                message: "write concern failure".to_string(),
            },
        });

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // Backend details stay out of the response body
        assert_eq!(body.0["error"], "Internal server error");
    }
}
