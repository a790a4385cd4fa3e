use serde::{Deserialize, Serialize};

/// Core menu item model as it is served over the API.
///
/// The `id` is the hex form of the ObjectId assigned by MongoDB on insert
/// and is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
}

/// Candidate fields for a menu item that passed creation validation.
///
/// Carries no id; the backend assigns one when the record is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Request model for creating a new menu item.
///
/// `name` and `price` are optional at the type level so that a missing
/// field reaches the service validation path and is reported as a 400
/// rather than being rejected during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Request model for updating an existing menu item. Fields left out of
/// the payload are left unchanged; fields present overwrite unconditionally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl UpdateMenuItemRequest {
    /// True when the payload carries no fields at all, in which case an
    /// update is a no-op read of the current record.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMenuItemResponse {
    pub message: String,
}

impl DeleteMenuItemResponse {
    pub fn new() -> Self {
        Self {
            message: "Menu item deleted successfully".to_string(),
        }
    }
}

impl Default for DeleteMenuItemResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_serialization_omits_absent_description() {
        let item = MenuItem {
            id: "665f1f77bcf86cd799439011".to_string(),
            name: "Burger".to_string(),
            description: None,
            price: 8.5,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "665f1f77bcf86cd799439011");
        assert_eq!(json["name"], "Burger");
        assert_eq!(json["price"], 8.5);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_menu_item_serialization_with_description() {
        let item = MenuItem {
            id: "665f1f77bcf86cd799439011".to_string(),
            name: "Salad".to_string(),
            description: Some("Greens".to_string()),
            price: 6.0,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["description"], "Greens");
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        // Missing name and price must deserialize so the service can reject
        // them with a client error instead of a body-parsing failure.
        let request: CreateMenuItemRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(request.name.is_none());
        assert!(request.price.is_none());

        let request: CreateMenuItemRequest =
            serde_json::from_str(r#"{"name":"Burger","price":8.5}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("Burger"));
        assert_eq!(request.price, Some(8.5));
        assert!(request.description.is_none());
    }

    #[test]
    fn test_update_request_is_empty() {
        let request = UpdateMenuItemRequest::default();
        assert!(request.is_empty());

        let request = UpdateMenuItemRequest {
            price: Some(9.99),
            ..Default::default()
        };
        assert!(!request.is_empty());
    }

    #[test]
    fn test_delete_response_message() {
        let response = DeleteMenuItemResponse::new();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("Menu item deleted successfully"));
    }
}
