use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::models::{
    MenuItem, NewMenuItem, RepositoryError, RepositoryResult, UpdateMenuItemRequest,
};
use crate::observability::Metrics;

/// Trait defining the interface for menu item data access operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Retrieve every stored menu item in backend-default order
    async fn find_all(&self) -> RepositoryResult<Vec<MenuItem>>;

    /// Insert a new menu item; the backend assigns the id
    async fn insert(&self, item: NewMenuItem) -> RepositoryResult<MenuItem>;

    /// Merge the given fields into the identified item and return the
    /// post-update record, or None if no such id exists
    async fn update(
        &self,
        id: &str,
        request: UpdateMenuItemRequest,
    ) -> RepositoryResult<Option<MenuItem>>;

    /// Remove the identified item permanently, returning the deleted
    /// record, or None if no such id exists
    async fn delete(&self, id: &str) -> RepositoryResult<Option<MenuItem>>;
}

/// Stored form of a menu item. `_id` is absent on insert so that MongoDB
/// assigns it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MenuItemDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
}

impl MenuItemDocument {
    /// Build the insert payload for a validated creation request
    pub fn from_new(item: NewMenuItem) -> Self {
        Self {
            id: None,
            name: item.name,
            description: item.description,
            price: item.price,
        }
    }

    /// Convert a stored document into the API model
    pub fn into_menu_item(self) -> RepositoryResult<MenuItem> {
        let id = self.id.ok_or_else(|| RepositoryError::Serialization {
            message: "stored document is missing _id".to_string(),
        })?;

        Ok(MenuItem {
            id: id.to_hex(),
            name: self.name,
            description: self.description,
            price: self.price,
        })
    }
}

/// Build the `$set` document for a partial update. Only fields present in
/// the request are written; everything else is left untouched.
pub fn update_document(request: &UpdateMenuItemRequest) -> Document {
    let mut set = Document::new();
    if let Some(ref name) = request.name {
        set.insert("name", name);
    }
    if let Some(ref description) = request.description {
        set.insert("description", description);
    }
    if let Some(price) = request.price {
        set.insert("price", price);
    }
    doc! { "$set": set }
}

/// Parse a path id into an ObjectId, reporting malformed values as a
/// distinct client-side error kind
pub fn parse_object_id(id: &str) -> RepositoryResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidId { id: id.to_string() })
}

/// MongoDB implementation of the MenuRepository trait
pub struct MongoMenuRepository {
    collection: Collection<MenuItemDocument>,
    database_name: String,
    metrics: Arc<Metrics>,
}

impl MongoMenuRepository {
    /// Create a new MongoDB menu repository
    pub fn new(
        collection: Collection<MenuItemDocument>,
        database_name: String,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            collection,
            database_name,
            metrics,
        }
    }

    /// Get the collection name (for testing)
    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// Create a MongoDB client span with database semantic conventions
    fn create_mongodb_span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "MongoDB",
            "otel.kind" = "client",
            "otel.name" = format!("{}.{}", self.collection.name(), operation),
            "db.system" = "mongodb",
            "db.name" = %self.database_name,
            "db.mongodb.collection" = self.collection.name(),
            "db.operation" = operation,
        )
    }

    /// Run a driver call inside a client span and record operation metrics
    async fn timed<T, F>(&self, operation: &str, fut: F) -> RepositoryResult<T>
    where
        F: IntoFuture<Output = Result<T, mongodb::error::Error>>,
    {
        let start = Instant::now();
        let result = fut
            .into_future()
            .instrument(self.create_mongodb_span(operation))
            .await;
        self.metrics.record_database_operation(
            operation,
            self.collection.name(),
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );
        result.map_err(RepositoryError::from)
    }
}

#[async_trait]
impl MenuRepository for MongoMenuRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<MenuItem>> {
        let documents = self
            .timed("find", async {
                let mut cursor = self.collection.find(doc! {}).await?;
                let mut documents = Vec::new();
                while let Some(document) = cursor.try_next().await? {
                    documents.push(document);
                }
                Ok(documents)
            })
            .await?;

        documents
            .into_iter()
            .map(MenuItemDocument::into_menu_item)
            .collect()
    }

    async fn insert(&self, item: NewMenuItem) -> RepositoryResult<MenuItem> {
        let mut document = MenuItemDocument::from_new(item);

        let result = self
            .timed("insert_one", self.collection.insert_one(&document))
            .await?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| RepositoryError::Backend {
                message: "insert did not return an ObjectId".to_string(),
            })?;

        document.id = Some(id);
        document.into_menu_item()
    }

    async fn update(
        &self,
        id: &str,
        request: UpdateMenuItemRequest,
    ) -> RepositoryResult<Option<MenuItem>> {
        let object_id = parse_object_id(id)?;
        let filter = doc! { "_id": object_id };

        // An empty payload carries nothing to merge; MongoDB rejects an
        // empty $set, so read the current record instead.
        let document = if request.is_empty() {
            self.timed("find_one", self.collection.find_one(filter))
                .await?
        } else {
            self.timed(
                "find_one_and_update",
                self.collection
                    .find_one_and_update(filter, update_document(&request))
                    .return_document(ReturnDocument::After),
            )
            .await?
        };

        document.map(MenuItemDocument::into_menu_item).transpose()
    }

    async fn delete(&self, id: &str) -> RepositoryResult<Option<MenuItem>> {
        let object_id = parse_object_id(id)?;

        let document = self
            .timed(
                "find_one_and_delete",
                self.collection.find_one_and_delete(doc! { "_id": object_id }),
            )
            .await?;

        document.map(MenuItemDocument::into_menu_item).transpose()
    }
}
