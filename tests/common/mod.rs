use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{middleware, routing::get, Router};
use mongodb::bson::oid::ObjectId;
use reqwest::Client;
use tokio::net::TcpListener;

use menu_rs::handlers::{
    cors_middleware, health_check, menu, metrics_handler, request_validation_middleware,
    security_headers_middleware,
};
use menu_rs::models::{
    MenuItem, NewMenuItem, RepositoryError, RepositoryResult, UpdateMenuItemRequest,
};
use menu_rs::observability::observability_middleware;
use menu_rs::repositories::MenuRepository;
use menu_rs::services::MenuService;
use menu_rs::Metrics;

/// In-memory MenuRepository standing in for MongoDB. Ids are ObjectId hex
/// strings assigned on insert, matching the production backend.
pub struct InMemoryMenuRepository {
    items: Mutex<Vec<MenuItem>>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMenuRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_id(id: &str) -> RepositoryResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidId { id: id.to_string() })
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<MenuItem>> {
        Ok(self.items.lock().unwrap().clone())
    }

    async fn insert(&self, item: NewMenuItem) -> RepositoryResult<MenuItem> {
        let stored = MenuItem {
            id: ObjectId::new().to_hex(),
            name: item.name,
            description: item.description,
            price: item.price,
        };
        self.items.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &str,
        request: UpdateMenuItemRequest,
    ) -> RepositoryResult<Option<MenuItem>> {
        let object_id = parse_id(id)?;
        let mut items = self.items.lock().unwrap();

        match items.iter_mut().find(|item| item.id == object_id.to_hex()) {
            Some(item) => {
                if let Some(name) = request.name {
                    item.name = name;
                }
                if let Some(description) = request.description {
                    item.description = Some(description);
                }
                if let Some(price) = request.price {
                    item.price = price;
                }
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<Option<MenuItem>> {
        let object_id = parse_id(id)?;
        let mut items = self.items.lock().unwrap();

        match items.iter().position(|item| item.id == object_id.to_hex()) {
            Some(index) => Ok(Some(items.remove(index))),
            None => Ok(None),
        }
    }
}

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
}

impl TestEnvironment {
    /// Start the full application router on an ephemeral port, backed by
    /// a fresh in-memory repository.
    pub async fn new() -> Self {
        let repository = Arc::new(InMemoryMenuRepository::new());
        let menu_service = Arc::new(MenuService::new(repository));
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let metrics_for_middleware = metrics.clone();

        let app = Router::new()
            .route("/health/status", get(health_check))
            .route("/metrics", get(metrics_handler))
            .with_state(metrics)
            .merge(menu::create_menu_router(menu_service))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(middleware::from_fn(cors_middleware))
            .layer(middleware::from_fn(request_validation_middleware))
            .layer(middleware::from_fn(move |req, next| {
                observability_middleware(metrics_for_middleware.clone(), req, next)
            }));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{}", addr),
        }
    }
}
