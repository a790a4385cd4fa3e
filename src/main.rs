use axum::{middleware, routing::get, Router};
use mongodb::bson::doc;
use mongodb::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use menu_rs::{
    handlers::{
        cors_middleware, health_check, menu, metrics_handler, request_validation_middleware,
        security_headers_middleware,
    },
    init_observability,
    observability::observability_middleware,
    repositories::{MenuItemDocument, MongoMenuRepository},
    services::MenuService,
    shutdown_observability, Config, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        config.observability.otlp_endpoint.as_deref(),
        config.observability.enable_json_logging,
    )?;

    info!("Starting menu-rs service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!(
        "MongoDB: database={}, collection={}",
        config.database.database_name, config.database.collection_name
    );

    // Initialize metrics
    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    // One client for the process lifetime; the driver manages pooling
    let client = Client::with_uri_str(&config.database.mongo_uri).await?;
    let database = client.database(&config.database.database_name);

    // A failed ping is logged but does not halt the process: requests
    // will surface backend errors until the database becomes reachable
    match database.run_command(doc! { "ping": 1 }).await {
        Ok(_) => info!("Connected to MongoDB"),
        Err(e) => warn!("MongoDB connectivity check failed: {}", e),
    }

    let collection = database.collection::<MenuItemDocument>(&config.database.collection_name);
    let menu_repository = Arc::new(MongoMenuRepository::new(
        collection,
        config.database.database_name.clone(),
        metrics.clone(),
    ));
    info!("Repository initialized successfully");

    let menu_service = Arc::new(MenuService::new(menu_repository));
    info!("Service initialized successfully");

    // Build the application router
    let app = create_app(metrics, menu_service);

    // Create socket address
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Server listening on {}", addr);

    // Create TCP listener
    let listener = TcpListener::bind(addr).await?;

    // Set up graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received");
        shutdown_observability().await;
    };

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn create_app(metrics: Arc<Metrics>, menu_service: Arc<MenuService>) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        // Health and metrics endpoints (with metrics state)
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        // Menu CRUD endpoints
        .merge(menu::create_menu_router(menu_service))
        // Add middleware layers (order matters - outer to inner)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_validation_middleware))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(TraceLayer::new_for_http())
}
