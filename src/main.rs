//! Service entry point: configuration, tracing, storage pool, router.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use order_service::adapters::cart::HttpCartStore;
use order_service::adapters::events::LoggingEventPublisher;
use order_service::adapters::http::order::{order_router, OrderAppState};
use order_service::adapters::payment::HttpPaymentGateway;
use order_service::adapters::postgres::PostgresOrderRepository;
use order_service::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(environment = ?config.server.environment, "starting order service");

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let client = reqwest::Client::new();
    let state = OrderAppState {
        cart_store: Arc::new(HttpCartStore::new(client.clone(), &config.cart.base_url)),
        repository: Arc::new(PostgresOrderRepository::new(pool)),
        payment_gateway: Arc::new(HttpPaymentGateway::new(
            client,
            &config.payment.base_url,
            config.payment.timeout(),
        )),
        event_publisher: Arc::new(LoggingEventPublisher::new()),
    };

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", order_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
