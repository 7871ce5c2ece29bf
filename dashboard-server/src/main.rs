//! NIDS Dashboard Server
//!
//! Upload network-traffic CSVs, classify every row, export and summarize.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      NIDS DASHBOARD                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐  │
//! │  │  API      │  │  Session      │  │  Pipeline           │  │
//! │  │  (Axum)   │──│  Store        │──│  align → infer      │  │
//! │  │           │  │  (in-memory)  │  │  (blocking pool)    │  │
//! │  └───────────┘  └───────────────┘  └──────────┬──────────┘  │
//! │                                               ▼             │
//! │                                   ┌─────────────────────┐   │
//! │                                   │ Assets (read-only)  │   │
//! │                                   │ ONNX · labels · 49f │   │
//! │                                   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod store;
mod models;
mod handlers;
mod error;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nids_core::Assets;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(config.log_json || config.is_production());

    tracing::info!("NIDS Dashboard v{} starting ({})", env!("CARGO_PKG_VERSION"), config.environment);

    // Assets are mandatory: no half-initialized server
    let assets = Assets::load(&config.assets)
        .context("Failed to load model assets")?;
    tracing::info!(
        "Model '{}' ready: {} features, {} labels",
        assets.metadata().model_name,
        assets.metadata().feature_count,
        assets.metadata().label_count
    );

    // Build application state
    let state = AppState::new(assets, config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nids_dashboard=debug,nids_core=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<Assets>,
    pub sessions: Arc<store::SessionStore>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(assets: Assets, config: config::Config) -> Self {
        Self {
            assets: Arc::new(assets),
            sessions: Arc::new(store::SessionStore::new(config.max_sessions)),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    let session_routes = Router::new()
        .route("/api/v1/sessions", post(handlers::sessions::upload))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::sessions::get).delete(handlers::sessions::delete),
        )
        .route("/api/v1/sessions/:id/predict", post(handlers::predictions::run))
        .route("/api/v1/sessions/:id/predictions.csv", get(handlers::predictions::download))
        .route("/api/v1/sessions/:id/summary", get(handlers::visualization::summary))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/schema", get(handlers::schema::get))
        .merge(session_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
