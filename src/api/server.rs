//! HTTP server implementation for the caption service

use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::config::Config;
use crate::fetcher::CaptionSource;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CaptionSource>,
}

/// Build the application router with CORS and tracing middleware
pub fn build_router(state: AppState) -> Router {
    // Any origin may call the service
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/transcript", get(handlers::get_transcript))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

/// Configure and start the HTTP server
pub async fn start_http_server(source: Arc<dyn CaptionSource>, config: Arc<Config>) -> Result<()> {
    let app = build_router(AppState { source });

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Caption service listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
