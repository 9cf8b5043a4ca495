//! Caption service module
//!
//! Exposes the transcript read endpoint over HTTP for the browser UI and the
//! CLI client.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::fetcher::CaptionSource;

pub mod handlers;
pub mod server;

/// HTTP server for the caption service
pub struct ApiServer {
    source: Arc<dyn CaptionSource>,
    config: Arc<Config>,
}

impl ApiServer {
    /// Create a new caption service
    pub fn new(source: Arc<dyn CaptionSource>, config: Arc<Config>) -> Self {
        Self { source, config }
    }

    /// Start the caption service in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the caption service
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting caption service on port {}", self.config.server.port);

        server::start_http_server(self.source, self.config).await
    }
}
