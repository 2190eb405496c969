mod assets;
mod handlers;

pub use handlers::{GenerateRecipeRequest, GenerateRecipeResponse, ServiceStatus};

use crate::config::AppConfig;
use crate::error::{ChomptronError, Result};
use crate::providers::{LlmProvider, ProviderFactory};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Read-only state shared by every request
#[derive(Clone)]
pub struct AppState {
    service_name: Arc<str>,
    provider: Option<Arc<dyn LlmProvider>>,
    static_dir: Arc<PathBuf>,
}

impl AppState {
    /// `provider` is `None` when no credential is configured; the server
    /// still starts but reports itself not ready.
    pub fn new(
        service_name: impl Into<String>,
        provider: Option<Arc<dyn LlmProvider>>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service_name: Arc::from(service_name.into()),
            provider,
            static_dir: Arc::new(static_dir.into()),
        }
    }

    /// Build state from configuration, tolerating a missing API key.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let created = ProviderFactory::create(&config.gemini);
        let provider: Option<Arc<dyn LlmProvider>> = match created {
            Ok(provider) => Some(Arc::from(provider)),
            Err(ChomptronError::MissingCredential(var)) => {
                warn!("{} is not set; recipe generation is unavailable", var);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self::new(
            config.service_name.clone(),
            provider,
            config.server.static_dir.clone(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.static_dir.as_path());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/api/generate-recipe", post(handlers::generate_recipe))
        .route("/sitemap.xml", get(assets::sitemap))
        .route("/robots.txt", get(assets::robots))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_server(config: &AppConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(
        "Chomptron AI Recipe Generator running on port {}",
        config.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Chomptron shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C, running until killed: {}", e);
        std::future::pending::<()>().await;
    }
}
