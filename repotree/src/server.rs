use crate::config::ServerConfig;
use crate::handlers;
use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use repotree_core::RepoBrowser;
use repotree_scanner::GithubClient;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub browser: RepoBrowser,
}

impl AppState {
    pub fn new(browser: RepoBrowser) -> Self {
        Self { browser }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let client = GithubClient::new(config.client_options())
            .context("Failed to create upstream API client")?;
        Ok(Self::new(RepoBrowser::new(client, config.workers)))
    }
}

/// Credentialed CORS for the listed origins. Methods and headers mirror the
/// preflight request since wildcards cannot be combined with credentials.
pub fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(state: AppState, origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/repo-files", get(handlers::repo_files))
        .route("/repo-files/", get(handlers::repo_files))
        .route("/file-content", get(handlers::file_content))
        .route("/file-content/", get(handlers::file_content))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state, config.origin_headers()?);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a handler the server runs until the process is killed
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
