use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use super::api::{self, AppState};
use super::bot::{Bot, DEFAULT_PRODUCTION_TARGET, HttpAnswerProvider, KeywordResponder};
use super::store::DataStore;

/// Configuration for the metrics server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub permissive_cors: bool,
    pub production_target: f64,
    pub answer_url: Option<String>,
    pub answer_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_path: PathBuf::from("data/factory.csv"),
            permissive_cors: true,
            production_target: DEFAULT_PRODUCTION_TARGET,
            answer_url: None,
            answer_timeout: Duration::from_secs(10),
        }
    }
}

/// Assemble the shared state: load the dataset once and wire up the bot.
pub fn build_state(config: &ServerConfig) -> Arc<AppState> {
    let store = DataStore::from_path(&config.data_path);
    let mut bot = Bot::new(KeywordResponder::new(store.clone(), config.production_target));
    if let Some(url) = &config.answer_url {
        info!(url = %url, "Using remote answer provider");
        bot = bot.with_remote(Arc::new(HttpAnswerProvider::new(url.clone())), config.answer_timeout);
    }
    Arc::new(AppState { store, bot })
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>, permissive_cors: bool) -> Router {
    let app = api::api_router().with_state(state);
    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the metrics server and serve until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let state = build_state(&config);
    if !state.store.has_data() {
        info!(path = %config.data_path.display(), "No dataset loaded, endpoints will serve placeholder values");
    }

    let app = build_router(state, config.permissive_cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "Floorwatch listening");
    println!("Floorwatch running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
