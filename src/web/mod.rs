//! HTTP front end: router, shared state and server loop

pub mod handlers;
pub mod pages;

use anyhow::{Context, Result};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tracing::info;

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::session::{self, SessionStore};

/// Shared application state injected into all route handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog =
            CatalogClient::new(&config.catalog).context("Failed to build catalog client")?;
        Ok(Self {
            catalog,
            sessions: Arc::new(SessionStore::new(&config.session)),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/search", get(handlers::search))
        .route("/save_book", post(handlers::save_book))
        .route("/remove_book", post(handlers::remove_book))
        .route("/readinglist", get(handlers::reading_list))
        .route("/profile", get(handlers::profile))
        .layer(ServiceBuilder::new().layer(from_fn_with_state(
            state.sessions.clone(),
            session::session_middleware,
        )))
        // Routes below are not wrapped by the session layer
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl-C
pub async fn serve(config: &Config, bind: &str) -> Result<()> {
    let state = AppState::from_config(config)?;
    let purge = session::spawn_purge_task(
        state.sessions.clone(),
        Duration::from_secs(config.session.purge_interval_secs.max(1)),
    );

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let addr = listener.local_addr().context("Failed to read local address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    purge.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
