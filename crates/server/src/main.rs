use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod relay;

use app_state::AppState;
use config::{load_settings, DESTINATION_URL_ENV};
use relay::{API_REGISTER_ROUTE, REGISTER_ROUTE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    if settings.destination_url.is_none() {
        warn!(
            env = DESTINATION_URL_ENV,
            "webhook destination is not configured; registrations will fail until it is set"
        );
    }

    let state = AppState::from_settings(&settings)?;
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(%addr, validation_mode = ?settings.validation_mode, "registration relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(REGISTER_ROUTE, any(relay::register))
        .route(API_REGISTER_ROUTE, any(relay::register))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(middleware::map_response(relay::json_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
