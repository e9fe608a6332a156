use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod envelope;
mod locator;
mod pipeline;
mod transforms;

use crate::config::Config;
use crate::pipeline::{Completion, TransformPipeline};
use crate::transforms::transform_for;
use shared::observability::init_default_logging;
use shared::storage::HttpObjectStore;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<TransformPipeline>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
    transform: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_default_logging("transform-service")?;

    let config = Config::from_env()?;
    config.validate()?;

    // One storage client per process, reused across invocations.
    let store = Arc::new(HttpObjectStore::new(config.storage.clone())?);
    let pipeline = Arc::new(TransformPipeline::new(store, transform_for(config.variant)));

    info!(transform = pipeline.transform_name(), "Transform worker configured");

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/notifications", post(handle_notification))
        .with_state(AppState { pipeline })
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Transform service listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "transform-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        transform: state.pipeline.transform_name().to_string(),
    })
}

/// Notification entry point for the invoking runtime.
///
/// The body is taken raw so envelope parse failures flow through the
/// pipeline's own error path. The response is always success-shaped; the
/// run's outcome is conveyed through logs only.
async fn handle_notification(State(state): State<AppState>, body: String) -> StatusCode {
    match state.pipeline.handle(&body).await {
        Completion::Finished => StatusCode::OK,
    }
}
