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
use tracing::{error, info};

mod callback;
mod config;
mod provisioner;

use crate::callback::HttpCallback;
use crate::config::Config;
use crate::provisioner::{HttpPermissionGranter, ProvisionRequest, Provisioner};
use shared::observability::init_default_logging;

#[derive(Clone)]
struct AppState {
    provisioner: Arc<Provisioner>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_default_logging("bootstrap-service")?;

    let config = Config::from_env()?;
    config.validate()?;

    let granter = Arc::new(HttpPermissionGranter::new(
        config.permissions_endpoint.clone(),
        config.request_timeout_seconds,
    )?);
    let callback = Arc::new(HttpCallback::new(config.request_timeout_seconds)?);
    let provisioner = Arc::new(Provisioner::new(granter, callback));

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/provision", post(handle_provision))
        .with_state(AppState { provisioner })
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Bootstrap service listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "bootstrap-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Deployment lifecycle entry point.
///
/// The result is reported to the caller-supplied callback URL; the HTTP
/// response here only acknowledges receipt.
async fn handle_provision(
    State(state): State<AppState>,
    Json(request): Json<ProvisionRequest>,
) -> StatusCode {
    if let Err(e) = state.provisioner.handle(request).await {
        error!(error = %e, "Provision callback delivery failed");
    }
    StatusCode::OK
}
