use crate::config::Config;
use crate::errors::AppError;
use crate::models::{ClientRecord, LookupRequest, LookupResponse};
use crate::status::{ApiStatus, StatusRecord, StatusTracker};
use crate::switchtransact_client::{LookupOutcome, SwitchTransactClient};
use crate::validation::validate_id_number;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub const HEALTHY_MESSAGE: &str = "API responded normally";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Outcome of the most recent SwitchTransact call.
    pub status: StatusTracker,
    /// SwitchTransact client; `None` when no API key is configured.
    pub client: Option<SwitchTransactClient>,
}

impl AppState {
    /// Builds the state, creating the upstream client only when an API key is set.
    pub fn new(config: Config, status: StatusTracker) -> Result<Self, AppError> {
        let client = match config.api_key.clone() {
            Some(api_key) => Some(SwitchTransactClient::new(
                config.upstream_base_url.clone(),
                api_key,
                config.upstream_timeout(),
                config.probe_timeout(),
            )?),
            None => None,
        };

        Ok(Self {
            config,
            status,
            client,
        })
    }
}

/// Health check endpoint.
///
/// Liveness only; never calls SwitchTransact.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/status
///
/// Returns the status tracker snapshot.
pub async fn api_status(State(state): State<Arc<AppState>>) -> Json<StatusRecord> {
    Json(state.status.read())
}

/// POST /api/check-client
///
/// Validates the ID number, looks it up at SwitchTransact and returns the
/// normalized client record. Every attempt that reaches the upstream stage
/// updates the status tracker exactly once.
///
/// # Returns
///
/// * `Ok(Json<LookupResponse>)` - `success` or `not_found`, both HTTP 200.
/// * `Err(AppError)` - rendered as `{status: "error", message}`.
pub async fn check_client(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<LookupResponse>, AppError> {
    let Json(request) = payload?;
    let id_number = validate_id_number(request.id_number.as_deref())?;

    tracing::info!("POST /api/check-client - id_number: {}", id_number);

    let Some(client) = state.client.as_ref() else {
        let err =
            AppError::MissingConfiguration("SWITCHTRANSACT_API_KEY is not set".to_string());
        state.status.update(ApiStatus::Error, err.tracker_message());
        return Err(err);
    };

    match client.fetch_person_details(&id_number).await {
        Ok(LookupOutcome::Found(details)) => {
            state.status.update(ApiStatus::Ok, HEALTHY_MESSAGE);
            Ok(Json(LookupResponse::Success {
                data: ClientRecord::from(details),
            }))
        }
        Ok(LookupOutcome::NotFound) => {
            state.status.update(ApiStatus::Ok, HEALTHY_MESSAGE);
            Ok(Json(LookupResponse::NotFound {
                message: format!("no client record found for {}", id_number),
            }))
        }
        Err(err) => {
            state.status.update(ApiStatus::Error, err.tracker_message());
            Err(err)
        }
    }
}

/// Seeds the status tracker from a single SwitchTransact probe.
pub async fn seed_status_from_probe(client: &SwitchTransactClient, status: &StatusTracker) {
    match client.probe().await {
        Ok(()) => status.update(ApiStatus::Ok, "API is responding normally"),
        Err(err) => {
            tracing::warn!("Startup status probe failed: {}", err);
            status.update(ApiStatus::Error, err.tracker_message());
        }
    }
}
