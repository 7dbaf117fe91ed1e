use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub publications: usize,
    /// Model behind the prompt flows, `null` when they are disabled.
    pub flows_model: Option<String>,
    pub api_base_url: String,
}

/// GET /api/health
pub async fn health(State(state): State<SharedState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        publications: state.store.len(),
        flows_model: state.flows.as_ref().map(|f| f.model_id().to_string()),
        api_base_url: state.api.base_url().to_string(),
    })
}

/// GET /api/remote/health - health of the remote search service
pub async fn remote_health(
    State(state): State<SharedState>,
) -> Result<Json<biospace_search::types::Health>, ApiError> {
    Ok(Json(state.api.health().await?))
}
