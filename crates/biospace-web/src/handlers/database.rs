//! Remote paper database management.

use axum::extract::{Query, State};
use axum::Json;
use biospace_search::actions::{self, ActionResult};
use biospace_search::types::{
    CsvLoadResponse, DatabaseStats, DatabaseStatus, LoadPapersResponse, ModelList, PaperPage, PaperSearch,
    StatusMessage,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPapersBody {
    #[serde(default = "default_num_papers")]
    pub num_papers: u32,
}

fn default_num_papers() -> u32 { 10 }

/// POST /api/database/load-papers
pub async fn load_papers(
    State(state): State<SharedState>,
    Json(body): Json<LoadPapersBody>,
) -> Json<ActionResult<LoadPapersResponse>> {
    Json(actions::load_papers(&state.api, body.num_papers).await)
}

/// POST /api/database/load-csv
pub async fn load_csv(State(state): State<SharedState>) -> Json<ActionResult<CsvLoadResponse>> {
    Json(actions::load_csv_to_database(&state.api).await)
}

/// POST /api/database/reset
pub async fn reset(State(state): State<SharedState>) -> Json<ActionResult<StatusMessage>> {
    Json(actions::reset_database(&state.api).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendCsvBody {
    pub csv_url: String,
}

/// POST /api/database/append-csv
pub async fn append_csv(
    State(state): State<SharedState>,
    Json(body): Json<AppendCsvBody>,
) -> Result<Json<CsvLoadResponse>, ApiError> {
    if body.csv_url.trim().is_empty() {
        return Err(ApiError::BadRequest("csvUrl must not be empty".into()));
    }
    Ok(Json(state.api.append_csv(&body.csv_url).await?))
}

/// GET /api/database/status
pub async fn status(State(state): State<SharedState>) -> Result<Json<DatabaseStatus>, ApiError> {
    Ok(Json(state.api.database_status().await?))
}

/// GET /api/database/stats
pub async fn stats(State(state): State<SharedState>) -> Result<Json<DatabaseStats>, ApiError> {
    Ok(Json(state.api.database_stats().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct PapersParams {
    /// `loaded`, `unloaded` or `all` (default).
    pub filter: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/database/papers
pub async fn papers(
    State(state): State<SharedState>,
    Query(params): Query<PapersParams>,
) -> Result<Json<PaperPage>, ApiError> {
    let page = match params.filter.as_deref().unwrap_or("all") {
        "loaded" => state.api.loaded_papers(params.limit).await?,
        "unloaded" => state.api.unloaded_papers(params.limit).await?,
        "all" => state.api.all_papers().await?,
        other => return Err(ApiError::BadRequest(format!("Unknown paper filter: {other}"))),
    };
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSearchParams {
    pub query: String,
    #[serde(default)]
    pub loaded_only: bool,
}

/// GET /api/database/papers/search
pub async fn search_papers(
    State(state): State<SharedState>,
    Query(params): Query<PaperSearchParams>,
) -> Result<Json<PaperSearch>, ApiError> {
    Ok(Json(state.api.search_papers_in_db(&params.query, params.loaded_only).await?))
}

/// GET /api/models
pub async fn models(State(state): State<SharedState>) -> Result<Json<ModelList>, ApiError> {
    Ok(Json(state.api.list_models().await?))
}
