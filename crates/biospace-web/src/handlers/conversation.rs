//! Search chat transcript. Submitting returns immediately; results arrive
//! on the transcript and on the event stream as each remote call finishes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use biospace_search::types::SourceDocument;
use biospace_search::{ChatMessage, DecoratedWorkflow, Theme};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::handlers::search::SearchRequest;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct TranscriptParams {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptView {
    pub messages: Vec<ChatMessage>,
    pub workflow: Option<DecoratedWorkflow>,
    pub sources: Vec<SourceDocument>,
}

/// GET /api/conversation
pub async fn get_transcript(
    State(state): State<SharedState>,
    Query(params): Query<TranscriptParams>,
) -> Json<TranscriptView> {
    let convo = &state.conversation;
    Json(TranscriptView {
        messages: convo.messages().await,
        workflow: convo.workflow(params.theme).await,
        sources: convo.sources().await,
    })
}

/// POST /api/conversation - blank queries are ignored
pub async fn submit(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> (StatusCode, Json<Value>) {
    let opts = req.options(&state.search);
    match state.conversation.submit(&req.query, opts).await {
        Some(_) => (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))),
        None => (StatusCode::OK, Json(json!({ "accepted": false }))),
    }
}

/// DELETE /api/conversation
pub async fn clear(State(state): State<SharedState>) -> StatusCode {
    state.conversation.clear().await;
    StatusCode::NO_CONTENT
}
