//! Prompt flow endpoints. Inputs are validated by the flows themselves;
//! invalid input never reaches the model.

use axum::extract::State;
use axum::Json;
use biospace_llm::flows::{
    AnalyzeConsensusInput, AnalyzeConsensusOutput, ChatInput, ChatOutput, SummarizePublicationInput,
    SummarizePublicationOutput, TargetedSummaryInput, TargetedSummaryOutput,
};

use crate::error::ApiError;
use crate::state::SharedState;

/// POST /api/flows/summarize
pub async fn summarize(
    State(state): State<SharedState>,
    Json(input): Json<SummarizePublicationInput>,
) -> Result<Json<SummarizePublicationOutput>, ApiError> {
    Ok(Json(state.flows()?.summarize_publication(input).await?))
}

/// POST /api/flows/targeted-summary
pub async fn targeted_summary(
    State(state): State<SharedState>,
    Json(input): Json<TargetedSummaryInput>,
) -> Result<Json<TargetedSummaryOutput>, ApiError> {
    Ok(Json(state.flows()?.targeted_summary(input).await?))
}

/// POST /api/flows/consensus
pub async fn consensus(
    State(state): State<SharedState>,
    Json(input): Json<AnalyzeConsensusInput>,
) -> Result<Json<AnalyzeConsensusOutput>, ApiError> {
    Ok(Json(state.flows()?.analyze_consensus(input).await?))
}

/// POST /api/flows/chat
pub async fn chat(
    State(state): State<SharedState>,
    Json(input): Json<ChatInput>,
) -> Result<Json<ChatOutput>, ApiError> {
    Ok(Json(state.flows()?.chat_with_data(input).await?))
}
