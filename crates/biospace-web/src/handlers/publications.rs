//! Publication dashboard: text filter, facet filter, detail lookup and
//! per-publication summaries.

use axum::extract::{Path, Query, State};
use axum::Json;
use biospace_common::Publication;
use biospace_kg::{facets, FacetFilter, Facets};
use biospace_llm::flows::{Section, SummarizePublicationInput, SummarizePublicationOutput};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

/// Query string for the publication list. Facet groups are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct PublicationFilter {
    pub q: Option<String>,
    pub topics: Option<String>,
    pub organisms: Option<String>,
    pub environments: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl PublicationFilter {
    pub fn facet_filter(&self) -> FacetFilter {
        FacetFilter {
            topics: split_list(self.topics.as_deref()),
            organisms: split_list(self.organisms.as_deref()),
            environments: split_list(self.environments.as_deref()),
        }
    }
}

/// GET /api/publications
pub async fn list_publications(
    State(state): State<SharedState>,
    Query(filter): Query<PublicationFilter>,
) -> Json<Vec<Publication>> {
    let matched = state.store.filter_text(filter.q.as_deref().unwrap_or_default());
    let publications = filter.facet_filter().apply(matched).into_iter().cloned().collect();
    Json(publications)
}

/// GET /api/publications/facets
pub async fn list_facets(State(state): State<SharedState>) -> Json<Facets> {
    Json(facets(state.store.all()))
}

/// GET /api/publications/{id}
pub async fn get_publication(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Publication>, ApiError> {
    state
        .store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Publication not found: {id}")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationSummaryRequest {
    #[serde(default)]
    pub sections_to_summarize: Option<Vec<Section>>,
}

/// POST /api/publications/{id}/summary - summarize a stored publication
pub async fn summarize_publication(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<PublicationSummaryRequest>,
) -> Result<Json<SummarizePublicationOutput>, ApiError> {
    let flows = state.flows()?;
    let publication = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Publication not found: {id}")))?;
    let input = SummarizePublicationInput {
        publication_text: publication.full_text.clone(),
        sections_to_summarize: req.sections_to_summarize,
    };
    Ok(Json(flows.summarize_publication(input).await?))
}
