//! Dataset insights and the downloadable insights report.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use biospace_export::{insights_report, report_filename, representative_publications};
use biospace_kg::{facets, major_topics, research_gaps, trends, Facets, ResearchGap, Trends};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::{attachment, today};
use crate::state::SharedState;

pub const DEFAULT_TOP_TOPICS: usize = 10;
pub const DEFAULT_MAX_GAPS: usize = 50;
pub const MAJOR_TOPICS: usize = 10;
pub const REPRESENTATIVE_PUBLICATIONS: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct InsightsParams {
    pub top: Option<usize>,
    pub gaps: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsView {
    pub trends: Trends,
    pub research_gaps: Vec<ResearchGap>,
    pub major_topics: Vec<String>,
    pub facets: Facets,
}

/// GET /api/insights
pub async fn get_insights(
    State(state): State<SharedState>,
    Query(params): Query<InsightsParams>,
) -> Json<InsightsView> {
    let publications = state.store.all();
    Json(InsightsView {
        trends: trends(publications, params.top.unwrap_or(DEFAULT_TOP_TOPICS)),
        research_gaps: research_gaps(publications, params.gaps.unwrap_or(DEFAULT_MAX_GAPS)),
        major_topics: major_topics(publications, MAJOR_TOPICS),
        facets: facets(publications),
    })
}

/// GET /api/insights/report - PDF download
pub async fn get_report(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let publications = state.store.all();
    let trends = trends(publications, DEFAULT_TOP_TOPICS);
    let gaps = research_gaps(publications, DEFAULT_MAX_GAPS);
    let representative =
        representative_publications(publications, &trends.top_topics, REPRESENTATIVE_PUBLICATIONS);
    let date = today();
    let bytes = insights_report(&trends, &gaps, &representative, date)?;
    Ok(attachment(&report_filename(date), "application/pdf", bytes))
}
