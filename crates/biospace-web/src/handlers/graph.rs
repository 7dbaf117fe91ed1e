//! Knowledge map: graph with selection styling, node publications, exports.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use biospace_export::{export, ExportFormat, ExportTarget};
use biospace_kg::{highlight, GraphEdge, GraphNode, Highlight};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::{attachment, today};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    pub selected: Option<String>,
}

#[derive(Serialize)]
struct GraphView<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    styles: Highlight,
}

/// GET /api/graph
pub async fn get_graph(State(state): State<SharedState>, Query(params): Query<GraphParams>) -> Response {
    let selected = params.selected.as_deref().filter(|s| !s.is_empty());
    let view = GraphView {
        nodes: &state.graph.nodes,
        edges: &state.graph.edges,
        styles: highlight(&state.graph, selected),
    };
    Json(view).into_response()
}

fn node_or_404<'a>(state: &'a SharedState, node_id: &str) -> Result<&'a GraphNode, ApiError> {
    state
        .graph
        .node(node_id)
        .ok_or_else(|| ApiError::NotFound(format!("Graph node not found: {node_id}")))
}

/// GET /api/graph/nodes/{node_id}/publications
pub async fn node_publications(
    State(state): State<SharedState>,
    Path(node_id): Path<String>,
) -> Result<Response, ApiError> {
    node_or_404(&state, &node_id)?;
    let related = state.graph.related_publications(&node_id).unwrap_or_default();
    Ok(Json(related).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

/// GET /api/graph/nodes/{node_id}/export?format=csv|pdf
pub async fn export_node(
    State(state): State<SharedState>,
    Path(node_id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = params.format.as_deref().unwrap_or("csv").parse()?;
    let node = node_or_404(&state, &node_id)?;
    let target = ExportTarget::from_node(node);
    let related = state.graph.related_publications(&node_id).unwrap_or_default();
    let file = export(format, &target, &related, today())?;
    Ok(attachment(&file.filename, file.content_type, file.bytes))
}
