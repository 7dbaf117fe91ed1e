//! Axum router: maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    conversation::{clear, get_transcript, submit},
    database,
    flows::{chat, consensus, summarize, targeted_summary},
    graph::{export_node, get_graph, node_publications},
    health::{health, remote_health},
    insights::{get_insights, get_report},
    publications::{get_publication, list_facets, list_publications, summarize_publication},
    search::{search, workflow},
};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/health",        get(health))
        .route("/api/remote/health", get(remote_health))

        // Publications
        .route("/api/publications",              get(list_publications))
        .route("/api/publications/facets",       get(list_facets))
        .route("/api/publications/{id}",         get(get_publication))
        .route("/api/publications/{id}/summary", post(summarize_publication))

        // Knowledge map
        .route("/api/graph",                               get(get_graph))
        .route("/api/graph/nodes/{node_id}/publications",  get(node_publications))
        .route("/api/graph/nodes/{node_id}/export",        get(export_node))

        // Insights
        .route("/api/insights",        get(get_insights))
        .route("/api/insights/report", get(get_report))

        // Prompt flows
        .route("/api/flows/summarize",        post(summarize))
        .route("/api/flows/targeted-summary", post(targeted_summary))
        .route("/api/flows/consensus",        post(consensus))
        .route("/api/flows/chat",             post(chat))

        // Remote search
        .route("/api/search",   post(search))
        .route("/api/workflow", post(workflow))
        .route("/api/conversation",        get(get_transcript).post(submit).delete(clear))
        .route("/api/conversation/events", get(sse_handler))

        // Remote database
        .route("/api/database/status",        get(database::status))
        .route("/api/database/stats",         get(database::stats))
        .route("/api/database/papers",        get(database::papers))
        .route("/api/database/papers/search", get(database::search_papers))
        .route("/api/database/load-papers",   post(database::load_papers))
        .route("/api/database/load-csv",      post(database::load_csv))
        .route("/api/database/append-csv",    post(database::append_csv))
        .route("/api/database/reset",         post(database::reset))
        .route("/api/models",                 get(database::models))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
