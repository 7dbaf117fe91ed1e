//! End-to-end checks of the HTTP API with an in-memory dataset, a scripted
//! model backend and a mocked remote search service.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use biospace_ingestion::PublicationStore;
use biospace_llm::{FlowRunner, FlowService, LlmBackend, LlmError, LlmRequest, LlmResponse, PublicationQuery};
use biospace_search::{ApiClient, SearchOptions};
use biospace_web::router::build_router;
use biospace_web::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

const DATASET: &str = r#"[
    {"title": "Bone loss in mice", "link": "https://osdr.nasa.gov/PMC2019001", "authors": ["Ada"],
     "abstract": "Mice lose bone in microgravity.", "keywords": ["Bone Loss", "Rodent Model", "Microgravity"]},
    {"title": "Root growth", "link": "https://osdr.nasa.gov/PMC2021002",
     "abstract": "Roots bend toward light.", "keywords": ["Plant Biology", "Arabidopsis Thaliana", "Spaceflight"]},
    {"title": "Muscle atrophy", "link": "https://osdr.nasa.gov/PMC2020003", "keywords": ["Muscle Atrophy", "Rodent Model"]}
]"#;

const BONE_ID: &str = "https://osdr.nasa.gov/PMC2019001";
const BONE_ID_ENCODED: &str = "https%3A%2F%2Fosdr.nasa.gov%2FPMC2019001";

struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(replies: &[Value]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(Value::to_string).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmBackend for ScriptedModel {
    async fn complete(&self, _req: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Unavailable("no scripted reply".into()))?;
        Ok(LlmResponse { content, model: "scripted".into(), prompt_tokens: 0, completion_tokens: 0 })
    }

    fn model_id(&self) -> &str { "scripted" }
    fn is_local(&self) -> bool { true }
}

fn app(model: Option<Arc<ScriptedModel>>, api_url: &str) -> Router {
    let store = Arc::new(PublicationStore::from_json_str(DATASET));
    let flows = model.map(|m| {
        let query: Arc<dyn PublicationQuery> = store.clone();
        FlowService::new(FlowRunner::new(m, 5), query)
    });
    let api = Arc::new(ApiClient::new(api_url));
    build_router(AppState::new(store, flows, api, SearchOptions::default()))
}

fn offline_app() -> Router {
    // Nothing listens on port 9 locally.
    app(None, "http://127.0.0.1:9")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec(), headers)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body, _) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body, _) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

// ── Local data ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_dataset_and_flows() {
    let (status, body) = get_json(&offline_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["publications"], 3);
    assert!(body["flowsModel"].is_null());

    let with_model = app(Some(ScriptedModel::new(&[])), "http://127.0.0.1:9");
    let (_, body) = get_json(&with_model, "/api/health").await;
    assert_eq!(body["flowsModel"], "scripted");
}

#[tokio::test]
async fn publications_text_and_facet_filters() {
    let app = offline_app();
    let (_, all) = get_json(&app, "/api/publications").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, bone) = get_json(&app, "/api/publications?q=bone").await;
    assert_eq!(bone.as_array().unwrap().len(), 1);
    assert_eq!(bone[0]["title"], "Bone loss in mice");

    let (_, rodents) = get_json(&app, "/api/publications?organisms=Rodent%20Model").await;
    assert_eq!(rodents.as_array().unwrap().len(), 2);

    let (_, facets) = get_json(&app, "/api/publications/facets").await;
    assert_eq!(facets["organisms"], json!(["Arabidopsis Thaliana", "Rodent Model"]));
}

#[tokio::test]
async fn publication_detail_and_not_found() {
    let app = offline_app();
    let (status, body) = get_json(&app, &format!("/api/publications/{BONE_ID_ENCODED}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], BONE_ID);
    assert_eq!(body["publicationYear"], 2019);

    let (status, body) = get_json(&app, "/api/publications/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn graph_highlights_selection_without_removing_nodes() {
    let app = offline_app();
    let (_, plain) = get_json(&app, "/api/graph").await;
    let node_count = plain["nodes"].as_array().unwrap().len();
    assert!(plain["styles"]["nodes"].as_array().unwrap().iter().all(|n| n["opacity"] == 1.0));

    let (_, selected) = get_json(&app, "/api/graph?selected=topic-Rodent-Model").await;
    assert_eq!(selected["nodes"].as_array().unwrap().len(), node_count);
    let styles = selected["styles"]["nodes"].as_array().unwrap();
    let style = |id: &str| styles.iter().find(|s| s["id"] == id).unwrap().clone();
    assert_eq!(style("topic-Rodent-Model")["selected"], true);
    assert_eq!(style(&format!("pub-{BONE_ID}"))["opacity"], 1.0);
    assert_eq!(style("topic-Plant-Biology")["opacity"], 0.5);
}

#[tokio::test]
async fn node_publications_by_topic_and_unknown_node() {
    let app = offline_app();
    let (status, body) = get_json(&app, "/api/graph/nodes/topic-Rodent-Model/publications").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Bone loss in mice", "Muscle atrophy"]);

    let (status, _) = get_json(&app, "/api/graph/nodes/topic-Nothing/publications").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn node_export_csv_pdf_and_bad_format() {
    let app = offline_app();
    let req = Request::builder()
        .uri("/api/graph/nodes/topic-Rodent-Model/export?format=csv")
        .body(Body::empty())
        .unwrap();
    let (status, body, headers) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"export_organism_Rodent-Model_"));
    assert!(disposition.ends_with(".csv\""));
    let csv = String::from_utf8(body).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("id,title,year,authors,summary,link\n"));

    let req = Request::builder()
        .uri(format!("/api/graph/nodes/pub-{BONE_ID_ENCODED}/export?format=pdf"))
        .body(Body::empty())
        .unwrap();
    let (status, body, headers) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert!(body.starts_with(b"%PDF"));

    let (status, body) = get_json(&app, "/api/graph/nodes/topic-Rodent-Model/export?format=xlsx").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("xlsx"));
}

#[tokio::test]
async fn insights_and_report() {
    let app = offline_app();
    let (_, body) = get_json(&app, "/api/insights").await;
    assert_eq!(body["majorTopics"][0], "Rodent Model");
    assert_eq!(body["trends"]["publicationsByYear"][0], json!({ "year": 2019, "count": 1 }));
    assert!(!body["researchGaps"].as_array().unwrap().is_empty());

    let req = Request::builder().uri("/api/insights/report").body(Body::empty()).unwrap();
    let (status, body, headers) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_DISPOSITION].to_str().unwrap().contains("BioSpace_Insights_Report_"));
    assert!(body.starts_with(b"%PDF"));
}

// ── Prompt flows ────────────────────────────────────────────────────────────

#[tokio::test]
async fn summarize_flow_returns_model_output() {
    let model = ScriptedModel::new(&[json!({ "output": { "summary": "Bone density drops." } })]);
    let app = app(Some(model.clone()), "http://127.0.0.1:9");
    let (status, body) = post_json(
        &app,
        "/api/flows/summarize",
        json!({ "publicationText": "Title: Bone", "sectionsToSummarize": ["Results"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "Bone density drops." }));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn invalid_flow_input_never_reaches_the_model() {
    let model = ScriptedModel::new(&[json!({ "output": { "summary": "unused" } })]);
    let app = app(Some(model.clone()), "http://127.0.0.1:9");
    let (status, body) = post_json(&app, "/api/flows/consensus", json!({ "topic": "  " })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("topic"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn consensus_flow_uses_topic_tool() {
    let model = ScriptedModel::new(&[
        json!({ "tool_call": { "name": "findRelevantPublications", "input": { "topic": "Rodent Model" } } }),
        json!({ "output": { "state": "consistent", "supportingPublications": [BONE_ID] } }),
    ]);
    let app = app(Some(model.clone()), "http://127.0.0.1:9");
    let (status, body) = post_json(&app, "/api/flows/consensus", json!({ "topic": "Rodent Model" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "consistent");
    assert_eq!(body["supportingPublications"], json!([BONE_ID]));
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn malformed_model_reply_is_bad_gateway() {
    let model = ScriptedModel::new(&[json!({ "answer": "not wrapped" })]);
    let app = app(Some(model), "http://127.0.0.1:9");
    let (status, body) = post_json(&app, "/api/flows/chat", json!({ "question": "What about bone?" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn flows_unavailable_without_backend() {
    let (status, body) = post_json(&offline_app(), "/api/flows/chat", json!({ "question": "hi" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn stored_publication_summary_uses_full_text() {
    let model = ScriptedModel::new(&[json!({ "output": { "summary": "Short." } })]);
    let app = app(Some(model.clone()), "http://127.0.0.1:9");
    let (status, body) =
        post_json(&app, &format!("/api/publications/{BONE_ID_ENCODED}/summary"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Short.");

    let (status, _) = post_json(&app, "/api/publications/missing/summary", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Remote search ───────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_search_is_reported_not_raised() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("POST", "/search").with_status(500).create_async().await;
    let app = app(None, &server.url());

    let (status, body) = post_json(&app, "/api/search", json!({ "query": "bone" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": null, "error": "Failed to search papers. Please try again." }));
}

#[tokio::test]
async fn search_forwards_caller_api_key() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("POST", "/search")
        .match_body(mockito::Matcher::PartialJson(json!({
            "query": "bone",
            "num_results": 3,
            "google_api_key": "user-key"
        })))
        .with_status(200)
        .with_body(r#"{"answer": "ok", "source_documents": [], "query": "bone"}"#)
        .expect(1)
        .create_async()
        .await;
    let app = app(None, &server.url());

    let (status, body) = post_json(
        &app,
        "/api/search",
        json!({ "query": "bone", "numResults": 3, "apiKey": "user-key" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_null());
    assert_eq!(body["result"]["answer"], "ok");
    m.assert_async().await;
}

#[tokio::test]
async fn workflow_is_decorated_for_theme() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/workflow")
        .with_status(200)
        .with_body(r#"{"nodes": [{"id": "1", "data": {"label": "Topic: Bone"}, "position": {"x": 0, "y": 0}}], "edges": [], "query": "bone", "num_papers": 1}"#)
        .create_async()
        .await;
    let app = app(None, &server.url());

    let (_, body) = post_json(&app, "/api/workflow", json!({ "query": "bone", "theme": "dark" })).await;
    assert!(body["error"].is_null());
    assert_eq!(body["result"]["nodes"][0]["className"], "topic-node dark");
}

#[tokio::test]
async fn conversation_submit_then_read_transcript() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/search")
        .with_status(200)
        .with_body(r#"{"answer": "Bone loss is common.", "source_documents": [], "query": "bone"}"#)
        .create_async()
        .await;
    let _m = server.mock("POST", "/workflow").with_status(503).create_async().await;
    let app = app(None, &server.url());

    let (status, body) = post_json(&app, "/api/conversation", json!({ "query": "bone" })).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["accepted"], true);

    let mut transcript = Value::Null;
    for _ in 0..50 {
        let (_, body) = get_json(&app, "/api/conversation").await;
        if body["messages"].as_array().map_or(0, Vec::len) == 2 {
            transcript = body;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(transcript["messages"][0]["role"], "user");
    assert_eq!(transcript["messages"][1]["content"], "Bone loss is common.");
    assert!(transcript["workflow"].is_null());

    let (status, body) = post_json(&app, "/api/conversation", json!({ "query": "   " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn database_actions_and_remote_errors() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("POST", "/reset-database").with_status(500).create_async().await;
    let _m = server
        .mock("GET", "/database/stats")
        .with_status(404)
        .with_body(r#"{"detail": "Database not found"}"#)
        .create_async()
        .await;
    let app = app(None, &server.url());

    let (status, body) = post_json(&app, "/api/database/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Failed to reset database. Please try again.");

    let (status, body) = get_json(&app, "/api/database/stats").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Database not found");

    let (status, _) = get_json(&app, "/api/database/papers?filter=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
