//! Client and action behaviour against a mocked remote API.

use biospace_search::actions::{self, SearchOptions, LOAD_CSV_FAILED, RESET_FAILED, SEARCH_FAILED, WORKFLOW_FAILED};
use biospace_search::{ApiClient, ApiError};
use mockito::Matcher;
use serde_json::json;

const SEARCH_BODY: &str = r#"{
    "answer": "Microgravity reduces bone density.",
    "source_documents": [
        {"page_content": "Mice lost 20%...", "metadata": {"title": "Bone", "source": "https://x/PMC1", "pmcid": "PMC1"}, "score": 0.91}
    ],
    "images_found": [],
    "papers_newly_scraped": 1,
    "papers_already_loaded": 4,
    "query": "bone loss",
    "timestamp": "2024-05-01T12:00:00"
}"#;

#[tokio::test]
async fn search_forwards_parameters_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "query": "bone loss",
            "num_results": 10,
            "use_llm": true,
            "google_api_key": "key-1",
            "model_name": "gemini-2.5-flash"
        })))
        .with_status(200)
        .with_body(SEARCH_BODY)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let opts = SearchOptions { api_key: Some("key-1".into()), ..Default::default() };
    let out = actions::search(&client, "bone loss", &opts).await;

    mock.assert_async().await;
    assert!(out.is_ok());
    let result = out.result.unwrap();
    assert_eq!(result.answer.as_deref(), Some("Microgravity reduces bone density."));
    assert_eq!(result.source_documents[0].metadata.pmcid, "PMC1");
    assert_eq!(result.papers_already_loaded, 4);
}

#[tokio::test]
async fn failed_search_returns_fixed_message() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/search")
        .with_status(500)
        .with_body(r#"{"detail": "vector store offline"}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let out = actions::search(&client, "bone", &SearchOptions::default()).await;
    assert!(out.result.is_none());
    assert_eq!(out.error.as_deref(), Some(SEARCH_FAILED));
}

#[tokio::test]
async fn malformed_json_and_unreachable_server_are_failures() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("POST", "/search").with_status(200).with_body("<html>").create_async().await;
    let client = ApiClient::new(server.url());
    let err = client
        .search(&biospace_search::types::SearchQuery {
            query: "x".into(),
            num_results: None,
            use_llm: None,
            google_api_key: None,
            model_name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    // Nothing listens on port 9 locally.
    let dead = ApiClient::new("http://127.0.0.1:9");
    let out = actions::get_workflow(&dead, "x", &SearchOptions::default()).await;
    assert_eq!(out.error.as_deref(), Some(WORKFLOW_FAILED));
}

#[tokio::test]
async fn status_error_uses_detail_or_status_code() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/database/stats")
        .with_status(404)
        .with_body(r#"{"detail": "Database not found"}"#)
        .create_async()
        .await;
    let _m = server.mock("GET", "/health").with_status(502).with_body("bad gateway").create_async().await;

    let client = ApiClient::new(server.url());
    match client.database_stats().await.unwrap_err() {
        ApiError::Status { status, detail } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "Database not found");
        }
        other => panic!("unexpected: {other}"),
    }
    match client.health().await.unwrap_err() {
        ApiError::Status { detail, .. } => assert_eq!(detail, "HTTP 502"),
        other => panic!("unexpected: {other}"),
    }
}

#[tokio::test]
async fn workflow_always_disables_llm() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/workflow")
        .match_body(Matcher::PartialJson(json!({ "query": "roots", "use_llm": false })))
        .with_status(200)
        .with_body(r#"{"nodes": [], "edges": [], "query": "roots", "num_papers": 0}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let out = actions::get_workflow(&client, "roots", &SearchOptions::default()).await;
    mock.assert_async().await;
    assert_eq!(out.result.unwrap().query, "roots");
}

#[tokio::test]
async fn database_actions() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/load-papers")
        .match_body(Matcher::Json(json!({ "num_papers": 5 })))
        .with_status(200)
        .with_body(r#"{"status": "success", "papers_loaded": 5, "chunks_created": 120, "message": "ok"}"#)
        .create_async()
        .await;
    let _m = server.mock("POST", "/database/load-csv").with_status(500).create_async().await;
    let _m = server.mock("POST", "/reset-database").with_status(500).create_async().await;

    let client = ApiClient::new(server.url());
    let loaded = actions::load_papers(&client, 5).await;
    assert_eq!(loaded.result.unwrap().chunks_created, 120);
    assert_eq!(actions::load_csv_to_database(&client).await.error.as_deref(), Some(LOAD_CSV_FAILED));
    assert_eq!(actions::reset_database(&client).await.error.as_deref(), Some(RESET_FAILED));
}

#[tokio::test]
async fn paper_listing_endpoints_send_query_params() {
    let mut server = mockito::Server::new_async().await;
    let loaded = server
        .mock("GET", "/database/papers/loaded")
        .match_query(Matcher::UrlEncoded("limit".into(), "3".into()))
        .with_status(200)
        .with_body(r#"{"count": 1, "papers": [{"title": "T", "pmcid": "PMC9", "link": "l", "isLoaded": true}]}"#)
        .create_async()
        .await;
    let search = server
        .mock("GET", "/database/papers/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "bone loss".into()),
            Matcher::UrlEncoded("loaded_only".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"query": "bone loss", "count": 0, "papers": []}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url());
    let page = client.loaded_papers(Some(3)).await.unwrap();
    assert_eq!(page.papers[0].is_loaded, Some(true));
    let found = client.search_papers_in_db("bone loss", true).await.unwrap();
    assert_eq!(found.count, 0);
    loaded.assert_async().await;
    search.assert_async().await;
}
