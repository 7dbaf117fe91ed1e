//! Transcript behaviour with independent search and workflow calls.

use std::sync::Arc;

use biospace_search::actions::{SearchOptions, SEARCH_FAILED};
use biospace_search::conversation::{Submitted, SEARCH_FALLBACK_ANSWER};
use biospace_search::{ApiClient, Conversation, ConversationEvent, Role, Theme};

fn search_body(answer: Option<&str>, pmcids: &[&str]) -> String {
    let docs: Vec<serde_json::Value> = pmcids
        .iter()
        .map(|id| serde_json::json!({ "page_content": "...", "metadata": { "title": id, "source": "s", "pmcid": id } }))
        .collect();
    serde_json::json!({ "answer": answer, "source_documents": docs, "query": "q" }).to_string()
}

const WORKFLOW_BODY: &str = r#"{
    "nodes": [{"id": "1", "data": {"label": "Paper: Bone"}, "position": {"x": 0, "y": 0}}],
    "edges": [],
    "query": "bone",
    "num_papers": 1
}"#;

#[tokio::test]
async fn search_success_and_workflow_success() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("POST", "/search").with_status(200).with_body(search_body(Some("Yes."), &["PMC1"])).create_async().await;
    let _m = server.mock("POST", "/workflow").with_status(200).with_body(WORKFLOW_BODY).create_async().await;

    let convo = Conversation::new(Arc::new(ApiClient::new(server.url())));
    let mut events = convo.subscribe();
    convo.submit("bone", SearchOptions::default()).await.unwrap().join().await.unwrap();

    let messages = convo.messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Yes.");

    let wf = convo.workflow(Theme::Dark).await.unwrap();
    assert_eq!(wf.nodes[0].class_name, "paper-node dark");

    let mut saw_workflow = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, ConversationEvent::WorkflowUpdated { .. }) {
            saw_workflow = true;
        }
    }
    assert!(saw_workflow);
}

#[tokio::test]
async fn missing_answer_uses_fallback_text() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("POST", "/search").with_status(200).with_body(search_body(None, &[])).create_async().await;
    let _m = server.mock("POST", "/workflow").with_status(500).create_async().await;

    let convo = Conversation::new(Arc::new(ApiClient::new(server.url())));
    convo.submit("bone", SearchOptions::default()).await.unwrap().join().await.unwrap();
    assert_eq!(convo.messages().await[1].content, SEARCH_FALLBACK_ANSWER);
}

#[tokio::test]
async fn search_failure_keeps_prior_workflow_and_records_error() {
    let mut server = mockito::Server::new_async().await;
    let workflow_ok = server.mock("POST", "/workflow").with_status(200).with_body(WORKFLOW_BODY).create_async().await;
    let search_ok = server.mock("POST", "/search").with_status(200).with_body(search_body(Some("a"), &[])).create_async().await;

    let convo = Conversation::new(Arc::new(ApiClient::new(server.url())));
    convo.submit("bone", SearchOptions::default()).await.unwrap().join().await.unwrap();
    assert!(convo.workflow(Theme::Light).await.is_some());

    // Second round: both endpoints now fail.
    workflow_ok.remove_async().await;
    search_ok.remove_async().await;
    let _m = server.mock("POST", "/search").with_status(503).create_async().await;
    let _m = server.mock("POST", "/workflow").with_status(503).create_async().await;
    convo.submit("roots", SearchOptions::default()).await.unwrap().join().await.unwrap();

    let messages = convo.messages().await;
    let last = messages.last().unwrap();
    assert_eq!(last.role, Role::Error);
    assert_eq!(last.content, SEARCH_FAILED);
    let wf = convo.workflow(Theme::Light).await.unwrap();
    assert_eq!(wf.query, "bone");
}

#[tokio::test]
async fn blank_query_is_ignored() {
    let convo = Conversation::new(Arc::new(ApiClient::new("http://127.0.0.1:9")));
    assert!(convo.submit("   ", SearchOptions::default()).await.is_none());
    assert!(convo.messages().await.is_empty());
}

#[tokio::test]
async fn sources_deduplicated_by_pmcid() {
    let mut server = mockito::Server::new_async().await;
    let _m = server.mock("POST", "/search").with_status(200).with_body(search_body(Some("a"), &["PMC1", "PMC2", "PMC1"])).create_async().await;
    let _m = server.mock("POST", "/workflow").with_status(500).create_async().await;

    let convo = Conversation::new(Arc::new(ApiClient::new(server.url())));
    convo.submit("one", SearchOptions::default()).await.unwrap().join().await.unwrap();
    convo.submit("two", SearchOptions::default()).await.unwrap().join().await.unwrap();

    let ids: Vec<String> = convo.sources().await.into_iter().map(|d| d.metadata.pmcid).collect();
    assert_eq!(ids, vec!["PMC1", "PMC2"]);
}

#[tokio::test]
async fn join_reports_a_panicked_task() {
    let submitted = Submitted {
        search: tokio::spawn(async { panic!("search task blew up") }),
        workflow: tokio::spawn(async {}),
    };
    let err = submitted.join().await.unwrap_err();
    assert!(err.is_panic());

    let clean = Submitted { search: tokio::spawn(async {}), workflow: tokio::spawn(async {}) };
    assert!(clean.join().await.is_ok());
}
