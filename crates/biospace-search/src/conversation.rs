//! Search chat transcript.
//!
//! Each submitted query fans out into two independent tasks: the search
//! itself and the workflow diagram for the same query. Neither waits for or
//! cancels the other, and both write into the shared transcript in whatever
//! order they finish. A failed search leaves an error notice in the
//! transcript; a failed workflow is only logged and the previous diagram
//! stays in place.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::actions::{self, SearchOptions};
use crate::client::ApiClient;
use crate::types::{SearchResponse, SourceDocument, WorkflowResponse};
use crate::workflow::{decorate, DecoratedWorkflow, Theme};

pub const SEARCH_FALLBACK_ANSWER: &str = "Search completed with document results.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_result: Option<SearchResponse>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>, search_result: Option<SearchResponse>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            search_result,
            created_at: Utc::now(),
        }
    }
}

/// Pushed to subscribers whenever the transcript changes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    MessageAdded { message: ChatMessage },
    WorkflowUpdated { query: String, num_papers: u32 },
}

#[derive(Debug, Default)]
struct Transcript {
    messages: Vec<ChatMessage>,
    workflow: Option<WorkflowResponse>,
}

/// Handles of the two tasks spawned by [`Conversation::submit`].
pub struct Submitted {
    pub search: JoinHandle<()>,
    pub workflow: JoinHandle<()>,
}

impl Submitted {
    /// Wait for both tasks to finish. A task that panicked or was aborted
    /// is logged and its `JoinError` returned, search first.
    pub async fn join(self) -> Result<(), JoinError> {
        let (search, workflow) = tokio::join!(self.search, self.workflow);
        if let Err(e) = &search {
            error!(task = "search", error = %e, "Conversation task failed");
        }
        if let Err(e) = &workflow {
            error!(task = "workflow", error = %e, "Conversation task failed");
        }
        search.and(workflow)
    }
}

#[derive(Clone)]
pub struct Conversation {
    client: Arc<ApiClient>,
    state: Arc<Mutex<Transcript>>,
    events: broadcast::Sender<ConversationEvent>,
}

impl Conversation {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self { client, state: Arc::new(Mutex::new(Transcript::default())), events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Submit a query. Blank queries are ignored and return `None`.
    pub async fn submit(&self, query: &str, opts: SearchOptions) -> Option<Submitted> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.push(ChatMessage::new(Role::User, query, None)).await;
        info!(query, "Query submitted");

        let search = {
            let this = self.clone();
            let query = query.to_string();
            let opts = opts.clone();
            tokio::spawn(async move { this.run_search(&query, &opts).await })
        };
        let workflow = {
            let this = self.clone();
            let query = query.to_string();
            tokio::spawn(async move { this.run_workflow(&query, &opts).await })
        };
        Some(Submitted { search, workflow })
    }

    async fn run_search(&self, query: &str, opts: &SearchOptions) {
        let outcome = actions::search(&self.client, query, opts).await;
        let message = match (outcome.result, outcome.error) {
            (Some(result), _) => {
                let content = result
                    .answer
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| SEARCH_FALLBACK_ANSWER.to_string());
                ChatMessage::new(Role::Assistant, content, Some(result))
            }
            (None, error) => ChatMessage::new(
                Role::Error,
                error.unwrap_or_else(|| actions::SEARCH_FAILED.to_string()),
                None,
            ),
        };
        self.push(message).await;
    }

    async fn run_workflow(&self, query: &str, opts: &SearchOptions) {
        let outcome = actions::get_workflow(&self.client, query, opts).await;
        match outcome.result {
            Some(workflow) => {
                let event = ConversationEvent::WorkflowUpdated {
                    query: workflow.query.clone(),
                    num_papers: workflow.num_papers,
                };
                self.state.lock().await.workflow = Some(workflow);
                let _ = self.events.send(event);
            }
            None => warn!(query, "Workflow unavailable; keeping previous diagram"),
        }
    }

    async fn push(&self, message: ChatMessage) {
        self.state.lock().await.messages.push(message.clone());
        // No subscribers is fine.
        let _ = self.events.send(ConversationEvent::MessageAdded { message });
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.clone()
    }

    /// Latest workflow diagram, styled for `theme`.
    pub async fn workflow(&self, theme: Theme) -> Option<DecoratedWorkflow> {
        self.state.lock().await.workflow.as_ref().map(|w| decorate(w, theme))
    }

    /// Source documents across all assistant answers, first occurrence per pmcid.
    pub async fn sources(&self) -> Vec<SourceDocument> {
        let state = self.state.lock().await;
        let mut seen = HashSet::new();
        state
            .messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .filter_map(|m| m.search_result.as_ref())
            .flat_map(|r| r.source_documents.iter())
            .filter(|d| seen.insert(d.metadata.pmcid.clone()))
            .cloned()
            .collect()
    }

    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.messages.clear();
        state.workflow = None;
    }
}
