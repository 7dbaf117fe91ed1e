//! Shared application state for the web server.

use std::sync::Arc;

use biospace_ingestion::PublicationStore;
use biospace_kg::{build_graph, KnowledgeGraph};
use biospace_llm::{build_backend, FlowRunner, FlowService, LlmBackend, PublicationQuery};
use biospace_search::{ApiClient, Conversation, ConversationEvent, SearchOptions};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ApiError;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub store: Arc<PublicationStore>,
    /// Built once at startup; the store never changes.
    pub graph: KnowledgeGraph,
    /// `None` when no generative-AI backend could be configured.
    pub flows: Option<FlowService>,
    pub api: Arc<ApiClient>,
    pub conversation: Conversation,
    /// Defaults for search requests that leave options out.
    pub search: SearchOptions,
}

impl AppState {
    pub fn new(
        store: Arc<PublicationStore>,
        flows: Option<FlowService>,
        api: Arc<ApiClient>,
        search: SearchOptions,
    ) -> Self {
        let graph = build_graph(store.all());
        let conversation = Conversation::new(api.clone());
        Self { store, graph, flows, api, conversation, search }
    }

    /// Load the dataset and connect the backends described by `config`.
    /// A backend that cannot be built only disables the flows.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(PublicationStore::from_path(&config.dataset.path));
        info!(path = %config.dataset.path, publications = store.len(), "Dataset loaded");

        let flows = match build_backend(&config.llm) {
            Ok(backend) => {
                info!(model = backend.model_id(), "Prompt flows enabled");
                let runner = FlowRunner::new(backend, config.llm.max_tool_turns);
                let query: Arc<dyn PublicationQuery> = store.clone();
                Some(FlowService::new(runner, query))
            }
            Err(e) => {
                warn!(error = %e, "Prompt flows disabled");
                None
            }
        };

        let api = Arc::new(ApiClient::new(config.api.base_url.clone()));
        Self::new(store, flows, api, config.search_options())
    }

    pub fn flows(&self) -> Result<&FlowService, ApiError> {
        self.flows.as_ref().ok_or(ApiError::FlowsUnavailable)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.conversation.subscribe()
    }
}

pub type SharedState = Arc<AppState>;
