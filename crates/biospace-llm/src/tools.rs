//! Tools the model may call while a flow runs.
//!
//! Tools never touch the dataset directly: they go through an injected
//! [`PublicationQuery`], so a flow can be pointed at any store (or a test
//! double). Every tool returns at most [`MAX_TOOL_RESULTS`] items.
//!
//! Tool lifecycle:
//!   1. Implement `FlowTool` for your type.
//!   2. Register it with `ToolRegistry::register`.
//!   3. The flow runner lists `ToolRegistry::manifest` in the prompt and
//!      dispatches the model's calls through `ToolRegistry::invoke`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use biospace_common::Publication;
use biospace_ingestion::PublicationStore;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flows::FlowError;

pub const MAX_TOOL_RESULTS: usize = 5;

// ─────────────────────────────────────────────
//  Query seam
// ─────────────────────────────────────────────

/// Read-only publication lookups available to tools.
pub trait PublicationQuery: Send + Sync {
    /// Publications whose topics contain `topic` exactly, at most `limit`.
    fn find_by_topic(&self, topic: &str, limit: usize) -> Vec<Publication>;

    /// Keyword matches over title and summary, at most `limit`.
    fn find_by_keywords(&self, query: &str, limit: usize) -> Vec<Publication>;
}

impl PublicationQuery for PublicationStore {
    fn find_by_topic(&self, topic: &str, limit: usize) -> Vec<Publication> {
        self.by_topic(topic).into_iter().take(limit).cloned().collect()
    }

    fn find_by_keywords(&self, query: &str, limit: usize) -> Vec<Publication> {
        self.keyword_search(query, limit).into_iter().cloned().collect()
    }
}

// ─────────────────────────────────────────────
//  Tool trait
// ─────────────────────────────────────────────

#[async_trait]
pub trait FlowTool: Send + Sync {
    /// Name the model uses in its `tool_call`.
    fn name(&self) -> &str;

    /// Short description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema of the expected input.
    fn parameters_schema(&self) -> Value;

    async fn invoke(&self, params: Value) -> Result<Value, FlowError>;
}

// ─────────────────────────────────────────────
//  Tool registry
// ─────────────────────────────────────────────

/// Tools available to one flow, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn FlowTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Panics if the name is already registered.
    pub fn register<T: FlowTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        assert!(!self.tools.contains_key(&name), "Duplicate tool name: {name}");
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn with<T: FlowTool + 'static>(mut self, tool: T) -> Self {
        self.register(tool);
        self
    }

    pub async fn invoke(&self, name: &str, params: Value) -> Result<Value, FlowError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| FlowError::UnknownTool(name.to_string()))?;
        tracing::info!(tool = name, "Invoking tool");
        tool.invoke(params).await
    }

    /// All registered tools as JSON, for the prompt.
    pub fn manifest(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .values()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters_schema(),
                })
            })
            .collect();
        serde_json::json!({ "tools": tools })
    }

    pub fn len(&self) -> usize { self.tools.len() }

    pub fn is_empty(&self) -> bool { self.tools.is_empty() }
}

fn parse_params<T: serde::de::DeserializeOwned>(tool: &str, params: Value) -> Result<T, FlowError> {
    serde_json::from_value(params).map_err(|e| FlowError::ToolInput {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_default()
}

// ─────────────────────────────────────────────
//  findRelevantPublications
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TopicInput {
    /// The topic to search for.
    pub topic: String,
}

#[derive(Debug, Serialize)]
struct PublicationSummary {
    id: String,
    summary: String,
}

/// Publications tagged with an exact topic, with their summaries.
pub struct FindRelevantPublications {
    query: Arc<dyn PublicationQuery>,
}

impl FindRelevantPublications {
    pub const NAME: &'static str = "findRelevantPublications";

    pub fn new(query: Arc<dyn PublicationQuery>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl FlowTool for FindRelevantPublications {
    fn name(&self) -> &str { Self::NAME }

    fn description(&self) -> &str {
        "Finds publications related to a specific research topic, providing their summaries."
    }

    fn parameters_schema(&self) -> Value { schema_of::<TopicInput>() }

    async fn invoke(&self, params: Value) -> Result<Value, FlowError> {
        let input: TopicInput = parse_params(Self::NAME, params)?;
        let publications: Vec<PublicationSummary> = self
            .query
            .find_by_topic(&input.topic, MAX_TOOL_RESULTS)
            .into_iter()
            .take(MAX_TOOL_RESULTS)
            .map(|p| PublicationSummary { id: p.id, summary: p.summary })
            .collect();
        tracing::debug!(topic = %input.topic, found = publications.len(), "findRelevantPublications");
        Ok(serde_json::json!({ "publications": publications }))
    }
}

// ─────────────────────────────────────────────
//  findRelevantSources
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// The user's question to find sources for.
    pub query: String,
}

#[derive(Debug, Serialize)]
struct SourceSummary {
    id: String,
    title: String,
    summary: String,
}

/// Keyword search over titles and summaries.
pub struct FindRelevantSources {
    query: Arc<dyn PublicationQuery>,
}

impl FindRelevantSources {
    pub const NAME: &'static str = "findRelevantSources";

    pub fn new(query: Arc<dyn PublicationQuery>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl FlowTool for FindRelevantSources {
    fn name(&self) -> &str { Self::NAME }

    fn description(&self) -> &str {
        "Finds publications relevant to a user's question."
    }

    fn parameters_schema(&self) -> Value { schema_of::<QueryInput>() }

    async fn invoke(&self, params: Value) -> Result<Value, FlowError> {
        let input: QueryInput = parse_params(Self::NAME, params)?;
        let sources: Vec<SourceSummary> = self
            .query
            .find_by_keywords(&input.query, MAX_TOOL_RESULTS)
            .into_iter()
            .take(MAX_TOOL_RESULTS)
            .map(|p| SourceSummary { id: p.id, title: p.title, summary: p.summary })
            .collect();
        tracing::debug!(query = %input.query, found = sources.len(), "findRelevantSources");
        Ok(serde_json::json!({ "sources": sources }))
    }
}

// ─────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────
