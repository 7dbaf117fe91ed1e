//! Prompt flows: typed input → one model conversation → typed, validated output.
//!
//! The model always answers in JSON. It either asks for a tool
//! (`{"tool_call": {"name": ..., "input": {...}}}`), whose result is sent back
//! as the next user message, or finishes (`{"output": {...}}`). The number of
//! tool calls per flow is capped; nothing is retried.

pub mod chat;
pub mod consensus;
pub mod prompts;
pub mod summarize;
pub mod targeted;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::backend::{LlmBackend, LlmError, LlmRequest, Message};
use crate::tools::{FindRelevantPublications, FindRelevantSources, PublicationQuery, ToolRegistry};
use crate::util::strip_code_blocks;

pub use chat::{ChatInput, ChatOutput};
pub use consensus::{AnalyzeConsensusInput, AnalyzeConsensusOutput, ConsensusState};
pub use summarize::{Section, SummarizePublicationInput, SummarizePublicationOutput};
pub use targeted::{TargetedSummaryInput, TargetedSummaryOutput};

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("Model exceeded {0} tool calls")]
    TooManyToolCalls(usize),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid input for tool {tool}: {message}")]
    ToolInput { tool: String, message: String },
    #[error("Prompt template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Shape checks on flow inputs and outputs.
pub trait Validate {
    fn validate(&self) -> Result<(), FlowError>;
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be empty"))
    } else {
        Ok(())
    }
}

// ── Reply protocol ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModelReply {
    ToolCall(ToolCall),
    Output(Value),
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    input: Value,
}

// ── Runner ────────────────────────────────────────────────────────────────────

pub struct FlowRunner {
    backend: Arc<dyn LlmBackend>,
    max_tool_turns: usize,
}

impl FlowRunner {
    pub fn new(backend: Arc<dyn LlmBackend>, max_tool_turns: usize) -> Self {
        Self { backend, max_tool_turns }
    }

    pub fn model_id(&self) -> &str {
        self.backend.model_id()
    }

    /// Run one flow conversation and decode the final output as `O`.
    #[instrument(skip(self, prompt, tools), fields(model = self.backend.model_id()))]
    pub async fn run<O>(&self, flow: &str, prompt: String, tools: &ToolRegistry) -> Result<O, FlowError>
    where
        O: JsonSchema + DeserializeOwned + Validate,
    {
        let schema = serde_json::to_string_pretty(&schema_for!(O)).unwrap_or_default();
        let manifest = if tools.is_empty() {
            String::new()
        } else {
            serde_json::to_string_pretty(&tools.manifest()["tools"]).unwrap_or_default()
        };
        let system = prompts::render(
            prompts::SYSTEM,
            minijinja::context! { tools => manifest, schema => schema },
        )?;

        let mut messages = vec![Message::system(system), Message::user(prompt)];
        let mut tool_calls = 0usize;

        loop {
            let resp = self.backend.complete(LlmRequest::new(messages.clone())).await?;
            let reply: ModelReply = serde_json::from_str(strip_code_blocks(&resp.content))
                .map_err(|e| {
                    warn!(error = %e, "Model reply is not a tool call or output");
                    FlowError::InvalidOutput(format!("unparseable reply: {e}"))
                })?;

            match reply {
                ModelReply::ToolCall(call) => {
                    tool_calls += 1;
                    if tool_calls > self.max_tool_turns {
                        warn!(limit = self.max_tool_turns, "Tool call limit reached");
                        return Err(FlowError::TooManyToolCalls(self.max_tool_turns));
                    }
                    let result = tools.invoke(&call.name, call.input).await?;
                    debug!(tool = %call.name, turn = tool_calls, "Tool result returned to model");
                    messages.push(Message::assistant(resp.content));
                    messages.push(Message::user(format!(
                        "Result of tool {}:\n{}",
                        call.name,
                        serde_json::to_string(&result).unwrap_or_default()
                    )));
                }
                ModelReply::Output(value) => {
                    let output: O = serde_json::from_value(value)
                        .map_err(|e| FlowError::InvalidOutput(e.to_string()))?;
                    output.validate()?;
                    info!(tool_calls, "Flow completed");
                    return Ok(output);
                }
            }
        }
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

/// The four flows, wired to one backend and one publication source.
pub struct FlowService {
    runner: FlowRunner,
    query: Arc<dyn PublicationQuery>,
}

impl FlowService {
    pub fn new(runner: FlowRunner, query: Arc<dyn PublicationQuery>) -> Self {
        Self { runner, query }
    }

    pub fn model_id(&self) -> &str {
        self.runner.model_id()
    }

    pub async fn summarize_publication(
        &self,
        input: SummarizePublicationInput,
    ) -> Result<SummarizePublicationOutput, FlowError> {
        summarize::run(&self.runner, input).await
    }

    pub async fn targeted_summary(
        &self,
        input: TargetedSummaryInput,
    ) -> Result<TargetedSummaryOutput, FlowError> {
        targeted::run(&self.runner, input).await
    }

    pub async fn analyze_consensus(
        &self,
        input: AnalyzeConsensusInput,
    ) -> Result<AnalyzeConsensusOutput, FlowError> {
        let tools = ToolRegistry::new().with(FindRelevantPublications::new(self.query.clone()));
        consensus::run(&self.runner, &tools, input).await
    }

    pub async fn chat_with_data(&self, input: ChatInput) -> Result<ChatOutput, FlowError> {
        let tools = ToolRegistry::new().with(FindRelevantSources::new(self.query.clone()));
        chat::run(&self.runner, &tools, input).await
    }
}
