//! Question answering grounded in keyword-matched publications.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{prompts, require_text, FlowError, FlowRunner, Validate};
use crate::tools::ToolRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub question: String,
}

impl Validate for ChatInput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("question", &self.question).map_err(FlowError::InvalidInput)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatOutput {
    /// The answer to the user's question.
    pub answer: String,
    /// IDs of the publications used as sources for the answer.
    pub sources: Vec<String>,
}

impl Validate for ChatOutput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("answer", &self.answer).map_err(FlowError::InvalidOutput)
    }
}

pub async fn run(
    runner: &FlowRunner,
    tools: &ToolRegistry,
    input: ChatInput,
) -> Result<ChatOutput, FlowError> {
    input.validate()?;
    let prompt = prompts::render(prompts::CHAT, minijinja::context! { question => input.question })?;
    runner.run("chat_with_data", prompt, tools).await
}
