//! Summary of free-form named sections; an empty list means the whole paper.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{prompts, require_text, FlowError, FlowRunner, Validate};
use crate::tools::ToolRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedSummaryInput {
    pub publication_text: String,
    pub sections_to_summarize: Vec<String>,
}

impl Validate for TargetedSummaryInput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("publicationText", &self.publication_text).map_err(FlowError::InvalidInput)?;
        if self.sections_to_summarize.iter().any(|s| s.trim().is_empty()) {
            return Err(FlowError::InvalidInput("section names must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TargetedSummaryOutput {
    /// The summary of the selected sections.
    pub summary: String,
}

impl Validate for TargetedSummaryOutput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("summary", &self.summary).map_err(FlowError::InvalidOutput)
    }
}

pub async fn run(
    runner: &FlowRunner,
    input: TargetedSummaryInput,
) -> Result<TargetedSummaryOutput, FlowError> {
    input.validate()?;
    let prompt = prompts::render(
        prompts::TARGETED,
        minijinja::context! {
            publication_text => input.publication_text,
            sections => input.sections_to_summarize,
        },
    )?;
    runner.run("targeted_summary", prompt, &ToolRegistry::new()).await
}
