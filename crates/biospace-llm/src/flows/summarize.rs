//! Whole-publication summary, optionally focused on named sections.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{prompts, require_text, FlowError, FlowRunner, Validate};
use crate::tools::ToolRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Section {
    Introduction,
    Results,
    Conclusion,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Introduction => "Introduction",
            Section::Results => "Results",
            Section::Conclusion => "Conclusion",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizePublicationInput {
    pub publication_text: String,
    #[serde(default)]
    pub sections_to_summarize: Option<Vec<Section>>,
}

impl Validate for SummarizePublicationInput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("publicationText", &self.publication_text).map_err(FlowError::InvalidInput)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizePublicationOutput {
    /// A concise summary of the NASA bioscience publication.
    pub summary: String,
}

impl Validate for SummarizePublicationOutput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("summary", &self.summary).map_err(FlowError::InvalidOutput)
    }
}

pub async fn run(
    runner: &FlowRunner,
    input: SummarizePublicationInput,
) -> Result<SummarizePublicationOutput, FlowError> {
    input.validate()?;
    let sections: Vec<&str> = input
        .sections_to_summarize
        .iter()
        .flatten()
        .map(Section::as_str)
        .collect();
    let prompt = prompts::render(
        prompts::SUMMARIZE,
        minijinja::context! { publication_text => input.publication_text, sections => sections },
    )?;
    runner.run("summarize_publication", prompt, &ToolRegistry::new()).await
}
