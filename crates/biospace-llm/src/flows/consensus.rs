//! Consensus analysis over the publications tagged with one topic.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{prompts, require_text, FlowError, FlowRunner, Validate};
use crate::tools::{ToolRegistry, MAX_TOOL_RESULTS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConsensusInput {
    pub topic: String,
}

impl Validate for AnalyzeConsensusInput {
    fn validate(&self) -> Result<(), FlowError> {
        require_text("topic", &self.topic).map_err(FlowError::InvalidInput)
    }
}

/// "consistent" if findings agree, "mixed" if they vary, "contradictory"
/// if they conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusState {
    Consistent,
    Mixed,
    Contradictory,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeConsensusOutput {
    pub state: ConsensusState,
    /// IDs of up to five publications that support the consensus state.
    pub supporting_publications: Vec<String>,
}

impl Validate for AnalyzeConsensusOutput {
    fn validate(&self) -> Result<(), FlowError> {
        if self.supporting_publications.len() > MAX_TOOL_RESULTS {
            return Err(FlowError::InvalidOutput(format!(
                "at most {MAX_TOOL_RESULTS} supporting publications allowed, got {}",
                self.supporting_publications.len()
            )));
        }
        if self.supporting_publications.iter().any(|id| id.trim().is_empty()) {
            return Err(FlowError::InvalidOutput("empty publication id".to_string()));
        }
        Ok(())
    }
}

pub async fn run(
    runner: &FlowRunner,
    tools: &ToolRegistry,
    input: AnalyzeConsensusInput,
) -> Result<AnalyzeConsensusOutput, FlowError> {
    input.validate()?;
    let prompt = prompts::render(prompts::CONSENSUS, minijinja::context! { topic => input.topic })?;
    runner.run("analyze_consensus", prompt, tools).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedBackend;
    use crate::flows::FlowService;
    use biospace_ingestion::PublicationStore;
    use std::sync::Arc;

    fn service(replies: &[&str]) -> (FlowService, Arc<ScriptedBackend>) {
        let backend = ScriptedBackend::new(replies.iter().copied());
        let store = PublicationStore::from_json_str(
            r#"[
                {"title": "A", "link": "p1", "abstract": "Bone density drops.", "keywords": ["Bone Loss"]},
                {"title": "B", "link": "p2", "abstract": "Bone density drops fast.", "keywords": ["Bone Loss"]},
                {"title": "C", "link": "p3", "abstract": "Roots curl.", "keywords": ["Plants"]}
            ]"#,
        );
        let service = FlowService::new(FlowRunner::new(backend.clone(), 5), Arc::new(store));
        (service, backend)
    }

    #[tokio::test]
    async fn test_consensus_uses_topic_tool() {
        let (service, backend) = service(&[
            r#"{"tool_call": {"name": "findRelevantPublications", "input": {"topic": "Bone Loss"}}}"#,
            r#"{"output": {"state": "consistent", "supportingPublications": ["p1", "p2"]}}"#,
        ]);
        let out = service
            .analyze_consensus(AnalyzeConsensusInput { topic: "Bone Loss".into() })
            .await
            .unwrap();
        assert_eq!(out.state, ConsensusState::Consistent);
        assert_eq!(out.supporting_publications, vec!["p1", "p2"]);

        let requests = backend.requests();
        let tool_result = &requests[1].messages[3].content;
        assert!(tool_result.contains("Bone density drops."));
        assert!(!tool_result.contains("Roots curl."));
    }

    #[tokio::test]
    async fn test_state_outside_enum_rejected() {
        let (service, _) = service(&[r#"{"output": {"state": "unclear", "supportingPublications": []}}"#]);
        let err = service
            .analyze_consensus(AnalyzeConsensusInput { topic: "Bone Loss".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_too_many_supporting_ids_rejected() {
        let (service, _) = service(&[
            r#"{"output": {"state": "mixed", "supportingPublications": ["a", "b", "c", "d", "e", "f"]}}"#,
        ]);
        let err = service
            .analyze_consensus(AnalyzeConsensusInput { topic: "Bone Loss".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_blank_topic_rejected() {
        let (service, backend) = service(&[]);
        let err = service
            .analyze_consensus(AnalyzeConsensusInput { topic: "".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert!(backend.requests().is_empty());
    }
}
