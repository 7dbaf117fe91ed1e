//! Backend selection from the `[llm]` configuration section.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{
    GeminiBackend, LlmBackend, LlmError, OllamaBackend, OpenAiCompatibleBackend,
    DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL,
};

/// Environment variables consulted, in order, when no key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["BIOSPACE_GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Gemini,
    OpenaiCompatible,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: BackendKind,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_max_tool_turns")]
    pub max_tool_turns: usize,
}

fn default_model()          -> String { DEFAULT_GEMINI_MODEL.to_string() }
fn default_max_tool_turns() -> usize  { 5 }

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: BackendKind::default(),
            model: default_model(),
            base_url: None,
            api_key: None,
            max_tool_turns: default_max_tool_turns(),
        }
    }
}

impl LlmSettings {
    /// The configured key, else the first non-empty key from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|k| !k.trim().is_empty())
            })
    }
}

/// Build the configured backend.
///
/// Gemini needs an API key; OpenAI-compatible endpoints need a base URL.
/// Ollama defaults to `http://localhost:11434`.
pub fn build_backend(settings: &LlmSettings) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let backend: Arc<dyn LlmBackend> = match settings.provider {
        BackendKind::Gemini => {
            let key = settings.resolve_api_key().ok_or_else(|| {
                LlmError::Unavailable(format!(
                    "Gemini backend needs an API key (set llm.api_key or {})",
                    API_KEY_ENV_VARS.join(" / ")
                ))
            })?;
            let base_url = settings.base_url.as_deref().unwrap_or(GEMINI_BASE_URL);
            Arc::new(GeminiBackend::new(key, &settings.model).with_base_url(base_url))
        }
        BackendKind::OpenaiCompatible => {
            let base_url = settings.base_url.as_deref().ok_or_else(|| {
                LlmError::Unavailable("openai_compatible backend needs llm.base_url".to_string())
            })?;
            Arc::new(OpenAiCompatibleBackend::new(base_url, &settings.model, settings.resolve_api_key()))
        }
        BackendKind::Ollama => {
            let base_url = settings.base_url.as_deref().unwrap_or("http://localhost:11434");
            Arc::new(OllamaBackend::new(base_url, &settings.model))
        }
    };

    tracing::info!(
        provider = ?settings.provider,
        model = backend.model_id(),
        is_local = backend.is_local(),
        "LLM backend ready"
    );
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s: LlmSettings = from_json("{}");
        assert_eq!(s.provider, BackendKind::Gemini);
        assert_eq!(s.model, "gemini-2.5-flash");
        assert_eq!(s.max_tool_turns, 5);
    }

    #[test]
    fn test_configured_key_wins() {
        let s = LlmSettings { api_key: Some("configured".into()), ..Default::default() };
        assert_eq!(s.resolve_api_key().as_deref(), Some("configured"));
    }

    #[test]
    fn test_openai_compatible_requires_base_url() {
        let s = LlmSettings { provider: BackendKind::OpenaiCompatible, ..Default::default() };
        assert!(matches!(build_backend(&s), Err(LlmError::Unavailable(_))));
    }

    #[test]
    fn test_ollama_builds_local_backend() {
        let s = LlmSettings {
            provider: BackendKind::Ollama,
            model: "llama3:8b".into(),
            ..Default::default()
        };
        let backend = build_backend(&s).unwrap();
        assert!(backend.is_local());
        assert_eq!(backend.model_id(), "llama3:8b");
    }

    #[test]
    fn test_provider_names() {
        let s: LlmSettings = from_json(r#"{"provider": "openai_compatible", "base_url": "http://x"}"#);
        assert_eq!(s.provider, BackendKind::OpenaiCompatible);
        assert!(!build_backend(&s).unwrap().is_local());
    }

    fn from_json(json: &str) -> LlmSettings {
        serde_json::from_str(json).unwrap()
    }
}
