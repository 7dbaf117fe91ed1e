//! Remote semantic search and workflow diagrams. Both endpoints answer with
//! `{result, error}` and never fail.

use axum::extract::State;
use axum::Json;
use biospace_search::actions::{self, ActionResult, SearchOptions};
use biospace_search::types::SearchResponse;
use biospace_search::{decorate, DecoratedWorkflow, Theme};
use serde::Deserialize;

use crate::state::SharedState;

/// A query plus optional per-request overrides of the configured options.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub num_results: Option<u32>,
    pub use_llm: Option<bool>,
    pub model_name: Option<String>,
    /// Caller-supplied model key; a blank value keeps the configured one.
    #[serde(default, alias = "googleApiKey")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

impl SearchRequest {
    pub fn options(&self, defaults: &SearchOptions) -> SearchOptions {
        SearchOptions {
            num_results: self.num_results.unwrap_or(defaults.num_results),
            use_llm: self.use_llm.unwrap_or(defaults.use_llm),
            model_name: self.model_name.clone().unwrap_or_else(|| defaults.model_name.clone()),
            api_key: self
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| defaults.api_key.clone()),
        }
    }
}

/// POST /api/search
pub async fn search(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> Json<ActionResult<SearchResponse>> {
    let opts = req.options(&state.search);
    Json(actions::search(&state.api, &req.query, &opts).await)
}

/// POST /api/workflow
pub async fn workflow(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> Json<ActionResult<DecoratedWorkflow>> {
    let opts = req.options(&state.search);
    let outcome = actions::get_workflow(&state.api, &req.query, &opts).await;
    Json(outcome.map(|w| decorate(&w, req.theme)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_fall_back_to_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "bone", "numResults": 3}"#).unwrap();
        let defaults = SearchOptions { api_key: Some("k".into()), ..Default::default() };
        let opts = req.options(&defaults);
        assert_eq!(opts.num_results, 3);
        assert!(opts.use_llm);
        assert_eq!(opts.model_name, "gemini-2.5-flash");
        assert_eq!(opts.api_key.as_deref(), Some("k"));
        assert_eq!(req.theme, Theme::Light);
    }

    #[test]
    fn test_request_api_key_overrides_configured_key() {
        let defaults = SearchOptions { api_key: Some("configured".into()), ..Default::default() };
        let req: SearchRequest = serde_json::from_str(r#"{"query": "bone", "apiKey": "mine"}"#).unwrap();
        assert_eq!(req.options(&defaults).api_key.as_deref(), Some("mine"));

        let blank: SearchRequest = serde_json::from_str(r#"{"query": "bone", "apiKey": " "}"#).unwrap();
        assert_eq!(blank.options(&defaults).api_key.as_deref(), Some("configured"));
    }
}
