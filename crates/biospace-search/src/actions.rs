//! User-facing actions over the API client.
//!
//! Actions never fail: the underlying error is logged and replaced by a
//! fixed message, so callers only ever see `{result, error}`.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::client::ApiClient;
use crate::types::{
    CsvLoadResponse, LoadPapersRequest, LoadPapersResponse, SearchQuery, SearchResponse,
    StatusMessage, WorkflowResponse,
};

pub const SEARCH_FAILED: &str = "Failed to search papers. Please try again.";
pub const WORKFLOW_FAILED: &str = "Failed to generate workflow. Please try again.";
pub const LOAD_PAPERS_FAILED: &str = "Failed to load papers. Please try again.";
pub const LOAD_CSV_FAILED: &str = "Failed to load CSV to database. Please try again.";
pub const RESET_FAILED: &str = "Failed to reset database. Please try again.";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(result: T) -> Self {
        Self { result: Some(result), error: None }
    }

    pub fn failed(message: &str) -> Self {
        Self { result: None, error: Some(message.to_string()) }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        ActionResult { result: self.result.map(f), error: self.error }
    }

    fn from_result<E: std::fmt::Display>(action: &str, res: Result<T, E>, message: &str) -> Self {
        match res {
            Ok(value) => Self::ok(value),
            Err(e) => {
                error!(action, error = %e, "Action failed");
                Self::failed(message)
            }
        }
    }
}

/// Per-query search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default = "default_num_results")]
    pub num_results: u32,
    #[serde(default = "default_use_llm")]
    pub use_llm: bool,
    #[serde(default = "default_model")]
    pub model_name: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_num_results() -> u32    { 10 }
fn default_use_llm()     -> bool   { true }
fn default_model()       -> String { DEFAULT_MODEL.to_string() }

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: default_num_results(),
            use_llm: default_use_llm(),
            model_name: default_model(),
            api_key: None,
        }
    }
}

impl SearchOptions {
    fn to_query(&self, query: &str, use_llm: bool) -> SearchQuery {
        SearchQuery {
            query: query.to_string(),
            num_results: Some(self.num_results),
            use_llm: Some(use_llm),
            google_api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            model_name: Some(self.model_name.clone()),
        }
    }
}

pub async fn search(client: &ApiClient, query: &str, opts: &SearchOptions) -> ActionResult<SearchResponse> {
    let res = client.search(&opts.to_query(query, opts.use_llm)).await;
    ActionResult::from_result("search", res, SEARCH_FAILED)
}

/// Workflow graphs never need the LLM, so `use_llm` is always sent as false.
pub async fn get_workflow(client: &ApiClient, query: &str, opts: &SearchOptions) -> ActionResult<WorkflowResponse> {
    let res = client.workflow(&opts.to_query(query, false)).await;
    ActionResult::from_result("workflow", res, WORKFLOW_FAILED)
}

pub async fn load_papers(client: &ApiClient, num_papers: u32) -> ActionResult<LoadPapersResponse> {
    let res = client.load_papers(&LoadPapersRequest { num_papers }).await;
    ActionResult::from_result("load_papers", res, LOAD_PAPERS_FAILED)
}

pub async fn load_csv_to_database(client: &ApiClient) -> ActionResult<CsvLoadResponse> {
    let res = client.load_csv_to_database().await;
    ActionResult::from_result("load_csv", res, LOAD_CSV_FAILED)
}

pub async fn reset_database(client: &ApiClient) -> ActionResult<StatusMessage> {
    let res = client.reset_database().await;
    ActionResult::from_result("reset_database", res, RESET_FAILED)
}
