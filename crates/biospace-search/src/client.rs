//! HTTP client for the remote search / database API.
//!
//! Every call is a single JSON request with no retry and no timeout. Failures
//! are logged with the endpoint here and returned; the action layer turns
//! them into user-facing messages.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::types::{
    CsvLoadResponse, DatabaseStats, DatabaseStatus, Health, LoadPapersRequest,
    LoadPapersResponse, ModelList, PaperList, PaperPage, PaperSearch, SearchQuery,
    SearchResponse, StatusMessage, WorkflowResponse,
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, req: RequestBuilder) -> Result<T, ApiError> {
        let result = Self::send(req).await;
        match &result {
            Ok(_) => debug!(endpoint, "API call succeeded"),
            Err(e) => error!(endpoint, error = %e, "API error"),
        }
        result
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["detail"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ApiError::Status { status: status.as_u16(), detail });
        }
        Ok(serde_json::from_str(&body)?)
    }

    // ── Health and status ──────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Health, ApiError> {
        self.fetch("/health", self.request(Method::GET, "/health")).await
    }

    #[instrument(skip(self))]
    pub async fn database_status(&self) -> Result<DatabaseStatus, ApiError> {
        self.fetch("/database-status", self.request(Method::GET, "/database-status")).await
    }

    #[instrument(skip(self))]
    pub async fn database_stats(&self) -> Result<DatabaseStats, ApiError> {
        self.fetch("/database/stats", self.request(Method::GET, "/database/stats")).await
    }

    // ── Papers ─────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn list_papers(&self) -> Result<PaperList, ApiError> {
        self.fetch("/papers", self.request(Method::GET, "/papers")).await
    }

    #[instrument(skip(self))]
    pub async fn loaded_papers(&self, limit: Option<u32>) -> Result<PaperPage, ApiError> {
        let endpoint = "/database/papers/loaded";
        let mut req = self.request(Method::GET, endpoint);
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        self.fetch(endpoint, req).await
    }

    #[instrument(skip(self))]
    pub async fn unloaded_papers(&self, limit: Option<u32>) -> Result<PaperPage, ApiError> {
        let endpoint = "/database/papers/unloaded";
        let mut req = self.request(Method::GET, endpoint);
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        self.fetch(endpoint, req).await
    }

    #[instrument(skip(self))]
    pub async fn all_papers(&self) -> Result<PaperPage, ApiError> {
        self.fetch("/database/papers/all", self.request(Method::GET, "/database/papers/all")).await
    }

    #[instrument(skip(self))]
    pub async fn search_papers_in_db(&self, query: &str, loaded_only: bool) -> Result<PaperSearch, ApiError> {
        let endpoint = "/database/papers/search";
        let req = self
            .request(Method::GET, endpoint)
            .query(&[("query", query.to_string()), ("loaded_only", loaded_only.to_string())]);
        self.fetch(endpoint, req).await
    }

    // ── Database operations ────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn load_csv_to_database(&self) -> Result<CsvLoadResponse, ApiError> {
        self.fetch("/database/load-csv", self.request(Method::POST, "/database/load-csv")).await
    }

    #[instrument(skip(self))]
    pub async fn load_papers(&self, request: &LoadPapersRequest) -> Result<LoadPapersResponse, ApiError> {
        let req = self.request(Method::POST, "/load-papers").json(request);
        self.fetch("/load-papers", req).await
    }

    #[instrument(skip(self))]
    pub async fn reset_database(&self) -> Result<StatusMessage, ApiError> {
        self.fetch("/reset-database", self.request(Method::POST, "/reset-database")).await
    }

    #[instrument(skip(self))]
    pub async fn append_csv(&self, csv_url: &str) -> Result<CsvLoadResponse, ApiError> {
        let req = self
            .request(Method::POST, "/database/append-csv")
            .json(&serde_json::json!({ "csv_url": csv_url }));
        self.fetch("/database/append-csv", req).await
    }

    // ── Search ─────────────────────────────────────────────────────────────

    #[instrument(skip(self, query), fields(query = %query.query))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError> {
        let req = self.request(Method::POST, "/search").json(query);
        self.fetch("/search", req).await
    }

    #[instrument(skip(self, query), fields(query = %query.query))]
    pub async fn workflow(&self, query: &SearchQuery) -> Result<WorkflowResponse, ApiError> {
        let req = self.request(Method::POST, "/workflow").json(query);
        self.fetch("/workflow", req).await
    }

    // ── Models ─────────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<ModelList, ApiError> {
        self.fetch("/models", self.request(Method::GET, "/models")).await
    }
}
