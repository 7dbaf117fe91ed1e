//! JSON contracts of the remote search / database API.
//!
//! Response fields the client does not strictly need are defaulted so a
//! slightly different server version still decodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Search ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_llm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub pmcid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub page_content: String,
    pub metadata: DocumentMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesFound {
    pub pmcid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub source_documents: Vec<SourceDocument>,
    #[serde(default)]
    pub images_found: Vec<ImagesFound>,
    #[serde(default)]
    pub papers_newly_scraped: u32,
    #[serde(default)]
    pub papers_already_loaded: u32,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub timestamp: String,
}

// ── Workflow graph ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub data: WorkflowNodeData,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub num_papers: u32,
}

// ── Database ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub status: String,
    #[serde(default)]
    pub collection_name: String,
    #[serde(default)]
    pub persist_directory: String,
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub total_papers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    #[serde(default)]
    pub total_papers: u64,
    #[serde(default)]
    pub loaded_papers: u64,
    #[serde(default)]
    pub unloaded_papers: u64,
    #[serde(default)]
    pub total_chunks_created: u64,
    #[serde(default)]
    pub database_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub pmcid: String,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "isLoaded", default, skip_serializing_if = "Option::is_none")]
    pub is_loaded: Option<bool>,
    #[serde(rename = "loadedAt", default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
    #[serde(rename = "chunksCreated", default, skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperList {
    #[serde(default)]
    pub total_papers: u64,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSearch {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPapersRequest {
    pub num_papers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPapersResponse {
    pub status: String,
    #[serde(default)]
    pub papers_loaded: u32,
    #[serde(default)]
    pub chunks_created: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvLoadResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stats: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

// ── Models / health ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub database_loaded: bool,
    #[serde(default)]
    pub timestamp: String,
}
