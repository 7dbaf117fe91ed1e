//! biospace-llm: Generative model backends and the schema-checked prompt
//! flows built on them (summaries, consensus analysis, chat over the data).

pub mod backend;
pub mod flows;
pub mod provider;
pub mod tools;
pub mod util;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};
pub use flows::{FlowError, FlowRunner, FlowService};
pub use provider::{build_backend, BackendKind, LlmSettings};
pub use tools::{PublicationQuery, ToolRegistry, MAX_TOOL_RESULTS};
