//! biospace-search: Client for the remote paper search / database API and
//! the chat transcript that merges its search and workflow results.

pub mod actions;
pub mod client;
pub mod conversation;
pub mod types;
pub mod workflow;

pub use actions::{ActionResult, SearchOptions};
pub use client::{ApiClient, ApiError, DEFAULT_API_BASE_URL};
pub use conversation::{ChatMessage, Conversation, ConversationEvent, Role};
pub use workflow::{decorate, DecoratedWorkflow, Theme};
