//! biospace-web: JSON HTTP service for BioSpace Explorer.
//! Provides:
//!   - Publication listing, filtering and detail
//!   - Knowledge map with selection styling and CSV/PDF export
//!   - Dataset insights and the insights report
//!   - Prompt flows (summaries, consensus, chat)
//!   - Remote semantic search, workflow diagrams and the search chat
//!   - Remote paper database management

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod sse;
pub mod state;
