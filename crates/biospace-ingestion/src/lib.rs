//! biospace-ingestion: Publication dataset loading.
//! - Lenient parsing of the raw JSON dataset
//! - Normalisation into `Publication` records with derived fields
//! - The read-only `PublicationStore` and its in-memory queries

pub mod models;
pub mod normalise;
pub mod query;
pub mod store;

pub use models::RawPublication;
pub use normalise::{extract_year, normalise};
pub use store::PublicationStore;
