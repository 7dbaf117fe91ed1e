//! biospace-kg: Knowledge map construction.
//! Turns the flat publication list into publication and topic nodes joined
//! by membership edges, plus the dataset-level insights built on the same
//! topic classification.

pub mod classification;
pub mod graph;
pub mod highlight;
pub mod insights;

pub use classification::{classify, NodeKind};
pub use graph::{build_graph, slugify, GraphEdge, GraphNode, KnowledgeGraph};
pub use highlight::{highlight, EdgeStyle, Highlight, NodeStyle};
pub use insights::{
    facets, major_topics, publications_by_year, research_gaps, top_topics, trends, FacetFilter,
    Facets, ResearchGap, TopicCount, Trends, YearCount,
};
