//! Fixed lookup that sorts topic labels into organisms, environments and
//! generic topics.

use serde::{Deserialize, Serialize};

/// Labels rendered as organism nodes.
pub const ORGANISMS: &[&str] = &["Arabidopsis Thaliana", "Rodent Model", "Dwarf Wheat"];

/// Labels rendered as environment nodes.
pub const ENVIRONMENTS: &[&str] = &[
    "Spaceflight",
    "Lunar Regolith",
    "Galactic Cosmic Rays",
    "Microgravity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Publication,
    Topic,
    Organism,
    Environment,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Publication => "publication",
            NodeKind::Topic       => "topic",
            NodeKind::Organism    => "organism",
            NodeKind::Environment => "environment",
        }
    }

    /// Display colour used by the map and its minimap.
    pub fn color(&self) -> &'static str {
        match self {
            NodeKind::Publication => "hsl(var(--primary))",
            NodeKind::Topic       => "hsl(var(--accent))",
            NodeKind::Organism    => "#3b82f6",
            NodeKind::Environment => "#16a34a",
        }
    }
}

/// Classify a topic label. Membership is exact and case-sensitive;
/// anything outside both tables is a generic topic.
pub fn classify(label: &str) -> NodeKind {
    if ORGANISMS.contains(&label) {
        NodeKind::Organism
    } else if ENVIRONMENTS.contains(&label) {
        NodeKind::Environment
    } else {
        NodeKind::Topic
    }
}
