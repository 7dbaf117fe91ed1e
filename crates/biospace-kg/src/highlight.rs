//! Node selection highlighting. Purely presentational: the graph itself is
//! never filtered.

use std::collections::HashSet;

use serde::Serialize;

use crate::graph::KnowledgeGraph;

pub const DIMMED_NODE_OPACITY: f32 = 0.5;
pub const DIMMED_EDGE_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub id: String,
    pub color: &'static str,
    pub opacity: f32,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub id: String,
    pub opacity: f32,
    pub animated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub nodes: Vec<NodeStyle>,
    pub edges: Vec<EdgeStyle>,
}

/// Style every node and edge for the current selection.
///
/// Without a selection everything is fully opaque. With one, the selected
/// node and its direct neighbours stay opaque, every other node is dimmed,
/// and only edges touching the selection stay opaque and animate.
pub fn highlight(graph: &KnowledgeGraph, selected: Option<&str>) -> Highlight {
    let connected: HashSet<&str> = match selected {
        Some(id) => graph.neighbours(id).into_iter().chain(std::iter::once(id)).collect(),
        None => HashSet::new(),
    };

    let nodes = graph
        .nodes
        .iter()
        .map(|n| {
            let is_selected = selected == Some(n.id.as_str());
            let opacity = match selected {
                None => 1.0,
                Some(_) if connected.contains(n.id.as_str()) => 1.0,
                Some(_) => DIMMED_NODE_OPACITY,
            };
            NodeStyle { id: n.id.clone(), color: n.kind.color(), opacity, selected: is_selected }
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|e| {
            let touches = selected.is_some_and(|id| e.source == id || e.target == id);
            let opacity = match selected {
                None => 1.0,
                Some(_) if touches => 1.0,
                Some(_) => DIMMED_EDGE_OPACITY,
            };
            EdgeStyle { id: e.id.clone(), opacity, animated: touches }
        })
        .collect();

    Highlight { nodes, edges }
}
