//! Publication list → knowledge map graph.
//!
//! The graph is rebuilt from scratch on every call; nothing is persisted.
//! Topic node ids come from [`slugify`], which only collapses whitespace, so
//! labels differing in case stay distinct while labels differing only in
//! spacing end up sharing a node id. That behaviour is kept as-is.

use std::collections::HashMap;

use biospace_common::Publication;
use serde::{Deserialize, Serialize};

use crate::classification::{classify, NodeKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<Publication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Replace every run of whitespace with a single `-`.
pub fn slugify(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

pub fn publication_node_id(publication_id: &str) -> String {
    format!("pub-{publication_id}")
}

pub fn topic_node_id(label: &str) -> String {
    format!("topic-{}", slugify(label))
}

/// Build the knowledge map.
///
/// Produces one publication node per input (in input order), followed by one
/// node per distinct topic label (first-seen order), and one edge for every
/// topic occurrence on every publication.
pub fn build_graph(publications: &[Publication]) -> KnowledgeGraph {
    let mut nodes = Vec::with_capacity(publications.len());
    let mut edges = Vec::new();
    let mut topic_nodes: Vec<GraphNode> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for publication in publications {
        let pub_node_id = publication_node_id(&publication.id);
        nodes.push(GraphNode {
            id: pub_node_id.clone(),
            kind: NodeKind::Publication,
            label: publication.title.clone(),
            publication: Some(publication.clone()),
        });

        for topic in &publication.topics {
            let position = *seen.entry(topic.as_str()).or_insert_with(|| {
                topic_nodes.push(GraphNode {
                    id: topic_node_id(topic),
                    kind: classify(topic),
                    label: topic.clone(),
                    publication: None,
                });
                topic_nodes.len() - 1
            });

            edges.push(GraphEdge {
                id: format!("edge-{}-{}", publication.id, slugify(topic)),
                source: pub_node_id.clone(),
                target: topic_nodes[position].id.clone(),
            });
        }
    }

    tracing::debug!(
        publications = publications.len(),
        topics = topic_nodes.len(),
        edges = edges.len(),
        "Knowledge map built"
    );

    nodes.extend(topic_nodes);
    KnowledgeGraph { nodes, edges }
}

impl KnowledgeGraph {
    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn publication_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Publication)
    }

    pub fn topic_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind != NodeKind::Publication)
    }

    /// Ids of nodes sharing an edge with `id`.
    pub fn neighbours(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.source == id {
                    Some(e.target.as_str())
                } else if e.target == id {
                    Some(e.source.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Publications behind a node: the backing record for a publication
    /// node, every publication tagged with the label for a topic-like node.
    /// `None` when the node does not exist.
    pub fn related_publications(&self, node_id: &str) -> Option<Vec<&Publication>> {
        let node = self.node(node_id)?;
        let related = match node.kind {
            NodeKind::Publication => node.publication.iter().collect(),
            _ => self
                .publication_nodes()
                .filter_map(|n| n.publication.as_ref())
                .filter(|p| p.has_topic(&node.label))
                .collect(),
        };
        Some(related)
    }
}
