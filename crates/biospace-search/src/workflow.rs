//! Styling classes for the workflow network diagram.

use serde::{Deserialize, Serialize};

use crate::types::{WorkflowEdge, WorkflowNode, WorkflowResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

const NODE_PREFIXES: [(&str, &str); 6] = [
    ("Paper:", "paper-node"),
    ("Author:", "author-node"),
    ("Topic:", "topic-node"),
    ("Method:", "method-node"),
    ("Results:", "results-node"),
    ("Citation:", "citation-node"),
];

// Checked in order: the first phrase found wins.
const EDGE_PHRASES: [(&str, &str); 5] = [
    ("authored by", "author-edge"),
    ("focuses on", "topic-edge"),
    ("uses", "method-edge"),
    ("finds", "results-edge"),
    ("cites", "citation-edge"),
];

pub fn node_class(label: &str) -> &'static str {
    NODE_PREFIXES
        .iter()
        .find(|(prefix, _)| label.starts_with(prefix))
        .map_or("default-node", |(_, class)| *class)
}

pub fn edge_class(label: Option<&str>) -> &'static str {
    let label = label.unwrap_or_default().to_lowercase();
    EDGE_PHRASES
        .iter()
        .find(|(phrase, _)| label.contains(phrase))
        .map_or("default-edge", |(_, class)| *class)
}

fn themed(class: &str, theme: Theme) -> String {
    match theme {
        Theme::Light => class.to_string(),
        Theme::Dark => format!("{class} dark"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedNode {
    #[serde(flatten)]
    pub node: WorkflowNode,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedEdge {
    #[serde(flatten)]
    pub edge: WorkflowEdge,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoratedWorkflow {
    pub nodes: Vec<DecoratedNode>,
    pub edges: Vec<DecoratedEdge>,
    pub query: String,
    pub num_papers: u32,
}

/// Attach a class to every node and edge of `workflow`.
pub fn decorate(workflow: &WorkflowResponse, theme: Theme) -> DecoratedWorkflow {
    DecoratedWorkflow {
        nodes: workflow
            .nodes
            .iter()
            .map(|n| DecoratedNode {
                node: n.clone(),
                class_name: themed(node_class(&n.data.label), theme),
            })
            .collect(),
        edges: workflow
            .edges
            .iter()
            .map(|e| DecoratedEdge {
                edge: e.clone(),
                class_name: themed(edge_class(e.label.as_deref()), theme),
            })
            .collect(),
        query: workflow.query.clone(),
        num_papers: workflow.num_papers,
    }
}
