//! Data model for concept graphs.
//!
//! This module defines the wire-level graph structures exchanged with graph
//! sources and consumed by the view pipeline:
//! - `GraphNode` - a concept with a semantic group rank
//! - `GraphEdge` - a labeled relation between two node ids
//! - `GraphData` - the node/edge collections plus adjacency helpers
//!
//! Generated payloads are untrusted; [`normalise`] repairs them into a
//! well-formed `GraphData`, falling back to a built-in starter graph when
//! the payload is unusable.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Maximum characters kept from a generated node label.
const MAX_NODE_LABEL: usize = 20;

/// Maximum characters kept from a generated edge label.
const MAX_EDGE_LABEL: usize = 12;

/// A concept node in the graph.
///
/// `group` is a semantic rank: 0 and 1 mark core/topic nodes, 2 and above
/// mark secondary concepts. Explicit shape/size/color entries override the
/// active theme for this node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique, stable identifier
    pub id: String,

    /// Display label
    pub label: String,

    /// Semantic rank (0/1 = core, >= 2 = secondary)
    #[serde(default)]
    pub group: u32,

    /// Explicit shape name, overrides the theme shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,

    /// Explicit size, overrides the theme size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    /// Explicit fill color, overrides the theme palette
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GraphNode {
    /// Create a node with the given id, label, and group.
    pub fn new(id: impl Into<String>, label: impl Into<String>, group: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group,
            shape: None,
            size: None,
            color: None,
        }
    }

    /// Create a node with an explicit fill color.
    pub fn with_color(id: &str, label: &str, group: u32, color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::new(id, label, group)
        }
    }
}

/// A directed relation between two nodes.
///
/// Both endpoints must exist in the node set at render time; dangling edges
/// are a caller error and are filtered out only during [`normalise`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id
    pub from: String,

    /// Target node id
    pub to: String,

    /// Relation label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Explicit color, overrides the theme edge policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GraphEdge {
    /// Create an edge between two node ids.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
            color: None,
        }
    }

    /// Create a labeled edge.
    pub fn labeled(from: &str, to: &str, label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::new(from, to)
        }
    }
}

/// A complete concept graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,

    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether a node id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Find a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Undirected adjacency map over node ids.
    ///
    /// Every node appears as a key, isolated nodes with an empty set.
    pub fn adjacency(&self) -> HashMap<String, HashSet<String>> {
        let mut adj: HashMap<String, HashSet<String>> = HashMap::new();
        for node in &self.nodes {
            adj.entry(node.id.clone()).or_default();
        }
        for edge in &self.edges {
            adj.entry(edge.from.clone())
                .or_default()
                .insert(edge.to.clone());
            adj.entry(edge.to.clone())
                .or_default()
                .insert(edge.from.clone());
        }
        adj
    }

    /// Append another graph's nodes and edges, skipping nodes whose id is
    /// already present. Returns the ids of the nodes actually added.
    pub fn append(&mut self, extra: GraphData) -> Vec<String> {
        let mut added = Vec::new();
        for node in extra.nodes {
            if !self.contains_node(&node.id) {
                added.push(node.id.clone());
                self.nodes.push(node);
            }
        }
        for edge in extra.edges {
            if self.contains_node(&edge.from) && self.contains_node(&edge.to) {
                self.edges.push(edge);
            }
        }
        added
    }
}

/// Built-in starter graph used when a generated payload is unusable.
///
/// The palette here doubles as the seed of the `default` theme.
pub fn default_graph(topic: &str) -> GraphData {
    GraphData {
        nodes: vec![
            GraphNode::with_color("topic", topic, 1, "#4F46E5"),
            GraphNode::with_color("concept", "Core concepts", 2, "#818CF8"),
            GraphNode::with_color("application", "In practice", 3, "#A5B4FC"),
            GraphNode::with_color("extension", "Extensions", 4, "#C7D2FE"),
        ],
        edges: vec![
            GraphEdge::labeled("topic", "concept", "covers"),
            GraphEdge::labeled("topic", "application", "applies"),
            GraphEdge::labeled("topic", "extension", "extends"),
        ],
    }
}

/// Truncate a label to `max` characters on a char boundary.
fn truncate_label(label: &str, max: usize) -> String {
    label.chars().take(max).collect()
}

/// Repair a generated payload into a well-formed graph.
///
/// Rules:
/// - node ids default to their 1-based position, labels default to the
///   topic (first node) or a positional placeholder, groups default to 1
///   for the first node and 2 otherwise (a zero group is treated as unset)
/// - labels are truncated to 20 chars (nodes) / 12 chars (edges)
/// - edges missing either endpoint field are skipped
/// - an empty node or edge list is replaced with the starter graph
pub fn normalise(payload: &serde_json::Value, topic: &str) -> GraphData {
    let mut data = normalise_fragment(payload, topic);

    if data.nodes.is_empty() || data.edges.is_empty() {
        let fallback = default_graph(topic);
        if data.nodes.is_empty() {
            data.nodes = fallback.nodes;
        }
        if data.edges.is_empty() {
            data.edges = fallback.edges;
        }
    }

    data
}

/// Like [`normalise`] but without the starter-graph fallback.
///
/// Used for expansion payloads, where an empty result is a valid answer.
pub fn normalise_fragment(payload: &serde_json::Value, topic: &str) -> GraphData {
    let mut nodes = Vec::new();
    if let Some(raw_nodes) = payload.get("nodes").and_then(|v| v.as_array()) {
        for (index, item) in raw_nodes.iter().enumerate() {
            let Some(item) = item.as_object() else {
                continue;
            };

            let id = match item.get("id") {
                Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => (index + 1).to_string(),
            };

            let label = match item.get("label").and_then(|v| v.as_str()) {
                Some(s) if !s.is_empty() => truncate_label(s, MAX_NODE_LABEL),
                _ if index == 0 => truncate_label(topic, MAX_NODE_LABEL),
                _ => format!("Node {}", index + 1),
            };

            let group = match item.get("group").and_then(|v| v.as_u64()) {
                Some(g) if g > 0 => g as u32,
                _ if index == 0 => 1,
                _ => 2,
            };

            let mut node = GraphNode::new(id, label, group);
            if let Some(color) = item.get("color").and_then(|v| v.as_str()) {
                node.color = Some(color.to_string());
            }
            nodes.push(node);
        }
    }

    let mut edges = Vec::new();
    if let Some(raw_edges) = payload.get("edges").and_then(|v| v.as_array()) {
        for item in raw_edges {
            let Some(item) = item.as_object() else {
                continue;
            };

            let source = item.get("from").and_then(|v| v.as_str());
            let target = item.get("to").and_then(|v| v.as_str());
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            if source.is_empty() || target.is_empty() {
                continue;
            }

            let label = match item.get("label").and_then(|v| v.as_str()) {
                Some(s) if !s.is_empty() => truncate_label(s, MAX_EDGE_LABEL),
                _ => "related".to_string(),
            };

            edges.push(GraphEdge::labeled(source, target, &label));
        }
    }

    GraphData { nodes, edges }
}
