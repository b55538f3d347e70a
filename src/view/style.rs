//! Visual attribute resolution for nodes and edges.
//!
//! Given a node/edge, the active theme, and the element's position in the
//! collection, this module computes the final render attributes: fill and
//! border colors, shape, size, font, and label decoration.
//!
//! The core rule wins over everything else: nodes with group 0 or 1, and
//! the node at index 0, always receive the theme's core color, border, and
//! shape, a larger size, bold font, and an emphasized label. Re-resolving
//! an already-styled node strips the previous emphasis wrapper first, so
//! the operation is idempotent.

use crate::models::{GraphEdge, GraphNode};
use crate::view::theme::{
    EdgePolicy, NodeShape, Palette, ThemeDefinition, best_text_color,
};

/// Base size of a secondary node.
pub const BASE_SIZE: f64 = 25.0;

/// Size of a core node before shape inflation.
pub const CORE_SIZE: f64 = 35.0;

/// Font size of a secondary node label.
pub const BASE_FONT: f64 = 14.0;

/// Font size of a core node label.
pub const CORE_FONT: f64 = 18.0;

/// Default edge stroke width.
pub const EDGE_WIDTH: f64 = 2.0;

/// Size multiplier for shapes with external label placement.
///
/// Together with the per-shape vadjust multipliers this repositions the
/// label visually inside the shape. Empirical table; keep verbatim.
const EXTERNAL_LABEL_INFLATION: f64 = 2.5;

/// Resolved visual attributes of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub fill: String,
    pub border: String,
    pub shape: NodeShape,
    pub size: f64,
    pub font_size: f64,
    pub font_color: String,
    pub bold: bool,
    pub label: String,
    /// Vertical label offset; negative moves the label up into the shape.
    pub label_vadjust: f64,
    pub is_core: bool,
}

/// Resolved visual attributes of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeVisual {
    pub color: String,
    pub highlight: String,
    pub width: f64,
    pub label: Option<String>,
}

/// Whether a node counts as core: group 0 or 1, or the first node.
pub fn is_core(node: &GraphNode, index: usize) -> bool {
    node.group <= 1 || index == 0
}

/// Strip the emphasis wrapper from a label, repeatedly in case earlier
/// styling passes compounded it.
fn strip_emphasis(label: &str) -> &str {
    let mut label = label;
    while let Some(inner) = label
        .strip_prefix("<b>")
        .and_then(|rest| rest.strip_suffix("</b>"))
    {
        label = inner;
    }
    label
}

/// Wrap a label in emphasis markup.
fn emphasize(label: &str) -> String {
    format!("<b>{}</b>", label)
}

/// Resolve the visual attributes of a node.
///
/// `index` is the node's position in the collection and `core_count` the
/// total number of core nodes, used to start the color cycle at zero for
/// the first non-core node.
pub fn resolve_node(
    node: &GraphNode,
    theme: &ThemeDefinition,
    index: usize,
    core_count: usize,
) -> NodeVisual {
    let core = is_core(node, index);

    let (fill, border) = if core {
        (
            theme.core.color.fill.to_string(),
            theme.core.color.border.to_string(),
        )
    } else {
        let pair = match theme.palette {
            Palette::Cycle(colors) => {
                colors[index.saturating_sub(core_count) % colors.len()]
            }
            Palette::Tiered { level1, level2 } => {
                if node.group == 2 {
                    level1
                } else {
                    level2
                }
            }
        };
        // Explicit node color wins over the palette for secondary nodes
        match &node.color {
            Some(explicit) => (explicit.clone(), pair.border.to_string()),
            None => (pair.fill.to_string(), pair.border.to_string()),
        }
    };

    let shape = match &node.shape {
        Some(name) => NodeShape::parse(name),
        None if core => theme.core.shape,
        None => NodeShape::default(),
    };

    let mut size = node
        .size
        .unwrap_or(if core { CORE_SIZE } else { BASE_SIZE });

    let label_vadjust = if shape.has_external_label() {
        size *= EXTERNAL_LABEL_INFLATION;
        -(shape.vadjust_multiplier() * size)
    } else {
        0.0
    };

    let plain = strip_emphasis(&node.label);
    let label = if core {
        emphasize(plain)
    } else {
        plain.to_string()
    };

    NodeVisual {
        font_color: best_text_color(&fill).to_string(),
        fill,
        border,
        shape,
        size,
        font_size: if core { CORE_FONT } else { BASE_FONT },
        bold: core,
        label,
        label_vadjust,
        is_core: core,
    }
}

/// Resolve the visual attributes of an edge.
pub fn resolve_edge(edge: &GraphEdge, theme: &ThemeDefinition, index: usize) -> EdgeVisual {
    let (color, highlight) = match theme.edges {
        EdgePolicy::Gradient(colors) => {
            let c = colors[index % colors.len()];
            (c.to_string(), c.to_string())
        }
        EdgePolicy::Flat { color, highlight } => (color.to_string(), highlight.to_string()),
    };

    EdgeVisual {
        color: edge.color.clone().unwrap_or(color),
        highlight,
        width: EDGE_WIDTH,
        label: edge.label.clone(),
    }
}

/// Count the core nodes of a collection (group 0/1 or index 0).
pub fn core_count(nodes: &[GraphNode]) -> usize {
    nodes
        .iter()
        .enumerate()
        .filter(|(i, n)| is_core(n, *i))
        .count()
}
