//! Neighbor-highlight projection for hover and blur.
//!
//! Hovering a node dims everything not adjacent to it and widens the
//! incident edge strokes; blurring restores the fixed baseline. This is a
//! pure projection over the static adjacency data: the underlying graph is
//! never mutated, only transient opacity/width overrides are produced for
//! the surface to apply.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::GraphData;
use crate::view::surface::{EdgePatch, NodePatch, RenderSurface};

/// Baseline node opacity.
pub const BASE_NODE_OPACITY: f64 = 1.0;

/// Baseline edge opacity.
pub const BASE_EDGE_OPACITY: f64 = 0.8;

/// Opacity of nodes outside the hovered neighborhood.
pub const DIM_NODE_OPACITY: f64 = 0.3;

/// Opacity of edges outside the hovered neighborhood.
pub const DIM_EDGE_OPACITY: f64 = 0.15;

/// Baseline edge stroke width.
pub const BASE_EDGE_WIDTH: f64 = 2.0;

/// Stroke width of edges incident to the hovered node.
pub const HIGHLIGHT_EDGE_WIDTH: f64 = 3.5;

/// The opacity/width overrides produced by a hover or blur.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightState {
    pub node_opacity: BTreeMap<String, f64>,
    pub edge_opacity: BTreeMap<String, f64>,
    pub edge_width: BTreeMap<String, f64>,
}

impl HighlightState {
    /// Push the overrides onto a surface. Missing targets are skipped by
    /// the surface's soft-failure contract.
    pub fn apply(&self, surface: &mut dyn RenderSurface) {
        for (id, &opacity) in &self.node_opacity {
            surface.update_node(
                id,
                NodePatch {
                    opacity: Some(opacity),
                    ..NodePatch::default()
                },
            );
        }
        for (id, &opacity) in &self.edge_opacity {
            let width = self.edge_width.get(id).copied();
            surface.update_edge(
                id,
                EdgePatch {
                    opacity: Some(opacity),
                    width,
                    color: None,
                },
            );
        }
    }
}

/// An edge as tracked for highlighting: surface id plus endpoints.
#[derive(Debug, Clone)]
struct TrackedEdge {
    id: String,
    from: String,
    to: String,
}

/// Projects hover/blur events onto highlight overrides.
#[derive(Debug, Default)]
pub struct InteractionController {
    adjacency: HashMap<String, HashSet<String>>,
    edges: Vec<TrackedEdge>,
}

impl InteractionController {
    /// Build the controller from graph data. `edge_id` must assign the
    /// same surface ids the view model used when inserting edges.
    pub fn new(data: &GraphData) -> Self {
        Self {
            adjacency: data.adjacency(),
            edges: data
                .edges
                .iter()
                .enumerate()
                .map(|(i, e)| TrackedEdge {
                    id: edge_id(i),
                    from: e.from.clone(),
                    to: e.to.clone(),
                })
                .collect(),
        }
    }

    /// Overrides for hovering `node_id`.
    ///
    /// An unknown id projects the baseline: there is no neighborhood to
    /// highlight, and dimming the whole graph for a stale hover would be
    /// worse than doing nothing.
    pub fn hover(&self, node_id: &str) -> HighlightState {
        let Some(neighbors) = self.adjacency.get(node_id) else {
            return self.blur();
        };

        let node_opacity = self
            .adjacency
            .keys()
            .map(|id| {
                let visible = id == node_id || neighbors.contains(id);
                (
                    id.clone(),
                    if visible {
                        BASE_NODE_OPACITY
                    } else {
                        DIM_NODE_OPACITY
                    },
                )
            })
            .collect();

        let mut edge_opacity = BTreeMap::new();
        let mut edge_width = BTreeMap::new();
        for edge in &self.edges {
            let incident = edge.from == node_id || edge.to == node_id;
            if incident {
                edge_opacity.insert(edge.id.clone(), BASE_NODE_OPACITY);
                edge_width.insert(edge.id.clone(), HIGHLIGHT_EDGE_WIDTH);
            } else {
                edge_opacity.insert(edge.id.clone(), DIM_EDGE_OPACITY);
                edge_width.insert(edge.id.clone(), BASE_EDGE_WIDTH);
            }
        }

        HighlightState {
            node_opacity,
            edge_opacity,
            edge_width,
        }
    }

    /// Overrides restoring the baseline.
    pub fn blur(&self) -> HighlightState {
        HighlightState {
            node_opacity: self
                .adjacency
                .keys()
                .map(|id| (id.clone(), BASE_NODE_OPACITY))
                .collect(),
            edge_opacity: self
                .edges
                .iter()
                .map(|e| (e.id.clone(), BASE_EDGE_OPACITY))
                .collect(),
            edge_width: self
                .edges
                .iter()
                .map(|e| (e.id.clone(), BASE_EDGE_WIDTH))
                .collect(),
        }
    }
}

/// Surface id of the edge at the given index.
pub fn edge_id(index: usize) -> String {
    format!("e{}", index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GraphData, GraphEdge, GraphNode};

    /// Node set {x,y,z,w} where x-y and x-z are connected and w is
    /// isolated.
    fn sample() -> GraphData {
        GraphData {
            nodes: vec![
                GraphNode::new("x", "X", 1),
                GraphNode::new("y", "Y", 2),
                GraphNode::new("z", "Z", 2),
                GraphNode::new("w", "W", 2),
            ],
            edges: vec![GraphEdge::new("x", "y"), GraphEdge::new("x", "z")],
        }
    }

    #[test]
    fn test_hover_dims_non_neighbors() {
        let controller = InteractionController::new(&sample());
        let state = controller.hover("x");

        assert_eq!(state.node_opacity["x"], 1.0);
        assert_eq!(state.node_opacity["y"], 1.0);
        assert_eq!(state.node_opacity["z"], 1.0);
        assert_eq!(state.node_opacity["w"], 0.3);
    }

    #[test]
    fn test_hover_widens_incident_edges() {
        let controller = InteractionController::new(&sample());
        let state = controller.hover("y");

        // x-y is incident to y; x-z is not
        assert_eq!(state.edge_opacity["e0"], 1.0);
        assert_eq!(state.edge_width["e0"], HIGHLIGHT_EDGE_WIDTH);
        assert_eq!(state.edge_opacity["e1"], 0.15);
        assert_eq!(state.edge_width["e1"], BASE_EDGE_WIDTH);
    }

    #[test]
    fn test_blur_restores_baseline() {
        let controller = InteractionController::new(&sample());
        let state = controller.blur();

        assert!(state.node_opacity.values().all(|&o| o == 1.0));
        assert!(state.edge_opacity.values().all(|&o| o == 0.8));
        assert!(state.edge_width.values().all(|&w| w == BASE_EDGE_WIDTH));
    }

    #[test]
    fn test_hover_unknown_id_is_baseline() {
        let controller = InteractionController::new(&sample());
        assert_eq!(controller.hover("ghost"), controller.blur());
    }

    #[test]
    fn test_hover_then_blur_round_trip() {
        use crate::view::style::{resolve_edge, resolve_node};
        use crate::view::surface::MemorySurface;
        use crate::view::theme::ThemeKind;

        let data = sample();
        let theme = ThemeKind::Default.definition();
        let mut surface = MemorySurface::new();
        for (i, node) in data.nodes.iter().enumerate() {
            surface.add_node(&node.id, resolve_node(node, theme, i, 1), None, false);
        }
        for (i, edge) in data.edges.iter().enumerate() {
            surface.add_edge(&edge_id(i), &edge.from, &edge.to, resolve_edge(edge, theme, i));
        }

        let controller = InteractionController::new(&data);
        controller.hover("x").apply(&mut surface);
        assert_eq!(surface.node("w").unwrap().opacity, 0.3);

        controller.blur().apply(&mut surface);
        assert!(surface.nodes().iter().all(|n| n.opacity == 1.0));
        assert!(surface.edges().iter().all(|e| e.opacity == 0.8));
    }

    #[test]
    fn test_projection_does_not_touch_graph_data() {
        let data = sample();
        let before = data.clone();
        let controller = InteractionController::new(&data);
        let _ = controller.hover("x");
        let _ = controller.blur();
        assert_eq!(data, before);
    }
}
