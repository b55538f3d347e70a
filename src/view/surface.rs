//! The rendering-surface boundary.
//!
//! The view pipeline never talks to a concrete renderer; it drives a
//! [`RenderSurface`]. Mutating calls that target a missing element return
//! `false` instead of failing: the reveal animation and pulse timers can
//! fire after the surface was replaced, and every such step must no-op
//! safely.
//!
//! [`MemorySurface`] is the in-process backend used by tests and by the
//! snapshot exporter.

use std::collections::HashMap;

use crate::view::layout::{HierarchicalConfig, PhysicsParams, Position};
use crate::view::style::{EdgeVisual, NodeVisual};

/// A partial update to a node's transient render state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub size: Option<f64>,
    pub opacity: Option<f64>,
    /// Glow blur radius; `0.0` disables the glow.
    pub glow: Option<f64>,
}

/// A partial update to an edge's transient render state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub opacity: Option<f64>,
    pub width: Option<f64>,
    pub color: Option<String>,
}

/// The surface the view pipeline renders into.
pub trait RenderSurface {
    /// Insert a node. An existing node with the same id is replaced.
    fn add_node(&mut self, id: &str, visual: NodeVisual, position: Option<Position>, pinned: bool);

    /// Insert an edge. An existing edge with the same id is replaced.
    fn add_edge(&mut self, id: &str, from: &str, to: &str, visual: EdgeVisual);

    /// Apply a patch to a node. Returns `false` when the id is unknown.
    fn update_node(&mut self, id: &str, patch: NodePatch) -> bool;

    /// Apply a patch to an edge. Returns `false` when the id is unknown.
    fn update_edge(&mut self, id: &str, patch: EdgePatch) -> bool;

    /// Replace a node's resolved visual, keeping transient state.
    fn restyle_node(&mut self, id: &str, visual: NodeVisual) -> bool;

    /// Replace an edge's resolved visual, keeping transient state.
    fn restyle_edge(&mut self, id: &str, visual: EdgeVisual) -> bool;

    /// Move a node, optionally pinning it there.
    fn set_position(&mut self, id: &str, position: Position, pinned: bool) -> bool;

    /// Unpin every node. Must run before applying a new layout's pin
    /// policy, or stale pins defeat the new layout.
    fn clear_pins(&mut self);

    /// Configure the physics engine; `None` disables it.
    fn set_physics(&mut self, params: Option<PhysicsParams>);

    /// Configure hierarchical mode; `None` disables it.
    fn set_hierarchical(&mut self, config: Option<HierarchicalConfig>);

    /// Set the CSS-level background.
    fn set_background(&mut self, css: &str);

    /// Fit the viewport to the current content.
    fn fit_view(&mut self);

    /// Remove all nodes and edges.
    fn clear(&mut self);
}

/// A node as held by the in-memory surface.
#[derive(Debug, Clone)]
pub struct SurfaceNode {
    pub id: String,
    pub visual: NodeVisual,
    pub position: Option<Position>,
    pub pinned: bool,
    pub size: f64,
    pub opacity: f64,
    pub glow: f64,
}

/// An edge as held by the in-memory surface.
#[derive(Debug, Clone)]
pub struct SurfaceEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub visual: EdgeVisual,
    pub opacity: f64,
    pub width: f64,
    pub color: String,
}

/// In-memory rendering surface.
///
/// Preserves insertion order, which the snapshot exporter relies on for
/// stable output.
#[derive(Debug, Default)]
pub struct MemorySurface {
    nodes: Vec<SurfaceNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<SurfaceEdge>,
    edge_index: HashMap<String, usize>,
    physics: Option<PhysicsParams>,
    hierarchical: Option<HierarchicalConfig>,
    background: String,
    fit_count: u32,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SurfaceEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&SurfaceNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edge(&self, id: &str) -> Option<&SurfaceEdge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn physics(&self) -> Option<&PhysicsParams> {
        self.physics.as_ref()
    }

    pub fn hierarchical(&self) -> Option<&HierarchicalConfig> {
        self.hierarchical.as_ref()
    }

    /// How many times the viewport was fitted.
    pub fn fit_count(&self) -> u32 {
        self.fit_count
    }
}

impl RenderSurface for MemorySurface {
    fn add_node(&mut self, id: &str, visual: NodeVisual, position: Option<Position>, pinned: bool) {
        let node = SurfaceNode {
            id: id.to_string(),
            size: visual.size,
            visual,
            position,
            pinned,
            opacity: 1.0,
            glow: 0.0,
        };
        match self.node_index.get(id) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.node_index.insert(id.to_string(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    fn add_edge(&mut self, id: &str, from: &str, to: &str, visual: EdgeVisual) {
        let edge = SurfaceEdge {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            opacity: 0.8,
            width: visual.width,
            color: visual.color.clone(),
            visual,
        };
        match self.edge_index.get(id) {
            Some(&i) => self.edges[i] = edge,
            None => {
                self.edge_index.insert(id.to_string(), self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        let Some(&i) = self.node_index.get(id) else {
            return false;
        };
        let node = &mut self.nodes[i];
        if let Some(size) = patch.size {
            node.size = size;
        }
        if let Some(opacity) = patch.opacity {
            node.opacity = opacity;
        }
        if let Some(glow) = patch.glow {
            node.glow = glow;
        }
        true
    }

    fn update_edge(&mut self, id: &str, patch: EdgePatch) -> bool {
        let Some(&i) = self.edge_index.get(id) else {
            return false;
        };
        let edge = &mut self.edges[i];
        if let Some(opacity) = patch.opacity {
            edge.opacity = opacity;
        }
        if let Some(width) = patch.width {
            edge.width = width;
        }
        if let Some(color) = patch.color {
            edge.color = color;
        }
        true
    }

    fn restyle_node(&mut self, id: &str, visual: NodeVisual) -> bool {
        let Some(&i) = self.node_index.get(id) else {
            return false;
        };
        let node = &mut self.nodes[i];
        node.size = visual.size;
        node.visual = visual;
        true
    }

    fn restyle_edge(&mut self, id: &str, visual: EdgeVisual) -> bool {
        let Some(&i) = self.edge_index.get(id) else {
            return false;
        };
        let edge = &mut self.edges[i];
        edge.width = visual.width;
        edge.color = visual.color.clone();
        edge.visual = visual;
        true
    }

    fn set_position(&mut self, id: &str, position: Position, pinned: bool) -> bool {
        let Some(&i) = self.node_index.get(id) else {
            return false;
        };
        let node = &mut self.nodes[i];
        node.position = Some(position);
        node.pinned = pinned;
        true
    }

    fn clear_pins(&mut self) {
        for node in &mut self.nodes {
            node.pinned = false;
        }
    }

    fn set_physics(&mut self, params: Option<PhysicsParams>) {
        self.physics = params;
    }

    fn set_hierarchical(&mut self, config: Option<HierarchicalConfig>) {
        self.hierarchical = config;
    }

    fn set_background(&mut self, css: &str) {
        self.background = css.to_string();
    }

    fn fit_view(&mut self) {
        self.fit_count += 1;
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
    }
}
