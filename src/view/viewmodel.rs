//! The graph view model: owned view state and pipeline orchestration.
//!
//! `GraphViewModel` is the single owner of the current graph data and of
//! the active theme/layout/background selection. All pipeline stages run
//! against this state in a fixed order: styling, then layout, then reveal.
//! Theme and layout changes re-run their own stage over the stored data
//! without refetching anything.
//!
//! A reload while a reveal is still running cancels the live handle before
//! touching the surface, so no stale step can mutate the replacement
//! graph.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::models::GraphData;
use crate::source::GraphSource;
use crate::view::interact::{InteractionController, edge_id};
use crate::view::layout::{self, LayoutKind, LayoutPlan};
use crate::view::reveal::{
    self, RevealConfig, RevealEdge, RevealHandle, RevealNode, RevealPlan, RevealPlayer,
};
use crate::view::style::{core_count, resolve_edge, resolve_node};
use crate::view::surface::{EdgePatch, MemorySurface, RenderSurface};
use crate::view::theme::{BackgroundKind, DARK_BACKGROUND_EDGE, ThemeKind};
use crate::{Error, Result};

/// The view's owned state: graph data plus active selections.
#[derive(Debug, Default)]
pub struct ViewState {
    pub data: GraphData,
    pub theme: ThemeKind,
    pub layout: LayoutKind,
    pub background: BackgroundKind,
    /// Nodes that already received an expansion, preventing duplicates.
    expanded: HashSet<String>,
}

impl ViewState {
    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.expanded.contains(node_id)
    }
}

/// Result of an expansion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// New node ids appended to the graph.
    Added(Vec<String>),
    /// The node was expanded before; nothing changed.
    AlreadyExpanded,
}

/// Mediates between the graph data, the pipeline stages, and a rendering
/// surface.
pub struct GraphViewModel<S: RenderSurface> {
    state: ViewState,
    surface: S,
    reveal_config: RevealConfig,
    interaction: InteractionController,
    player: Option<RevealPlayer>,
    live_handle: Option<RevealHandle>,
    highlight_enabled: bool,
}

impl<S: RenderSurface> GraphViewModel<S> {
    pub fn new(surface: S) -> Self {
        Self {
            state: ViewState::default(),
            surface,
            reveal_config: RevealConfig::default(),
            interaction: InteractionController::default(),
            player: None,
            live_handle: None,
            highlight_enabled: false,
        }
    }

    pub fn with_reveal_config(surface: S, reveal_config: RevealConfig) -> Self {
        Self {
            reveal_config,
            ..Self::new(surface)
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Replace all data and play the reveal from the start.
    ///
    /// Any reveal still in flight is cancelled first; its pending steps
    /// will never touch the new surface contents.
    pub fn load(&mut self, data: GraphData) -> RevealHandle {
        self.cancel_reveal();

        info!(
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            "loading graph"
        );
        self.state.data = data;
        self.state.expanded.clear();
        self.interaction = InteractionController::new(&self.state.data);
        self.highlight_enabled = false;
        self.surface.clear();

        let layout_plan = layout::compute(self.state.layout, &self.state.data.nodes);
        self.surface.set_physics(layout_plan.physics);
        self.surface.set_hierarchical(layout_plan.hierarchical);
        let plan = self.build_reveal_plan(&layout_plan);
        let (player, handle) = reveal::play(plan);
        self.player = Some(player);
        self.live_handle = Some(handle.clone());
        handle
    }

    /// Drive the running reveal up to the given clock reading.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let finished = player.advance(now_ms, &mut self.surface);
        if player.highlight_enabled() {
            self.highlight_enabled = true;
        }
        if finished {
            self.player = None;
            self.live_handle = None;
        }
    }

    /// Run the current reveal to completion in one step.
    pub fn finish_reveal(&mut self) {
        self.tick(u64::MAX);
    }

    /// Re-resolve styles for the active theme over the existing data.
    ///
    /// Unknown names fall back to the default theme. Data is not
    /// refetched and positions are untouched.
    pub fn set_theme(&mut self, name: &str) {
        let theme: ThemeKind = name.parse().unwrap_or_default();
        if theme.name() != name {
            warn!(name, fallback = theme.name(), "unknown theme");
        }
        self.state.theme = theme;
        self.restyle_all();
        debug!(theme = theme.name(), "restyled graph");
    }

    /// Recompute positions for the active layout without restyling.
    ///
    /// All pins are cleared before the new plan's pin policy applies;
    /// stale pins would silently defeat the new layout.
    pub fn set_layout(&mut self, name: &str) {
        let layout = name.parse().unwrap_or_default();
        self.state.layout = layout;

        let plan = layout::compute(layout, &self.state.data.nodes);
        self.apply_layout(&plan);
        debug!(layout = layout.name(), "applied layout");
    }

    /// Swap the background and adjust edge colors for legibility.
    pub fn set_background(&mut self, name: &str) {
        let background: BackgroundKind = name.parse().unwrap_or_default();
        self.state.background = background;
        self.surface.set_background(background.css());

        if background.is_dark() {
            for index in 0..self.state.data.edges.len() {
                self.surface.update_edge(
                    &edge_id(index),
                    EdgePatch {
                        color: Some(DARK_BACKGROUND_EDGE.to_string()),
                        ..EdgePatch::default()
                    },
                );
            }
        } else {
            // Revert to the theme's edge colors
            let theme = self.state.theme.definition();
            for (index, edge) in self.state.data.edges.iter().enumerate() {
                self.surface.update_edge(
                    &edge_id(index),
                    EdgePatch {
                        color: Some(resolve_edge(edge, theme, index).color),
                        ..EdgePatch::default()
                    },
                );
            }
        }
    }

    /// Append nodes/edges produced by expanding `node_id`.
    ///
    /// A second expansion of the same node is a no-op. A failing source
    /// leaves the state untouched.
    pub fn expand(&mut self, node_id: &str, source: &dyn GraphSource) -> Result<ExpandOutcome> {
        let Some(node) = self.state.data.node(node_id) else {
            return Err(Error::NotFound(format!("node {}", node_id)));
        };
        if self.state.expanded.contains(node_id) {
            debug!(node_id, "node already expanded");
            return Ok(ExpandOutcome::AlreadyExpanded);
        }

        let label = node.label.clone();
        let fragment = source.expand(node_id, &label, &self.state.data)?;

        let theme = self.state.theme.definition();
        let start_index = self.state.data.nodes.len();
        let edge_start = self.state.data.edges.len();
        let cores = core_count(&self.state.data.nodes);

        let added = self.state.data.append(fragment);
        // Style only the appended elements, with non-core rules (indices
        // continue past the existing collection, so index 0 never recurs)
        for (offset, node) in self.state.data.nodes[start_index..].iter().enumerate() {
            let index = start_index + offset;
            let visual = resolve_node(node, theme, index, cores);
            self.surface.add_node(&node.id, visual, None, false);
        }
        for (offset, edge) in self.state.data.edges[edge_start..].iter().enumerate() {
            let index = edge_start + offset;
            let visual = resolve_edge(edge, theme, index);
            self.surface
                .add_edge(&edge_id(index), &edge.from, &edge.to, visual);
        }

        self.state.expanded.insert(node_id.to_string());
        self.interaction = InteractionController::new(&self.state.data);
        info!(node_id, added = added.len(), "expanded node");
        Ok(ExpandOutcome::Added(added))
    }

    /// Dim everything outside the hovered node's neighborhood.
    ///
    /// Inactive until the reveal enables highlighting.
    pub fn hover(&mut self, node_id: &str) {
        if !self.highlight_enabled {
            return;
        }
        self.interaction.hover(node_id).apply(&mut self.surface);
    }

    /// Restore baseline opacities.
    pub fn blur(&mut self) {
        if !self.highlight_enabled {
            return;
        }
        self.interaction.blur().apply(&mut self.surface);
    }

    fn cancel_reveal(&mut self) {
        if let Some(handle) = self.live_handle.take() {
            handle.cancel();
        }
        self.player = None;
    }

    fn restyle_all(&mut self) {
        let theme = self.state.theme.definition();
        let cores = core_count(&self.state.data.nodes);
        for (index, node) in self.state.data.nodes.iter().enumerate() {
            let visual = resolve_node(node, theme, index, cores);
            self.surface.restyle_node(&node.id, visual);
        }
        for (index, edge) in self.state.data.edges.iter().enumerate() {
            let visual = resolve_edge(edge, theme, index);
            self.surface.restyle_edge(&edge_id(index), visual);
        }
        // Keep dark-background legibility after restyling
        if self.state.background.is_dark() {
            let name = self.state.background.name().to_string();
            self.set_background(&name);
        }
    }

    fn apply_layout(&mut self, plan: &LayoutPlan) {
        self.surface.clear_pins();
        for (id, position) in &plan.positions {
            self.surface.set_position(id, *position, plan.pinned);
        }
        self.surface.set_physics(plan.physics);
        self.surface.set_hierarchical(plan.hierarchical);
    }

    fn build_reveal_plan(&self, layout_plan: &LayoutPlan) -> RevealPlan {
        let theme = self.state.theme.definition();
        let cores = core_count(&self.state.data.nodes);

        let nodes = self
            .state
            .data
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| RevealNode {
                id: node.id.clone(),
                visual: resolve_node(node, theme, index, cores),
                position: layout_plan.positions.get(&node.id).copied(),
                pinned: layout_plan.pinned,
                pulse: node.group == 0,
            })
            .collect();

        let edges = self
            .state
            .data
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| RevealEdge {
                id: edge_id(index),
                from: edge.from.clone(),
                to: edge.to.clone(),
                visual: resolve_edge(edge, theme, index),
            })
            .collect();

        RevealPlan::build(&self.reveal_config, nodes, edges)
    }
}

impl GraphViewModel<MemorySurface> {
    /// Serialize the current surface to SVG bytes.
    pub fn export_snapshot(&self) -> Vec<u8> {
        crate::view::snapshot::render_svg(&self.surface)
    }
}
