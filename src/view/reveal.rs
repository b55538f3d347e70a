//! The staggered reveal animation.
//!
//! A reveal is built as a deterministic plan of timed steps: every node is
//! scheduled before any edge, node *i* starts at `i × node_delay` and passes
//! through appear → grow → settle sub-states at fixed sub-delays, edges
//! follow after a phase gap, and the sequence ends with a view-fit plus
//! enabling neighbor-highlight interaction. Core nodes get a finite pulse
//! train that free-runs after their settle step and self-cancels when its
//! target disappears.
//!
//! Scheduling is cooperative and single-threaded: [`RevealPlayer::advance`]
//! applies every step due at the given clock reading. Steps whose target no
//! longer exists are ignored, never propagated. `play` hands back a
//! [`RevealHandle`]; cancelling it invalidates all pending steps, which is
//! what makes mid-animation reloads safe.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::view::layout::Position;
use crate::view::style::{EdgeVisual, NodeVisual};
use crate::view::surface::{NodePatch, RenderSurface};

/// Fraction of the final size a node appears at.
const APPEAR_SCALE: f64 = 0.1;

/// Overshoot factor of the grow sub-state.
const GROW_SCALE: f64 = 1.4;

/// Pulse expansion factor.
const PULSE_SCALE: f64 = 1.12;

/// Glow blur radius during the grow sub-state.
const STRONG_GLOW: f64 = 30.0;

/// Glow blur radius after settling.
const NORMAL_GLOW: f64 = 10.0;

/// Timing constants of the reveal sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Delay between successive node starts.
    pub node_delay_ms: u64,
    /// Delay between successive edge insertions.
    pub edge_delay_ms: u64,
    /// Gap between the node phase and the first edge.
    pub edge_phase_gap_ms: u64,
    /// Buffer after the last edge before fitting the view.
    pub settle_buffer_ms: u64,
    /// Appear → grow sub-delay.
    pub grow_delay_ms: u64,
    /// Appear → settle sub-delay.
    pub settle_delay_ms: u64,
    /// Interval between pulse beats.
    pub pulse_interval_ms: u64,
    /// Total lifetime of a pulse train.
    pub pulse_duration_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            node_delay_ms: 120,
            edge_delay_ms: 60,
            edge_phase_gap_ms: 200,
            settle_buffer_ms: 600,
            grow_delay_ms: 80,
            settle_delay_ms: 250,
            pulse_interval_ms: 400,
            pulse_duration_ms: 6000,
        }
    }
}

/// A node entering the reveal, fully styled and placed.
#[derive(Debug, Clone)]
pub struct RevealNode {
    pub id: String,
    pub visual: NodeVisual,
    pub position: Option<Position>,
    pub pinned: bool,
    /// Whether this node gets the pulse train (core nodes of group 0).
    pub pulse: bool,
}

/// An edge entering the reveal.
#[derive(Debug, Clone)]
pub struct RevealEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub visual: EdgeVisual,
}

/// One scheduled mutation of the surface.
#[derive(Debug, Clone)]
pub enum RevealAction {
    /// Insert the node at near-zero size, fully transparent.
    NodeAppear {
        node: Box<RevealNode>,
    },
    /// Overshoot to 140% size with a strong glow.
    NodeGrow { id: String, final_size: f64 },
    /// Final size, normal glow.
    NodeSettle { id: String, final_size: f64 },
    /// Insert the edge.
    EdgeAppear { edge: Box<RevealEdge> },
    /// One beat of the core-node pulse.
    Pulse { id: String, size: f64 },
    /// Fit the viewport to the revealed graph.
    FitView,
    /// Turn on neighbor-highlight interaction.
    EnableHighlight,
}

/// A timed step of the reveal plan.
#[derive(Debug, Clone)]
pub struct RevealStep {
    pub at_ms: u64,
    pub action: RevealAction,
}

/// The full, deterministic reveal timeline.
#[derive(Debug, Clone, Default)]
pub struct RevealPlan {
    steps: Vec<RevealStep>,
}

impl RevealPlan {
    /// Build the timeline for the given styled nodes and edges.
    pub fn build(config: &RevealConfig, nodes: Vec<RevealNode>, edges: Vec<RevealEdge>) -> Self {
        let mut steps = Vec::new();
        let node_count = nodes.len() as u64;

        for (i, node) in nodes.into_iter().enumerate() {
            let start = i as u64 * config.node_delay_ms;
            let final_size = node.visual.size;
            let id = node.id.clone();
            let pulse = node.pulse;

            steps.push(RevealStep {
                at_ms: start,
                action: RevealAction::NodeAppear {
                    node: Box::new(node),
                },
            });
            steps.push(RevealStep {
                at_ms: start + config.grow_delay_ms,
                action: RevealAction::NodeGrow {
                    id: id.clone(),
                    final_size,
                },
            });
            let settle_at = start + config.settle_delay_ms;
            steps.push(RevealStep {
                at_ms: settle_at,
                action: RevealAction::NodeSettle {
                    id: id.clone(),
                    final_size,
                },
            });

            if pulse {
                let beats = config.pulse_duration_ms / config.pulse_interval_ms;
                for beat in 1..=beats {
                    let size = if beat % 2 == 1 {
                        final_size * PULSE_SCALE
                    } else {
                        final_size
                    };
                    steps.push(RevealStep {
                        at_ms: settle_at + beat * config.pulse_interval_ms,
                        action: RevealAction::Pulse {
                            id: id.clone(),
                            size,
                        },
                    });
                }
            }
        }

        let edge_phase_start = node_count * config.node_delay_ms + config.edge_phase_gap_ms;
        let edge_count = edges.len() as u64;
        for (j, edge) in edges.into_iter().enumerate() {
            steps.push(RevealStep {
                at_ms: edge_phase_start + j as u64 * config.edge_delay_ms,
                action: RevealAction::EdgeAppear {
                    edge: Box::new(edge),
                },
            });
        }

        let last_edge = edge_phase_start + edge_count.saturating_sub(1) * config.edge_delay_ms;
        let finish_at = last_edge + config.settle_buffer_ms;
        steps.push(RevealStep {
            at_ms: finish_at,
            action: RevealAction::FitView,
        });
        steps.push(RevealStep {
            at_ms: finish_at,
            action: RevealAction::EnableHighlight,
        });

        // Stable sort keeps same-instant steps in push order (fit before
        // highlight, appear before its own grow).
        steps.sort_by_key(|s| s.at_ms);
        Self { steps }
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    /// Scheduled time of the last step.
    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map(|s| s.at_ms).unwrap_or(0)
    }
}

/// Cancellation token for a running reveal.
///
/// Cancelling invalidates every step the player has not yet applied.
#[derive(Debug, Clone)]
pub struct RevealHandle {
    cancelled: Arc<AtomicBool>,
}

impl RevealHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Cooperative pump that applies plan steps as a clock advances.
#[derive(Debug)]
pub struct RevealPlayer {
    plan: RevealPlan,
    cursor: usize,
    cancelled: Arc<AtomicBool>,
    /// Pulse targets whose update failed; their remaining beats are skipped.
    dead_pulses: HashSet<String>,
    highlight_enabled: bool,
}

/// Start a reveal, returning the player and its cancellation handle.
pub fn play(plan: RevealPlan) -> (RevealPlayer, RevealHandle) {
    let cancelled = Arc::new(AtomicBool::new(false));
    let handle = RevealHandle {
        cancelled: Arc::clone(&cancelled),
    };
    let player = RevealPlayer {
        plan,
        cursor: 0,
        cancelled,
        dead_pulses: HashSet::new(),
        highlight_enabled: false,
    };
    (player, handle)
}

impl RevealPlayer {
    /// Apply every step due at `now_ms`. Returns `true` when the reveal is
    /// finished (all steps applied, or the handle was cancelled).
    pub fn advance(&mut self, now_ms: u64, surface: &mut dyn RenderSurface) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            if self.cursor < self.plan.steps.len() {
                debug!(
                    pending = self.plan.steps.len() - self.cursor,
                    "reveal cancelled"
                );
                self.cursor = self.plan.steps.len();
            }
            return true;
        }

        while self.cursor < self.plan.steps.len() && self.plan.steps[self.cursor].at_ms <= now_ms {
            let step = self.plan.steps[self.cursor].clone();
            self.cursor += 1;
            self.apply(step.action, surface);
        }

        self.is_finished()
    }

    /// Run the whole remaining plan in one call.
    pub fn run_to_completion(&mut self, surface: &mut dyn RenderSurface) {
        self.advance(u64::MAX, surface);
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.plan.steps.len()
    }

    /// Whether the sequence reached its enable-highlight step.
    pub fn highlight_enabled(&self) -> bool {
        self.highlight_enabled
    }

    fn apply(&mut self, action: RevealAction, surface: &mut dyn RenderSurface) {
        match action {
            RevealAction::NodeAppear { node } => {
                let RevealNode {
                    id,
                    visual,
                    position,
                    pinned,
                    ..
                } = *node;
                let size = visual.size;
                surface.add_node(&id, visual, position, pinned);
                surface.update_node(
                    &id,
                    NodePatch {
                        size: Some(size * APPEAR_SCALE),
                        opacity: Some(0.0),
                        glow: Some(0.0),
                    },
                );
            }
            RevealAction::NodeGrow { id, final_size } => {
                surface.update_node(
                    &id,
                    NodePatch {
                        size: Some(final_size * GROW_SCALE),
                        opacity: Some(1.0),
                        glow: Some(STRONG_GLOW),
                    },
                );
            }
            RevealAction::NodeSettle { id, final_size } => {
                surface.update_node(
                    &id,
                    NodePatch {
                        size: Some(final_size),
                        opacity: None,
                        glow: Some(NORMAL_GLOW),
                    },
                );
            }
            RevealAction::EdgeAppear { edge } => {
                let RevealEdge {
                    id,
                    from,
                    to,
                    visual,
                } = *edge;
                surface.add_edge(&id, &from, &to, visual);
            }
            RevealAction::Pulse { id, size } => {
                if self.dead_pulses.contains(&id) {
                    return;
                }
                let alive = surface.update_node(
                    &id,
                    NodePatch {
                        size: Some(size),
                        opacity: None,
                        glow: None,
                    },
                );
                if !alive {
                    // Target is gone; the rest of this pulse train
                    // self-cancels.
                    self.dead_pulses.insert(id);
                }
            }
            RevealAction::FitView => {
                surface.fit_view();
            }
            RevealAction::EnableHighlight => {
                self.highlight_enabled = true;
                debug!("reveal complete, highlight enabled");
            }
        }
    }
}
