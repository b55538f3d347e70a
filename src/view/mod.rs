//! Graph view pipeline.
//!
//! This module contains the rendering-side logic of mindgraph, independent
//! of any concrete rendering backend:
//!
//! - `theme`: named color/shape themes and backgrounds
//! - `style`: per-node/per-edge visual attribute resolution
//! - `layout`: named deterministic layouts and physics parameter sets
//! - `reveal`: the staggered node-then-edge reveal animation
//! - `interact`: neighbor-highlight projection for hover/blur
//! - `surface`: the rendering-surface boundary and an in-memory backend
//! - `snapshot`: SVG export of a rendered surface
//! - `viewmodel`: owned view state tying the pipeline together

pub mod interact;
pub mod layout;
pub mod reveal;
pub mod snapshot;
pub mod style;
pub mod surface;
pub mod theme;
pub mod viewmodel;

pub use interact::{HighlightState, InteractionController};
pub use layout::{LayoutKind, LayoutPlan, PhysicsParams, Position};
pub use reveal::{RevealConfig, RevealHandle, RevealPlan, RevealPlayer};
pub use style::{EdgeVisual, NodeVisual, resolve_edge, resolve_node};
pub use surface::{MemorySurface, RenderSurface};
pub use theme::{BackgroundKind, NodeShape, ThemeKind};
pub use viewmodel::{ExpandOutcome, GraphViewModel, ViewState};
