//! Named layouts: deterministic coordinate assignment and physics presets.
//!
//! Each layout is a pure function of the ordered node sequence (and group
//! membership for the cluster layout): the same input always produces the
//! same coordinates. Physics-based layouts carry a parameter set with a
//! fixed seed instead of coordinates.
//!
//! A plan's `pinned` flag is a policy, not an applied state: callers must
//! clear previously pinned coordinates before applying a new plan, or the
//! stale pins silently defeat the new layout.

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::str::FromStr;

use serde::Serialize;

use crate::models::GraphNode;

/// Grid cell spacing.
const GRID_SPACING: f64 = 150.0;

/// Radius of the innermost concentric ring.
const CONCENTRIC_BASE_RADIUS: f64 = 100.0;

/// Radius increment per concentric ring.
const CONCENTRIC_RING_STEP: f64 = 120.0;

/// Single-ring radius of the circular layout.
const CIRCULAR_RADIUS: f64 = 300.0;

/// Ring radius of the star layout.
const STAR_RADIUS: f64 = 250.0;

/// Outer ring radius for cluster centroids.
const CLUSTER_OUTER_RADIUS: f64 = 400.0;

/// Ring radius of nodes around their cluster centroid.
const CLUSTER_INNER_RADIUS: f64 = 80.0;

/// Fixed seed for force-directed initial placement.
const FORCE_SEED: u64 = 42;

/// A 2D position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Force-engine parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsParams {
    pub gravitational_constant: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub spring_constant: f64,
    pub damping: f64,
    pub stabilization_iterations: u32,
    /// Seed for reproducible initial placement.
    pub seed: u64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravitational_constant: -8000.0,
            central_gravity: 0.3,
            spring_length: 150.0,
            spring_constant: 0.04,
            damping: 0.09,
            stabilization_iterations: 200,
            seed: FORCE_SEED,
        }
    }
}

impl PhysicsParams {
    /// Loosened parameters for the circular layout, which seeds ring
    /// positions and then lets the engine smooth overlaps.
    pub fn loosened() -> Self {
        Self {
            gravitational_constant: -3000.0,
            central_gravity: 0.1,
            spring_constant: 0.02,
            damping: 0.3,
            ..Self::default()
        }
    }

    /// Tightened attraction for the cluster layout so clusters cohere.
    pub fn clustered() -> Self {
        Self {
            spring_length: 80.0,
            spring_constant: 0.1,
            central_gravity: 0.5,
            ..Self::default()
        }
    }
}

/// Direction of the hierarchical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HierarchicalDirection {
    UpDown,
    LeftRight,
    RightLeft,
}

/// Parameters handed to the rendering library's hierarchical mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HierarchicalConfig {
    pub direction: HierarchicalDirection,
    pub level_separation: f64,
    pub node_spacing: f64,
}

/// The closed set of named layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutKind {
    Grid,
    Concentric,
    Circular,
    Spiral,
    Star,
    Cluster,
    HierarchicalUd,
    HierarchicalLr,
    HierarchicalRl,
    Tree,
    #[default]
    Force,
}

impl LayoutKind {
    /// All layouts, in listing order.
    pub fn all() -> &'static [LayoutKind] {
        &[
            LayoutKind::Grid,
            LayoutKind::Concentric,
            LayoutKind::Circular,
            LayoutKind::Spiral,
            LayoutKind::Star,
            LayoutKind::Cluster,
            LayoutKind::HierarchicalUd,
            LayoutKind::HierarchicalLr,
            LayoutKind::HierarchicalRl,
            LayoutKind::Tree,
            LayoutKind::Force,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Grid => "grid",
            LayoutKind::Concentric => "concentric",
            LayoutKind::Circular => "circular",
            LayoutKind::Spiral => "spiral",
            LayoutKind::Star => "star",
            LayoutKind::Cluster => "cluster",
            LayoutKind::HierarchicalUd => "hierarchical-ud",
            LayoutKind::HierarchicalLr => "hierarchical-lr",
            LayoutKind::HierarchicalRl => "hierarchical-rl",
            LayoutKind::Tree => "tree",
            LayoutKind::Force => "force",
        }
    }
}

impl FromStr for LayoutKind {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to the force layout.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "grid" => LayoutKind::Grid,
            "concentric" => LayoutKind::Concentric,
            "circular" => LayoutKind::Circular,
            "spiral" => LayoutKind::Spiral,
            "star" => LayoutKind::Star,
            "cluster" => LayoutKind::Cluster,
            "hierarchical-ud" => LayoutKind::HierarchicalUd,
            "hierarchical-lr" => LayoutKind::HierarchicalLr,
            "hierarchical-rl" => LayoutKind::HierarchicalRl,
            "tree" => LayoutKind::Tree,
            _ => LayoutKind::Force,
        })
    }
}

/// The outcome of computing a layout: fixed coordinates and/or an engine
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    /// Seed coordinates keyed by node id. Empty for engine-only layouts.
    pub positions: BTreeMap<String, Position>,

    /// Whether the seeded coordinates are pinned (excluded from physics).
    pub pinned: bool,

    /// Engine parameters, when physics stays enabled.
    pub physics: Option<PhysicsParams>,

    /// Hierarchical-mode delegation, when used.
    pub hierarchical: Option<HierarchicalConfig>,
}

impl LayoutPlan {
    fn pinned_positions(positions: BTreeMap<String, Position>) -> Self {
        Self {
            positions,
            pinned: true,
            physics: None,
            hierarchical: None,
        }
    }

    /// True when the plan leaves the physics engine running.
    pub fn physics_enabled(&self) -> bool {
        self.physics.is_some()
    }
}

/// Compute the layout plan for a node sequence.
pub fn compute(kind: LayoutKind, nodes: &[GraphNode]) -> LayoutPlan {
    match kind {
        LayoutKind::Grid => LayoutPlan::pinned_positions(grid_positions(nodes)),
        LayoutKind::Concentric => LayoutPlan::pinned_positions(concentric_positions(nodes)),
        LayoutKind::Spiral => LayoutPlan::pinned_positions(spiral_positions(nodes)),
        LayoutKind::Star => LayoutPlan::pinned_positions(star_positions(nodes)),
        LayoutKind::Circular => LayoutPlan {
            positions: circular_positions(nodes),
            pinned: false,
            physics: Some(PhysicsParams::loosened()),
            hierarchical: None,
        },
        LayoutKind::Cluster => LayoutPlan {
            positions: cluster_positions(nodes),
            pinned: false,
            physics: Some(PhysicsParams::clustered()),
            hierarchical: None,
        },
        LayoutKind::HierarchicalUd => hierarchical_plan(HierarchicalDirection::UpDown, 150.0, 120.0),
        LayoutKind::HierarchicalLr => {
            hierarchical_plan(HierarchicalDirection::LeftRight, 180.0, 100.0)
        }
        LayoutKind::HierarchicalRl => {
            hierarchical_plan(HierarchicalDirection::RightLeft, 180.0, 100.0)
        }
        LayoutKind::Tree => hierarchical_plan(HierarchicalDirection::UpDown, 200.0, 160.0),
        LayoutKind::Force => LayoutPlan {
            positions: BTreeMap::new(),
            pinned: false,
            physics: Some(PhysicsParams::default()),
            hierarchical: None,
        },
    }
}

fn hierarchical_plan(
    direction: HierarchicalDirection,
    level_separation: f64,
    node_spacing: f64,
) -> LayoutPlan {
    LayoutPlan {
        positions: BTreeMap::new(),
        pinned: true,
        physics: None,
        hierarchical: Some(HierarchicalConfig {
            direction,
            level_separation,
            node_spacing,
        }),
    }
}

/// Row-major grid with `ceil(sqrt(n))` columns, centered on the origin.
fn grid_positions(nodes: &[GraphNode]) -> BTreeMap<String, Position> {
    let n = nodes.len();
    if n == 0 {
        return BTreeMap::new();
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let x_offset = (cols - 1) as f64 / 2.0;
    let y_offset = (rows - 1) as f64 / 2.0;

    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let col = i % cols;
            let row = i / cols;
            let pos = Position::new(
                (col as f64 - x_offset) * GRID_SPACING,
                (row as f64 - y_offset) * GRID_SPACING,
            );
            (node.id.clone(), pos)
        })
        .collect()
}

/// Capacity of concentric ring `k`.
fn ring_capacity(k: usize) -> usize {
    6 + 4 * k
}

/// Rings of increasing capacity (ring k holds 6+4k nodes) at radius
/// 100+120k. The angular step divides by the ring's actual occupancy so a
/// partial outer ring stays evenly spaced.
fn concentric_positions(nodes: &[GraphNode]) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();
    let mut remaining = nodes.len();
    let mut start = 0usize;
    let mut ring = 0usize;

    while remaining > 0 {
        let occupancy = remaining.min(ring_capacity(ring));
        let radius = CONCENTRIC_BASE_RADIUS + CONCENTRIC_RING_STEP * ring as f64;
        let step = TAU / occupancy as f64;

        for slot in 0..occupancy {
            let angle = step * slot as f64;
            let node = &nodes[start + slot];
            positions.insert(
                node.id.clone(),
                Position::new(radius * angle.cos(), radius * angle.sin()),
            );
        }

        start += occupancy;
        remaining -= occupancy;
        ring += 1;
    }

    positions
}

/// Node i at angle 0.5·i, radius 30 + 15·angle.
fn spiral_positions(nodes: &[GraphNode]) -> BTreeMap<String, Position> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = 0.5 * i as f64;
            let radius = 30.0 + angle * 15.0;
            (
                node.id.clone(),
                Position::new(radius * angle.cos(), radius * angle.sin()),
            )
        })
        .collect()
}

/// All nodes evenly spaced on one fixed-radius ring.
fn circular_positions(nodes: &[GraphNode]) -> BTreeMap<String, Position> {
    let n = nodes.len();
    if n == 0 {
        return BTreeMap::new();
    }
    let step = TAU / n as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = step * i as f64;
            (
                node.id.clone(),
                Position::new(CIRCULAR_RADIUS * angle.cos(), CIRCULAR_RADIUS * angle.sin()),
            )
        })
        .collect()
}

/// Node 0 at the origin, the rest evenly spaced on a ring.
fn star_positions(nodes: &[GraphNode]) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();
    let Some((hub, rest)) = nodes.split_first() else {
        return positions;
    };
    positions.insert(hub.id.clone(), Position::default());

    if rest.is_empty() {
        return positions;
    }
    let step = TAU / rest.len() as f64;
    for (i, node) in rest.iter().enumerate() {
        let angle = step * i as f64;
        positions.insert(
            node.id.clone(),
            Position::new(STAR_RADIUS * angle.cos(), STAR_RADIUS * angle.sin()),
        );
    }
    positions
}

/// Group centroids on an outer ring, nodes on a small ring around their
/// centroid. Distinct group values take slots in ascending order.
fn cluster_positions(nodes: &[GraphNode]) -> BTreeMap<String, Position> {
    let mut by_group: BTreeMap<u32, Vec<&GraphNode>> = BTreeMap::new();
    for node in nodes {
        by_group.entry(node.group).or_default().push(node);
    }
    if by_group.is_empty() {
        return BTreeMap::new();
    }

    let group_count = by_group.len();
    let centroid_step = TAU / group_count as f64;
    let mut positions = BTreeMap::new();

    for (slot, (_, members)) in by_group.iter().enumerate() {
        let centroid = if group_count == 1 {
            Position::default()
        } else {
            let angle = centroid_step * slot as f64;
            Position::new(
                CLUSTER_OUTER_RADIUS * angle.cos(),
                CLUSTER_OUTER_RADIUS * angle.sin(),
            )
        };

        let member_step = TAU / members.len() as f64;
        for (i, node) in members.iter().enumerate() {
            let angle = member_step * i as f64;
            positions.insert(
                node.id.clone(),
                Position::new(
                    centroid.x + CLUSTER_INNER_RADIUS * angle.cos(),
                    centroid.y + CLUSTER_INNER_RADIUS * angle.sin(),
                ),
            );
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GraphNode;

    fn nodes(n: usize) -> Vec<GraphNode> {
        (0..n)
            .map(|i| GraphNode::new(format!("n{}", i), format!("Node {}", i), 2))
            .collect()
    }

    #[test]
    fn test_layout_name_fallback() {
        let layout: LayoutKind = "wibble".parse().unwrap();
        assert_eq!(layout, LayoutKind::Force);
        let layout: LayoutKind = "concentric".parse().unwrap();
        assert_eq!(layout, LayoutKind::Concentric);
    }

    #[test]
    fn test_layouts_are_pure() {
        let ns = nodes(17);
        for kind in LayoutKind::all() {
            let a = compute(*kind, &ns);
            let b = compute(*kind, &ns);
            assert_eq!(a, b, "{} not deterministic", kind.name());
        }
    }

    #[test]
    fn test_empty_node_list_degrades_gracefully() {
        for kind in LayoutKind::all() {
            let plan = compute(*kind, &[]);
            assert!(plan.positions.is_empty(), "{}", kind.name());
        }
    }

    #[test]
    fn test_grid_nine_nodes() {
        let ns = nodes(9);
        let plan = compute(LayoutKind::Grid, &ns);

        assert!(plan.pinned);
        assert!(!plan.physics_enabled());

        // 3x3 grid: node i at column i%3, row i/3, centered on origin
        for (i, node) in ns.iter().enumerate() {
            let pos = plan.positions[&node.id];
            let col = (i % 3) as f64;
            let row = (i / 3) as f64;
            assert_eq!(pos.x, (col - 1.0) * 150.0);
            assert_eq!(pos.y, (row - 1.0) * 150.0);
        }
    }

    #[test]
    fn test_grid_is_centered() {
        let plan = compute(LayoutKind::Grid, &nodes(9));
        let sum_x: f64 = plan.positions.values().map(|p| p.x).sum();
        let sum_y: f64 = plan.positions.values().map(|p| p.y).sum();
        assert!(sum_x.abs() < 1e-9);
        assert!(sum_y.abs() < 1e-9);
    }

    #[test]
    fn test_concentric_ring_partition() {
        // 6 + 10 + 4: first ring full, second ring full, third partial
        let ns = nodes(20);
        let plan = compute(LayoutKind::Concentric, &ns);

        let radius_of = |i: usize| plan.positions[&ns[i].id].distance(&Position::default());

        for i in 0..6 {
            assert!((radius_of(i) - 100.0).abs() < 1e-9, "node {}", i);
        }
        for i in 6..16 {
            assert!((radius_of(i) - 220.0).abs() < 1e-9, "node {}", i);
        }
        for i in 16..20 {
            assert!((radius_of(i) - 340.0).abs() < 1e-9, "node {}", i);
        }
    }

    #[test]
    fn test_concentric_partial_ring_evenly_spaced() {
        // 8 nodes: ring 0 holds 6, ring 1 holds the remaining 2 opposite
        // each other.
        let ns = nodes(8);
        let plan = compute(LayoutKind::Concentric, &ns);

        let a = plan.positions[&ns[6].id];
        let b = plan.positions[&ns[7].id];
        assert!((a.x + b.x).abs() < 1e-9);
        assert!((a.y + b.y).abs() < 1e-9);
    }

    #[test]
    fn test_spiral_radius_grows_with_angle() {
        let ns = nodes(10);
        let plan = compute(LayoutKind::Spiral, &ns);

        assert!(plan.pinned);
        for (i, node) in ns.iter().enumerate() {
            let angle = 0.5 * i as f64;
            let expected = 30.0 + angle * 15.0;
            let r = plan.positions[&node.id].distance(&Position::default());
            assert!((r - expected).abs() < 1e-9, "node {}", i);
        }
    }

    #[test]
    fn test_circular_seeds_then_reenables_physics() {
        let ns = nodes(12);
        let plan = compute(LayoutKind::Circular, &ns);

        assert!(!plan.pinned);
        let physics = plan.physics.unwrap();
        assert!(physics.spring_constant < PhysicsParams::default().spring_constant);

        for node in &ns {
            let r = plan.positions[&node.id].distance(&Position::default());
            assert!((r - 300.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_star_hub_at_origin() {
        let ns = nodes(7);
        let plan = compute(LayoutKind::Star, &ns);

        assert_eq!(plan.positions[&ns[0].id], Position::default());
        for node in &ns[1..] {
            let r = plan.positions[&node.id].distance(&Position::default());
            assert!((r - 250.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_star_single_node() {
        let ns = nodes(1);
        let plan = compute(LayoutKind::Star, &ns);
        assert_eq!(plan.positions.len(), 1);
    }

    #[test]
    fn test_cluster_groups_cohere() {
        let mut ns = nodes(6);
        for (i, node) in ns.iter_mut().enumerate() {
            node.group = if i < 3 { 2 } else { 5 };
        }
        let plan = compute(LayoutKind::Cluster, &ns);

        assert!(!plan.pinned);
        let physics = plan.physics.unwrap();
        assert!(physics.spring_constant > PhysicsParams::default().spring_constant);

        // Intra-group distances are bounded by the inner ring diameter;
        // the two centroids sit far apart on the outer ring.
        let a = plan.positions[&ns[0].id];
        let b = plan.positions[&ns[1].id];
        let c = plan.positions[&ns[3].id];
        assert!(a.distance(&b) <= 2.0 * 80.0 + 1e-9);
        assert!(a.distance(&c) > 2.0 * 80.0);
    }

    #[test]
    fn test_hierarchical_delegates() {
        let plan = compute(LayoutKind::HierarchicalLr, &nodes(5));
        assert!(plan.positions.is_empty());
        assert!(!plan.physics_enabled());
        let config = plan.hierarchical.unwrap();
        assert_eq!(config.direction, HierarchicalDirection::LeftRight);
    }

    #[test]
    fn test_force_has_fixed_seed() {
        let plan = compute(LayoutKind::Force, &nodes(5));
        assert!(plan.positions.is_empty());
        assert_eq!(plan.physics.unwrap().seed, 42);
    }
}
