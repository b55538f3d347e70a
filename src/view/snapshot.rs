//! SVG snapshot export.
//!
//! Serializes the current state of a [`MemorySurface`] — positioned,
//! styled nodes and edges plus the background — into a self-contained SVG
//! document. Nodes without positions (engine-driven layouts that were never
//! seeded) are placed on a fallback ring so a snapshot is always
//! produced.

use std::f64::consts::TAU;
use std::fmt::Write;

use crate::view::layout::Position;
use crate::view::surface::{MemorySurface, SurfaceNode};
use crate::view::theme::NodeShape;

/// Padding around the content bounding box.
const MARGIN: f64 = 60.0;

/// Ring radius used for nodes that never received coordinates.
const FALLBACK_RADIUS: f64 = 300.0;

/// Render the surface to SVG bytes.
pub fn render_svg(surface: &MemorySurface) -> Vec<u8> {
    let placed = placements(surface);

    let (min, max) = bounding_box(&placed);
    let width = (max.x - min.x) + 2.0 * MARGIN;
    let height = (max.y - min.y) + 2.0 * MARGIN;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.1} {:.1} {:.1} {:.1}">"#,
        min.x - MARGIN,
        min.y - MARGIN,
        width,
        height
    );
    let _ = writeln!(
        svg,
        r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
        min.x - MARGIN,
        min.y - MARGIN,
        width,
        height,
        surface.background()
    );

    // Edges under nodes
    for edge in surface.edges() {
        let (Some(a), Some(b)) = (position_of(&placed, &edge.from), position_of(&placed, &edge.to))
        else {
            continue;
        };
        let _ = writeln!(
            svg,
            r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" opacity="{:.2}"/>"#,
            a.x, a.y, b.x, b.y, edge.color, edge.width, edge.opacity
        );
        if let Some(label) = &edge.visual.label {
            let _ = writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle" fill="{}" opacity="{:.2}">{}</text>"#,
                (a.x + b.x) / 2.0,
                (a.y + b.y) / 2.0 - 4.0,
                edge.color,
                edge.opacity,
                escape(label)
            );
        }
    }

    for (node, pos) in &placed {
        write_node(&mut svg, node, *pos);
    }

    svg.push_str("</svg>\n");
    svg.into_bytes()
}

fn write_node(svg: &mut String, node: &SurfaceNode, pos: Position) {
    let v = &node.visual;
    let half = node.size / 2.0;

    let shape_markup = match v.shape {
        NodeShape::Dot => format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}""#,
            pos.x, pos.y, half
        ),
        NodeShape::Ellipse => format!(
            r#"<ellipse cx="{:.1}" cy="{:.1}" rx="{:.1}" ry="{:.1}""#,
            pos.x,
            pos.y,
            node.size,
            half
        ),
        NodeShape::Box | NodeShape::Square => format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="4""#,
            pos.x - half,
            pos.y - half,
            node.size,
            node.size
        ),
        NodeShape::Diamond => polygon(&diamond_points(pos, half)),
        NodeShape::Triangle => polygon(&triangle_points(pos, half)),
        NodeShape::Star => polygon(&star_points(pos, half)),
        NodeShape::Hexagon => polygon(&hexagon_points(pos, half)),
    };

    let _ = writeln!(
        svg,
        r#"  {} fill="{}" stroke="{}" stroke-width="2" opacity="{:.2}"/>"#,
        shape_markup, v.fill, v.border, node.opacity
    );

    let weight = if v.bold { " font-weight=\"bold\"" } else { "" };
    let label_y = pos.y + v.label_vadjust + v.font_size / 3.0;
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" font-size="{:.0}"{} text-anchor="middle" fill="{}" opacity="{:.2}">{}</text>"#,
        pos.x,
        label_y,
        v.font_size,
        weight,
        v.font_color,
        node.opacity,
        escape(strip_markup(&v.label))
    );
}

fn polygon(points: &[Position]) -> String {
    let list = points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    format!(r#"<polygon points="{}""#, list)
}

fn hexagon_points(center: Position, radius: f64) -> Vec<Position> {
    (0..6)
        .map(|i| {
            let angle = i as f64 * TAU / 6.0 - TAU / 12.0;
            Position::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

fn diamond_points(center: Position, radius: f64) -> Vec<Position> {
    vec![
        Position::new(center.x, center.y - radius),
        Position::new(center.x + radius, center.y),
        Position::new(center.x, center.y + radius),
        Position::new(center.x - radius, center.y),
    ]
}

fn triangle_points(center: Position, radius: f64) -> Vec<Position> {
    (0..3)
        .map(|i| {
            let angle = i as f64 * TAU / 3.0 - TAU / 4.0;
            Position::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

fn star_points(center: Position, radius: f64) -> Vec<Position> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { radius * 0.45 };
            let angle = i as f64 * TAU / 10.0 - TAU / 4.0;
            Position::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect()
}

/// Assign every node a position, falling back to a ring for nodes the
/// layout left to the physics engine.
fn placements(surface: &MemorySurface) -> Vec<(&SurfaceNode, Position)> {
    let unplaced = surface
        .nodes()
        .iter()
        .filter(|n| n.position.is_none())
        .count();
    let step = if unplaced > 0 {
        TAU / unplaced as f64
    } else {
        0.0
    };

    let mut ring_slot = 0usize;
    surface
        .nodes()
        .iter()
        .map(|node| {
            let pos = node.position.unwrap_or_else(|| {
                let angle = step * ring_slot as f64;
                ring_slot += 1;
                Position::new(FALLBACK_RADIUS * angle.cos(), FALLBACK_RADIUS * angle.sin())
            });
            (node, pos)
        })
        .collect()
}

fn position_of(placed: &[(&SurfaceNode, Position)], id: &str) -> Option<Position> {
    placed.iter().find(|(n, _)| n.id == id).map(|(_, p)| *p)
}

fn bounding_box(placed: &[(&SurfaceNode, Position)]) -> (Position, Position) {
    if placed.is_empty() {
        return (Position::new(-200.0, -150.0), Position::new(200.0, 150.0));
    }
    let mut min = Position::new(f64::MAX, f64::MAX);
    let mut max = Position::new(f64::MIN, f64::MIN);
    for (node, pos) in placed {
        min.x = min.x.min(pos.x - node.size);
        min.y = min.y.min(pos.y - node.size);
        max.x = max.x.max(pos.x + node.size);
        max.y = max.y.max(pos.y + node.size);
    }
    (min, max)
}

/// Remove emphasis markup before the label goes into a plain text element.
fn strip_markup(label: &str) -> &str {
    label
        .strip_prefix("<b>")
        .and_then(|rest| rest.strip_suffix("</b>"))
        .unwrap_or(label)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
