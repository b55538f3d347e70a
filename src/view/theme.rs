//! Named themes and backgrounds for graph styling.
//!
//! A theme maps semantic roles to concrete colors and shapes: a core style
//! for topic nodes, a palette for secondary nodes (either a two-level tier
//! or a repeating color cycle), and an edge color policy (flat or a cyclic
//! gradient keyed by edge index). Every group value resolves to a color via
//! the tier mapping or modular indexing, so there is no undefined-color
//! state.
//!
//! Theme and background names are closed enums; unknown names fall back to
//! `default` / `snow` rather than erroring.

use std::fmt;
use std::str::FromStr;

/// Text color used over light fills.
pub const DARK_TEXT: &str = "#1A202C";

/// Text color used over dark fills.
pub const LIGHT_TEXT: &str = "#F7FAFC";

/// Edge color substituted on dark backgrounds for legibility.
pub const DARK_BACKGROUND_EDGE: &str = "#CBD5E1";

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex string.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Relative luminance on a 0-1 scale.
    ///
    /// Uses the ITU-R BT.601 coefficients 0.299/0.587/0.114. Changing the
    /// coefficients or the 0.5 threshold in [`best_text_color`] breaks
    /// visual regression parity.
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Pick a readable text color for the given background fill.
///
/// Luminance strictly above 0.5 gets dark text; 0.5 and below (and any
/// unparseable color) gets light text.
pub fn best_text_color(background: &str) -> &'static str {
    match Color::parse_hex(background) {
        Some(color) if color.luminance() > 0.5 => DARK_TEXT,
        _ => LIGHT_TEXT,
    }
}

/// Node shape vocabulary.
///
/// Shapes whose native label placement is outside the shape body are
/// inflated and get a vertical label offset during style resolution, so
/// the label appears inside the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    #[default]
    Dot,
    Ellipse,
    Box,
    Square,
    Diamond,
    Triangle,
    Star,
    Hexagon,
}

impl NodeShape {
    /// Shapes that render their label outside the shape body.
    pub fn has_external_label(&self) -> bool {
        matches!(
            self,
            NodeShape::Diamond
                | NodeShape::Triangle
                | NodeShape::Star
                | NodeShape::Hexagon
                | NodeShape::Square
        )
    }

    /// Per-shape vertical label offset multiplier.
    ///
    /// Empirical values tuned against the rendering surface; keep verbatim.
    pub fn vadjust_multiplier(&self) -> f64 {
        match self {
            NodeShape::Triangle => 0.8,
            NodeShape::Star | NodeShape::Hexagon => 1.1,
            NodeShape::Diamond => 1.2,
            _ => 1.2,
        }
    }

    /// Parse a shape name; unknown names get the default shape.
    pub fn parse(name: &str) -> Self {
        match name {
            "dot" => NodeShape::Dot,
            "ellipse" => NodeShape::Ellipse,
            "box" => NodeShape::Box,
            "square" => NodeShape::Square,
            "diamond" => NodeShape::Diamond,
            "triangle" => NodeShape::Triangle,
            "star" => NodeShape::Star,
            "hexagon" => NodeShape::Hexagon,
            _ => NodeShape::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeShape::Dot => "dot",
            NodeShape::Ellipse => "ellipse",
            NodeShape::Box => "box",
            NodeShape::Square => "square",
            NodeShape::Diamond => "diamond",
            NodeShape::Triangle => "triangle",
            NodeShape::Star => "star",
            NodeShape::Hexagon => "hexagon",
        }
    }
}

/// Fill/border color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fill: &'static str,
    pub border: &'static str,
}

const fn pair(fill: &'static str, border: &'static str) -> ColorPair {
    ColorPair { fill, border }
}

/// Styling applied to core (topic) nodes, taking precedence over the
/// palette rules.
#[derive(Debug, Clone, Copy)]
pub struct CoreStyle {
    pub color: ColorPair,
    pub shape: NodeShape,
}

/// Secondary-node color policy.
#[derive(Debug, Clone, Copy)]
pub enum Palette {
    /// Two-level mapping keyed on the node group (group 2 = level 1,
    /// everything else = level 2).
    Tiered {
        level1: ColorPair,
        level2: ColorPair,
    },
    /// Repeating color cycle indexed by non-core position.
    Cycle(&'static [ColorPair]),
}

/// Edge color policy.
#[derive(Debug, Clone, Copy)]
pub enum EdgePolicy {
    /// Every edge gets the same color, with a separate highlight color.
    Flat {
        color: &'static str,
        highlight: &'static str,
    },
    /// Edge index cycles through a gradient color list.
    Gradient(&'static [&'static str]),
}

/// A complete, immutable theme record.
#[derive(Debug, Clone, Copy)]
pub struct ThemeDefinition {
    pub name: &'static str,
    pub core: CoreStyle,
    pub palette: Palette,
    pub edges: EdgePolicy,
}

/// The closed set of named themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Default,
    Rainbow,
    Ocean,
    Forest,
    Sunset,
    Pastel,
    Neon,
    Mono,
}

const RAINBOW_CYCLE: &[ColorPair] = &[
    pair("#F97316", "#EA580C"),
    pair("#FACC15", "#EAB308"),
    pair("#22C55E", "#16A34A"),
    pair("#06B6D4", "#0891B2"),
    pair("#3B82F6", "#2563EB"),
    pair("#8B5CF6", "#7C3AED"),
    pair("#EC4899", "#DB2777"),
];

const RAINBOW_GRADIENT: &[&str] = &[
    "#F97316", "#FACC15", "#22C55E", "#06B6D4", "#3B82F6", "#8B5CF6",
];

const FOREST_CYCLE: &[ColorPair] = &[
    pair("#22C55E", "#16A34A"),
    pair("#4ADE80", "#22C55E"),
    pair("#86EFAC", "#4ADE80"),
    pair("#15803D", "#166534"),
];

const SUNSET_CYCLE: &[ColorPair] = &[
    pair("#F97316", "#EA580C"),
    pair("#FB923C", "#F97316"),
    pair("#F59E0B", "#D97706"),
    pair("#EF4444", "#DC2626"),
];

const SUNSET_GRADIENT: &[&str] = &["#F97316", "#EF4444", "#F59E0B"];

const PASTEL_CYCLE: &[ColorPair] = &[
    pair("#FBCFE8", "#F9A8D4"),
    pair("#BFDBFE", "#93C5FD"),
    pair("#BBF7D0", "#86EFAC"),
    pair("#FDE68A", "#FCD34D"),
    pair("#DDD6FE", "#C4B5FD"),
];

const NEON_CYCLE: &[ColorPair] = &[
    pair("#22D3EE", "#06B6D4"),
    pair("#A3E635", "#84CC16"),
    pair("#F472B6", "#EC4899"),
    pair("#FBBF24", "#F59E0B"),
];

const NEON_GRADIENT: &[&str] = &["#22D3EE", "#A3E635", "#F472B6", "#FBBF24"];

static DEFAULT_THEME: ThemeDefinition = ThemeDefinition {
    name: "default",
    core: CoreStyle {
        color: pair("#4F46E5", "#4338CA"),
        shape: NodeShape::Ellipse,
    },
    palette: Palette::Tiered {
        level1: pair("#818CF8", "#6366F1"),
        level2: pair("#A5B4FC", "#818CF8"),
    },
    edges: EdgePolicy::Flat {
        color: "#94A3B8",
        highlight: "#475569",
    },
};

static RAINBOW_THEME: ThemeDefinition = ThemeDefinition {
    name: "rainbow",
    core: CoreStyle {
        color: pair("#E11D48", "#BE123C"),
        shape: NodeShape::Hexagon,
    },
    palette: Palette::Cycle(RAINBOW_CYCLE),
    edges: EdgePolicy::Gradient(RAINBOW_GRADIENT),
};

static OCEAN_THEME: ThemeDefinition = ThemeDefinition {
    name: "ocean",
    core: CoreStyle {
        color: pair("#0E7490", "#155E75"),
        shape: NodeShape::Dot,
    },
    palette: Palette::Tiered {
        level1: pair("#22D3EE", "#06B6D4"),
        level2: pair("#A5F3FC", "#67E8F9"),
    },
    edges: EdgePolicy::Flat {
        color: "#155E75",
        highlight: "#0E7490",
    },
};

static FOREST_THEME: ThemeDefinition = ThemeDefinition {
    name: "forest",
    core: CoreStyle {
        color: pair("#166534", "#14532D"),
        shape: NodeShape::Square,
    },
    palette: Palette::Cycle(FOREST_CYCLE),
    edges: EdgePolicy::Flat {
        color: "#14532D",
        highlight: "#166534",
    },
};

static SUNSET_THEME: ThemeDefinition = ThemeDefinition {
    name: "sunset",
    core: CoreStyle {
        color: pair("#C2410C", "#9A3412"),
        shape: NodeShape::Diamond,
    },
    palette: Palette::Cycle(SUNSET_CYCLE),
    edges: EdgePolicy::Gradient(SUNSET_GRADIENT),
};

static PASTEL_THEME: ThemeDefinition = ThemeDefinition {
    name: "pastel",
    core: CoreStyle {
        color: pair("#A78BFA", "#8B5CF6"),
        shape: NodeShape::Ellipse,
    },
    palette: Palette::Cycle(PASTEL_CYCLE),
    edges: EdgePolicy::Flat {
        color: "#CBD5E1",
        highlight: "#94A3B8",
    },
};

static NEON_THEME: ThemeDefinition = ThemeDefinition {
    name: "neon",
    core: CoreStyle {
        color: pair("#22D3EE", "#06B6D4"),
        shape: NodeShape::Star,
    },
    palette: Palette::Cycle(NEON_CYCLE),
    edges: EdgePolicy::Gradient(NEON_GRADIENT),
};

static MONO_THEME: ThemeDefinition = ThemeDefinition {
    name: "mono",
    core: CoreStyle {
        color: pair("#111827", "#030712"),
        shape: NodeShape::Box,
    },
    palette: Palette::Tiered {
        level1: pair("#4B5563", "#374151"),
        level2: pair("#9CA3AF", "#6B7280"),
    },
    edges: EdgePolicy::Flat {
        color: "#6B7280",
        highlight: "#374151",
    },
};

impl ThemeKind {
    /// All themes, in listing order.
    pub fn all() -> &'static [ThemeKind] {
        &[
            ThemeKind::Default,
            ThemeKind::Rainbow,
            ThemeKind::Ocean,
            ThemeKind::Forest,
            ThemeKind::Sunset,
            ThemeKind::Pastel,
            ThemeKind::Neon,
            ThemeKind::Mono,
        ]
    }

    /// Total mapping from kind to definition.
    pub fn definition(&self) -> &'static ThemeDefinition {
        match self {
            ThemeKind::Default => &DEFAULT_THEME,
            ThemeKind::Rainbow => &RAINBOW_THEME,
            ThemeKind::Ocean => &OCEAN_THEME,
            ThemeKind::Forest => &FOREST_THEME,
            ThemeKind::Sunset => &SUNSET_THEME,
            ThemeKind::Pastel => &PASTEL_THEME,
            ThemeKind::Neon => &NEON_THEME,
            ThemeKind::Mono => &MONO_THEME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition().name
    }
}

impl FromStr for ThemeKind {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to the default theme.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "default" => ThemeKind::Default,
            "rainbow" => ThemeKind::Rainbow,
            "ocean" => ThemeKind::Ocean,
            "forest" => ThemeKind::Forest,
            "sunset" => ThemeKind::Sunset,
            "pastel" => ThemeKind::Pastel,
            "neon" => ThemeKind::Neon,
            "mono" => ThemeKind::Mono,
            _ => ThemeKind::Default,
        })
    }
}

/// The closed set of named backgrounds.
///
/// Backgrounds are classified into two buckets; dark backgrounds trigger a
/// light edge-color override for legibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundKind {
    #[default]
    Snow,
    Paper,
    Mist,
    Slate,
    Midnight,
    Charcoal,
}

impl BackgroundKind {
    pub fn all() -> &'static [BackgroundKind] {
        &[
            BackgroundKind::Snow,
            BackgroundKind::Paper,
            BackgroundKind::Mist,
            BackgroundKind::Slate,
            BackgroundKind::Midnight,
            BackgroundKind::Charcoal,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BackgroundKind::Snow => "snow",
            BackgroundKind::Paper => "paper",
            BackgroundKind::Mist => "mist",
            BackgroundKind::Slate => "slate",
            BackgroundKind::Midnight => "midnight",
            BackgroundKind::Charcoal => "charcoal",
        }
    }

    /// CSS-level background color.
    pub fn css(&self) -> &'static str {
        match self {
            BackgroundKind::Snow => "#FFFFFF",
            BackgroundKind::Paper => "#FDF6E3",
            BackgroundKind::Mist => "#E2E8F0",
            BackgroundKind::Slate => "#334155",
            BackgroundKind::Midnight => "#0F172A",
            BackgroundKind::Charcoal => "#1F2937",
        }
    }

    /// Dark-bucket classification.
    pub fn is_dark(&self) -> bool {
        matches!(
            self,
            BackgroundKind::Slate | BackgroundKind::Midnight | BackgroundKind::Charcoal
        )
    }
}

impl FromStr for BackgroundKind {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to the snow background.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "snow" => BackgroundKind::Snow,
            "paper" => BackgroundKind::Paper,
            "mist" => BackgroundKind::Mist,
            "slate" => BackgroundKind::Slate,
            "midnight" => BackgroundKind::Midnight,
            "charcoal" => BackgroundKind::Charcoal,
            _ => BackgroundKind::Snow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse_hex("#FFFFFF"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::parse_hex("#000000"), Some(Color::rgb(0, 0, 0)));
        assert_eq!(Color::parse_hex("#4F46E5"), Some(Color::rgb(79, 70, 229)));
        assert_eq!(Color::parse_hex("4F46E5"), None);
        assert_eq!(Color::parse_hex("#FFF"), None);
        assert_eq!(Color::parse_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_best_text_color_extremes() {
        assert_eq!(best_text_color("#FFFFFF"), DARK_TEXT);
        assert_eq!(best_text_color("#000000"), LIGHT_TEXT);
    }

    #[test]
    fn test_best_text_color_boundary() {
        // Luminance of exactly 0.5 is not "> 0.5", so it gets light text.
        // 0.299r + 0.587g + 0.114b = 127.5 for r=g=b=127.5; the nearest
        // representable grey below sits at or under the threshold.
        assert_eq!(best_text_color("#7F7F7F"), LIGHT_TEXT);
        assert_eq!(best_text_color("#808080"), DARK_TEXT);
    }

    #[test]
    fn test_best_text_color_unparseable_is_light() {
        assert_eq!(best_text_color("not-a-color"), LIGHT_TEXT);
    }

    #[test]
    fn test_luminance_coefficients() {
        // Pure green dominates the luminance sum
        let g = Color::rgb(0, 255, 0).luminance();
        let r = Color::rgb(255, 0, 0).luminance();
        let b = Color::rgb(0, 0, 255).luminance();
        assert!((r - 0.299).abs() < 1e-9);
        assert!((g - 0.587).abs() < 1e-9);
        assert!((b - 0.114).abs() < 1e-9);
    }

    #[test]
    fn test_theme_lookup_fallback() {
        let theme: ThemeKind = "nonexistent".parse().unwrap();
        assert_eq!(theme, ThemeKind::Default);
        let theme: ThemeKind = "rainbow".parse().unwrap();
        assert_eq!(theme, ThemeKind::Rainbow);
    }

    #[test]
    fn test_every_theme_has_nonempty_palette() {
        for kind in ThemeKind::all() {
            let def = kind.definition();
            match def.palette {
                Palette::Cycle(colors) => assert!(!colors.is_empty(), "{}", def.name),
                Palette::Tiered { .. } => {}
            }
            match def.edges {
                EdgePolicy::Gradient(colors) => assert!(!colors.is_empty(), "{}", def.name),
                EdgePolicy::Flat { .. } => {}
            }
        }
    }

    #[test]
    fn test_every_theme_color_parses() {
        for kind in ThemeKind::all() {
            let def = kind.definition();
            assert!(Color::parse_hex(def.core.color.fill).is_some());
            assert!(Color::parse_hex(def.core.color.border).is_some());
            match def.palette {
                Palette::Cycle(colors) => {
                    for c in colors {
                        assert!(Color::parse_hex(c.fill).is_some());
                        assert!(Color::parse_hex(c.border).is_some());
                    }
                }
                Palette::Tiered { level1, level2 } => {
                    assert!(Color::parse_hex(level1.fill).is_some());
                    assert!(Color::parse_hex(level2.fill).is_some());
                }
            }
        }
    }

    #[test]
    fn test_rainbow_core_is_hexagon() {
        let def = ThemeKind::Rainbow.definition();
        assert_eq!(def.core.shape, NodeShape::Hexagon);
        // Red family
        let core = Color::parse_hex(def.core.color.fill).unwrap();
        assert!(core.r > core.g && core.r > core.b);
    }

    #[test]
    fn test_background_buckets() {
        assert!(!BackgroundKind::Snow.is_dark());
        assert!(!BackgroundKind::Paper.is_dark());
        assert!(BackgroundKind::Midnight.is_dark());
        assert!(BackgroundKind::Charcoal.is_dark());
    }

    #[test]
    fn test_background_fallback() {
        let bg: BackgroundKind = "nope".parse().unwrap();
        assert_eq!(bg, BackgroundKind::Snow);
    }

    #[test]
    fn test_external_label_shapes() {
        assert!(NodeShape::Diamond.has_external_label());
        assert!(NodeShape::Triangle.has_external_label());
        assert!(NodeShape::Star.has_external_label());
        assert!(NodeShape::Hexagon.has_external_label());
        assert!(NodeShape::Square.has_external_label());
        assert!(!NodeShape::Dot.has_external_label());
        assert!(!NodeShape::Ellipse.has_external_label());
        assert!(!NodeShape::Box.has_external_label());
    }

    #[test]
    fn test_vadjust_multipliers() {
        assert_eq!(NodeShape::Triangle.vadjust_multiplier(), 0.8);
        assert_eq!(NodeShape::Star.vadjust_multiplier(), 1.1);
        assert_eq!(NodeShape::Hexagon.vadjust_multiplier(), 1.1);
        assert_eq!(NodeShape::Diamond.vadjust_multiplier(), 1.2);
        assert_eq!(NodeShape::Square.vadjust_multiplier(), 1.2);
    }
}
