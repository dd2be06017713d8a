//! Background Pattern Generator: turns a resolved geometry into a tileable
//! rule/grid description that lines up exactly with the character grid.
//!
//! The output is renderer-neutral: a tile shape, its exact size, how it
//! repeats, where its origin sits, and the page border. `layout::css` turns it
//! into CSS/SVG; any renderer with a repeating-rectangle primitive could do
//! the same.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{GeometryDescriptor, WritingDirection};

// ────────────────────────────────────────────────────────────────────────────
// Visual mode
// ────────────────────────────────────────────────────────────────────────────

/// Decoration drawn behind the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualMode {
    /// No decoration; geometry is not grid-fitted.
    None,
    /// One rule per line.
    #[default]
    Ruled,
    /// Full manuscript grid, one box per character.
    Grid,
    /// Page border only.
    Outline,
}

impl VisualMode {
    /// Every decorated mode fits the text to the grid.
    pub fn grid_fitting(self) -> bool {
        self != VisualMode::None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Colours and stroke parameters shared by every mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Grid cell stroke colour.
    pub grid_color: String,
    /// Ruled-line colour.
    pub rule_color: String,
    /// Page border colour.
    pub border_color: String,
    pub stroke_width: f64,
    pub rule_thickness: f64,
    pub border_width: f64,
    /// Offset applied to the Grid tile origin on the vertical axis.
    ///
    /// Glyphs in a line box sit optically low, so the boxes are lifted to meet
    /// them. Tuned by eye for MS Gothic; other families may need another value.
    /// Known approximation: there is no formula from font metrics behind it.
    pub grid_alignment_adjust: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            grid_color: "#8bc34a".to_string(),
            rule_color: "#e0e0e0".to_string(),
            border_color: "#ccc".to_string(),
            stroke_width: 1.0,
            rule_thickness: 1.0,
            border_width: 1.0,
            grid_alignment_adjust: -2.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pattern types
// ────────────────────────────────────────────────────────────────────────────

/// The single vector shape drawn inside one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileShape {
    /// A thin rule running across the tile at `position` along the stacking axis,
    /// measured from the edge lines advance away from.
    Rule {
        position: f64,
        thickness: f64,
        color: String,
    },
    /// An unfilled square outline.
    CellOutline {
        x: f64,
        y: f64,
        side: f64,
        stroke_width: f64,
        color: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

/// How a tile is repeated across the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatAxis {
    None,
    /// Stripe repeated top → bottom.
    Down,
    /// Stripe repeated right → left.
    Left,
    /// Tiled in both directions.
    Both,
}

/// Corner of the content area the first tile is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    TopRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub anchor: Anchor,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BorderStyle {
    None,
    Solid { width: f64, color: String },
}

/// Complete background description for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub tile: Option<TileShape>,
    pub tile_size: Option<TileSize>,
    pub repeat: RepeatAxis,
    pub placement: Placement,
    pub border: BorderStyle,
}

impl PatternSpec {
    fn undecorated(direction: WritingDirection, border: BorderStyle) -> Self {
        PatternSpec {
            tile: None,
            tile_size: None,
            repeat: RepeatAxis::None,
            placement: origin(direction, 0.0),
            border,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Generates the background with the default colours and alignment correction.
/// The service always passes its configured `PatternConfig` instead.
#[cfg(test)]
pub fn generate_pattern(
    descriptor: &GeometryDescriptor,
    direction: WritingDirection,
    mode: VisualMode,
) -> PatternSpec {
    generate_pattern_with(descriptor, direction, mode, &PatternConfig::default())
}

/// Generates the background for `mode`. Deterministic; never partial.
pub fn generate_pattern_with(
    descriptor: &GeometryDescriptor,
    direction: WritingDirection,
    mode: VisualMode,
    config: &PatternConfig,
) -> PatternSpec {
    match mode {
        VisualMode::None => PatternSpec::undecorated(direction, BorderStyle::None),
        VisualMode::Outline => PatternSpec::undecorated(direction, page_border(config)),
        VisualMode::Ruled => ruled(descriptor, direction, config),
        VisualMode::Grid => grid(descriptor, direction, config),
    }
}

fn page_border(config: &PatternConfig) -> BorderStyle {
    BorderStyle::Solid {
        width: config.border_width,
        color: config.border_color.clone(),
    }
}

/// Lines start at the top-left in horizontal writing and at the top-right in vertical.
fn origin(direction: WritingDirection, offset_y: f64) -> Placement {
    let anchor = if direction.is_vertical() {
        Anchor::TopRight
    } else {
        Anchor::TopLeft
    };
    Placement {
        anchor,
        offset_x: 0.0,
        offset_y,
    }
}

/// A stripe one line pitch thick, with its rule at the far edge of the pitch
/// so it reads as a baseline rather than a strike-through.
fn ruled(
    descriptor: &GeometryDescriptor,
    direction: WritingDirection,
    config: &PatternConfig,
) -> PatternSpec {
    let pitch = descriptor.line_pitch;
    let thickness = config.rule_thickness.min(pitch);
    let (tile_size, repeat) = if direction.is_vertical() {
        (
            TileSize {
                width: pitch,
                height: descriptor.content_height,
            },
            RepeatAxis::Left,
        )
    } else {
        (
            TileSize {
                width: descriptor.content_width,
                height: pitch,
            },
            RepeatAxis::Down,
        )
    };

    PatternSpec {
        tile: Some(TileShape::Rule {
            position: pitch - thickness,
            thickness,
            color: config.rule_color.clone(),
        }),
        tile_size: Some(tile_size),
        repeat,
        placement: origin(direction, 0.0),
        border: page_border(config),
    }
}

/// One `cell × pitch` tile holding a single `cell`-sided box, flush to the
/// leading edge on the flow axis and centred across the line.
fn grid(
    descriptor: &GeometryDescriptor,
    direction: WritingDirection,
    config: &PatternConfig,
) -> PatternSpec {
    let cell = descriptor.cell_size;
    let pitch = descriptor.line_pitch;
    // A pitch tighter than the cell cannot centre the box; pin it to the tile edge.
    let centered = ((pitch - cell) / 2.0).floor().max(0.0);

    let (tile_size, x, y) = if direction.is_vertical() {
        (
            TileSize {
                width: pitch,
                height: cell,
            },
            centered,
            0.0,
        )
    } else {
        (
            TileSize {
                width: cell,
                height: pitch,
            },
            0.0,
            centered,
        )
    };

    PatternSpec {
        tile: Some(TileShape::CellOutline {
            x,
            y,
            side: cell,
            stroke_width: config.stroke_width,
            color: config.grid_color.clone(),
        }),
        tile_size: Some(tile_size),
        repeat: RepeatAxis::Both,
        placement: origin(direction, config.grid_alignment_adjust),
        border: page_border(config),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{resolve, GridSpec};
    use crate::layout::paper::PageDimensions;
    use proptest::prelude::*;

    fn descriptor(direction: WritingDirection) -> GeometryDescriptor {
        resolve(
            direction,
            GridSpec::new(20, 20),
            16.0,
            PageDimensions::default(),
            true,
        )
    }

    #[test]
    fn test_none_mode_is_empty() {
        let p = generate_pattern(
            &descriptor(WritingDirection::Horizontal),
            WritingDirection::Horizontal,
            VisualMode::None,
        );
        assert!(p.tile.is_none());
        assert!(p.tile_size.is_none());
        assert_eq!(p.repeat, RepeatAxis::None);
        assert_eq!(p.border, BorderStyle::None);
    }

    #[test]
    fn test_outline_mode_has_border_only() {
        let p = generate_pattern(
            &descriptor(WritingDirection::Vertical),
            WritingDirection::Vertical,
            VisualMode::Outline,
        );
        assert!(p.tile.is_none());
        assert_eq!(
            p.border,
            BorderStyle::Solid {
                width: 1.0,
                color: "#ccc".to_string()
            }
        );
    }

    #[test]
    fn test_ruled_horizontal_repeats_down_with_rule_at_far_edge() {
        let d = descriptor(WritingDirection::Horizontal);
        let p = generate_pattern(&d, WritingDirection::Horizontal, VisualMode::Ruled);
        assert_eq!(p.repeat, RepeatAxis::Down);
        let size = p.tile_size.expect("ruled tile has a size");
        assert_eq!(size.height, d.line_pitch);
        match p.tile {
            Some(TileShape::Rule {
                position,
                thickness,
                ..
            }) => {
                assert_eq!(thickness, 1.0);
                assert_eq!(position, d.line_pitch - 1.0);
            }
            other => panic!("expected a rule, got {other:?}"),
        }
    }

    #[test]
    fn test_ruled_vertical_repeats_left() {
        let d = descriptor(WritingDirection::Vertical);
        let p = generate_pattern(&d, WritingDirection::Vertical, VisualMode::Ruled);
        assert_eq!(p.repeat, RepeatAxis::Left);
        assert_eq!(p.placement.anchor, Anchor::TopRight);
        assert_eq!(p.tile_size.map(|s| s.width), Some(d.line_pitch));
    }

    #[test]
    fn test_grid_horizontal_tile_centres_box_across_line() {
        let d = descriptor(WritingDirection::Horizontal);
        let p = generate_pattern(&d, WritingDirection::Horizontal, VisualMode::Grid);
        assert_eq!(
            p.tile_size,
            Some(TileSize {
                width: d.cell_size,
                height: d.line_pitch
            })
        );
        assert_eq!(p.repeat, RepeatAxis::Both);
        assert_eq!(p.placement.anchor, Anchor::TopLeft);
        assert_eq!(p.placement.offset_y, -2.0);
        match p.tile {
            Some(TileShape::CellOutline { x, y, side, .. }) => {
                assert_eq!(x, 0.0);
                assert_eq!(side, d.cell_size);
                assert_eq!(y, ((d.line_pitch - d.cell_size) / 2.0).floor());
            }
            other => panic!("expected a cell outline, got {other:?}"),
        }
    }

    #[test]
    fn test_grid_vertical_swaps_tile_axes() {
        let h = descriptor(WritingDirection::Horizontal);
        let d = GeometryDescriptor {
            line_pitch: 60.0,
            ..h
        };
        let p = generate_pattern(&d, WritingDirection::Vertical, VisualMode::Grid);
        assert_eq!(
            p.tile_size,
            Some(TileSize {
                width: 60.0,
                height: d.cell_size
            })
        );
        match p.tile {
            Some(TileShape::CellOutline { x, y, .. }) => {
                assert_eq!(y, 0.0);
                assert_eq!(x, ((60.0 - d.cell_size) / 2.0).floor());
            }
            other => panic!("expected a cell outline, got {other:?}"),
        }
    }

    #[test]
    fn test_grid_alignment_adjust_is_configurable() {
        let d = descriptor(WritingDirection::Horizontal);
        let config = PatternConfig {
            grid_alignment_adjust: -5.0,
            ..PatternConfig::default()
        };
        let p = generate_pattern_with(&d, WritingDirection::Horizontal, VisualMode::Grid, &config);
        assert_eq!(p.placement.offset_y, -5.0);
    }

    #[test]
    fn test_mode_switch_leaves_geometry_alone() {
        let d = descriptor(WritingDirection::Horizontal);
        let before = d;
        let grid = generate_pattern(&d, WritingDirection::Horizontal, VisualMode::Grid);
        let none = generate_pattern(&d, WritingDirection::Horizontal, VisualMode::None);
        assert!(grid.tile.is_some());
        assert!(none.tile.is_none());
        assert_eq!(none.border, BorderStyle::None);
        assert_eq!(d, before);
    }

    proptest! {
        #[test]
        fn prop_none_is_empty_for_any_descriptor(
            cell in 0.0f64..500.0,
            pitch in 0.0f64..500.0,
            vertical in any::<bool>(),
        ) {
            let d = GeometryDescriptor {
                cell_size: cell,
                line_pitch: pitch,
                effective_font_size: 1.0,
                letter_spacing: 0.0,
                centering_offset: 0.0,
                content_width: 10.0,
                content_height: 10.0,
            };
            let direction = if vertical { WritingDirection::Vertical } else { WritingDirection::Horizontal };
            let p = generate_pattern(&d, direction, VisualMode::None);
            prop_assert!(p.tile.is_none());
            prop_assert_eq!(p.border, BorderStyle::None);
        }

        #[test]
        fn prop_grid_box_fits_inside_tile(
            cell in 1.0f64..200.0,
            pitch in 1.0f64..200.0,
            vertical in any::<bool>(),
        ) {
            let d = GeometryDescriptor {
                cell_size: cell.floor(),
                line_pitch: pitch.floor(),
                effective_font_size: 1.0,
                letter_spacing: 0.0,
                centering_offset: 0.0,
                content_width: 10.0,
                content_height: 10.0,
            };
            let direction = if vertical { WritingDirection::Vertical } else { WritingDirection::Horizontal };
            let p = generate_pattern(&d, direction, VisualMode::Grid);
            let size = p.tile_size.expect("grid tile has a size");
            let larger = size.width.max(size.height);
            match p.tile {
                Some(TileShape::CellOutline { x, y, side, .. }) => {
                    prop_assert_eq!(side, d.cell_size);
                    let offset = if vertical { x } else { y };
                    prop_assert!(offset >= 0.0);
                    prop_assert!(offset <= (larger - side).max(0.0));
                }
                _ => prop_assert!(false, "grid mode must produce a cell outline"),
            }
        }
    }
}
