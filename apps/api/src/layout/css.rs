//! Renders a `PatternSpec` for the browser: CSS background declarations for the
//! editor's content box, the SVG tile behind them, and a standalone page SVG
//! used for print preview.

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::layout::geometry::GeometryDescriptor;
use crate::layout::pattern::{Anchor, BorderStyle, PatternSpec, RepeatAxis, TileShape};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const PATTERN_ID: &str = "genko-tile";

/// CSS background properties for the content box. `None` means "leave unset".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundCss {
    pub background_image: String,
    pub background_size: Option<String>,
    pub background_position: Option<String>,
    pub border: String,
}

impl BackgroundCss {
    pub fn from_pattern(pattern: &PatternSpec) -> Self {
        let border = border_css(&pattern.border);

        let (Some(tile), Some(size)) = (&pattern.tile, pattern.tile_size) else {
            return BackgroundCss {
                background_image: "none".to_string(),
                background_size: None,
                background_position: None,
                border,
            };
        };

        match tile {
            TileShape::Rule {
                position,
                thickness,
                color,
            } => {
                let towards = if pattern.repeat == RepeatAxis::Left {
                    "to left"
                } else {
                    "to bottom"
                };
                BackgroundCss {
                    background_image: format!(
                        "repeating-linear-gradient({towards}, transparent, transparent {}px, {color} {}px)",
                        position,
                        position + thickness
                    ),
                    background_size: None,
                    background_position: None,
                    border,
                }
            }
            TileShape::CellOutline { .. } => {
                let svg = tile_svg(pattern).unwrap_or_default();
                let side = match pattern.placement.anchor {
                    Anchor::TopLeft => "left",
                    Anchor::TopRight => "right",
                };
                BackgroundCss {
                    background_image: format!(
                        "url(\"data:image/svg+xml;base64,{}\")",
                        BASE64.encode(svg.as_bytes())
                    ),
                    background_size: Some(format!("{}px {}px", size.width, size.height)),
                    background_position: Some(format!(
                        "{side} top {}px",
                        pattern.placement.offset_y
                    )),
                    border,
                }
            }
        }
    }
}

fn border_css(border: &BorderStyle) -> String {
    match border {
        BorderStyle::None => "none".to_string(),
        BorderStyle::Solid { width, color } => format!("{width}px solid {color}"),
    }
}

/// The tile as a standalone SVG document, or `None` for undecorated modes.
pub fn tile_svg(pattern: &PatternSpec) -> Option<String> {
    let tile = pattern.tile.as_ref()?;
    let size = pattern.tile_size?;
    Some(format!(
        r#"<svg width="{}" height="{}" xmlns="{SVG_NS}">{}</svg>"#,
        size.width,
        size.height,
        shape_svg(tile, pattern.repeat, size.width, size.height)
    ))
}

fn shape_svg(tile: &TileShape, repeat: RepeatAxis, width: f64, height: f64) -> String {
    match tile {
        TileShape::CellOutline {
            x,
            y,
            side,
            stroke_width,
            color,
        } => format!(
            r#"<rect x="{x}" y="{y}" width="{side}" height="{side}" fill="none" stroke="{color}" stroke-width="{stroke_width}"/>"#
        ),
        TileShape::Rule {
            position,
            thickness,
            color,
        } => {
            if repeat == RepeatAxis::Left {
                // Lines advance right → left, so the far edge is the tile's left side.
                let x = width - position - thickness;
                format!(
                    r#"<rect x="{x}" y="0" width="{thickness}" height="{height}" fill="{color}"/>"#
                )
            } else {
                format!(
                    r#"<rect x="0" y="{position}" width="{width}" height="{thickness}" fill="{color}"/>"#
                )
            }
        }
    }
}

/// Whole content area as one SVG page: the tile laid with a native `<pattern>`
/// plus the page border. This is what gets printed.
pub fn page_preview_svg(descriptor: &GeometryDescriptor, pattern: &PatternSpec) -> String {
    let width = descriptor.content_width;
    let height = descriptor.content_height;
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="{SVG_NS}">"#
    );
    let _ = write!(out, r#"<rect width="{width}" height="{height}" fill="white"/>"#);

    if let (Some(tile), Some(size)) = (&pattern.tile, pattern.tile_size) {
        let origin_x = match pattern.placement.anchor {
            Anchor::TopLeft => pattern.placement.offset_x,
            Anchor::TopRight => width + pattern.placement.offset_x,
        };
        let _ = write!(
            out,
            r#"<defs><pattern id="{PATTERN_ID}" patternUnits="userSpaceOnUse" x="{origin_x}" y="{}" width="{}" height="{}">{}</pattern></defs>"#,
            pattern.placement.offset_y,
            size.width,
            size.height,
            shape_svg(tile, pattern.repeat, size.width, size.height)
        );
        let _ = write!(
            out,
            r#"<rect width="{width}" height="{height}" fill="url(#{PATTERN_ID})"/>"#
        );
    }

    if let BorderStyle::Solid {
        width: stroke,
        color,
    } = &pattern.border
    {
        let inset = stroke / 2.0;
        let _ = write!(
            out,
            r#"<rect x="{inset}" y="{inset}" width="{}" height="{}" fill="none" stroke="{color}" stroke-width="{stroke}"/>"#,
            (width - stroke).max(0.0),
            (height - stroke).max(0.0)
        );
    }

    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{resolve, GridSpec, WritingDirection};
    use crate::layout::paper::PageDimensions;
    use crate::layout::pattern::{generate_pattern, VisualMode};

    fn pattern_for(
        direction: WritingDirection,
        mode: VisualMode,
    ) -> (GeometryDescriptor, PatternSpec) {
        let d = resolve(
            direction,
            GridSpec::new(20, 20),
            16.0,
            PageDimensions::default(),
            mode.grid_fitting(),
        );
        let p = generate_pattern(&d, direction, mode);
        (d, p)
    }

    #[test]
    fn test_none_clears_background_and_border() {
        let (_, p) = pattern_for(WritingDirection::Horizontal, VisualMode::None);
        let css = BackgroundCss::from_pattern(&p);
        assert_eq!(css.background_image, "none");
        assert_eq!(css.border, "none");
        assert!(css.background_size.is_none());
    }

    #[test]
    fn test_outline_sets_border_only() {
        let (_, p) = pattern_for(WritingDirection::Horizontal, VisualMode::Outline);
        let css = BackgroundCss::from_pattern(&p);
        assert_eq!(css.background_image, "none");
        assert_eq!(css.border, "1px solid #ccc");
    }

    #[test]
    fn test_ruled_gradient_direction() {
        let (d, p) = pattern_for(WritingDirection::Horizontal, VisualMode::Ruled);
        let css = BackgroundCss::from_pattern(&p);
        let pitch = d.line_pitch;
        assert_eq!(
            css.background_image,
            format!(
                "repeating-linear-gradient(to bottom, transparent, transparent {}px, #e0e0e0 {}px)",
                pitch - 1.0,
                pitch
            )
        );

        let (_, p) = pattern_for(WritingDirection::Vertical, VisualMode::Ruled);
        let css = BackgroundCss::from_pattern(&p);
        assert!(css.background_image.starts_with("repeating-linear-gradient(to left,"));
    }

    #[test]
    fn test_grid_css_embeds_tile() {
        let (d, p) = pattern_for(WritingDirection::Horizontal, VisualMode::Grid);
        let css = BackgroundCss::from_pattern(&p);
        assert!(css
            .background_image
            .starts_with("url(\"data:image/svg+xml;base64,"));
        assert_eq!(
            css.background_size.as_deref(),
            Some(format!("{}px {}px", d.cell_size, d.line_pitch).as_str())
        );
        assert_eq!(css.background_position.as_deref(), Some("left top -2px"));

        let (_, p) = pattern_for(WritingDirection::Vertical, VisualMode::Grid);
        let css = BackgroundCss::from_pattern(&p);
        assert_eq!(css.background_position.as_deref(), Some("right top -2px"));
    }

    #[test]
    fn test_tile_svg_has_single_unfilled_rect() {
        let (_, p) = pattern_for(WritingDirection::Horizontal, VisualMode::Grid);
        let svg = tile_svg(&p).expect("grid has a tile");
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"width="31" height="31""#));
    }

    #[test]
    fn test_tile_svg_none_for_outline() {
        let (_, p) = pattern_for(WritingDirection::Horizontal, VisualMode::Outline);
        assert!(tile_svg(&p).is_none());
    }

    #[test]
    fn test_page_preview_uses_pattern_element() {
        let (d, p) = pattern_for(WritingDirection::Vertical, VisualMode::Grid);
        let svg = page_preview_svg(&d, &p);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<pattern id="genko-tile""#));
        assert!(svg.contains(r##"fill="url(#genko-tile)""##));
        assert!(svg.contains(r##"stroke="#ccc""##));
    }

    #[test]
    fn test_page_preview_plain_for_none() {
        let (d, p) = pattern_for(WritingDirection::Horizontal, VisualMode::None);
        let svg = page_preview_svg(&d, &p);
        assert!(!svg.contains("<pattern"));
        assert_eq!(svg.matches("<rect").count(), 1);
    }
}
