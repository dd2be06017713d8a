//! Content-box style handed to the rich-text editor: how big the text box is,
//! what size and spacing the glyphs get, and how far to shift them so they sit
//! centred in their cells.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{GeometryDescriptor, WritingDirection};

/// Monospace stack used whenever the text is fitted to a grid.
pub const GRID_FONT_STACK: &str = r#""MS Gothic", "Hiragino Kaku Gothic ProN", monospace"#;
/// Proportional stack for free horizontal layout.
pub const FREE_FONT_STACK: &str = r#""Inter", "MS Mincho", sans-serif"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritingModeCss {
    HorizontalTb,
    VerticalRl,
}

/// Shift applied to the text container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "axis", content = "px", rename_all = "snake_case")]
pub enum Translate {
    None,
    X(f64),
    Y(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBoxStyle {
    pub writing_mode: WritingModeCss,
    /// Fixed box size; `None` lets the box size itself.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub font_size: f64,
    pub line_height: f64,
    /// `None` renders as `normal`.
    pub letter_spacing: Option<f64>,
    pub transform: Translate,
    pub font_family: &'static str,
}

impl ContentBoxStyle {
    pub fn from_layout(
        direction: WritingDirection,
        descriptor: &GeometryDescriptor,
        grid_fitting: bool,
    ) -> Self {
        let d = descriptor;
        let letter_spacing = grid_fitting.then_some(d.letter_spacing);
        let font_family = if grid_fitting || direction.is_vertical() {
            GRID_FONT_STACK
        } else {
            FREE_FONT_STACK
        };

        match direction {
            WritingDirection::Horizontal => ContentBoxStyle {
                writing_mode: WritingModeCss::HorizontalTb,
                width: grid_fitting.then_some(d.content_width),
                height: None,
                min_width: None,
                min_height: Some(d.content_height),
                max_width: (!grid_fitting).then_some(d.content_width),
                font_size: d.effective_font_size,
                line_height: d.line_pitch,
                letter_spacing,
                transform: if grid_fitting {
                    Translate::X(d.centering_offset)
                } else {
                    Translate::None
                },
                font_family,
            },
            WritingDirection::Vertical => ContentBoxStyle {
                writing_mode: WritingModeCss::VerticalRl,
                height: grid_fitting.then_some(d.content_height),
                width: None,
                // A vertical page grows leftward one column at a time; keep the whole grid visible.
                min_width: grid_fitting.then_some(d.content_width),
                min_height: (!grid_fitting).then_some(d.content_height),
                max_width: None,
                font_size: d.effective_font_size,
                line_height: d.line_pitch,
                letter_spacing,
                transform: if grid_fitting {
                    Translate::Y(d.centering_offset)
                } else {
                    Translate::None
                },
                font_family,
            },
        }
    }

    /// Ordered `(property, value)` pairs ready to be inlined as a style attribute.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![(
            "writing-mode",
            match self.writing_mode {
                WritingModeCss::HorizontalTb => "horizontal-tb".to_string(),
                WritingModeCss::VerticalRl => "vertical-rl".to_string(),
            },
        )];
        let sizes = [
            ("width", self.width),
            ("height", self.height),
            ("min-width", self.min_width),
            ("min-height", self.min_height),
            ("max-width", self.max_width),
        ];
        for (name, value) in sizes {
            if let Some(v) = value {
                out.push((name, format!("{v}px")));
            }
        }
        out.push(("font-size", format!("{}px", self.font_size)));
        out.push(("line-height", format!("{}px", self.line_height)));
        out.push((
            "letter-spacing",
            self.letter_spacing
                .map_or_else(|| "normal".to_string(), |v| format!("{v}px")),
        ));
        out.push((
            "transform",
            match self.transform {
                Translate::None => "none".to_string(),
                Translate::X(px) => format!("translateX({px}px)"),
                Translate::Y(px) => format!("translateY({px}px)"),
            },
        ));
        out.push(("font-family", self.font_family.to_string()));
        // Full-width glyphs on fixed advances: no proportional alternates, no kerning.
        out.push(("font-feature-settings", r#""palt" 0"#.to_string()));
        out.push(("font-kerning", "none".to_string()));
        out.push(("font-variant-east-asian", "full-width".to_string()));
        out.push(("font-variant-numeric", "tabular-nums".to_string()));
        out.push(("word-break", "break-all".to_string()));
        out
    }
}
