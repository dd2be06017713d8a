//! Layout Geometry Resolver: derives cell size, line pitch and letter spacing
//! from a writing direction, a character grid and a page size.
//!
//! # Grid fitting
//! With grid fitting on, the grid is fitted *backward* from the page:
//! `cell = floor(flow_length / chars)` and `pitch = floor(stacking_length / lines)`.
//! The glyph is then shrunk to `cell - CELL_PADDING` and the slack is handed to
//! letter spacing, so a proportional glyph still advances by exactly one cell.
//!
//! Without grid fitting the geometry is derived *forward* from the font size and
//! the content area falls back to the raw page.
//!
//! # Rounding
//! Every grid-fitting division floors. The grid may leave a gap at the trailing
//! edge of the page (< one cell / one line) but never overflows it.
//!
//! # Axes
//! Which physical page side is the "flow" axis flips with the writing direction.
//! That mapping lives in one table (`WritingDirection::axes`) and nowhere else.

use serde::{Deserialize, Serialize};

use crate::layout::paper::PageDimensions;

// ────────────────────────────────────────────────────────────────────────────
// Tuning constants
// ────────────────────────────────────────────────────────────────────────────

/// Minimum breathing room around a glyph inside its cell, in px.
pub const CELL_PADDING: f64 = 6.0;

/// Font size assumed when the editor reports none (or garbage).
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Free-layout line height as a multiple of the font size.
pub const DEFAULT_LINE_MULTIPLE: f64 = 1.75;

/// Minimum interline air below a free-layout cell, in px.
pub const MIN_INTERLINE_AIR: f64 = 2.0;

/// Extra px added to the flow-axis content length to absorb sub-pixel
/// rounding in the renderer; without it the last cell of a line wraps.
pub const FLOW_ROUNDING_SLACK: f64 = 1.0;

const MIN_FONT_SIZE: f64 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Writing direction + axis table
// ────────────────────────────────────────────────────────────────────────────

/// Direction in which characters and lines advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingDirection {
    /// Characters left → right, lines top → bottom.
    #[default]
    Horizontal,
    /// Characters top → bottom, lines right → left.
    Vertical,
}

/// A physical side of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageAxis {
    Width,
    Height,
}

impl PageAxis {
    pub fn length_of(self, page: &PageDimensions) -> f64 {
        match self {
            PageAxis::Width => page.width,
            PageAxis::Height => page.height,
        }
    }
}

/// Which physical axis text flows along and which one lines stack along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMap {
    pub flow: PageAxis,
    pub stacking: PageAxis,
}

impl AxisMap {
    /// Places a (flow, stacking) pair of lengths back onto (width, height).
    pub fn to_physical(self, flow_length: f64, stacking_length: f64) -> (f64, f64) {
        match self.flow {
            PageAxis::Width => (flow_length, stacking_length),
            PageAxis::Height => (stacking_length, flow_length),
        }
    }
}

/// The direction → axis table.
const AXIS_TABLE: [(WritingDirection, AxisMap); 2] = [
    (
        WritingDirection::Horizontal,
        AxisMap {
            flow: PageAxis::Width,
            stacking: PageAxis::Height,
        },
    ),
    (
        WritingDirection::Vertical,
        AxisMap {
            flow: PageAxis::Height,
            stacking: PageAxis::Width,
        },
    ),
];

impl WritingDirection {
    pub fn axes(self) -> AxisMap {
        AXIS_TABLE
            .iter()
            .find(|(direction, _)| *direction == self)
            .map(|(_, axes)| *axes)
            .unwrap_or(AXIS_TABLE[0].1)
    }

    pub fn is_vertical(self) -> bool {
        self == WritingDirection::Vertical
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grid spec
// ────────────────────────────────────────────────────────────────────────────

/// Target character grid for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    pub chars_per_line: u32,
    pub lines_per_page: u32,
}

impl GridSpec {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 100;

    pub fn new(chars_per_line: u32, lines_per_page: u32) -> Self {
        GridSpec {
            chars_per_line,
            lines_per_page,
        }
    }

    /// Builds a grid from user-entered values, clamping each to `[MIN, MAX]`.
    pub fn clamped(chars_per_line: i64, lines_per_page: i64) -> Self {
        let clamp = |v: i64| v.clamp(Self::MIN as i64, Self::MAX as i64) as u32;
        GridSpec {
            chars_per_line: clamp(chars_per_line),
            lines_per_page: clamp(lines_per_page),
        }
    }

    /// Counts safe to divide by: zero becomes one.
    fn divisors(self) -> (f64, f64) {
        (
            self.chars_per_line.max(1) as f64,
            self.lines_per_page.max(1) as f64,
        )
    }
}

impl Default for GridSpec {
    /// 400-character sheet: 20 × 20.
    fn default() -> Self {
        GridSpec::new(20, 20)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Descriptor
// ────────────────────────────────────────────────────────────────────────────

/// Fully resolved page geometry. Always re-derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryDescriptor {
    /// Flow-axis length of one character plus its padding.
    pub cell_size: f64,
    /// Stacking-axis distance between consecutive lines.
    pub line_pitch: f64,
    pub effective_font_size: f64,
    /// Spacing added after each glyph; absorbs `cell_size - effective_font_size`.
    pub letter_spacing: f64,
    /// Shift that centres a glyph inside its cell.
    pub centering_offset: f64,
    pub content_width: f64,
    pub content_height: f64,
}

/// Resolves page geometry. Never fails: non-positive grid counts are treated
/// as 1 and an unusable font size falls back to `DEFAULT_FONT_SIZE`.
pub fn resolve(
    direction: WritingDirection,
    grid: GridSpec,
    base_font_size: f64,
    page: PageDimensions,
    grid_fitting: bool,
) -> GeometryDescriptor {
    let axes = direction.axes();
    let (chars, lines) = grid.divisors();
    let base_font_size = sanitize_font_size(base_font_size);
    let flow_length = sanitize_length(page.along_line(direction));
    let stacking_length = sanitize_length(page.across_lines(direction));

    if !grid_fitting {
        let cell_size = base_font_size + CELL_PADDING;
        // Never tighter than the cell plus interline air.
        let line_pitch = (base_font_size * DEFAULT_LINE_MULTIPLE)
            .floor()
            .max(cell_size + MIN_INTERLINE_AIR);
        return GeometryDescriptor {
            cell_size,
            line_pitch,
            effective_font_size: base_font_size,
            letter_spacing: 0.0,
            centering_offset: 0.0,
            content_width: sanitize_length(page.width),
            content_height: sanitize_length(page.height),
        };
    }

    let cell_size = (flow_length / chars).floor().max(1.0);
    let effective_font_size = (cell_size - CELL_PADDING).max(MIN_FONT_SIZE);
    let letter_spacing = (cell_size - effective_font_size).max(0.0);
    let line_pitch = (stacking_length / lines).floor().max(1.0);
    let centering_offset = (letter_spacing / 2.0).floor();

    let (content_width, content_height) = axes.to_physical(
        cell_size * chars + FLOW_ROUNDING_SLACK,
        line_pitch * lines,
    );

    GeometryDescriptor {
        cell_size,
        line_pitch,
        effective_font_size,
        letter_spacing,
        centering_offset,
        content_width,
        content_height,
    }
}

fn sanitize_font_size(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size.max(MIN_FONT_SIZE)
    } else {
        DEFAULT_FONT_SIZE
    }
}

fn sanitize_length(length: f64) -> f64 {
    if length.is_finite() {
        length.max(0.0)
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
