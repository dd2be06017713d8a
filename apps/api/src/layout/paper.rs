//! Physical paper model: converts a paper size and its margins into the
//! pixel content area the geometry resolver fits its grid into.
//!
//! The millimetre → pixel factor is fixed (96 dpi screen, rounded to 3.78 px/mm)
//! and is not user-configurable.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::WritingDirection;

/// Pixels per millimetre at 96 dpi, rounded to two places.
pub const MM_TO_PX: f64 = 3.78;

// ────────────────────────────────────────────────────────────────────────────
// Paper + margins
// ────────────────────────────────────────────────────────────────────────────

/// A sheet of paper in millimetres (portrait orientation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PaperSize {
    /// ISO 216 A4: the sheet manuscript paper is normally printed on.
    pub const A4: PaperSize = PaperSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top_mm: f64,
    pub right_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
}

impl Default for Margins {
    /// Leaves a 165 × 245 mm writing area on A4.
    fn default() -> Self {
        Margins {
            top_mm: 26.0,
            right_mm: 22.5,
            bottom_mm: 26.0,
            left_mm: 22.5,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page dimensions
// ────────────────────────────────────────────────────────────────────────────

/// Physical content-area size in pixels, independent of writing direction.
///
/// The direction-relative view (`along_line` / `across_lines`) is derived
/// through the axis table in `geometry`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

impl PageDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        PageDimensions { width, height }
    }

    /// Content area left after subtracting `margins` from `paper`, in pixels.
    /// A margin larger than the sheet yields a zero-length side rather than a negative one.
    pub fn from_paper(paper: PaperSize, margins: Margins) -> Self {
        let width_mm = (paper.width_mm - margins.left_mm - margins.right_mm).max(0.0);
        let height_mm = (paper.height_mm - margins.top_mm - margins.bottom_mm).max(0.0);
        PageDimensions {
            width: width_mm * MM_TO_PX,
            height: height_mm * MM_TO_PX,
        }
    }

    /// Length of the page along which a single line of text runs.
    pub fn along_line(&self, direction: WritingDirection) -> f64 {
        direction.axes().flow.length_of(self)
    }

    /// Length of the page along which successive lines are stacked.
    pub fn across_lines(&self, direction: WritingDirection) -> f64 {
        direction.axes().stacking.length_of(self)
    }
}

impl Default for PageDimensions {
    fn default() -> Self {
        PageDimensions::from_paper(PaperSize::A4, Margins::default())
    }
}
