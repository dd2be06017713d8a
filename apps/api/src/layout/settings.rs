//! Page setup state: direction, grid, decoration mode, font size and zoom,
//! plus the actions that change them. Everything the resolver needs comes from
//! here; nothing here depends on a live editing session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::geometry::{
    resolve, GeometryDescriptor, GridSpec, WritingDirection, DEFAULT_FONT_SIZE,
};
use crate::layout::paper::PageDimensions;
use crate::layout::pattern::{generate_pattern_with, PatternConfig, PatternSpec, VisualMode};

pub const ZOOM_MIN: u32 = 50;
pub const ZOOM_MAX: u32 = 200;
pub const ZOOM_STEP: u32 = 10;

const FONT_SIZE_MIN: f64 = 1.0;
const FONT_SIZE_MAX: f64 = 400.0;

// ────────────────────────────────────────────────────────────────────────────
// Grid presets
// ────────────────────────────────────────────────────────────────────────────

/// Standard manuscript sheets offered in Grid mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPreset {
    /// 400-character sheet, 20 × 20.
    Sheet400,
    /// 200-character sheet, 20 × 10.
    Sheet200,
}

impl GridPreset {
    pub const ALL: [GridPreset; 2] = [GridPreset::Sheet400, GridPreset::Sheet200];

    pub fn grid(self) -> GridSpec {
        match self {
            GridPreset::Sheet400 => GridSpec::new(20, 20),
            GridPreset::Sheet200 => GridSpec::new(20, 10),
        }
    }

    /// The preset closest to `grid`, counting cells of difference on both axes.
    pub fn nearest(grid: GridSpec) -> GridPreset {
        let distance = |p: &GridPreset| {
            let g = p.grid();
            g.chars_per_line.abs_diff(grid.chars_per_line)
                + g.lines_per_page.abs_diff(grid.lines_per_page)
        };
        GridPreset::ALL
            .into_iter()
            .min_by_key(distance)
            .unwrap_or(GridPreset::Sheet400)
    }

    pub fn label(self) -> &'static str {
        match self {
            GridPreset::Sheet400 => "400字詰 (20字 × 20行)",
            GridPreset::Sheet200 => "200字詰 (20字 × 10行)",
        }
    }
}

impl fmt::Display for GridPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.grid();
        write!(f, "{}x{}", g.chars_per_line, g.lines_per_page)
    }
}

impl FromStr for GridPreset {
    type Err = AppError;

    /// Parses the `"<chars>x<lines>"` form, e.g. `"20x10"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chars, lines) = s
            .trim()
            .split_once('x')
            .ok_or_else(|| AppError::Validation(format!("Malformed grid preset '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| AppError::Validation(format!("Malformed grid preset '{s}'")))
        };
        let grid = GridSpec::new(parse(chars)?, parse(lines)?);
        GridPreset::ALL
            .into_iter()
            .find(|p| p.grid() == grid)
            .ok_or_else(|| AppError::Validation(format!("Unknown grid preset '{s}'")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

/// Replaces the grid wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridUpdate {
    Preset { preset: GridPreset },
    Manual { chars: i64, lines: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub direction: WritingDirection,
    pub grid: GridSpec,
    pub mode: VisualMode,
    /// Font size currently selected in the editor, in px.
    pub base_font_size: f64,
    pub zoom_percent: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            direction: WritingDirection::Horizontal,
            grid: GridSpec::default(),
            mode: VisualMode::Ruled,
            base_font_size: DEFAULT_FONT_SIZE,
            zoom_percent: 100,
        }
    }
}

/// Everything a render pass needs, derived from one `LayoutSettings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLayout {
    pub geometry: GeometryDescriptor,
    pub pattern: PatternSpec,
}

impl LayoutSettings {
    /// Applies a grid update. Grid mode only accepts the standard sheets.
    pub fn apply_grid_update(&mut self, update: GridUpdate) -> Result<(), AppError> {
        self.grid = match update {
            GridUpdate::Preset { preset } => preset.grid(),
            GridUpdate::Manual { .. } if self.mode == VisualMode::Grid => {
                return Err(AppError::Validation(
                    "Grid mode only supports preset sheets".to_string(),
                ));
            }
            GridUpdate::Manual { chars, lines } => GridSpec::clamped(chars, lines),
        };
        Ok(())
    }

    /// Ctrl+wheel zoom: scrolling down (`delta_y > 0`) zooms out one step.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        let zoom = if delta_y > 0.0 {
            self.zoom_percent.saturating_sub(ZOOM_STEP)
        } else {
            self.zoom_percent.saturating_add(ZOOM_STEP)
        };
        self.zoom_percent = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Brings out-of-range values back to their nearest bound. In Grid mode the
    /// grid snaps to the nearest standard sheet.
    pub fn sanitized(&self) -> LayoutSettings {
        let grid = if self.mode == VisualMode::Grid {
            GridPreset::nearest(self.grid).grid()
        } else {
            GridSpec::clamped(
                self.grid.chars_per_line as i64,
                self.grid.lines_per_page as i64,
            )
        };
        let base_font_size = if self.base_font_size.is_finite() && self.base_font_size > 0.0 {
            self.base_font_size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX)
        } else {
            DEFAULT_FONT_SIZE
        };
        LayoutSettings {
            grid,
            base_font_size,
            zoom_percent: self.zoom_percent.clamp(ZOOM_MIN, ZOOM_MAX),
            ..self.clone()
        }
    }

    /// Runs the resolver and the pattern generator for these settings.
    pub fn resolve(&self, page: PageDimensions, config: &PatternConfig) -> ResolvedLayout {
        let s = self.sanitized();
        let geometry = resolve(
            s.direction,
            s.grid,
            s.base_font_size,
            page,
            s.mode.grid_fitting(),
        );
        let pattern = generate_pattern_with(&geometry, s.direction, s.mode, config);
        ResolvedLayout { geometry, pattern }
    }
}
