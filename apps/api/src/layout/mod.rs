// Layout core: grid geometry + background pattern, and their HTTP surface.
// Both core functions are pure and O(1); handlers call them inline on every request.

pub mod css;
pub mod geometry;
pub mod handlers;
pub mod paper;
pub mod pattern;
pub mod settings;
pub mod style;

// Re-export the public API consumed by other modules (state, main).
pub use paper::PageDimensions;
pub use pattern::PatternConfig;
