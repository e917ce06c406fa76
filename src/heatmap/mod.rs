//! # Calendar Heatmap
//!
//! Pure, synchronous construction of the commit-activity grid: Sunday-aligned
//! week columns, month and year axis segments, and the fixed activity level
//! scale. Rendering is left to the caller; [`render_text`] is a minimal
//! console surface used by the CLI.

mod grid;
mod levels;
mod text;


pub use grid::{
    build_heatmap, build_heatmap_now, Heatmap, HeatmapDay, HeatmapOptions, MonthSegment,
    WeekColumn, YearSegment,
};
pub use levels::{ActivityLevel, TextStyle};
pub use text::render_text;
