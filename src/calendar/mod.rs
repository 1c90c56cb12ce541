//! Year-at-a-glance calendar heatmap of daily delay fractions.
//!
//! [`grid`] lays out each month as Sunday-first weeks without touching any
//! drawing code; [`render`] paints those grids to SVG with a shared
//! [`scale::ColorScale`].

pub mod grid;
pub mod render;
pub mod scale;

pub use grid::{DelayLookup, MonthGrid, month_grid, year_grids};
pub use render::render_calendar;
pub use scale::ColorScale;
