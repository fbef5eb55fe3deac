// core holds the terrain analysis engine: pure functions over in-memory
// elevation grids (no I/O, no shared state)
pub mod contour;
pub mod cutfill;
pub mod error;
pub mod grid;
pub mod slope;
pub mod stats;
pub mod synth;
pub mod utils;

pub use contour::{ContourLevel, ContourSet, contours};
pub use cutfill::{CutFill, cut_fill};
pub use error::{Error, Result};
pub use grid::ElevationGrid;
pub use slope::{SlopeClass, SlopeField, SlopeHistogram, slope};
pub use stats::{GridStats, stats};
pub use synth::{HillCountry2D, synthesize};
pub use utils::CellMap;

// Defaults used when a caller leaves a parameter out
pub const DEFAULT_CELL_SIZE_FT: f64 = 5.0;
pub const DEFAULT_CONTOUR_INTERVAL_FT: f64 = 5.0;
pub const DEFAULT_DESIGN_ELEVATION_FT: f64 = 845.0;
// Demo DEMs are DEFAULT_GRID_SIZE × DEFAULT_GRID_SIZE cells
pub const DEFAULT_GRID_SIZE: usize = 200;
// 5 ft expressed in metres per pixel
pub const DEMO_RESOLUTION_M: f64 = 1.524;

// Square feet per acre, for site-area summaries
pub const SQ_FT_PER_ACRE: f64 = 43_560.0;

// Plan area covered by a grid, in acres.
pub fn site_area_acres(grid: &ElevationGrid, cell_size_ft: f64) -> Result<f64> {
    let cell_size = error::require_positive("cell_size_ft", cell_size_ft)?;
    let width_ft = grid.width() as f64 * cell_size;
    let height_ft = grid.height() as f64 * cell_size;
    Ok(width_ft * height_ft / SQ_FT_PER_ACRE)
}
