// Slope and aspect from centred finite differences.
// Neighbours are looked up with clamped coordinates, so border cells fall
// back to a one-sided difference and a 1×1 grid is simply flat.

use serde::{Deserialize, Serialize};

use crate::error::{Result, require_positive};
use crate::grid::ElevationGrid;
use crate::utils::{CellMap, round_dp};

// Per-cell slope (percent, 1 decimal) and aspect (whole degrees from
// north, 0–359), congruent to the source grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeField {
    pub gradient: CellMap<f64>,
    pub aspect: CellMap<u16>,
}

// Steepness buckets used when colouring slope maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeClass {
    // Under 5 %
    Gentle,
    // 5 % up to 15 %
    Moderate,
    // 15 % up to 30 %
    Steep,
    VerySteep,
}

impl SlopeClass {
    pub fn from_percent(percent: f64) -> Self {
        match percent {
            p if p < 5.0 => SlopeClass::Gentle,
            p if p < 15.0 => SlopeClass::Moderate,
            p if p < 30.0 => SlopeClass::Steep,
            _ => SlopeClass::VerySteep,
        }
    }
}

// Cell counts per `SlopeClass`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlopeHistogram {
    pub gentle: usize,
    pub moderate: usize,
    pub steep: usize,
    pub very_steep: usize,
}

impl SlopeField {
    pub fn class_histogram(&self) -> SlopeHistogram {
        let mut hist = SlopeHistogram::default();
        for &percent in self.gradient.iter().flatten() {
            match SlopeClass::from_percent(percent) {
                SlopeClass::Gentle => hist.gentle += 1,
                SlopeClass::Moderate => hist.moderate += 1,
                SlopeClass::Steep => hist.steep += 1,
                SlopeClass::VerySteep => hist.very_steep += 1,
            }
        }
        hist
    }
}

// Compute slope and aspect for every cell.
// dx = (right − left) / (2 · cell)
// dy = (down − up)    / (2 · cell)
// slope  = √(dx² + dy²) · 100
// aspect = (atan2(−dy, dx)° + 360) mod 360
pub fn slope(grid: &ElevationGrid, cell_size_ft: f64) -> Result<SlopeField> {
    let cell_size = require_positive("cell_size_ft", cell_size_ft)?;
    let two_cells = 2.0 * cell_size;

    let mut gradient = Vec::with_capacity(grid.height());
    let mut aspect = Vec::with_capacity(grid.height());

    for y in 0..grid.height() as isize {
        let mut g_row = Vec::with_capacity(grid.width());
        let mut a_row = Vec::with_capacity(grid.width());

        for x in 0..grid.width() as isize {
            let left = grid.get_clamped(x - 1, y);
            let right = grid.get_clamped(x + 1, y);
            let up = grid.get_clamped(x, y - 1);
            let down = grid.get_clamped(x, y + 1);

            let dx = (right - left) / two_cells;
            let dy = (down - up) / two_cells;

            g_row.push(round_dp((dx * dx + dy * dy).sqrt() * 100.0, 1));
            a_row.push(compass_degrees(dx, dy));
        }

        gradient.push(g_row);
        aspect.push(a_row);
    }

    tracing::debug!(
        width = grid.width(),
        height = grid.height(),
        cell_size,
        "computed slope/aspect"
    );
    Ok(SlopeField { gradient, aspect })
}

// Whole degrees in 0..360; a value rounding up to 360 wraps to 0.
fn compass_degrees(dx: f64, dy: f64) -> u16 {
    let degrees = ((-dy).atan2(dx).to_degrees() + 360.0) % 360.0;
    (round_dp(degrees, 0) as u16) % 360
}
