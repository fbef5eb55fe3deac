// Iso-elevation point extraction.
// For every level, each unit cell is checked on two of its four edges
// (top and left). Crossings become fractional grid coordinates; the
// result is an unconnected point cloud per level, not polylines.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, require_positive};
use crate::grid::ElevationGrid;
use crate::stats::stats;

// Upper bound on candidate levels per call
pub const MAX_LEVELS: f64 = 100_000.0;

// Crossing points of one contour level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLevel {
    // Level elevation in feet, a multiple of the interval.
    pub elevation: f64,
    // Fractional grid coordinates `[x, y]`, in scan order.
    pub points: Vec<[f64; 2]>,
}

// Levels in strictly ascending elevation; levels without crossings are left out.
pub type ContourSet = Vec<ContourLevel>;

// Trace contour crossings every `interval_ft` feet between the grid's
// rounded minimum and maximum.
pub fn contours(grid: &ElevationGrid, interval_ft: f64) -> Result<ContourSet> {
    let interval = require_positive("contour_interval_ft", interval_ft)?;
    let s = stats(grid);

    let first = (s.min / interval).ceil();
    let last = (s.max / interval).floor();
    // Tiny intervals would overflow the level index
    if !(last - first < MAX_LEVELS) {
        return Err(Error::InvalidParameter {
            name: "contour_interval_ft",
            value: interval_ft,
            reason: "yields too many contour levels",
        });
    }
    let (first, last) = (first as i64, last as i64);

    let mut set = ContourSet::new();
    for k in first..=last {
        let level = k as f64 * interval;
        let points = trace_level(grid, level);
        if !points.is_empty() {
            set.push(ContourLevel {
                elevation: level,
                points,
            });
        }
    }

    tracing::debug!(
        interval,
        candidate_levels = (last - first + 1).max(0),
        emitted_levels = set.len(),
        "traced contours"
    );
    Ok(set)
}

// Scan every unit cell (x < w-1, y < h-1) and test its top and left edges.
fn trace_level(grid: &ElevationGrid, level: f64) -> Vec<[f64; 2]> {
    let mut points = Vec::new();
    if grid.width() < 2 || grid.height() < 2 {
        return points;
    }

    for y in 0..grid.height() - 1 {
        for x in 0..grid.width() - 1 {
            let tl = grid.get(x, y);
            let tr = grid.get(x + 1, y);
            let bl = grid.get(x, y + 1);

            // Top edge
            if let Some(t) = crossing(tl, tr, level) {
                points.push([x as f64 + t, y as f64]);
            }
            // Left edge
            if let Some(t) = crossing(tl, bl, level) {
                points.push([x as f64, y as f64 + t]);
            }
        }
    }
    points
}

// Fraction along a → b where the level is crossed. A level equal to an
// endpoint is not a crossing.
#[inline]
fn crossing(a: f64, b: f64, level: f64) -> Option<f64> {
    if (a - level) * (b - level) < 0.0 {
        Some((level - a) / (b - a))
    } else {
        None
    }
}
