use serde::{Deserialize, Serialize};

use crate::grid::ElevationGrid;
use crate::utils::round_dp;

// Descriptive statistics of a grid, each rounded to 2 decimals.
// Derived data: recompute whenever the grid changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
}

impl GridStats {
    // Vertical span of the terrain (max − min), in feet.
    pub fn relief(&self) -> f64 {
        round_dp(self.max - self.min, 2)
    }
}

// Min, max, mean and population standard deviation over all cells.
// Two row-major passes; rounding happens only on the final values.
pub fn stats(grid: &ElevationGrid) -> GridStats {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;

    for &v in grid.values() {
        min = min.min(v);
        max = max.max(v);
        sum += v;
    }

    let count = grid.len() as f64;
    let mean = sum / count;

    let variance = grid
        .values()
        .iter()
        .map(|&v| (v - mean) * (v - mean))
        .sum::<f64>()
        / count;

    GridStats {
        min: round_dp(min, 2),
        max: round_dp(max, 2),
        mean: round_dp(mean, 2),
        stddev: round_dp(variance.sqrt(), 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_grid_has_zero_spread() {
        let grid = ElevationGrid::filled(7, 4, 845.25).unwrap();
        let s = stats(&grid);
        assert_eq!(s.min, 845.25);
        assert_eq!(s.max, 845.25);
        assert_eq!(s.mean, 845.25);
        assert_eq!(s.stddev, 0.0);
        assert_eq!(s.relief(), 0.0);
    }

    #[test]
    fn known_two_by_two() {
        let grid = ElevationGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let s = stats(&grid);
        assert_eq!(
            s,
            GridStats {
                min: 1.0,
                max: 4.0,
                mean: 2.5,
                stddev: 1.12,
            }
        );
        assert_eq!(s.relief(), 3.0);
    }

    #[test]
    fn single_cell() {
        let grid = ElevationGrid::filled(1, 1, -3.456).unwrap();
        let s = stats(&grid);
        assert_eq!(s.min, -3.46);
        assert_eq!(s.max, -3.46);
        assert_eq!(s.stddev, 0.0);
    }

    #[test]
    fn rounds_after_full_precision() {
        // mean = 1/3, stddev = sqrt(2)/3 ≈ 0.4714
        let grid = ElevationGrid::from_rows(vec![vec![0.0, 0.0, 1.0]]).unwrap();
        let s = stats(&grid);
        assert_eq!(s.mean, 0.33);
        assert_eq!(s.stddev, 0.47);
    }
}
