use serde::{Deserialize, Serialize};

use crate::error::{Result, require_finite, require_positive};
use crate::grid::ElevationGrid;
use crate::utils::{CellMap, round_dp};

pub const CUBIC_FEET_PER_CUBIC_YARD: f64 = 27.0;

// Earthwork needed to bring a site to a flat pad.
// Volumes are whole cubic yards; heatmap cells are feet above (+, cut)
// or below (−, fill) the design elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutFill {
    pub cut_volume: i64,
    pub fill_volume: i64,
    pub net_volume: i64,
    pub heatmap: CellMap<f64>,
}

pub fn cut_fill(
    existing: &ElevationGrid,
    design_elevation_ft: f64,
    cell_size_ft: f64,
) -> Result<CutFill> {
    let design = require_finite("design_elevation_ft", design_elevation_ft)?;
    let cell_size = require_positive("cell_size_ft", cell_size_ft)?;
    let cell_area = cell_size * cell_size;

    let mut cut_cubic_ft = 0.0;
    let mut fill_cubic_ft = 0.0;

    // Accumulate with full-precision diffs; only the heatmap is rounded
    let heatmap = existing.map_cells(|_, _, elevation| {
        let diff = elevation - design;
        let volume = diff * cell_area;
        if diff > 0.0 {
            cut_cubic_ft += volume;
        } else {
            fill_cubic_ft += volume.abs();
        }
        round_dp(diff, 2)
    });

    let cut_volume = to_cubic_yards(cut_cubic_ft);
    let fill_volume = to_cubic_yards(fill_cubic_ft);

    tracing::debug!(
        design,
        cell_size,
        cut_volume,
        fill_volume,
        "computed cut/fill"
    );

    Ok(CutFill {
        cut_volume,
        fill_volume,
        // From the rounded volumes, so net always equals cut − fill as reported
        net_volume: cut_volume - fill_volume,
        heatmap,
    })
}

fn to_cubic_yards(cubic_ft: f64) -> i64 {
    round_dp(cubic_ft / CUBIC_FEET_PER_CUBIC_YARD, 0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::stats::stats;

    #[test]
    fn flat_site_at_grade_moves_nothing() {
        let grid = ElevationGrid::filled(6, 5, 845.0).unwrap();
        let result = cut_fill(&grid, 845.0, 5.0).unwrap();
        assert_eq!(result.cut_volume, 0);
        assert_eq!(result.fill_volume, 0);
        assert_eq!(result.net_volume, 0);
        assert_eq!(result.heatmap.len(), 5);
        assert!(result.heatmap.iter().flatten().all(|&d| d == 0.0));
    }

    #[test]
    fn known_volumes() {
        // 3 ft of cut and 3 ft of fill on 3×3 ft cells = 27 ft³ = 1 yd³ each;
        // the remaining cell is 6 ft high = 2 yd³ of cut.
        let grid = ElevationGrid::from_rows(vec![vec![103.0, 97.0], vec![106.0, 100.0]]).unwrap();
        let result = cut_fill(&grid, 100.0, 3.0).unwrap();
        assert_eq!(result.cut_volume, 3);
        assert_eq!(result.fill_volume, 1);
        assert_eq!(result.net_volume, 2);
        assert_eq!(result.heatmap, vec![vec![3.0, -3.0], vec![6.0, 0.0]]);
    }

    #[test]
    fn net_is_taken_from_rounded_volumes() {
        // cut = 13.5 ft³ = 0.5 yd³ → 1, fill = 13.5 ft³ → 1, net 0
        let grid = ElevationGrid::from_rows(vec![vec![1.5, -1.5]]).unwrap();
        let result = cut_fill(&grid, 0.0, 3.0).unwrap();
        assert_eq!(result.cut_volume, 1);
        assert_eq!(result.fill_volume, 1);
        assert_eq!(result.net_volume, 0);
    }

    #[test]
    fn mean_design_has_both_cut_and_fill() {
        let grid = crate::synth::synthesize(60, 60).unwrap();
        let mean = stats(&grid).mean;
        let result = cut_fill(&grid, mean, 5.0).unwrap();
        assert!(result.cut_volume > 0);
        assert!(result.fill_volume > 0);
        assert_eq!(result.net_volume, result.cut_volume - result.fill_volume);
    }

    #[test]
    fn heatmap_sign_follows_existing_vs_design() {
        let grid = crate::synth::synthesize(40, 40).unwrap();
        let design = 848.0;
        let result = cut_fill(&grid, design, 5.0).unwrap();

        assert_eq!(result.heatmap.len(), grid.height());
        for (y, row) in result.heatmap.iter().enumerate() {
            assert_eq!(row.len(), grid.width());
            for (x, &d) in row.iter().enumerate() {
                assert_eq!(d > 0.0, grid.get(x, y) > design, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        let grid = ElevationGrid::filled(2, 2, 1.0).unwrap();
        assert!(matches!(
            cut_fill(&grid, 1.0, 0.0),
            Err(Error::InvalidParameter { name: "cell_size_ft", .. })
        ));
        assert!(matches!(
            cut_fill(&grid, f64::NAN, 5.0),
            Err(Error::InvalidParameter { name: "design_elevation_ft", .. })
        ));
    }

    #[test]
    fn serializes_camel_case() {
        let grid = ElevationGrid::filled(1, 1, 10.0).unwrap();
        let json = serde_json::to_value(cut_fill(&grid, 10.0, 5.0).unwrap()).unwrap();
        assert!(json.get("cutVolume").is_some());
        assert!(json.get("fillVolume").is_some());
        assert!(json.get("netVolume").is_some());
        assert!(json.get("heatmap").is_some());
    }
}
