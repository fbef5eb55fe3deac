use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::grid::ElevationGrid;
use crate::utils::round_dp;

// Elevation every feature is added to or carved from (feet).
pub const BASE_ELEVATION_FT: f64 = 845.0;

const PAD_CENTER: (f64, f64) = (0.4, 0.65);
const PAD_RADIUS: f64 = 0.12;
const PAD_ELEVATION_FT: f64 = 842.0;

// Deterministic demo terrain: rolling hill country with a hill, a ridge,
// a meandering drainage channel, a pond and a partly graded building pad.
// Each cell depends only on its (x, y) position, so there is no seed.
pub struct HillCountry2D {
    width: usize,
    height: usize,
}

impl HillCountry2D {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    // Unrounded elevation at cell (x, y).
    pub fn elevation_at(&self, x: usize, y: usize) -> f64 {
        // Normalized position in [0, 1)
        let nx = x as f64 / self.width as f64;
        let ny = y as f64 / self.height as f64;

        let mut elevation = BASE_ELEVATION_FT;

        // Hill in the NW quadrant
        elevation += gaussian(15.0, (nx - 0.3).powi(2) + (ny - 0.3).powi(2), 0.04);

        // Ridge along the NE-SW diagonal
        let ridge_dist = ((nx - ny) * 0.7 + 0.1).abs();
        elevation += gaussian(10.0, ridge_dist.powi(2), 0.01);

        // Rolling texture
        elevation += 5.0 * (nx * PI * 3.0).sin() * (ny * PI * 2.5).cos();
        elevation += 3.0 * (nx * PI * 7.0 + 1.2).sin() * (ny * PI * 5.3 + 0.8).cos();

        // Drainage channel meandering N-S
        let channel_x = 0.6 + 0.08 * (ny * PI * 3.0).sin();
        elevation -= gaussian(12.0, (nx - channel_x).powi(2), 0.002);

        // Pond
        elevation -= gaussian(6.0, (nx - 0.75).powi(2) + (ny - 0.7).powi(2), 0.005);

        // Building pad: pull toward a gently N-S sloped surface near its centre
        let pad_dist = ((nx - PAD_CENTER.0).powi(2) + (ny - PAD_CENTER.1).powi(2)).sqrt();
        if pad_dist < PAD_RADIUS {
            let blend = 1.0 - pad_dist / PAD_RADIUS;
            let pad_elevation = PAD_ELEVATION_FT + (ny - PAD_CENTER.1) * 20.0;
            elevation = elevation * (1.0 - blend * 0.5) + pad_elevation * blend * 0.5;
        }

        // Micro noise on raw cell indices
        let (xf, yf) = (x as f64, y as f64);
        elevation += 0.5 * ((xf * 13.7 + yf * 7.3).sin() + (xf * 9.1 - yf * 11.9).cos());

        elevation
    }

    // Sample every cell, rounded to 2 decimals.
    pub fn generate(&self) -> Result<ElevationGrid> {
        ElevationGrid::from_fn(self.width, self.height, |x, y| {
            round_dp(self.elevation_at(x, y), 2)
        })
    }
}

// amplitude · exp(−dist² / spread)
#[inline]
fn gaussian(amplitude: f64, dist_sq: f64, spread: f64) -> f64 {
    amplitude * (-dist_sq / spread).exp()
}

// Build the demo terrain grid for a `width × height` site.
pub fn synthesize(width: usize, height: usize) -> Result<ElevationGrid> {
    let grid = HillCountry2D::new(width, height)?.generate()?;
    tracing::debug!(width, height, "synthesized demo terrain");
    Ok(grid)
}
