use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Dense row-major elevation grid in feet.
// Stored flat (width × height) like a flattened height map; every row has
// the same width and every cell is finite, checked once at construction.
// On the wire it is a plain nested array `[[f64]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl ElevationGrid {
    // Build from nested rows (`rows[y][x]`), rejecting empty, ragged or NaN input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, value) in row.into_iter().enumerate() {
                check_finite(x, y, value)?;
                cells.push(value);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    // Build by sampling `f(x, y)` in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let value = f(x, y);
                check_finite(x, y, value)?;
                cells.push(value);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self> {
        Self::from_fn(width, height, |_, _| value)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    // Always false: construction rejects empty grids
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // Elevation at column `x`, row `y`. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.width + x]
    }

    // Elevation with both coordinates clamped onto the grid (edge replication).
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> f64 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.get(cx, cy)
    }

    pub fn row(&self, y: usize) -> &[f64] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.width)
    }

    // All cells in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    // New layer of the same shape, built cell by cell from (x, y, elevation).
    pub fn map_cells<T, F>(&self, mut f: F) -> Vec<Vec<T>>
    where
        F: FnMut(usize, usize, f64) -> T,
    {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| f(x, y, self.get(x, y))).collect())
            .collect()
    }
}

fn check_finite(x: usize, y: usize, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteValue {
            row: y,
            col: x,
            value,
        })
    }
}

impl TryFrom<Vec<Vec<f64>>> for ElevationGrid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<ElevationGrid> for Vec<Vec<f64>> {
    fn from(grid: ElevationGrid) -> Self {
        grid.to_rows()
    }
}
