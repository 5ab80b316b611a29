//! Square heightfield grid.
//!
//! Heights are normalized fractions of the vertical world extent. Storage is
//! row-major: `y` is the row (world z axis), `x` is the column (world x axis).

use rayon::prelude::*;

use crate::error::DeformError;

/// An N×N grid of normalized heights.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    pub resolution: usize,
    data: Vec<f32>,
}

impl HeightGrid {
    /// Create a grid filled with zeros.
    pub fn new(resolution: usize) -> Self {
        Self::new_with(resolution, 0.0)
    }

    pub fn new_with(resolution: usize, value: f32) -> Self {
        Self {
            resolution,
            data: vec![value; resolution * resolution],
        }
    }

    /// Build a grid from row-major data. The data length must be a perfect square.
    pub fn from_vec(resolution: usize, data: Vec<f32>) -> Result<Self, DeformError> {
        if data.len() != resolution * resolution {
            return Err(DeformError::NotSquare {
                width: resolution,
                height: data.len().checked_div(resolution).unwrap_or(0),
            });
        }
        Ok(Self { resolution, data })
    }

    /// Build a grid from nested rows (`rows[y][x]`).
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, DeformError> {
        let resolution = rows.len();
        let mut data = Vec::with_capacity(resolution * resolution);
        for row in rows {
            if row.len() != resolution {
                return Err(DeformError::NotSquare {
                    width: row.len(),
                    height: resolution,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { resolution, data })
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.resolution && y < self.resolution);
        y * self.resolution + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// True when both grids have the same resolution.
    pub fn same_dims(&self, other: &HeightGrid) -> bool {
        self.resolution == other.resolution
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let res = self.resolution;
        self.data.iter().enumerate().map(move |(idx, &val)| (idx % res, idx / res, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut f32)> {
        let res = self.resolution;
        self.data
            .iter_mut()
            .enumerate()
            .map(move |(idx, val)| (idx % res, idx / res, val))
    }

    /// Parallel mutable rows with their row index. Used by per-cell layers.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [f32])> {
        let res = self.resolution.max(1);
        self.data.par_chunks_mut(res).enumerate()
    }

    /// Mean of the 3×3 neighborhood centered on an interior cell.
    pub fn box_average(&self, x: usize, y: usize) -> f32 {
        let mut sum = 0.0;
        for ny in y - 1..=y + 1 {
            let row = ny * self.resolution;
            for nx in x - 1..=x + 1 {
                sum += self.data[row + nx];
            }
        }
        sum / 9.0
    }

    /// Minimum and maximum height. Returns `(0.0, 0.0)` for an empty grid.
    pub fn min_max(&self) -> (f32, f32) {
        if self.data.is_empty() {
            return (0.0, 0.0);
        }
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        for &h in &self.data {
            if h < min_h { min_h = h; }
            if h > max_h { max_h = h; }
        }
        (min_h, max_h)
    }

    /// Largest absolute per-cell difference against another grid of the same size.
    pub fn max_abs_diff(&self, other: &HeightGrid) -> Result<f32, DeformError> {
        if !self.same_dims(other) {
            return Err(DeformError::DimensionMismatch {
                expected: self.resolution,
                found: other.resolution,
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max))
    }

    /// Copy another grid's heights into this one without reallocating.
    pub fn copy_from(&mut self, other: &HeightGrid) -> Result<(), DeformError> {
        if !self.same_dims(other) {
            return Err(DeformError::DimensionMismatch {
                expected: self.resolution,
                found: other.resolution,
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }
}
