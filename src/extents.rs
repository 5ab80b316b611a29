//! World-space terrain size and conversion between world units and grid indices.

use serde::{Deserialize, Serialize};

use crate::error::DeformError;

/// World-space size of the terrain surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainExtents {
    /// Horizontal size along the x axis (grid columns)
    pub width: f32,
    /// Vertical extent; heights in the grid are fractions of this
    pub vertical: f32,
    /// Horizontal size along the z axis (grid rows)
    pub depth: f32,
}

impl TerrainExtents {
    pub fn new(width: f32, vertical: f32, depth: f32) -> Result<Self, DeformError> {
        let extents = Self { width, vertical, depth };
        extents.validate()?;
        Ok(extents)
    }

    /// Every component must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), DeformError> {
        for (name, value) in [("width", self.width), ("vertical", self.vertical), ("depth", self.depth)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DeformError::InvalidExtents(format!("{} = {}", name, value)));
            }
        }
        Ok(())
    }
}

impl Default for TerrainExtents {
    fn default() -> Self {
        Self { width: 1000.0, vertical: 600.0, depth: 1000.0 }
    }
}

/// Converts world-unit parameters into grid space for one terrain resolution.
#[derive(Clone, Copy, Debug)]
pub struct GridExtentMapper {
    pub extents: TerrainExtents,
    pub resolution: usize,
}

impl GridExtentMapper {
    pub fn new(extents: TerrainExtents, resolution: usize) -> Self {
        Self { extents, resolution }
    }

    /// World distance to grid cells, measured against the horizontal (x) size.
    #[inline]
    pub fn world_to_grid_distance(&self, d: f32) -> f32 {
        d / self.extents.width * self.resolution as f32
    }

    /// Normalized position (0..1 per axis) to the index `(x, y)` of the cell containing it.
    /// Values outside 0..1 map outside the grid; callers bound-check per cell.
    #[inline]
    pub fn normalized_to_grid_index(&self, pos: (f32, f32)) -> (f32, f32) {
        let res = self.resolution as f32;
        ((pos.0 * res).floor(), (pos.1 * res).floor())
    }

    /// World height to a fraction of the vertical extent.
    #[inline]
    pub fn vertical_fraction(&self, h: f32) -> f32 {
        h / self.extents.vertical
    }
}
