//! Binding between the deformation pipeline and a host terrain surface.
//!
//! The host owns the displayed heights. The controller captures them once as
//! the baseline, writes a freshly recomputed grid on every tick, and writes
//! the baseline back on reset.

use crate::error::DeformError;
use crate::extents::TerrainExtents;
use crate::grid::HeightGrid;
use crate::noise_source::{NoiseSource, PerlinSource};
use crate::params::DeformConfig;
use crate::pipeline::DeformationPipeline;

/// A host-owned terrain surface the controller reads from and writes to.
pub trait TerrainSurface {
    fn resolution(&self) -> usize;
    fn read_heights(&self) -> HeightGrid;
    fn write_heights(&mut self, grid: &HeightGrid) -> Result<(), DeformError>;
}

/// Terrain surface kept in memory.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    heights: HeightGrid,
    writes: usize,
}

impl MemorySurface {
    pub fn new(heights: HeightGrid) -> Self {
        Self { heights, writes: 0 }
    }

    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    /// Replace the surface contents directly, as a host editor would.
    pub fn replace(&mut self, heights: HeightGrid) {
        self.heights = heights;
    }

    /// Number of successful writes, for hosts tracking dirty state.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TerrainSurface for MemorySurface {
    fn resolution(&self) -> usize {
        self.heights.resolution
    }

    fn read_heights(&self) -> HeightGrid {
        self.heights.clone()
    }

    fn write_heights(&mut self, grid: &HeightGrid) -> Result<(), DeformError> {
        self.heights.copy_from(grid)?;
        self.writes += 1;
        Ok(())
    }
}

/// Drives a pipeline from host ticks and keeps a surface in sync with it.
pub struct TerrainController<S: TerrainSurface, N: NoiseSource = PerlinSource> {
    surface: S,
    pipeline: DeformationPipeline<N>,
    config: DeformConfig,
}

impl<S: TerrainSurface> TerrainController<S, PerlinSource> {
    pub fn new(surface: S, extents: TerrainExtents, config: DeformConfig) -> Result<Self, DeformError> {
        Ok(Self {
            surface,
            pipeline: DeformationPipeline::new(extents)?,
            config,
        })
    }
}

impl<S: TerrainSurface, N: NoiseSource> TerrainController<S, N> {
    pub fn with_pipeline(surface: S, pipeline: DeformationPipeline<N>, config: DeformConfig) -> Self {
        Self { surface, pipeline, config }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn pipeline(&self) -> &DeformationPipeline<N> {
        &self.pipeline
    }

    pub fn config(&self) -> &DeformConfig {
        &self.config
    }

    /// Editor mutation path. Changes take effect on the next apply.
    pub fn config_mut(&mut self) -> &mut DeformConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: DeformConfig) {
        self.config = config;
    }

    /// Capture the baseline from the surface and apply once.
    pub fn start(&mut self) -> Result<(), DeformError> {
        self.capture_baseline();
        self.apply()
    }

    /// Re-read the surface into the baseline store.
    pub fn capture_baseline(&mut self) {
        let heights = self.surface.read_heights();
        self.pipeline.capture_baseline(&heights);
    }

    /// One host tick: advance animation time, then apply.
    pub fn update(&mut self, dt: f32) -> Result<(), DeformError> {
        self.pipeline.advance(dt, &self.config);
        self.apply()
    }

    /// Recompute from the baseline and write to the surface. Captures the
    /// baseline first if it was never captured.
    pub fn apply(&mut self) -> Result<(), DeformError> {
        if !self.pipeline.is_ready() {
            self.capture_baseline();
        }
        self.check_dimensions()?;
        let heights = self.pipeline.recompute(&self.config)?;
        self.surface.write_heights(&heights)
    }

    /// Write the baseline back to the surface. Returns `false` when no
    /// baseline was ever captured.
    pub fn reset(&mut self) -> Result<bool, DeformError> {
        let baseline = match self.pipeline.reset() {
            Ok(baseline) => baseline,
            Err(e) if e.is_not_ready() => return Ok(false),
            Err(e) => return Err(e),
        };
        self.check_dimensions()?;
        self.surface.write_heights(&baseline)?;
        Ok(true)
    }

    fn check_dimensions(&self) -> Result<(), DeformError> {
        match self.pipeline.baseline() {
            Some(baseline) if baseline.resolution != self.surface.resolution() => {
                Err(DeformError::DimensionMismatch {
                    expected: baseline.resolution,
                    found: self.surface.resolution(),
                })
            }
            _ => Ok(()),
        }
    }
}
