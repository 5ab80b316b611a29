//! Deformation pipeline
//!
//! Every recompute starts from a fresh copy of the captured baseline and runs
//! the enabled layers in a fixed order:
//!
//! 1. Radial ripple
//! 2. Directional flow
//! 3. Fractal noise
//! 4. Radius smoothing
//!
//! The pipeline never reads its own previous output, so repeated calls with
//! the same configuration and clock give identical grids. The only state that
//! changes between calls is the animation clock.

use crate::clock::AnimationClock;
use crate::error::DeformError;
use crate::extents::{GridExtentMapper, TerrainExtents};
use crate::grid::HeightGrid;
use crate::layers::{
    apply_directional_flow, apply_fractal_noise, apply_radial_ripple, apply_radius_smoothing,
    LayerContext,
};
use crate::noise_source::{NoiseSource, PerlinSource};
use crate::params::DeformConfig;

/// Immutable snapshot of the starting heights.
#[derive(Clone, Debug, Default)]
pub struct BaselineStore {
    grid: Option<HeightGrid>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `grid` in, replacing any previous baseline.
    pub fn capture(&mut self, grid: &HeightGrid) {
        self.grid = Some(grid.clone());
    }

    pub fn get(&self) -> Option<&HeightGrid> {
        self.grid.as_ref()
    }

    pub fn is_captured(&self) -> bool {
        self.grid.is_some()
    }
}

/// Layered deformation over a captured baseline.
pub struct DeformationPipeline<N: NoiseSource = PerlinSource> {
    extents: TerrainExtents,
    noise: N,
    baseline: BaselineStore,
    clock: AnimationClock,
}

impl DeformationPipeline<PerlinSource> {
    pub fn new(extents: TerrainExtents) -> Result<Self, DeformError> {
        Self::with_noise(extents, PerlinSource::default())
    }
}

impl<N: NoiseSource> DeformationPipeline<N> {
    pub fn with_noise(extents: TerrainExtents, noise: N) -> Result<Self, DeformError> {
        extents.validate()?;
        Ok(Self {
            extents,
            noise,
            baseline: BaselineStore::new(),
            clock: AnimationClock::new(),
        })
    }

    pub fn extents(&self) -> TerrainExtents {
        self.extents
    }

    pub fn set_extents(&mut self, extents: TerrainExtents) -> Result<(), DeformError> {
        extents.validate()?;
        self.extents = extents;
        Ok(())
    }

    /// Store the starting heights. Must happen before the first recompute.
    pub fn capture_baseline(&mut self, grid: &HeightGrid) {
        self.baseline.capture(grid);
    }

    pub fn baseline(&self) -> Option<&HeightGrid> {
        self.baseline.get()
    }

    pub fn is_ready(&self) -> bool {
        self.baseline.is_captured()
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Advance animation time by one host tick. Only moves while the flow
    /// layer is enabled and animated.
    pub fn advance(&mut self, dt: f32, config: &DeformConfig) {
        if config.flow_animated() {
            self.clock.advance(dt, config.flow.animation_speed);
        }
    }

    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Flow phase for this configuration: the clock when animated, otherwise zero.
    pub fn flow_time(&self, config: &DeformConfig) -> f32 {
        if config.flow.animate {
            self.clock.value()
        } else {
            0.0
        }
    }

    /// Run all enabled layers on a fresh copy of the baseline.
    ///
    /// Returns `DeformError::NotReady` before a baseline is captured. Callers
    /// treat that as "nothing to show yet".
    pub fn recompute(&self, config: &DeformConfig) -> Result<HeightGrid, DeformError> {
        let baseline = self.baseline.get().ok_or(DeformError::NotReady)?;
        let mut heights = baseline.clone();
        self.apply_layers(&mut heights, config);
        Ok(heights)
    }

    /// Recompute into an existing host-owned grid. The grid must match the
    /// baseline resolution; on mismatch nothing is written.
    pub fn recompute_into(&self, config: &DeformConfig, target: &mut HeightGrid) -> Result<(), DeformError> {
        let baseline = self.baseline.get().ok_or(DeformError::NotReady)?;
        if !baseline.same_dims(target) {
            return Err(DeformError::DimensionMismatch {
                expected: baseline.resolution,
                found: target.resolution,
            });
        }
        target.copy_from(baseline)?;
        self.apply_layers(target, config);
        Ok(())
    }

    /// Unmodified copy of the baseline, for hosts restoring their surface.
    pub fn reset(&self) -> Result<HeightGrid, DeformError> {
        self.baseline.get().cloned().ok_or(DeformError::NotReady)
    }

    fn apply_layers(&self, heights: &mut HeightGrid, config: &DeformConfig) {
        let ctx = LayerContext {
            mapper: GridExtentMapper::new(self.extents, heights.resolution),
            noise: &self.noise,
            time: self.flow_time(config),
        };

        if config.ripple.enabled {
            apply_radial_ripple(heights, &config.ripple, &ctx);
        }
        if config.flow.enabled {
            apply_directional_flow(heights, &config.flow, &ctx);
        }
        if config.noise.enabled {
            apply_fractal_noise(heights, &config.noise, &ctx);
        }
        if config.smoothing.enabled {
            apply_radius_smoothing(heights, &config.smoothing, &ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::ConstantNoise;

    fn sloped(resolution: usize) -> HeightGrid {
        let mut grid = HeightGrid::new(resolution);
        for (x, y, h) in grid.iter_mut() {
            *h = (x + y) as f32 / (2 * resolution) as f32;
        }
        grid
    }

    #[test]
    fn test_not_ready_before_capture() {
        let pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
        let err = pipeline.recompute(&DeformConfig::default()).unwrap_err();
        assert!(err.is_not_ready());
        assert!(pipeline.reset().unwrap_err().is_not_ready());
        assert!(!pipeline.is_ready());
    }

    #[test]
    fn test_disabled_config_reproduces_baseline() {
        let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
        let baseline = sloped(33);
        pipeline.capture_baseline(&baseline);
        assert_eq!(pipeline.recompute(&DeformConfig::disabled()).unwrap(), baseline);
    }

    #[test]
    fn test_capture_replaces_baseline() {
        let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
        pipeline.capture_baseline(&HeightGrid::new(8));
        pipeline.capture_baseline(&sloped(16));
        assert_eq!(pipeline.baseline().map(|g| g.resolution), Some(16));
    }

    #[test]
    fn test_recompute_into_dimension_mismatch() {
        let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
        pipeline.capture_baseline(&sloped(16));

        let mut wrong = HeightGrid::new_with(17, 0.9);
        let err = pipeline.recompute_into(&DeformConfig::default(), &mut wrong).unwrap_err();
        assert!(matches!(err, DeformError::DimensionMismatch { expected: 16, found: 17 }));
        assert_eq!(wrong, HeightGrid::new_with(17, 0.9));

        let mut right = HeightGrid::new(16);
        pipeline.recompute_into(&DeformConfig::default(), &mut right).unwrap();
        assert_eq!(right, pipeline.recompute(&DeformConfig::default()).unwrap());
    }

    #[test]
    fn test_clock_only_advances_when_animated() {
        let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
        let mut config = DeformConfig::default();

        pipeline.advance(1.0, &config);
        assert_eq!(pipeline.clock().value(), 0.0);

        config.flow.animate = true;
        config.flow.animation_speed = 2.0;
        pipeline.advance(0.5, &config);
        assert!((pipeline.clock().value() - 1.0).abs() < 1e-6);

        // Disabled flow freezes the clock at its last value
        config.flow.enabled = false;
        pipeline.advance(0.5, &config);
        assert!((pipeline.clock().value() - 1.0).abs() < 1e-6);

        pipeline.reset_clock();
        assert_eq!(pipeline.clock().value(), 0.0);
    }

    #[test]
    fn test_smoothing_keeps_flat_noise_output() {
        let noise = ConstantNoise(0.75);
        let mut pipeline =
            DeformationPipeline::with_noise(TerrainExtents::new(16.0, 1.0, 16.0).unwrap(), noise).unwrap();
        pipeline.capture_baseline(&HeightGrid::new(16));

        let mut config = DeformConfig::disabled();
        config.noise.enabled = true;
        config.noise.blend_strength = 1.0;
        config.smoothing.enabled = true;
        let out = pipeline.recompute(&config).unwrap();
        let expected = (0.75 * 2.0 - 1.0) * config.noise.strength;
        assert!(out.as_slice().iter().all(|&h| (h - expected).abs() < 1e-6));
    }

    #[test]
    fn test_smoothing_runs_after_ripple() {
        // Smoothing last softens the ripple; the reverse order would not
        let noise = ConstantNoise(0.5);
        let mut pipeline =
            DeformationPipeline::with_noise(TerrainExtents::new(32.0, 1.0, 32.0).unwrap(), noise).unwrap();
        pipeline.capture_baseline(&HeightGrid::new(32));

        let mut ripple_only = DeformConfig::disabled();
        ripple_only.ripple.enabled = true;
        ripple_only.ripple.radius = 12.0;
        ripple_only.ripple.count = 3;
        ripple_only.ripple.noise_amount = 0.0;
        ripple_only.ripple.blend_strength = 1.0;
        let rippled = pipeline.recompute(&ripple_only).unwrap();

        let mut both = ripple_only.clone();
        both.smoothing.enabled = true;
        both.smoothing.radius = 32.0;
        both.smoothing.blend_strength = 1.0;
        let smoothed = pipeline.recompute(&both).unwrap();

        let roughness = |g: &HeightGrid| -> f32 {
            let mut total = 0.0;
            for y in 0..g.resolution {
                for x in 1..g.resolution {
                    total += (g.get(x, y) - g.get(x - 1, y)).abs();
                }
            }
            total
        };
        assert!(roughness(&smoothed) < roughness(&rippled));
    }

    #[test]
    fn test_invalid_extents_rejected() {
        assert!(DeformationPipeline::new(TerrainExtents { width: 0.0, vertical: 1.0, depth: 1.0 }).is_err());
        let mut pipeline = DeformationPipeline::new(TerrainExtents::default()).unwrap();
        assert!(pipeline
            .set_extents(TerrainExtents { width: 1.0, vertical: -1.0, depth: 1.0 })
            .is_err());
        assert_eq!(pipeline.extents(), TerrainExtents::default());
    }
}
