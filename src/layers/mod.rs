//! Deformation layers
//!
//! Each layer reads the working grid produced by the previous one and blends
//! its own displacement in:
//! - **Ripple**: concentric waves with a hard radius cutoff
//! - **Flow**: directional waves, optionally animated
//! - **Fractal**: multi-octave noise displacement
//! - **Smoothing**: iterated, double-buffered 3×3 box blur inside a radius
//!
//! Every blend is `lerp(current, current + delta, strength)` with the strength
//! clamped to `[0, 1]`, so a cell never leaves the span of `current` and
//! `current + delta`.

pub mod flow;
pub mod fractal;
pub mod ripple;
pub mod smoothing;

pub use flow::{apply_directional_flow, flow_delta};
pub use fractal::{apply_fractal_noise, fractal_delta, fractal_sample};
pub use ripple::{apply_radial_ripple, ripple_delta};
pub use smoothing::apply_radius_smoothing;

use crate::extents::GridExtentMapper;
use crate::noise_source::NoiseSource;

/// Everything a layer needs besides its own parameters.
#[derive(Clone, Copy)]
pub struct LayerContext<'a> {
    pub mapper: GridExtentMapper,
    pub noise: &'a dyn NoiseSource,
    /// Flow phase; zero unless the flow layer is animated
    pub time: f32,
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Blend a raw displacement into a height.
#[inline]
pub fn blend_delta(current: f32, delta: f32, strength: f32) -> f32 {
    lerp(current, current + delta, strength)
}

/// Quadratic falloff from 1 at the center to 0 at `radius`.
/// Returns `None` at or beyond the radius (hard cutoff).
#[inline]
pub fn radial_falloff(distance: f32, radius: f32) -> Option<f32> {
    if distance < radius {
        let t = distance / radius;
        let f = 1.0 - t;
        Some(f * f)
    } else {
        None
    }
}

/// Distance from a cell to a grid-space point.
#[inline]
pub(crate) fn cell_distance(x: usize, y: usize, center: (f32, f32)) -> f32 {
    let dx = x as f32 - center.0;
    let dy = y as f32 - center.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp(0.0, 1.0, 0.25), 0.25);
        assert_eq!(lerp(0.0, 1.0, 2.0), 1.0);
        assert_eq!(lerp(0.0, 1.0, -1.0), 0.0);
    }

    #[test]
    fn test_blend_within_span() {
        for &(current, delta) in &[(0.3f32, 0.2f32), (0.3, -0.7), (-1.0, 0.05)] {
            for i in 0..=10 {
                let out = blend_delta(current, delta, i as f32 / 10.0);
                let (lo, hi) = if delta < 0.0 { (current + delta, current) } else { (current, current + delta) };
                assert!(out >= lo - 1e-6 && out <= hi + 1e-6);
            }
        }
    }

    #[test]
    fn test_radial_falloff() {
        assert_eq!(radial_falloff(0.0, 2.0), Some(1.0));
        assert_eq!(radial_falloff(1.0, 2.0), Some(0.25));
        assert_eq!(radial_falloff(2.0, 2.0), None);
        assert_eq!(radial_falloff(0.0, 0.0), None);
        assert_eq!(radial_falloff(0.0, -3.0), None);
    }
}
