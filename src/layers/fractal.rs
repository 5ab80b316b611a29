//! Multi-octave noise displacement.

use rayon::prelude::*;

use super::{blend_delta, LayerContext};
use crate::grid::HeightGrid;
use crate::noise_source::NoiseSource;
use crate::params::NoiseParams;

fn is_active(params: &NoiseParams) -> bool {
    params.octaves > 0 && params.scale > 0.0 && params.scale.is_finite()
}

/// Fractal sum at a normalized position, normalized back to `[0, 1]`.
///
/// Amplitude starts at 1 and halves per octave; frequency starts at
/// `1 / scale` and doubles per octave.
pub fn fractal_sample(noise: &dyn NoiseSource, nx: f64, ny: f64, scale: f32, octaves: u32) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = 1.0 / scale as f64;
    let mut max_value = 0.0f32;

    for _ in 0..octaves {
        total += noise.sample(nx * frequency, ny * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / max_value
}

#[inline]
fn fractal_delta_unchecked(params: &NoiseParams, ctx: &LayerContext, x: usize, y: usize) -> f32 {
    let res = ctx.mapper.resolution as f64;
    let value = fractal_sample(ctx.noise, x as f64 / res, y as f64 / res, params.scale, params.octaves);
    (value * 2.0 - 1.0) * ctx.mapper.vertical_fraction(params.strength)
}

/// Raw noise displacement for one cell. Zero for a non-positive scale or no octaves.
pub fn fractal_delta(params: &NoiseParams, ctx: &LayerContext, x: usize, y: usize) -> f32 {
    if !is_active(params) {
        return 0.0;
    }
    fractal_delta_unchecked(params, ctx, x, y)
}

/// Blend fractal noise into `grid` in place.
pub fn apply_fractal_noise(grid: &mut HeightGrid, params: &NoiseParams, ctx: &LayerContext) {
    if !is_active(params) {
        return;
    }

    grid.par_rows_mut().for_each(|(y, row)| {
        for (x, h) in row.iter_mut().enumerate() {
            let delta = fractal_delta_unchecked(params, ctx, x, y);
            *h = blend_delta(*h, delta, params.blend_strength);
        }
    });
}
