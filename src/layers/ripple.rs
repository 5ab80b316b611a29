//! Radial ripple: concentric sine rings fading out toward a hard radius.

use std::f32::consts::TAU;

use rayon::prelude::*;

use super::{blend_delta, cell_distance, lerp, radial_falloff, LayerContext};
use crate::grid::HeightGrid;
use crate::params::RippleParams;

/// Jitter sampling scale, in cells
const JITTER_SCALE: f64 = 0.1;

/// Raw ripple displacement for one cell, before blending.
/// Zero at or beyond the radius; a non-positive radius never matches a cell.
pub fn ripple_delta(params: &RippleParams, ctx: &LayerContext, x: usize, y: usize) -> f32 {
    let center = ctx.mapper.normalized_to_grid_index(params.center);
    let radius = ctx.mapper.world_to_grid_distance(params.radius);
    ripple_delta_at(params, ctx, center, radius, x, y).unwrap_or(0.0)
}

/// `None` at or beyond the radius.
#[inline]
fn ripple_delta_at(
    params: &RippleParams,
    ctx: &LayerContext,
    center: (f32, f32),
    radius: f32,
    x: usize,
    y: usize,
) -> Option<f32> {
    let distance = cell_distance(x, y, center);
    let falloff = radial_falloff(distance, radius)?;
    let t = distance / radius;

    let wave = (t * params.count as f32 * TAU * params.frequency).sin();

    // Noise breaks up perfect circles
    let jitter = ctx.noise.sample(x as f64 * JITTER_SCALE, y as f64 * JITTER_SCALE) * 2.0 - 1.0;
    let wave = lerp(wave, wave * jitter, params.noise_amount);

    Some(wave * falloff * ctx.mapper.vertical_fraction(params.amplitude))
}

/// Blend the ripple into `grid` in place. Cells outside the radius are left untouched.
pub fn apply_radial_ripple(grid: &mut HeightGrid, params: &RippleParams, ctx: &LayerContext) {
    let center = ctx.mapper.normalized_to_grid_index(params.center);
    let radius = ctx.mapper.world_to_grid_distance(params.radius);

    grid.par_rows_mut().for_each(|(y, row)| {
        for (x, h) in row.iter_mut().enumerate() {
            if let Some(delta) = ripple_delta_at(params, ctx, center, radius, x, y) {
                *h = blend_delta(*h, delta, params.blend_strength);
            }
        }
    });
}
