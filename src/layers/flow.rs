//! Directional flow: straight wave fronts moving along a direction vector.

use std::f32::consts::TAU;

use rayon::prelude::*;

use super::{blend_delta, LayerContext};
use crate::grid::HeightGrid;
use crate::params::FlowParams;

/// Frequency of the cross-wave noise, per unit of normalized perpendicular distance
const PERP_NOISE_SCALE: f32 = 5.0;
/// How fast the cross-wave noise drifts with animation time
const PERP_NOISE_DRIFT: f32 = 0.1;
/// Peak crest amplification from the cross-wave noise
const PERP_VARIATION: f32 = 0.5;

/// Unit direction, or `None` for a zero or non-finite vector.
fn unit_direction(direction: (f32, f32)) -> Option<(f32, f32)> {
    let len = (direction.0 * direction.0 + direction.1 * direction.1).sqrt();
    if len > 0.0 && len.is_finite() {
        Some((direction.0 / len, direction.1 / len))
    } else {
        None
    }
}

fn is_active(params: &FlowParams) -> bool {
    params.wavelength > 0.0 && params.wavelength.is_finite()
}

#[inline]
fn flow_delta_with(params: &FlowParams, ctx: &LayerContext, dir: (f32, f32), x: usize, y: usize) -> f32 {
    let res = ctx.mapper.resolution as f32;
    let (fx, fy) = (x as f32, y as f32);

    let along = (fx * dir.0 + fy * dir.1) / res;
    let wave = ((along * ctx.mapper.extents.width / params.wavelength + ctx.time) * TAU).sin();

    let perp = (fx * dir.1 - fy * dir.0) / res;
    let variation = ctx.noise.sample(
        (perp * PERP_NOISE_SCALE) as f64,
        (ctx.time * PERP_NOISE_DRIFT) as f64,
    ) * PERP_VARIATION;

    wave * (1.0 + variation) * ctx.mapper.vertical_fraction(params.amplitude)
}

/// Raw flow displacement for one cell. Zero when the direction is zero or the
/// wavelength is not positive.
pub fn flow_delta(params: &FlowParams, ctx: &LayerContext, x: usize, y: usize) -> f32 {
    match unit_direction(params.direction) {
        Some(dir) if is_active(params) => flow_delta_with(params, ctx, dir, x, y),
        _ => 0.0,
    }
}

/// Blend the flow waves into `grid` in place.
pub fn apply_directional_flow(grid: &mut HeightGrid, params: &FlowParams, ctx: &LayerContext) {
    if !is_active(params) {
        return;
    }
    let Some(dir) = unit_direction(params.direction) else {
        return;
    };

    grid.par_rows_mut().for_each(|(y, row)| {
        for (x, h) in row.iter_mut().enumerate() {
            let delta = flow_delta_with(params, ctx, dir, x, y);
            *h = blend_delta(*h, delta, params.blend_strength);
        }
    });
}
