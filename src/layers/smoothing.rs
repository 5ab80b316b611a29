//! Radius smoothing: iterated 3×3 box blur weighted by a radial falloff.
//!
//! Each pass reads only the previous pass's frozen buffer and writes a second
//! buffer, then the two are swapped. Updating in place would let cells already
//! blurred in this pass leak into their neighbors' averages.

use rayon::prelude::*;

use super::{cell_distance, lerp, radial_falloff, LayerContext};
use crate::grid::HeightGrid;
use crate::params::SmoothingParams;

/// One blur pass from `current` into `next`. Border cells are copied unchanged.
fn smoothing_pass(
    current: &HeightGrid,
    next: &mut HeightGrid,
    center: (f32, f32),
    radius: f32,
    strength: f32,
) {
    let res = current.resolution;

    next.par_rows_mut().for_each(|(y, row)| {
        for (x, h) in row.iter_mut().enumerate() {
            let value = current.get(x, y);
            let interior = x > 0 && y > 0 && x + 1 < res && y + 1 < res;
            *h = match radial_falloff(cell_distance(x, y, center), radius) {
                Some(falloff) if interior => {
                    lerp(value, current.box_average(x, y), strength * falloff)
                }
                _ => value,
            };
        }
    });
}

/// Smooth `grid` inside the configured radius.
pub fn apply_radius_smoothing(grid: &mut HeightGrid, params: &SmoothingParams, ctx: &LayerContext) {
    let center = ctx.mapper.normalized_to_grid_index(params.center);
    let radius = ctx.mapper.world_to_grid_distance(params.radius);

    let mut current = grid.clone();
    let mut next = grid.clone();
    for _ in 0..params.iterations {
        smoothing_pass(&current, &mut next, center, radius, params.blend_strength);
        std::mem::swap(&mut current, &mut next);
    }
    *grid = current;
}
