//! Synthetic baselines for the CLI and tests.

use rand::Rng;

use crate::grid::HeightGrid;
use crate::layers::fractal_sample;
use crate::noise_source::PerlinSource;

/// Rolling hills from fBm: heights centered on `base` with roughly `±relief` variation.
pub fn fbm_baseline(resolution: usize, seed: u32, base: f32, relief: f32) -> HeightGrid {
    let noise = PerlinSource::new(seed);
    let mut grid = HeightGrid::new(resolution);
    let res = resolution.max(1) as f64;

    // Scale 0.25 puts four noise cells across the grid
    for (x, y, h) in grid.iter_mut() {
        let v = fractal_sample(&noise, x as f64 / res, y as f64 / res, 0.25, 5);
        *h = base + (v * 2.0 - 1.0) * relief;
    }
    grid
}

/// Uncorrelated heights in `[0, 1)`, for property-style tests.
pub fn random_baseline<R: Rng>(resolution: usize, rng: &mut R) -> HeightGrid {
    let mut grid = HeightGrid::new(resolution);
    for (_, _, h) in grid.iter_mut() {
        *h = rng.gen::<f32>();
    }
    grid
}
