//! Coherent 2D noise sampled by the ripple, flow and fractal layers.

use noise::{NoiseFn, Perlin};

/// Deterministic 2D noise returning values in `[0, 1]`.
///
/// Implementations are pure functions of `(x, y)`: sampling the same point
/// twice must return the same value, and sampling must not mutate state.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f32;
}

/// Lattice period of the `noise` crate's permutation table.
const PERLIN_PERIOD: f64 = 256.0;

/// Gradient noise from the `noise` crate, remapped from `[-1, 1]` to `[0, 1]`.
///
/// Inputs are wrapped into one lattice period before sampling. The field is
/// periodic anyway, and the crate cannot floor coordinates beyond the `isize`
/// range, which high octave counts or tiny scales reach quickly.
#[derive(Clone, Debug)]
pub struct PerlinSource {
    perlin: Perlin,
}

impl PerlinSource {
    pub fn new(seed: u32) -> Self {
        Self { perlin: Perlin::new(seed) }
    }
}

impl Default for PerlinSource {
    fn default() -> Self {
        Self::new(Perlin::DEFAULT_SEED)
    }
}

impl NoiseSource for PerlinSource {
    #[inline]
    fn sample(&self, x: f64, y: f64) -> f32 {
        if !x.is_finite() || !y.is_finite() {
            return 0.5;
        }
        let v = self
            .perlin
            .get([x.rem_euclid(PERLIN_PERIOD), y.rem_euclid(PERLIN_PERIOD)]);
        ((v * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
    }
}

/// Noise that returns the same value everywhere.
///
/// `ConstantNoise(0.5)` makes ripple jitter and flow variation neutral, which
/// gives closed-form layer output.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNoise(pub f32);

impl NoiseSource for ConstantNoise {
    #[inline]
    fn sample(&self, _x: f64, _y: f64) -> f32 {
        self.0.clamp(0.0, 1.0)
    }
}
