//! Deformation layer parameters and configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DeformError;

/// Deformation intensity preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeformPreset {
    /// No deformation - baseline passes through
    None,
    /// Low amplitudes, light blending
    Subtle,
    /// Balanced ripple, flow and noise
    #[default]
    Default,
    /// Tall ripples, strong flow and smoothing
    Dramatic,
}

impl DeformPreset {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Subtle, Self::Default, Self::Dramatic]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No deformation (baseline only)",
            Self::Subtle => "Gentle ripples and noise",
            Self::Default => "Balanced ripple, flow and noise",
            Self::Dramatic => "Tall ripples, strong flow, smoothed center",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.to_string() == name.to_ascii_lowercase())
    }

    pub fn config(&self) -> DeformConfig {
        match self {
            Self::None => DeformConfig::disabled(),
            Self::Default => DeformConfig::default(),
            Self::Subtle => {
                let mut config = DeformConfig::default();
                config.ripple.amplitude = 0.5;
                config.ripple.blend_strength = 0.25;
                config.flow.enabled = false;
                config.noise.strength = 0.5;
                config.noise.blend_strength = 0.25;
                config
            }
            Self::Dramatic => {
                let mut config = DeformConfig::default();
                config.ripple.amplitude = 6.0;
                config.ripple.blend_strength = 0.9;
                config.ripple.noise_amount = 0.5;
                config.flow.amplitude = 4.0;
                config.flow.blend_strength = 0.6;
                config.noise.octaves = 4;
                config.noise.strength = 3.0;
                config.smoothing.enabled = true;
                config.smoothing.iterations = 5;
                config
            }
        }
    }
}

impl std::fmt::Display for DeformPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Subtle => write!(f, "subtle"),
            Self::Default => write!(f, "default"),
            Self::Dramatic => write!(f, "dramatic"),
        }
    }
}

/// Concentric waves around a center point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleParams {
    pub enabled: bool,
    /// Normalized (0-1) position, `(x, z)`
    pub center: (f32, f32),
    /// Radius in world units; cells at or beyond it are untouched
    pub radius: f32,
    /// Number of wave crests between center and edge
    pub count: u32,
    /// Peak displacement in world units
    pub amplitude: f32,
    /// Multiplier on the crest count
    pub frequency: f32,
    /// How much noise breaks up the rings (0.0-1.0)
    pub noise_amount: f32,
    pub blend_strength: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            enabled: true,
            center: (0.5, 0.5),
            radius: 100.0,
            count: 12,
            amplitude: 2.0,
            frequency: 1.0,
            noise_amount: 0.2,
            blend_strength: 0.5,
        }
    }
}

/// Parallel waves travelling along a direction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    pub enabled: bool,
    /// Any nonzero 2D vector; normalized before use
    pub direction: (f32, f32),
    /// Crest spacing in world units
    pub wavelength: f32,
    pub amplitude: f32,
    pub blend_strength: f32,
    /// Phase follows the animation clock when set
    pub animate: bool,
    /// Clock units per second of host time
    pub animation_speed: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: (1.0, 0.0),
            wavelength: 20.0,
            amplitude: 1.5,
            blend_strength: 0.3,
            animate: false,
            animation_speed: 0.5,
        }
    }
}

/// Multi-octave noise displacement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub enabled: bool,
    /// Feature size; the first octave samples at `1 / scale`
    pub scale: f32,
    /// Peak displacement in world units
    pub strength: f32,
    /// Octave count (1-4 recommended, not clamped)
    pub octaves: u32,
    pub blend_strength: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 50.0,
            strength: 1.0,
            octaves: 3,
            blend_strength: 0.4,
        }
    }
}

/// Iterated box blur inside a radius
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    pub enabled: bool,
    /// Normalized (0-1) position, `(x, z)`
    pub center: (f32, f32),
    /// Radius in world units
    pub radius: f32,
    /// Blur passes (1-10 recommended)
    pub iterations: u32,
    pub blend_strength: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            enabled: false,
            center: (0.5, 0.5),
            radius: 50.0,
            iterations: 3,
            blend_strength: 0.5,
        }
    }
}

/// Complete layer configuration passed to each recompute.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformConfig {
    pub ripple: RippleParams,
    pub flow: FlowParams,
    pub noise: NoiseParams,
    pub smoothing: SmoothingParams,
}

impl DeformConfig {
    /// All layers off. Recomputing with this reproduces the baseline.
    pub fn disabled() -> Self {
        let mut config = Self::default();
        config.ripple.enabled = false;
        config.flow.enabled = false;
        config.noise.enabled = false;
        config.smoothing.enabled = false;
        config
    }

    pub fn any_enabled(&self) -> bool {
        self.ripple.enabled || self.flow.enabled || self.noise.enabled || self.smoothing.enabled
    }

    /// True when the flow phase should follow the animation clock.
    pub fn flow_animated(&self) -> bool {
        self.flow.enabled && self.flow.animate
    }

    pub fn from_json(json: &str) -> Result<Self, DeformError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DeformError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DeformError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DeformError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Parameters outside their recommended ranges. Nothing is clamped; the
    /// layers treat degenerate values as no-ops.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut check_blend = |layer: &str, value: f32| {
            if !(0.0..=1.0).contains(&value) {
                warnings.push(format!("{} blend strength {} outside 0-1", layer, value));
            }
        };
        check_blend("ripple", self.ripple.blend_strength);
        check_blend("flow", self.flow.blend_strength);
        check_blend("noise", self.noise.blend_strength);
        check_blend("smoothing", self.smoothing.blend_strength);

        if self.ripple.enabled && self.ripple.count == 0 {
            warnings.push("ripple count is 0; ripple has no waves".to_string());
        }
        if !(0.0..=1.0).contains(&self.ripple.noise_amount) {
            warnings.push(format!("ripple noise amount {} outside 0-1", self.ripple.noise_amount));
        }
        if self.flow.enabled {
            let (dx, dy) = self.flow.direction;
            if dx == 0.0 && dy == 0.0 {
                warnings.push("flow direction is zero; flow layer disabled".to_string());
            }
            if self.flow.wavelength <= 0.0 {
                warnings.push(format!("flow wavelength {} must be positive; flow layer disabled", self.flow.wavelength));
            }
        }
        if self.noise.enabled {
            if self.noise.scale <= 0.0 {
                warnings.push(format!("noise scale {} must be positive; noise layer disabled", self.noise.scale));
            }
            if !(1..=4).contains(&self.noise.octaves) {
                warnings.push(format!("noise octaves {} outside recommended 1-4", self.noise.octaves));
            }
        }
        if self.smoothing.enabled && !(1..=10).contains(&self.smoothing.iterations) {
            warnings.push(format!(
                "smoothing iterations {} outside recommended 1-10",
                self.smoothing.iterations
            ));
        }
        warnings
    }
}
