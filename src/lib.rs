//! Layered heightfield deformation library
//!
//! Composes radial ripple, directional flow, fractal noise and radius
//! smoothing over an immutable baseline grid. Re-exports modules for use by
//! binaries and hosts.

pub mod clock;
pub mod controller;
pub mod error;
pub mod export;
pub mod extents;
pub mod grid;
pub mod layers;
pub mod noise_source;
pub mod params;
pub mod pipeline;
pub mod synthetic;

pub use clock::AnimationClock;
pub use controller::{MemorySurface, TerrainController, TerrainSurface};
pub use error::DeformError;
pub use extents::{GridExtentMapper, TerrainExtents};
pub use grid::HeightGrid;
pub use noise_source::{ConstantNoise, NoiseSource, PerlinSource};
pub use params::{DeformConfig, DeformPreset, FlowParams, NoiseParams, RippleParams, SmoothingParams};
pub use pipeline::{BaselineStore, DeformationPipeline};
