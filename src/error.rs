//! Errors raised by the deformation engine and its host bindings.

/// Errors that can occur while capturing, deforming, or exporting a heightfield.
#[derive(Debug)]
pub enum DeformError {
    /// `recompute()` was called before a baseline was captured.
    /// Hosts treat this as "nothing to write yet", not as a failure.
    NotReady,
    /// A grid's resolution differs from the captured baseline.
    DimensionMismatch { expected: usize, found: usize },
    /// A grid or image that is not N×N.
    NotSquare { width: usize, height: usize },
    /// World size with a non-positive or non-finite component.
    InvalidExtents(String),
    /// Configuration parse or serialization error.
    Config(String),
    /// IO error (file not found, permissions, etc.)
    Io(std::io::Error),
    /// Image encode/decode error.
    Image(image::ImageError),
}

impl DeformError {
    pub fn is_not_ready(&self) -> bool {
        matches!(self, DeformError::NotReady)
    }
}

impl std::fmt::Display for DeformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeformError::NotReady => write!(f, "Baseline not captured yet"),
            DeformError::DimensionMismatch { expected, found } => write!(
                f,
                "Grid resolution {}x{} does not match baseline {}x{}",
                found, found, expected, expected
            ),
            DeformError::NotSquare { width, height } => {
                write!(f, "Heightfield must be square, got {}x{}", width, height)
            }
            DeformError::InvalidExtents(msg) => write!(f, "Invalid terrain extents: {}", msg),
            DeformError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DeformError::Io(e) => write!(f, "IO error: {}", e),
            DeformError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for DeformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeformError::Io(e) => Some(e),
            DeformError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeformError {
    fn from(e: std::io::Error) -> Self {
        DeformError::Io(e)
    }
}

impl From<image::ImageError> for DeformError {
    fn from(e: image::ImageError) -> Self {
        DeformError::Image(e)
    }
}

impl From<serde_json::Error> for DeformError {
    fn from(e: serde_json::Error) -> Self {
        DeformError::Config(e.to_string())
    }
}
