use std::path::PathBuf;
use thiserror::Error;

/// Rejected physical parameters. Raised while building a [`Scene`](super::scene::Scene),
/// never during integration.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("black hole radius must be positive and finite, got {0}")]
    InvalidBlackHoleRadius(f32),

    #[error("accretion disk inner radius {inner} must be non-negative and below outer radius {outer}")]
    InvalidDiskRadii { inner: f32, outer: f32 },

    #[error("escape radius {escape} must exceed black hole radius {blackhole}")]
    InvalidEscapeRadius { escape: f32, blackhole: f32 },

    #[error("accretion disk alpha must lie in [0, 1], got {0}")]
    InvalidDiskAlpha(f32),

    #[error("deflection coefficient must be finite and non-negative, got {0}")]
    InvalidDeflection(f32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f32),

    #[error("iteration cap must be at least 1")]
    ZeroMaxSteps,

    #[error("image resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("focal length must be positive, got {0}")]
    InvalidFocalLength(f32),

    #[error("camera position coincides with its look-at target")]
    DegenerateCamera,

    #[error("camera sits {distance} from the hole, not inside the escape radius {escape}")]
    CameraOutsideEscapeRadius { distance: f32, escape: f32 },

    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    Empty(PathBuf),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write image {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "preview")]
    #[error("preview window: {0}")]
    Window(#[from] minifb::Error),
}
