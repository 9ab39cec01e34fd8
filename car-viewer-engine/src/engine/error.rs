use bevy::render::render_resource::TextureFormat;

use crate::engine::loading::asset_events::AssetKind;

/// Error types for viewer asset and configuration handling.
#[derive(Debug, Clone)]
pub enum ViewerError {
    AssetLoad {
        kind: AssetKind,
        path: String,
        reason: String,
    },
    UnsupportedEnvironmentFormat(TextureFormat),
    MissingImageData,
    ImageSizeMismatch {
        expected: usize,
        actual: usize,
    },
    InvalidConfig(String),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::AssetLoad { kind, path, reason } => {
                write!(f, "Failed to load {} '{}': {}", kind, path, reason)
            }
            ViewerError::UnsupportedEnvironmentFormat(format) => {
                write!(f, "Environment image must be Rgba32Float, got {:?}", format)
            }
            ViewerError::MissingImageData => write!(f, "Image has no CPU-side pixel data"),
            ViewerError::ImageSizeMismatch { expected, actual } => write!(
                f,
                "Image data holds {} floats, expected {}",
                actual, expected
            ),
            ViewerError::InvalidConfig(message) => write!(f, "Invalid viewer config: {}", message),
        }
    }
}

impl std::error::Error for ViewerError {}
