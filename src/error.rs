use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;

/// Everything that can make a render fail
#[derive(Debug, Error)]
pub enum MeterError {
    /// The output file could not be created or written
    #[error("cannot write meter image to {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The canvas could not be encoded as PNG
    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    /// The configured range cannot be mapped onto the scale
    #[error("invalid meter configuration: {0}")]
    Configuration(String),

    /// The label format pattern is unusable
    #[error("invalid label format: {0}")]
    Format(#[from] FormatError),
}

pub type Result<T, E = MeterError> = std::result::Result<T, E>;
