//! Error types for I/O operations.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or corrupted file.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Unsupported bit depth.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Valid file using a feature this crate does not handle.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Decoded dimensions could not back a pixel buffer.
    #[error(transparent)]
    Core(#[from] convkit_core::Error),
}

impl IoError {
    /// Maps a short read to [`IoError::InvalidFile`], keeping other I/O errors.
    pub(crate) fn truncated(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            IoError::InvalidFile(format!("truncated {what}"))
        } else {
            IoError::Io(err)
        }
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
