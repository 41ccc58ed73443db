//! Text-extraction error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while turning an answer image into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The image file does not exist.
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The file extension is not one the OCR engine is fed.
    #[error("unsupported image format: {} (expected png, jpg or jpeg)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The OCR binary could not be started.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR binary exited with a failure status.
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The OCR binary did not finish in time.
    #[error("text extraction timed out after {0}s")]
    Timeout(u64),
}

impl ExtractError {
    /// Returns `true` if the problem is with the input file rather than
    /// the OCR engine.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExtractError::ImageNotFound(_) | ExtractError::UnsupportedFormat(_)
        )
    }
}
