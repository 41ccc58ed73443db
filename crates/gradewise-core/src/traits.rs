//! Collaborator traits for text extraction and file viewing.
//!
//! The evaluation pipeline never talks to an OCR engine or the desktop shell
//! directly. `gradewise-io` provides the real implementations.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ViewerError;

// ---------------------------------------------------------------------------
// Text extraction
// ---------------------------------------------------------------------------

/// Turns a scanned answer sheet into plain text.
///
/// Output is best-effort and untrusted; callers normalize it before scoring.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Human-readable engine name (e.g. "tesseract").
    fn name(&self) -> &str;

    /// Extract text from the image at `image`.
    async fn extract(&self, image: &Path) -> anyhow::Result<String>;
}

// ---------------------------------------------------------------------------
// File viewer
// ---------------------------------------------------------------------------

/// Opens a file with whatever the platform considers its default viewer.
pub trait FileViewer: Send + Sync {
    fn open_in_default_viewer(&self, path: &Path) -> Result<(), ViewerError>;
}
