//! Test doubles for the OCR engine and the file viewer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gradewise_core::error::ViewerError;
use gradewise_core::traits::{FileViewer, TextExtractor};

/// An extractor that returns canned text instead of running OCR.
///
/// Responses are chosen by file name; anything unmatched gets the default.
pub struct MockExtractor {
    /// Map of file name → extracted text.
    responses: HashMap<String, String>,
    /// Text returned when no file name matches.
    default_text: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last image path received.
    last_image: Mutex<Option<PathBuf>>,
}

impl MockExtractor {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_text: String::new(),
            call_count: AtomicU32::new(0),
            last_image: Mutex::new(None),
        }
    }

    /// A mock that always returns the same text.
    pub fn with_fixed_text(text: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_text: text.to_string(),
            call_count: AtomicU32::new(0),
            last_image: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_image(&self) -> Option<PathBuf> {
        self.last_image
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, image: &Path) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_image
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(image.to_path_buf());

        let key = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.default_text.clone()))
    }
}

/// A viewer that remembers what it was asked to open.
#[derive(Clone, Default)]
pub struct RecordingViewer {
    opened: Arc<Mutex<Vec<PathBuf>>>,
    failure: Option<String>,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewer that records the request and then fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            opened: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    /// Paths opened so far, in order. Clones share the same log.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl FileViewer for RecordingViewer {
    fn open_in_default_viewer(&self, path: &Path) -> Result<(), ViewerError> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.to_path_buf());
        match &self.failure {
            Some(message) => Err(ViewerError {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}
