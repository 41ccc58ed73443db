//! OCR adapter that shells out to the `tesseract` binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;

use gradewise_core::traits::TextExtractor;

use crate::error::ExtractError;

/// Image extensions accepted for answer sheets.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Runs `<command> <image> stdout` and returns what it prints.
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    command: String,
    tessdata_prefix: Option<PathBuf>,
    timeout: Duration,
}

impl TesseractExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            tessdata_prefix: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_tessdata_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.tessdata_prefix = Some(prefix.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    async fn run(&self, image: &Path) -> Result<String, ExtractError> {
        check_image(image)?;

        let mut cmd = Command::new(&self.command);
        cmd.arg(image)
            .arg("stdout")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(prefix) = &self.tessdata_prefix {
            cmd.env("TESSDATA_PREFIX", prefix);
        }

        let start = Instant::now();
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout.as_secs()))?
            .map_err(|source| ExtractError::Launch {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!(
            "extracted {} chars from {} in {}ms",
            text.chars().count(),
            image.display(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract(&self, image: &Path) -> anyhow::Result<String> {
        Ok(self.run(image).await?)
    }
}

/// Reject missing files and non-image extensions before launching anything.
pub fn check_image(image: &Path) -> Result<(), ExtractError> {
    let supported = image
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });
    if !supported {
        return Err(ExtractError::UnsupportedFormat(image.to_path_buf()));
    }
    if !image.is_file() {
        return Err(ExtractError::ImageNotFound(image.to_path_buf()));
    }
    Ok(())
}
