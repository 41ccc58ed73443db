//! gradewise-io: Configuration, OCR, and desktop integrations.
//!
//! Implements the `TextExtractor` and `FileViewer` traits from
//! `gradewise-core` against real programs (`tesseract`, `xdg-open`, ...),
//! loads answer text files, and reads the gradewise config file.

pub mod config;
pub mod error;
pub mod loader;
pub mod mock;
pub mod ocr;
pub mod viewer;

pub use config::{load_config, load_config_from, GradewiseConfig};
pub use error::ExtractError;
pub use loader::{load_candidate, load_reference};
pub use ocr::TesseractExtractor;
pub use viewer::{OpenStrategy, SystemViewer};
