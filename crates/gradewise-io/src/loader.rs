//! Loading answers from plain-text files.

use std::path::Path;

use anyhow::{Context, Result};

use gradewise_core::model::{Document, Role};

/// Read a UTF-8 text file as the reference answer.
pub fn load_reference(path: &Path) -> Result<Document> {
    load_text(path, Role::Reference)
}

/// Read a UTF-8 text file as an already-transcribed student answer.
pub fn load_candidate(path: &Path) -> Result<Document> {
    load_text(path, Role::Candidate)
}

fn load_text(path: &Path, role: Role) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {role} answer from {}", path.display()))?;
    tracing::debug!("loaded {role} answer ({} bytes) from {}", text.len(), path.display());
    Ok(Document::new(role, text))
}
