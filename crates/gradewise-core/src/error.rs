//! Error types for the evaluation pipeline.
//!
//! The split mirrors what a caller needs to decide: a `Validation` error means
//! nothing was evaluated, `NotSaved` means a record was computed but could not
//! reach any dataset file. Store-level corruption and lock conditions are
//! recovered inside the store and only show up as a [`Diversion`].
//!
//! [`Diversion`]: crate::store::Diversion

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::EvaluationRecord;

/// A required input that was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    ReferenceAnswer,
    StudentAnswer,
    StudentName,
    SubjectName,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInput::ReferenceAnswer => write!(f, "reference answer"),
            MissingInput::StudentAnswer => write!(f, "student answer"),
            MissingInput::StudentName => write!(f, "student name"),
            MissingInput::SubjectName => write!(f, "subject name"),
        }
    }
}

/// Errors returned by [`Evaluator::evaluate`](crate::engine::Evaluator::evaluate).
#[derive(Debug, Error)]
pub enum EvalError {
    /// A precondition failed before any scoring work was done.
    #[error("missing required input: {0}")]
    Validation(MissingInput),

    /// The answer was scored and graded, but no dataset file accepted it.
    #[error("evaluated but not saved: {source}")]
    NotSaved {
        record: Box<EvaluationRecord>,
        #[source]
        source: StoreError,
    },
}

impl EvalError {
    /// The computed record, if the failure happened after scoring.
    pub fn record(&self) -> Option<&EvaluationRecord> {
        match self {
            EvalError::Validation(_) => None,
            EvalError::NotSaved { record, .. } => Some(record),
        }
    }
}

/// Errors raised while reading or writing a result dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dataset exists but could not be parsed or read.
    #[error("dataset {} is unreadable: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The dataset could not be written because of a permission failure,
    /// typically because another program holds the file open.
    #[error("dataset {} is locked: {source}", path.display())]
    Locked {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table could not be serialized.
    #[error("failed to encode dataset: {0}")]
    Encode(String),
}

impl StoreError {
    /// Classify an I/O error raised while writing `path`.
    pub fn from_write(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            StoreError::Locked { path, source }
        } else {
            StoreError::Io { path, source }
        }
    }

    /// Returns `true` if the write can be retried at a fallback path.
    pub fn is_locked(&self) -> bool {
        matches!(self, StoreError::Locked { .. })
    }
}

/// The platform could not open a file in its default viewer.
#[derive(Debug, Error)]
#[error("could not open {} in the default viewer: {message}", path.display())]
pub struct ViewerError {
    pub path: PathBuf,
    pub message: String,
}
