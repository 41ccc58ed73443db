//! gradewise-core: Answer scoring, grading, and result persistence.
//!
//! This crate holds the evaluation pipeline: text normalization, TF-IDF
//! similarity, grade classification, the append-only result store, and the
//! orchestrator that ties them together. OCR and file viewing are reached
//! through the traits in [`traits`].

pub mod engine;
pub mod error;
pub mod grade;
pub mod model;
pub mod normalize;
pub mod similarity;
pub mod store;
pub mod traits;

pub use engine::{Evaluation, Evaluator};
pub use error::{EvalError, MissingInput, StoreError, ViewerError};
pub use grade::{classify, Grade};
pub use model::{Document, EvaluationRecord, EvaluationRequest, Role, SimilarityScore};
pub use store::{PersistedLocation, ResultStore};
