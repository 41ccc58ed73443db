//! Evaluation orchestrator.
//!
//! Validates a request, scores and grades the answer, persists the record,
//! and asks the viewer to open the saved dataset.

use crate::error::{EvalError, MissingInput, ViewerError};
use crate::grade::{classify, Grade};
use crate::model::{Document, EvaluationRecord, EvaluationRequest, SimilarityScore};
use crate::normalize::normalize;
use crate::similarity;
use crate::store::{PersistedLocation, ResultStore};
use crate::traits::FileViewer;

/// Outcome of a successful evaluation.
#[derive(Debug)]
pub struct Evaluation {
    /// The record that was persisted.
    pub record: EvaluationRecord,
    /// Where it was persisted.
    pub location: PersistedLocation,
    /// Set when the dataset was saved but could not be opened.
    pub viewer_error: Option<ViewerError>,
}

impl Evaluation {
    pub fn score(&self) -> SimilarityScore {
        self.record.score()
    }

    pub fn grade(&self) -> Grade {
        self.record.grade()
    }
}

/// Runs evaluations one at a time against a single result store.
pub struct Evaluator {
    store: ResultStore,
    viewer: Option<Box<dyn FileViewer>>,
}

impl Evaluator {
    pub fn new(store: ResultStore) -> Self {
        Self {
            store,
            viewer: None,
        }
    }

    /// Open the dataset after every successful save.
    pub fn with_viewer(mut self, viewer: Box<dyn FileViewer>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Evaluate one answer and persist the result.
    ///
    /// Validation happens before any scoring, so an `EvalError::Validation`
    /// guarantees nothing was written.
    pub fn evaluate(&mut self, request: EvaluationRequest) -> Result<Evaluation, EvalError> {
        let (reference, candidate, student_name, subject_name) = validate(&request)?;

        let reference = Document::reference(normalize(reference.text()));
        let candidate = Document::candidate(normalize(candidate.text()));

        let score = similarity::score(&reference, &candidate);
        let grade = classify(score);
        tracing::debug!(
            student = student_name,
            subject = subject_name,
            score = score.value(),
            %grade,
            "graded answer"
        );

        let record = EvaluationRecord::new(
            student_name,
            subject_name,
            reference.text(),
            candidate.text(),
            score,
            grade,
        );

        let location = match self.store.append(&record) {
            Ok(location) => location,
            Err(source) => {
                tracing::error!("evaluation for {student_name} was not saved: {source}");
                return Err(EvalError::NotSaved {
                    record: Box::new(record),
                    source,
                });
            }
        };

        if let Some(diversion) = &location.diversion {
            tracing::warn!("saved to fallback {}: {diversion}", location.path.display());
        }

        let viewer_error = match &self.viewer {
            Some(viewer) => match viewer.open_in_default_viewer(&location.path) {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!("{e}");
                    Some(e)
                }
            },
            None => None,
        };

        Ok(Evaluation {
            record,
            location,
            viewer_error,
        })
    }
}

/// Check preconditions in a fixed order: documents first, then names.
fn validate(request: &EvaluationRequest) -> Result<(&Document, &Document, &str, &str), EvalError> {
    let reference = request
        .reference
        .as_ref()
        .ok_or(EvalError::Validation(MissingInput::ReferenceAnswer))?;
    let candidate = request
        .candidate
        .as_ref()
        .ok_or(EvalError::Validation(MissingInput::StudentAnswer))?;

    let student_name = request.student_name.trim();
    if student_name.is_empty() {
        return Err(EvalError::Validation(MissingInput::StudentName));
    }
    let subject_name = request.subject_name.trim();
    if subject_name.is_empty() {
        return Err(EvalError::Validation(MissingInput::SubjectName));
    }

    Ok((reference, candidate, student_name, subject_name))
}
