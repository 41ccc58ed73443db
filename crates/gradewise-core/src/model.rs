//! Core data model types for gradewise.
//!
//! These are the values that flow through one evaluation: the two documents
//! being compared, the similarity score, and the record that gets persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grade::Grade;

/// Which side of the comparison a document is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reference,
    Candidate,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reference => write!(f, "reference"),
            Role::Candidate => write!(f, "candidate"),
        }
    }
}

/// An immutable unit of text being compared.
///
/// Empty text is valid and scores 0 against anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    role: Role,
    text: String,
}

impl Document {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// A reference (model) answer.
    pub fn reference(text: impl Into<String>) -> Self {
        Self::new(Role::Reference, text)
    }

    /// A candidate (student) answer.
    pub fn candidate(text: impl Into<String>) -> Self {
        Self::new(Role::Candidate, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Percentage lexical similarity between two documents, always in `[0, 100]`.
///
/// Deserialized values go through [`SimilarityScore::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Build a score, clamping into range. NaN becomes 0.
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self(Self::MIN);
        }
        Self(percent.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for SimilarityScore {
    fn from(percent: f64) -> Self {
        Self::new(percent)
    }
}

impl From<SimilarityScore> for f64 {
    fn from(score: SimilarityScore) -> Self {
        score.0
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// One completed evaluation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    student_name: String,
    subject_name: String,
    reference_text: String,
    candidate_text: String,
    score: SimilarityScore,
    grade: Grade,
}

impl EvaluationRecord {
    pub fn new(
        student_name: impl Into<String>,
        subject_name: impl Into<String>,
        reference_text: impl Into<String>,
        candidate_text: impl Into<String>,
        score: SimilarityScore,
        grade: Grade,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            subject_name: subject_name.into(),
            reference_text: reference_text.into(),
            candidate_text: candidate_text.into(),
            score,
            grade,
        }
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn candidate_text(&self) -> &str {
        &self.candidate_text
    }

    pub fn score(&self) -> SimilarityScore {
        self.score
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }
}

/// Input to a single evaluation.
///
/// Documents are optional so that "not uploaded" is distinguishable from
/// "uploaded but empty".
#[derive(Debug, Clone, Default)]
pub struct EvaluationRequest {
    pub student_name: String,
    pub subject_name: String,
    pub reference: Option<Document>,
    pub candidate: Option<Document>,
}

impl EvaluationRequest {
    pub fn new(student_name: impl Into<String>, subject_name: impl Into<String>) -> Self {
        Self {
            student_name: student_name.into(),
            subject_name: subject_name.into(),
            reference: None,
            candidate: None,
        }
    }

    pub fn with_reference(mut self, text: impl Into<String>) -> Self {
        self.reference = Some(Document::reference(text));
        self
    }

    pub fn with_candidate(mut self, text: impl Into<String>) -> Self {
        self.candidate = Some(Document::candidate(text));
        self
    }
}
