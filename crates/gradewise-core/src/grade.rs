//! Grade classification from similarity scores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::SimilarityScore;

/// Discrete grade derived from a similarity score, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Good,
    Average,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

/// Exclusive lower bounds, checked top to bottom. A score equal to a bound
/// falls into the next band down.
pub const THRESHOLDS: [(f64, Grade); 4] = [
    (90.0, Grade::Excellent),
    (75.0, Grade::Good),
    (50.0, Grade::Average),
    (30.0, Grade::Poor),
];

/// Map a similarity percentage to a grade.
pub fn classify(score: SimilarityScore) -> Grade {
    classify_percent(score.value())
}

/// Map a raw percentage to a grade. Out-of-range values land in the
/// nearest band; NaN is Very Poor.
pub fn classify_percent(percent: f64) -> Grade {
    THRESHOLDS
        .iter()
        .find(|(bound, _)| percent > *bound)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::VeryPoor)
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excellent => write!(f, "Excellent"),
            Grade::Good => write!(f, "Good"),
            Grade::Average => write!(f, "Average"),
            Grade::Poor => write!(f, "Poor"),
            Grade::VeryPoor => write!(f, "Very Poor"),
        }
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(Grade::Excellent),
            "good" => Ok(Grade::Good),
            "average" => Ok(Grade::Average),
            "poor" => Ok(Grade::Poor),
            "very poor" | "very_poor" | "verypoor" => Ok(Grade::VeryPoor),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}
