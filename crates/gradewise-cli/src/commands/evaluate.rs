//! The `gradewise evaluate` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use gradewise_core::model::{Document, EvaluationRecord, EvaluationRequest};
use gradewise_core::store::ResultStore;
use gradewise_core::traits::TextExtractor;
use gradewise_core::{EvalError, Evaluation, Evaluator};
use gradewise_io::config::load_config_from;
use gradewise_io::{load_candidate, load_reference};

pub struct EvaluateArgs {
    pub student: String,
    pub subject: String,
    pub reference: Option<PathBuf>,
    pub answer_image: Option<PathBuf>,
    pub answer_text: Option<PathBuf>,
    pub dataset_dir: Option<PathBuf>,
    pub no_open: bool,
    pub format: String,
    pub config: Option<PathBuf>,
}

/// JSON shape printed with `--format json`.
#[derive(Serialize)]
struct EvaluationOutput<'a> {
    record: &'a EvaluationRecord,
    saved_to: &'a std::path::Path,
    fallback_reason: Option<String>,
    viewer_error: Option<String>,
}

pub async fn execute(args: EvaluateArgs) -> Result<()> {
    anyhow::ensure!(
        matches!(args.format.as_str(), "text" | "json"),
        "unknown format '{}': expected text or json",
        args.format
    );

    let config = load_config_from(args.config.as_deref())?;

    let reference = args
        .reference
        .as_deref()
        .map(load_reference)
        .transpose()?;

    let candidate = match (&args.answer_image, &args.answer_text) {
        (Some(image), _) => {
            let extractor = config.extractor();
            tracing::info!("extracting text from {} with {}", image.display(), extractor.name());
            Some(Document::candidate(extractor.extract(image).await?))
        }
        (None, Some(text)) => Some(load_candidate(text)?),
        (None, None) => None,
    };

    let store = match &args.dataset_dir {
        Some(dir) => ResultStore::in_dir(dir),
        None => ResultStore::new(config.dataset_path()?),
    };

    let mut evaluator = Evaluator::new(store);
    if config.open_after_save && !args.no_open {
        evaluator = evaluator.with_viewer(Box::new(config.viewer()));
    }

    let request = EvaluationRequest {
        student_name: args.student,
        subject_name: args.subject,
        reference,
        candidate,
    };

    let evaluation = match evaluator.evaluate(request) {
        Ok(evaluation) => evaluation,
        Err(EvalError::NotSaved { record, source }) => {
            anyhow::bail!(
                "evaluated {} ({}, {}) but the result was not saved: {source}",
                record.student_name(),
                record.score(),
                record.grade()
            );
        }
        Err(e) => return Err(e.into()),
    };

    if args.format == "json" {
        print_json(&evaluation)?;
    } else {
        print_text(&evaluation);
    }

    Ok(())
}

fn print_text(evaluation: &Evaluation) {
    let record = &evaluation.record;
    println!("Student: {}", record.student_name());
    println!("Subject: {}", record.subject_name());
    println!("Score: {}", record.score());
    println!("Grade: {}", record.grade());

    if let Some(diversion) = &evaluation.location.diversion {
        eprintln!("Warning: {diversion}; saved to a fallback file instead.");
    }
    println!("Results saved to: {}", evaluation.location.path.display());

    if let Some(e) = &evaluation.viewer_error {
        eprintln!("Warning: {e}");
    }
}

fn print_json(evaluation: &Evaluation) -> Result<()> {
    let output = EvaluationOutput {
        record: &evaluation.record,
        saved_to: &evaluation.location.path,
        fallback_reason: evaluation
            .location
            .diversion
            .as_ref()
            .map(|d| d.to_string()),
        viewer_error: evaluation.viewer_error.as_ref().map(|e| e.to_string()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
