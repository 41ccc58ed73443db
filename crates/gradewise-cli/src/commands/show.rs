//! The `gradewise show` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use gradewise_core::store::{ResultStore, ResultTable, COLUMNS};
use gradewise_io::config::load_config_from;

/// Answers longer than this are cut in the table view.
const PREVIEW_CHARS: usize = 40;

pub fn execute(dataset: Option<PathBuf>, format: String, config: Option<PathBuf>) -> Result<()> {
    let path = match dataset {
        Some(path) => path,
        None => load_config_from(config.as_deref())?.dataset_path()?,
    };

    if !path.exists() {
        anyhow::bail!("no dataset at {}; run `gradewise evaluate` first", path.display());
    }

    let store = ResultStore::new(&path);
    let table = store
        .load(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    match format.as_str() {
        "table" => print_table(&table),
        "json" => println!("{}", serde_json::to_string_pretty(table.rows())?),
        other => anyhow::bail!("unknown format '{other}': expected table or json"),
    }

    Ok(())
}

fn print_table(results: &ResultTable) {
    if results.is_empty() {
        println!("No evaluations recorded yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(COLUMNS.to_vec());

    for row in results.rows() {
        table.add_row(vec![
            Cell::new(&row.student_name),
            Cell::new(&row.subject_name),
            Cell::new(preview(&row.reference_text)),
            Cell::new(preview(&row.candidate_text)),
            Cell::new(format!("{:.2}", row.score)),
            Cell::new(row.grade),
        ]);
    }

    println!("{table}");
    println!("{} evaluation(s)", results.len());
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    }
}
