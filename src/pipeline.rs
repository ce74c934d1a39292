use crate::config::Config;
use crate::data::classify::{classify_columns, clean_label, locate_header};
use crate::data::loader::load_table;
use crate::data::model::{ScoreDataset, ScoreRecord, SourceFile, coerce_numeric};
use crate::data::normalize::{FileFrame, RawRow, TotalCell, normalize};
use crate::error::SkipReason;

// ---------------------------------------------------------------------------
// Per-file outcome report
// ---------------------------------------------------------------------------

/// Outcome of processing one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Loaded { rows: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: FileOutcome,
}

// ---------------------------------------------------------------------------
// BatchOutput – everything handed to the rendering layer
// ---------------------------------------------------------------------------

/// The unified dataset (when any file yielded records) plus one report per
/// input file. The rendering layer decides how to surface skip reasons.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutput {
    /// `None` is the distinguished no-data state: zero files yielded
    /// records, so the consumer should show first-use guidance instead of
    /// charts.
    pub dataset: Option<ScoreDataset>,
    pub reports: Vec<FileReport>,
}

impl BatchOutput {
    /// Whether the batch produced no usable records.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_none()
    }
}

// ---------------------------------------------------------------------------
// Batch aggregator
// ---------------------------------------------------------------------------

/// Fold a batch of uploaded files into one unified dataset.
///
/// Each file is processed to completion or reported-and-skipped; a failure
/// on one file never aborts the batch. Record order is file order, then
/// row order within the file.
pub fn run_batch(files: &[SourceFile], config: &Config) -> BatchOutput {
    let mut frames: Vec<FileFrame> = Vec::new();
    let mut reports: Vec<FileReport> = Vec::with_capacity(files.len());
    let mut subjects: Vec<String> = Vec::new();

    for file in files {
        match process_file(file, config) {
            Ok(frame) => {
                log::info!(
                    "{}: {} rows, {} subject columns",
                    file.name,
                    frame.rows.len(),
                    frame.subjects.len()
                );
                for label in &frame.subjects {
                    if !subjects.contains(label) {
                        subjects.push(label.clone());
                    }
                }
                reports.push(FileReport {
                    file_name: file.name.clone(),
                    outcome: FileOutcome::Loaded {
                        rows: frame.rows.len(),
                    },
                });
                frames.push(frame);
            }
            Err(reason) => {
                log::warn!("skipping {}: {reason}", file.name);
                reports.push(FileReport {
                    file_name: file.name.clone(),
                    outcome: FileOutcome::Skipped(reason),
                });
            }
        }
    }

    let mut records: Vec<ScoreRecord> = Vec::new();
    for frame in &frames {
        for row in &frame.rows {
            records.push(coerce_row(row, &frame.exam));
        }
    }

    let dataset = if records.is_empty() {
        None
    } else {
        Some(ScoreDataset::new(records, subjects))
    };
    BatchOutput { dataset, reports }
}

/// One file through the whole per-file pipeline: load → locate header →
/// classify → normalize.
fn process_file(file: &SourceFile, config: &Config) -> Result<FileFrame, SkipReason> {
    let table = load_table(file).map_err(|e| SkipReason::Parse(format!("{e:#}")))?;
    let header_row = locate_header(&table, config).ok_or(SkipReason::HeaderNotFound)?;
    let labels: Vec<String> = table.rows[header_row]
        .iter()
        .map(|cell| clean_label(cell))
        .collect();
    let map = classify_columns(&labels, config).ok_or(SkipReason::MissingColumns)?;
    Ok(normalize(&table, header_row, &map, file.exam_name()))
}

/// Coerce one raw row into its final record. Every declared numeric cell
/// ends up as a value or missing, never raw text.
fn coerce_row(row: &RawRow, exam: &str) -> ScoreRecord {
    let total = match &row.total {
        TotalCell::Direct(cell) => coerce_numeric(cell),
        TotalCell::Composite(objective, subjective) => {
            match (coerce_numeric(objective), coerce_numeric(subjective)) {
                (Some(objective), Some(subjective)) => Some(objective + subjective),
                // A missing component makes the sum missing, not zero.
                _ => None,
            }
        }
    };
    let scores = row
        .cells
        .iter()
        .map(|(label, cell)| (label.clone(), coerce_numeric(cell)))
        .collect();

    ScoreRecord {
        student: row.student.clone(),
        exam: exam.to_string(),
        total,
        scores,
    }
}
