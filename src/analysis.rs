use std::collections::BTreeMap;

use crate::data::model::{ScoreDataset, ScoreRecord};

// ---------------------------------------------------------------------------
// Exam ordering
// ---------------------------------------------------------------------------

/// Resolve the exam display order.
///
/// An explicit ordering keeps only the exams it lists, in that order
/// (entries naming no present exam are dropped). Without one, exams appear
/// in first-appearance (batch) order.
pub fn exam_order(dataset: &ScoreDataset, ordering: Option<&[String]>) -> Vec<String> {
    let natural = dataset.exams();
    match ordering {
        Some(explicit) => explicit
            .iter()
            .filter(|exam| natural.contains(&exam.as_str()))
            .cloned()
            .collect(),
        None => natural.into_iter().map(str::to_string).collect(),
    }
}

// ---------------------------------------------------------------------------
// Per-student time series
// ---------------------------------------------------------------------------

/// One student's records, one per exam, in the given order. Exams where
/// the student has no record are omitted; the first record wins when a
/// file carried duplicate rows.
pub fn student_series<'a>(
    dataset: &'a ScoreDataset,
    student: &str,
    order: &[String],
) -> Vec<&'a ScoreRecord> {
    order
        .iter()
        .filter_map(|exam| {
            dataset
                .records
                .iter()
                .find(|record| record.student == student && record.exam == *exam)
        })
        .collect()
}

/// Split subject labels into score-like and rank-like groups, so trend
/// charts plot scores while rank changes go in a table.
pub fn split_subjects<'a>(subjects: &'a [String], rank_marker: &str) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut scores = Vec::new();
    let mut ranks = Vec::new();
    for label in subjects {
        if label.contains(rank_marker) {
            ranks.push(label.as_str());
        } else {
            scores.push(label.as_str());
        }
    }
    (scores, ranks)
}

// ---------------------------------------------------------------------------
// Class-level aggregates
// ---------------------------------------------------------------------------

/// Class means for one exam: the total plus every subject in the union,
/// each missing when no row had a coercible value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamAverages {
    pub exam: String,
    pub total: Option<f64>,
    pub subjects: BTreeMap<String, Option<f64>>,
}

/// Whole-class per-exam averages over the given exam order.
pub fn class_averages(dataset: &ScoreDataset, order: &[String]) -> Vec<ExamAverages> {
    order
        .iter()
        .map(|exam| {
            let rows: Vec<&ScoreRecord> = dataset
                .records
                .iter()
                .filter(|record| record.exam == *exam)
                .collect();
            let total = mean(rows.iter().map(|record| record.total));
            let subjects = dataset
                .subjects
                .iter()
                .map(|subject| {
                    (
                        subject.clone(),
                        mean(rows.iter().map(|record| record.score(subject))),
                    )
                })
                .collect();
            ExamAverages {
                exam: exam.clone(),
                total,
                subjects,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Mean over present values; missing values are skipped, not zeroed.
/// `None` when every value is missing.
pub fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Mean and spread of one tracked column.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); `None` with fewer
    /// than two present values.
    pub std_dev: Option<f64>,
}

/// Summary statistics skipping missing values. `None` when nothing is
/// present.
pub fn stats(values: impl Iterator<Item = Option<f64>>) -> Option<Stats> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        return None;
    }
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let std_dev = if present.len() < 2 {
        None
    } else {
        let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(variance.sqrt())
    };
    Some(Stats { mean, std_dev })
}
