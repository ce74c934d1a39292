use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// SourceFile – one uploaded artifact
// ---------------------------------------------------------------------------

/// An uploaded file: its name and raw bytes. The name carries both the
/// parser choice (extension) and the exam identifier (stem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceFile {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as the
    /// name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("no usable file name in {}", path.display()))?
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(SourceFile { name, bytes })
    }

    /// Exam identifier: the file name with its extension stripped.
    pub fn exam_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Lowercased extension, empty when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}

// ---------------------------------------------------------------------------
// RawTable – an untyped cell grid
// ---------------------------------------------------------------------------

/// A parsed file before any schema inference: rows of stringified cells,
/// no assumed header. Rows may have differing lengths; absent cells read
/// as empty.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Total coercion of one cell: a valid number or missing, never an error.
/// Blank and placeholder cells ("缺考", "-") are routine in exam sheets.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// ScoreRecord – one row of the unified dataset
// ---------------------------------------------------------------------------

/// One (student, exam) observation. `student` and `exam` are never empty;
/// every numeric field is either a value or missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub student: String,
    pub exam: String,
    pub total: Option<f64>,
    /// Subject label → coerced score. Holds only the subjects the
    /// originating file had; look up through [`ScoreRecord::score`].
    pub scores: BTreeMap<String, Option<f64>>,
}

impl ScoreRecord {
    /// Score for a subject; missing when the originating file never
    /// tracked it.
    pub fn score(&self, subject: &str) -> Option<f64> {
        self.scores.get(subject).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// ScoreDataset – the unified long-form dataset
// ---------------------------------------------------------------------------

/// All records across the batch, one row per (student, exam) pair, plus
/// the union of subject labels discovered in any file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDataset {
    pub records: Vec<ScoreRecord>,
    /// Insertion-ordered union of subject labels across files.
    pub subjects: Vec<String>,
}

impl ScoreDataset {
    pub fn new(records: Vec<ScoreRecord>, subjects: Vec<String>) -> Self {
        ScoreDataset { records, subjects }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique student names, sorted.
    pub fn students(&self) -> Vec<&str> {
        let mut students: Vec<&str> = self.records.iter().map(|r| r.student.as_str()).collect();
        students.sort_unstable();
        students.dedup();
        students
    }

    /// Exam identifiers in first-appearance order.
    pub fn exams(&self) -> Vec<&str> {
        let mut exams: Vec<&str> = Vec::new();
        for record in &self.records {
            if !exams.contains(&record.exam.as_str()) {
                exams.push(record.exam.as_str());
            }
        }
        exams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student: &str, exam: &str) -> ScoreRecord {
        ScoreRecord {
            student: student.to_string(),
            exam: exam.to_string(),
            total: None,
            scores: BTreeMap::new(),
        }
    }

    #[test]
    fn exam_name_strips_only_the_extension() {
        let file = SourceFile::new("第一次月考.xlsx", Vec::new());
        assert_eq!(file.exam_name(), "第一次月考");
        assert_eq!(file.extension(), "xlsx");

        let dotted = SourceFile::new("2024.05 期中.csv", Vec::new());
        assert_eq!(dotted.exam_name(), "2024.05 期中");
    }

    #[test]
    fn extension_is_lowercased() {
        let file = SourceFile::new("midterm.CSV", Vec::new());
        assert_eq!(file.extension(), "csv");
    }

    #[test]
    fn coercion_is_total() {
        assert_eq!(coerce_numeric("85"), Some(85.0));
        assert_eq!(coerce_numeric(" 85.5 "), Some(85.5));
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("  "), None);
        assert_eq!(coerce_numeric("缺考"), None);
        assert_eq!(coerce_numeric("90分"), None);
        assert_eq!(coerce_numeric("-3.5"), Some(-3.5));
    }

    #[test]
    fn score_lookup_treats_absent_subjects_as_missing() {
        let mut rec = record("Alice", "midterm");
        rec.scores.insert("听力".to_string(), Some(45.0));
        rec.scores.insert("写作1".to_string(), None);
        assert_eq!(rec.score("听力"), Some(45.0));
        assert_eq!(rec.score("写作1"), None);
        assert_eq!(rec.score("阅读"), None);
    }

    #[test]
    fn students_sorted_and_exams_in_first_appearance_order() {
        let dataset = ScoreDataset::new(
            vec![
                record("Bob", "midterm"),
                record("Alice", "midterm"),
                record("Bob", "final"),
                record("Alice", "final"),
            ],
            Vec::new(),
        );
        assert_eq!(dataset.students(), vec!["Alice", "Bob"]);
        assert_eq!(dataset.exams(), vec!["midterm", "final"]);
        assert_eq!(dataset.len(), 4);
    }
}
