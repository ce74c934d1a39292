use super::classify::{ColumnMap, TotalSource};
use super::model::RawTable;

// ---------------------------------------------------------------------------
// FileFrame – one file's rows in the canonical shape, cells still raw
// ---------------------------------------------------------------------------

/// One file's data rows projected to the canonical columns. Cells stay as
/// raw text here; numeric coercion happens at aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFrame {
    /// Exam identifier (file name sans extension).
    pub exam: String,
    /// Subject labels in frame order, alias rewrite applied.
    pub subjects: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// One data row before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub student: String,
    pub total: TotalCell,
    /// (subject label, raw cell), frame order.
    pub cells: Vec<(String, String)>,
}

/// The raw material for a row's total score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalCell {
    Direct(String),
    Composite(String, String),
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Project the rows strictly below the header through the column map.
///
/// Rows whose identity cell is blank are dropped (spreadsheets routinely
/// carry trailing empty rows). Cells beyond a short row's end read as
/// empty and coerce to missing later.
pub fn normalize(table: &RawTable, header_row: usize, map: &ColumnMap, exam: &str) -> FileFrame {
    let mut rows = Vec::new();

    for raw in table.rows.iter().skip(header_row + 1) {
        let student = raw.get(map.identity).map(|c| c.trim()).unwrap_or("");
        if student.is_empty() {
            continue;
        }

        let cell = |index: usize| raw.get(index).cloned().unwrap_or_default();
        let total = match map.total {
            TotalSource::Column(index) => TotalCell::Direct(cell(index)),
            TotalSource::Composite {
                objective,
                subjective,
            } => TotalCell::Composite(cell(objective), cell(subjective)),
        };
        let cells = map
            .subjects
            .iter()
            .map(|subject| (subject.label.clone(), cell(subject.index)))
            .collect();

        rows.push(RawRow {
            student: student.to_string(),
            total,
            cells,
        });
    }

    FileFrame {
        exam: exam.to_string(),
        subjects: map.subjects.iter().map(|s| s.label.clone()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::classify::{classify_columns, clean_label, locate_header};

    fn frame_for(rows: &[&[&str]], config: &Config) -> FileFrame {
        let table = RawTable {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        let header_row = locate_header(&table, config).expect("header");
        let labels: Vec<String> = table.rows[header_row].iter().map(|c| clean_label(c)).collect();
        let map = classify_columns(&labels, config).expect("classified");
        normalize(&table, header_row, &map, "期中")
    }

    #[test]
    fn rows_below_header_become_records_and_blank_names_drop() {
        let frame = frame_for(
            &[
                &["姓名", "总分", "写作"],
                &["Alice", "90", "18"],
                &["  ", "85", "17"],
                &["Bob", "85", "17"],
                &["", "", ""],
            ],
            &Config::default(),
        );
        assert_eq!(frame.exam, "期中");
        assert_eq!(frame.subjects, vec!["写作1"]);
        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.rows[0].student, "Alice");
        assert_eq!(frame.rows[1].student, "Bob");
    }

    #[test]
    fn header_as_last_row_yields_an_empty_body() {
        let frame = frame_for(&[&["姓名", "总分", "填空"]], &Config::default());
        assert!(frame.rows.is_empty());
        assert_eq!(frame.subjects, vec!["填空"]);
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let frame = frame_for(
            &[&["姓名", "总分", "写作", "填空"], &["Alice", "90"]],
            &Config::default(),
        );
        assert_eq!(frame.rows[0].total, TotalCell::Direct("90".to_string()));
        assert_eq!(
            frame.rows[0].cells,
            vec![
                ("写作1".to_string(), String::new()),
                ("填空".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn composite_total_keeps_both_component_cells() {
        let frame = frame_for(
            &[&["姓名", "客观", "主观"], &["Alice", "40", ""]],
            &Config::score_only(),
        );
        assert_eq!(
            frame.rows[0].total,
            TotalCell::Composite("40".to_string(), String::new())
        );
    }
}
