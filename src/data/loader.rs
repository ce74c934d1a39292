use std::io::Cursor;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto_from_rs};

use super::model::{RawTable, SourceFile};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse a source file into an untyped cell grid.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – delimited text, read without a header assumption
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet of a workbook
pub fn load_table(file: &SourceFile) -> Result<RawTable> {
    match file.extension().as_str() {
        "csv" => load_csv(&file.bytes),
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(&file.bytes),
        other => bail!("unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header position is unknown at this point, so every row is read as data;
/// the header locator sorts it out afterwards.
fn load_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(RawTable { rows })
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an Excel/ODS workbook. Format detection is
/// content-based, so a mislabeled `.xls` still opens.
fn load_workbook(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("opening workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no sheets")?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading worksheet {sheet_name:?}"))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(RawTable { rows })
}

/// Stringify one workbook cell. Numbers keep their shortest display form;
/// empty and error cells become empty text (missing after coercion).
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
