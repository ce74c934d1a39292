use crate::config::Config;

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Label cleaning
// ---------------------------------------------------------------------------

/// Normalize one raw header cell: strip embedded newlines (merged-cell
/// exports wrap labels) and surrounding whitespace.
pub fn clean_label(raw: &str) -> String {
    raw.replace('\n', "").trim().to_string()
}

// ---------------------------------------------------------------------------
// Header locator
// ---------------------------------------------------------------------------

/// Find the row holding the column labels.
///
/// Scans at most `header_scan_depth` leading rows; the first row where any
/// cleaned cell exactly equals a configured header token wins. `None`
/// means the file should be skipped, never that the batch fails.
pub fn locate_header(table: &RawTable, config: &Config) -> Option<usize> {
    table
        .rows
        .iter()
        .take(config.header_scan_depth)
        .position(|row| {
            row.iter().any(|cell| {
                let cleaned = clean_label(cell);
                config.header_tokens.iter().any(|token| cleaned == *token)
            })
        })
}

// ---------------------------------------------------------------------------
// Column classifier
// ---------------------------------------------------------------------------

/// Where a record's total score comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSource {
    /// A column that directly holds the aggregate score.
    Column(usize),
    /// No direct column: sum the objective and subjective components per
    /// row. A missing component makes the sum missing.
    Composite { objective: usize, subjective: usize },
}

/// One tracked subject column, with the alias rewrite already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub index: usize,
    pub label: String,
}

/// The classification result for one file: which columns mean what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub identity: usize,
    pub total: TotalSource,
    pub subjects: Vec<Subject>,
}

/// Classify cleaned column labels into the canonical column set.
///
/// Labels are taken in column order and are not deduplicated; duplicate
/// labels simply produce duplicate subject entries. `None` means the
/// identity or total-score column could not be resolved.
pub fn classify_columns(labels: &[String], config: &Config) -> Option<ColumnMap> {
    let identity = labels
        .iter()
        .position(|label| label.contains(&config.identity_marker));
    let Some(identity) = identity else {
        log::debug!("no column label contains {:?}", config.identity_marker);
        return None;
    };

    let direct_total = labels.iter().position(|label| {
        config
            .total_score_markers
            .iter()
            .any(|marker| label.contains(marker.as_str()))
    });
    let total = match direct_total {
        Some(index) => TotalSource::Column(index),
        None => {
            let fallback = config.total_score_fallback.as_ref()?;
            let objective = labels
                .iter()
                .position(|label| label.contains(&fallback.objective))?;
            let subjective = labels
                .iter()
                .position(|label| label.contains(&fallback.subjective))?;
            log::debug!("no total-score column, summing columns {objective} + {subjective}");
            TotalSource::Composite {
                objective,
                subjective,
            }
        }
    };

    let subjects = labels
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != identity && Some(*index) != direct_total)
        .filter(|(_, label)| {
            config
                .subject_keywords
                .iter()
                .any(|keyword| label.contains(keyword.as_str()))
        })
        .filter(|(_, label)| {
            !config
                .subject_exclusions
                .iter()
                .any(|excluded| label.contains(excluded.as_str()))
        })
        .map(|(index, label)| Subject {
            index,
            label: apply_alias(label, config),
        })
        .collect();

    Some(ColumnMap {
        identity,
        total,
        subjects,
    })
}

/// Rewrite a bare writing label to its disambiguated variant. Matches by
/// exact equality, so an already-rewritten label passes through unchanged.
fn apply_alias(label: &str, config: &Config) -> String {
    match &config.writing_alias {
        Some(alias) if label == alias.from => alias.to.clone(),
        _ => label.to_string(),
    }
}
