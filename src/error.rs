use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-file skip reasons
// ---------------------------------------------------------------------------

/// Why one uploaded file was excluded from the batch.
///
/// Every variant is file-scoped: the file is reported and skipped, the rest
/// of the batch continues. Cell-level coercion misses are not represented
/// here; they become missing values at cell granularity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The raw bytes could not be read as tabular data at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// No row within the scan depth matched a header token.
    #[error("header not found")]
    HeaderNotFound,

    /// Header found, but the identity column or the total-score column
    /// (direct or fallback) could not be resolved.
    #[error("missing identity or total-score column")]
    MissingColumns,
}
