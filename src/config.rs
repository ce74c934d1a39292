use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// Objective/subjective component pair summed per row when no direct
/// total-score column exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackComponents {
    pub objective: String,
    pub subjective: String,
}

/// Rewrite of one bare column label to a disambiguated variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAlias {
    pub from: String,
    pub to: String,
}

/// Everything that varies between score-sheet layouts and deployment
/// variants. New exam-sheet layouts are supported by editing this, not the
/// classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Substring identifying the student-name column.
    pub identity_marker: String,
    /// Cell literals that mark a row as the header row (exact match after
    /// label cleaning).
    pub header_tokens: Vec<String>,
    /// Substrings identifying the total-score column.
    pub total_score_markers: Vec<String>,
    /// Component columns summed when no total-score column matches.
    /// `None` disables the fallback.
    pub total_score_fallback: Option<FallbackComponents>,
    /// Substrings qualifying a column as a tracked subject.
    pub subject_keywords: Vec<String>,
    /// Substrings vetoing subject membership.
    pub subject_exclusions: Vec<String>,
    /// Rewrite applied to a bare writing label so later sittings' numbered
    /// writing columns do not collide with it.
    pub writing_alias: Option<LabelAlias>,
    /// Maximum number of leading rows scanned to locate the header.
    pub header_scan_depth: usize,
    /// Substring separating rank columns from score columns in analysis.
    pub rank_marker: String,
    /// Explicit exam display order; `None` keeps natural batch order.
    pub exam_ordering: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::rank_tracking()
    }
}

impl Config {
    /// Variant that tracks rank columns as subjects alongside scores.
    /// No fallback summation: sheets without a total-score column are
    /// skipped.
    pub fn rank_tracking() -> Self {
        Self {
            identity_marker: "姓名".to_string(),
            header_tokens: vec!["姓名".to_string()],
            total_score_markers: vec![
                "最新得分".to_string(),
                "总分".to_string(),
                "科目成绩".to_string(),
            ],
            total_score_fallback: None,
            subject_keywords: vec![
                "客观".to_string(),
                "主观".to_string(),
                "排名".to_string(),
                "写作".to_string(),
                "填空".to_string(),
            ],
            subject_exclusions: Vec::new(),
            writing_alias: Some(LabelAlias {
                from: "写作".to_string(),
                to: "写作1".to_string(),
            }),
            header_scan_depth: 10,
            rank_marker: "排名".to_string(),
            exam_ordering: None,
        }
    }

    /// Variant that tracks scores only: rank columns are vetoed, and a
    /// sheet without a total-score column falls back to summing the
    /// objective and subjective components.
    pub fn score_only() -> Self {
        Self {
            subject_exclusions: vec!["排名".to_string()],
            total_score_fallback: Some(FallbackComponents {
                objective: "客观".to_string(),
                subjective: "主观".to_string(),
            }),
            ..Self::rank_tracking()
        }
    }

    /// Load a configuration from a JSON file. Missing fields fall back to
    /// the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).context("reading config file")?;
        serde_json::from_str(&text).context("parsing config JSON")
    }
}
