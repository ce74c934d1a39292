//! Schema-inference pipeline for heterogeneous exam score sheets.
//!
//! Uploaded `.csv` / `.xlsx` score sheets rarely share a layout: the header
//! row floats below title rows, column names drift between sittings, and
//! each sheet tracks its own set of sub-scores. This crate locates the
//! header, classifies columns against configurable keyword vocabularies,
//! and folds every sheet into one long-form [`ScoreDataset`] (one row per
//! student and exam) ready for trend charts and class-level comparison.
//!
//! ```no_run
//! use examsheet::{Config, Session, SourceFile};
//!
//! let files = vec![
//!     SourceFile::from_path("期中考试.csv".as_ref()).unwrap(),
//!     SourceFile::from_path("期末考试.xlsx".as_ref()).unwrap(),
//! ];
//! let mut session = Session::new();
//! let output = session.process(&files, &Config::default());
//! for report in &output.reports {
//!     println!("{}: {:?}", report.file_name, report.outcome);
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod session;

pub use config::Config;
pub use data::model::{ScoreDataset, ScoreRecord, SourceFile};
pub use error::SkipReason;
pub use pipeline::{BatchOutput, FileOutcome, FileReport, run_batch};
pub use session::Session;
