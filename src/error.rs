// src/error.rs
use thiserror::Error;

/// Failures that abort an analysis run.
///
/// I/O and CSV problems travel as `anyhow` context chains; these are the
/// domain-level conditions a caller may want to match on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A required header name is absent from the annotation table.
    #[error("column `{column}` not found in header")]
    ColumnNotFound { column: String },

    /// No metadata row carries the requested `K<k>-<mvt>` key.
    #[error("no metadata record for `{key}`")]
    MetadataNotFound { key: String },

    /// The matching metadata row ends before the requested column.
    #[error("metadata record `{key}` has no column {column}")]
    MetadataFieldMissing { key: String, column: usize },

    /// Backward scan from a cadence reached the header.
    #[error("no pre-dominant found before {cadence} cadence at {line}")]
    NoPreDominant { line: String, cadence: String },

    /// The annotation file has no header row.
    #[error("table {path} is empty")]
    EmptyTable { path: String },
}
