// src/metadata.rs
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::table::read_tsv;

/// Default location of the corpus metadata table.
pub const DEFAULT_METADATA_PATH: &str = "metadata.tsv";

/// Zero-based column holding the year a work was completed.
pub const YEAR_END_COLUMN: usize = 20;

/// Catalogue entry for one movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInfo {
    pub k: u32,
    pub mvt: u32,
    pub year_end: String,
}

/// Identifier used in the metadata table's first column, e.g. `K279-1`.
pub fn work_key(k: u32, mvt: u32) -> String {
    format!("K{}-{}", k, mvt)
}

/// Find the movement among already-parsed metadata rows. Row 0 is the header
/// and is never matched.
pub fn lookup_work(rows: &[Vec<String>], k: u32, mvt: u32) -> Result<WorkInfo, AnalysisError> {
    let key = work_key(k, mvt);
    let row = rows
        .iter()
        .skip(1)
        .find(|row| row.first().map(String::as_str) == Some(key.as_str()))
        .ok_or_else(|| AnalysisError::MetadataNotFound { key: key.clone() })?;

    let year_end = row
        .get(YEAR_END_COLUMN)
        .cloned()
        .ok_or(AnalysisError::MetadataFieldMissing {
            key,
            column: YEAR_END_COLUMN,
        })?;

    Ok(WorkInfo { k, mvt, year_end })
}

/// Read the metadata TSV at `path` and look up `K<k>-<mvt>`.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_work_info<P: AsRef<Path>>(path: P, k: u32, mvt: u32) -> Result<WorkInfo> {
    let rows = read_tsv(&path)?;
    debug!(rows = rows.len(), "metadata loaded");
    let info = lookup_work(&rows, k, mvt)
        .with_context(|| format!("looking up movement in {:?}", path.as_ref()))?;
    info!(key = %work_key(k, mvt), year_end = %info.year_end, "metadata matched");
    Ok(info)
}
