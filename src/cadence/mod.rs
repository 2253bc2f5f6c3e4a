// src/cadence/mod.rs
use std::fmt;
use tracing::debug;

use crate::error::AnalysisError;
use crate::table::{AnnotationTable, ColumnMap, TableRow};

/// Numerals skipped when walking back from a cadence. Matching is exact and
/// case-sensitive.
pub const TONIC_DOMINANT_NUMERALS: [&str; 4] = ["V", "I", "v", "i"];

pub fn is_tonic_dominant(numeral: &str) -> bool {
    TONIC_DOMINANT_NUMERALS.contains(&numeral)
}

/// Authentic cadence markers found in the `cadence` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CadenceKind {
    Perfect,
    Imperfect,
}

impl CadenceKind {
    /// `PAC` or `IAC`; any other value (including empty) is not tracked.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PAC" => Some(Self::Perfect),
            "IAC" => Some(Self::Imperfect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perfect => "PAC",
            Self::Imperfect => "IAC",
        }
    }
}

impl fmt::Display for CadenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cadence row and the pre-dominant row that leads into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadencePair<'a> {
    pub kind: CadenceKind,
    pub pre_dominant: TableRow<'a>,
    pub cadence: TableRow<'a>,
}

/// Walk back from the row before `cadence` over tonic/dominant numerals and
/// return the first row that is not one. The header is never a candidate.
pub fn find_pre_dominant<'a>(
    table: &'a AnnotationTable,
    columns: &ColumnMap,
    cadence: TableRow<'a>,
) -> Result<TableRow<'a>, AnalysisError> {
    (1..cadence.position)
        .rev()
        .filter_map(|position| table.row(position))
        .find(|row| !is_tonic_dominant(row.field(columns.numeral)))
        .ok_or_else(|| AnalysisError::NoPreDominant {
            line: cadence.label().to_string(),
            cadence: cadence.field(columns.cadence).to_string(),
        })
}

/// Pair every PAC/IAC row with its pre-dominant, in file order.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.len()))]
pub fn locate_pre_dominants<'a>(
    table: &'a AnnotationTable,
    columns: &ColumnMap,
) -> Result<Vec<CadencePair<'a>>, AnalysisError> {
    let mut pairs = Vec::new();
    for row in table.data_rows() {
        let Some(kind) = CadenceKind::parse(row.field(columns.cadence)) else {
            continue;
        };
        let pre_dominant = find_pre_dominant(table, columns, row)?;
        debug!(
            cadence = %row.label(),
            pre_dominant = %pre_dominant.label(),
            chord = pre_dominant.field(columns.chord),
            "{} paired",
            kind
        );
        pairs.push(CadencePair {
            kind,
            pre_dominant,
            cadence: row,
        });
    }
    Ok(pairs)
}
