// src/table/columns.rs
use crate::error::AnalysisError;

pub const MN: &str = "mn";
pub const MN_ONSET: &str = "mn_onset";
pub const LOCALKEY: &str = "localkey";
pub const CHORD: &str = "chord";
pub const NUMERAL: &str = "numeral";
pub const CADENCE: &str = "cadence";

/// Columns every annotation table must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [MN, MN_ONSET, LOCALKEY, CHORD, NUMERAL, CADENCE];

/// First position in `header` equal to `name`, scanning left to right.
pub fn column_index(header: &[String], name: &str) -> Result<usize, AnalysisError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AnalysisError::ColumnNotFound {
            column: name.to_string(),
        })
}

/// Positions of the required columns within a labelled header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub mn: usize,
    pub mn_onset: usize,
    pub localkey: usize,
    pub chord: usize,
    pub numeral: usize,
    pub cadence: usize,
}

impl ColumnMap {
    /// Resolve all required columns, failing on the first one that is absent.
    pub fn resolve(header: &[String]) -> Result<Self, AnalysisError> {
        let mut found = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in found.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = column_index(header, name)?;
        }
        let [mn, mn_onset, localkey, chord, numeral, cadence] = found;
        Ok(Self {
            mn,
            mn_onset,
            localkey,
            chord,
            numeral,
            cadence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_in_any_order() {
        let h = header(&[
            "line 1", "cadence", "extra", "numeral", "chord", "localkey", "mn_onset", "mn",
        ]);
        let map = ColumnMap::resolve(&h).unwrap();
        assert_eq!(map.cadence, 1);
        assert_eq!(map.numeral, 3);
        assert_eq!(map.chord, 4);
        assert_eq!(map.localkey, 5);
        assert_eq!(map.mn_onset, 6);
        assert_eq!(map.mn, 7);
    }

    #[test]
    fn first_match_wins() {
        let h = header(&["line 1", "chord", "chord"]);
        assert_eq!(column_index(&h, "chord"), Ok(1));
    }

    #[test]
    fn names_are_exact() {
        let h = header(&["line 1", "Chord", "chord_type"]);
        assert_eq!(
            column_index(&h, "chord"),
            Err(AnalysisError::ColumnNotFound {
                column: "chord".into()
            })
        );
    }

    #[test]
    fn each_required_column_is_checked() {
        for missing in REQUIRED_COLUMNS {
            let mut names = vec!["line 1"];
            names.extend(REQUIRED_COLUMNS.iter().filter(|&&n| n != missing));
            assert_eq!(
                ColumnMap::resolve(&header(&names)),
                Err(AnalysisError::ColumnNotFound {
                    column: missing.into()
                }),
                "missing {}",
                missing
            );
        }
    }

    #[test]
    fn resolve_reports_missing_column() {
        let h = header(&["line 1", "mn", "mn_onset", "localkey", "chord", "numeral"]);
        assert_eq!(
            ColumnMap::resolve(&h),
            Err(AnalysisError::ColumnNotFound {
                column: CADENCE.into()
            })
        );
    }
}
