// src/report/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::cadence::CadencePair;
use crate::table::{ColumnMap, TableRow};

/// One row projected onto the seven reported fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensedRecord {
    pub line: String,
    pub mn: String,
    pub mn_onset: String,
    pub localkey: String,
    pub chord: String,
    pub numeral: String,
    pub cadence: String,
}

impl CondensedRecord {
    pub fn project(row: TableRow<'_>, columns: &ColumnMap) -> Self {
        Self {
            line: row.label().to_string(),
            mn: row.field(columns.mn).to_string(),
            mn_onset: row.field(columns.mn_onset).to_string(),
            localkey: row.field(columns.localkey).to_string(),
            chord: row.field(columns.chord).to_string(),
            numeral: row.field(columns.numeral).to_string(),
            cadence: row.field(columns.cadence).to_string(),
        }
    }

    pub fn fields(&self) -> [&str; 7] {
        [
            self.line.as_str(),
            self.mn.as_str(),
            self.mn_onset.as_str(),
            self.localkey.as_str(),
            self.chord.as_str(),
            self.numeral.as_str(),
            self.cadence.as_str(),
        ]
    }
}

/// Pre-dominant chord label and how many cadences it precedes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdCount {
    pub chord: String,
    pub count: u64,
}

/// Header projection followed by PD, cadence, PD, cadence, ... in pair order.
pub fn condense(
    header: TableRow<'_>,
    columns: &ColumnMap,
    pairs: &[CadencePair<'_>],
) -> Vec<CondensedRecord> {
    let mut out = Vec::with_capacity(1 + pairs.len() * 2);
    out.push(CondensedRecord::project(header, columns));
    for pair in pairs {
        out.push(CondensedRecord::project(pair.pre_dominant, columns));
        out.push(CondensedRecord::project(pair.cadence, columns));
    }
    out
}

/// Count chords on the pre-dominant rows of a condensed list (even data
/// positions, header excluded), most frequent first. Ties keep the order in
/// which the chords first appeared.
pub fn count_pre_dominants(condensed: &[CondensedRecord]) -> Vec<PdCount> {
    let mut counts: Vec<PdCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in condensed.iter().skip(1).step_by(2) {
        match slots.get(record.chord.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(record.chord.as_str(), counts.len());
                counts.push(PdCount {
                    chord: record.chord.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Output file locations for one movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cad_info: PathBuf,
    pub pd_counts: PathBuf,
}

impl OutputPaths {
    /// `cad_info<k>-<mvt>.tsv` and `pd<k>-<mvt>.tsv` under `dir`.
    pub fn for_work(dir: impl AsRef<Path>, k: u32, mvt: u32) -> Self {
        let dir = dir.as_ref();
        Self {
            cad_info: dir.join(format!("cad_info{}-{}.tsv", k, mvt)),
            pd_counts: dir.join(format!("pd{}-{}.tsv", k, mvt)),
        }
    }
}

/// Write `records` as header-less TSV, one record per line.
pub fn write_tsv<S: Serialize>(path: &Path, records: &[S]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?;
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(file);
    for (idx, record) in records.iter().enumerate() {
        wtr.serialize(record)
            .with_context(|| format!("writing record {} to {:?}", idx, path))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;
    info!(path = %path.display(), records = records.len(), "wrote TSV");
    Ok(())
}

/// Read a `pd<k>-<mvt>.tsv` file back into counts.
pub fn read_pd_counts(path: &Path) -> Result<Vec<PdCount>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(file);
    rdr.deserialize::<PdCount>()
        .enumerate()
        .map(|(idx, result)| {
            result.with_context(|| format!("PD count parse error in {:?} at record {}", path, idx))
        })
        .collect()
}
