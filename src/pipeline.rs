// src/pipeline.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::cadence::{locate_pre_dominants, CadenceKind, CadencePair};
use crate::metadata::{read_work_info, WorkInfo};
use crate::report::{
    condense, count_pre_dominants, write_tsv, CondensedRecord, OutputPaths, PdCount,
};
use crate::table::{AnnotationTable, ColumnMap};

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub metadata: PathBuf,
    pub k: u32,
    pub mvt: u32,
    pub out_dir: PathBuf,
}

/// In-memory results derived from a single annotation table.
#[derive(Debug)]
pub struct Analysis<'a> {
    pub pairs: Vec<CadencePair<'a>>,
    pub condensed: Vec<CondensedRecord>,
    pub pd_counts: Vec<PdCount>,
}

/// Resolve columns, pair cadences with their pre-dominants and aggregate.
pub fn analyze(table: &AnnotationTable) -> Result<Analysis<'_>> {
    let columns = ColumnMap::resolve(table.header()).context("resolving required columns")?;
    let pairs = locate_pre_dominants(table, &columns)?;
    let header = table
        .row(0)
        .context("annotation table has no header row")?;
    let condensed = condense(header, &columns, &pairs);
    let pd_counts = count_pre_dominants(&condensed);

    info!(
        cadences = pairs.len(),
        distinct_pre_dominants = pd_counts.len(),
        "analysis complete"
    );
    Ok(Analysis {
        pairs,
        condensed,
        pd_counts,
    })
}

/// Raw labelled rows of one cadence pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRows {
    pub kind: CadenceKind,
    pub pre_dominant: Vec<String>,
    pub cadence: Vec<String>,
}

/// What a finished run produced, detached from the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub work: WorkInfo,
    pub pairs: Vec<PairRows>,
    pub condensed: Vec<CondensedRecord>,
    pub pd_counts: Vec<PdCount>,
    pub outputs: OutputPaths,
}

/// Metadata lookup, analysis, and both output files, in that order.
#[tracing::instrument(level = "info", skip(opts), fields(k = opts.k, mvt = opts.mvt))]
pub fn run(opts: &RunOptions) -> Result<RunSummary> {
    let work = read_work_info(&opts.metadata, opts.k, opts.mvt)?;

    let table = AnnotationTable::load(&opts.input)?;
    let analysis = analyze(&table)
        .with_context(|| format!("analysing {:?}", opts.input))?;

    let outputs = OutputPaths::for_work(&opts.out_dir, opts.k, opts.mvt);
    write_tsv(&outputs.cad_info, &analysis.condensed)?;
    write_tsv(&outputs.pd_counts, &analysis.pd_counts)?;

    let pairs = analysis
        .pairs
        .iter()
        .map(|p| PairRows {
            kind: p.kind,
            pre_dominant: p.pre_dominant.fields.to_vec(),
            cadence: p.cadence.fields.to_vec(),
        })
        .collect();

    Ok(RunSummary {
        work,
        pairs,
        condensed: analysis.condensed,
        pd_counts: analysis.pd_counts,
        outputs,
    })
}
