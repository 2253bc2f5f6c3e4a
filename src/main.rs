use anyhow::Result;
use clap::Parser;
use pdscan::{
    metadata::DEFAULT_METADATA_PATH,
    pipeline::{run, RunOptions, RunSummary},
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Counts the last pre-dominant chord before the dominant in PACs and IACs
/// and writes the counts plus condensed PD/cadence pairs to TSV.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Annotation TSV for one movement
    input: PathBuf,
    /// Köchel catalogue number
    #[arg(long)]
    k: u32,
    /// Movement number
    #[arg(long)]
    mvt: u32,
    /// Corpus metadata TSV
    #[arg(long, env = "PDSCAN_METADATA", default_value = DEFAULT_METADATA_PATH)]
    metadata: PathBuf,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(input = %args.input.display(), k = args.k, mvt = args.mvt, "startup");

    // ─── 2) analyse, writing outputs to the working directory ────────
    let summary = run(&RunOptions {
        input: args.input,
        metadata: args.metadata,
        k: args.k,
        mvt: args.mvt,
        out_dir: PathBuf::from("."),
    })?;

    // ─── 3) console report ───────────────────────────────────────────
    print_report(&summary);
    Ok(())
}

fn print_report(summary: &RunSummary) {
    println!("OPUS, MVT, YEAR END");
    println!(
        "{} {} {}",
        summary.work.k, summary.work.mvt, summary.work.year_end
    );

    println!("PD-CADENCE PAIRS");
    for pair in &summary.pairs {
        println!("{}", pair.kind);
        println!("{:?}", pair.pre_dominant);
        println!("{:?}", pair.cadence);
    }

    println!("CONDENSED INFO ABOUT CADENCES");
    for record in &summary.condensed {
        println!("{:?}", record.fields());
    }

    println!("SORTED PD CHORD COUNTS");
    for entry in &summary.pd_counts {
        println!("{}\t{}", entry.chord, entry.count);
    }
}
