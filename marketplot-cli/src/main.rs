//! Marketplot CLI: list, run and normalize commands.
//!
//! Commands:
//! - `list`: print every chart set and the files it writes
//! - `run`: build chart sets and write their PNGs
//! - `normalize`: run shape normalization on a CSV export and print the result

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use marketplot_core::data::{
    normalize, read_csv, CsvSource, FieldPreference, FrameSource, Normalized, ProviderSource,
    RecordingSource, ReplaySource, SnapshotStore, YahooProvider,
};
use marketplot_runner::{ChartSet, OutputDir, RunConfig, RunContext};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marketplot", about = "Marketplot CLI: market data chart sets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chart sets and the files each one writes.
    List,
    /// Build chart sets and write their PNGs.
    Run {
        /// Chart sets to run (e.g., bitcoin-crash debt). All when omitted.
        sets: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory. Overrides the config file.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Read `<tag>.csv` exports from this directory instead of the network.
        #[arg(long, conflicts_with = "replay")]
        csv_dir: Option<PathBuf>,

        /// Replay raw frames recorded with --record.
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Record every downloaded raw frame into this directory.
        #[arg(long)]
        record: Option<PathBuf>,

        /// Pixel scale for every figure. Overrides the config file.
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Normalize a yfinance-style CSV export and print the resolved table.
    Normalize {
        /// CSV file to read.
        csv: PathBuf,

        /// Symbols the export is expected to hold.
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Rows to print.
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marketplot=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            run_list();
            Ok(())
        }
        Commands::Run {
            sets,
            config,
            output_dir,
            csv_dir,
            replay,
            record,
            scale,
        } => run_sets(RunArgs {
            sets,
            config,
            output_dir,
            csv_dir,
            replay,
            record,
            scale,
        }),
        Commands::Normalize { csv, symbols, rows } => run_normalize(&csv, &symbols, rows),
    }
}

fn run_list() {
    for set in ChartSet::ALL {
        println!("{:<20} {}", set.name(), set.summary());
        for file in set.files() {
            println!("{:<20}   {file}", "");
        }
    }
}

struct RunArgs {
    sets: Vec<String>,
    config: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    replay: Option<PathBuf>,
    record: Option<PathBuf>,
    scale: Option<f64>,
}

fn run_sets(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }
    config.validate()?;

    let sets = if args.sets.is_empty() {
        ChartSet::ALL.to_vec()
    } else {
        args.sets
            .iter()
            .map(|s| s.parse::<ChartSet>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let today = chrono::Local::now().date_naive();
    let source = build_source(&config, args.csv_dir, args.replay, args.record, today)?;
    info!(source = source.name(), sets = sets.len(), "starting run");

    let ctx = RunContext::new(&*source, today);
    let out = OutputDir::new(&config.output_dir, config.render.scale);

    let mut written = 0;
    for set in sets {
        let paths = set.run(&ctx, &out).with_context(|| format!("chart set '{set}'"))?;
        for path in &paths {
            println!("{}", path.display());
        }
        written += paths.len();
    }
    info!(written, dir = %out.root().display(), "run complete");
    Ok(())
}

/// CSV exports, recorded snapshots, or the live provider, optionally
/// recording whatever the chosen source returns.
fn build_source(
    config: &RunConfig,
    csv_dir: Option<PathBuf>,
    replay: Option<PathBuf>,
    record: Option<PathBuf>,
    today: chrono::NaiveDate,
) -> Result<Box<dyn FrameSource>> {
    if let (Some(from), Some(to)) = (&replay, &record) {
        if from == to {
            bail!("--replay and --record point at the same directory: {}", from.display());
        }
    }

    let inner: Box<dyn FrameSource> = match (csv_dir, replay) {
        (Some(dir), _) => Box::new(CsvSource::new(dir)),
        (None, Some(dir)) => Box::new(ReplaySource::new(SnapshotStore::new(dir))),
        (None, None) => {
            let provider = YahooProvider::new(&config.provider.yahoo())?;
            Box::new(ProviderSource::new(provider, today))
        }
    };

    let source: Box<dyn FrameSource> = match record {
        Some(dir) => Box::new(RecordingSource::new(inner, SnapshotStore::new(dir))),
        None => inner,
    };
    Ok(source)
}

fn run_normalize(csv: &Path, symbols: &[String], rows: usize) -> Result<()> {
    let frame = read_csv(csv)?;
    println!("{}: {} rows, {} columns", csv.display(), frame.len(), frame.keys().len());

    match normalize(frame, symbols, FieldPreference::PreferAdjusted)? {
        Normalized::Resolved { table, resolution } => {
            println!("shape: {}", resolution.shape);
            println!("field: {} (\"{}\")", resolution.field, resolution.label);
            println!("date        {}", table.columns().join("  "));
            for i in 0..rows.min(table.len()) {
                let values: Vec<String> = table.row(i).iter().map(|v| format!("{v:.4}")).collect();
                println!("{}  {}", table.dates()[i], values.join("  "));
            }
        }
        Normalized::Unrecognized { frame, reason } => {
            println!("shape: unrecognized ({reason})");
            for key in frame.keys() {
                println!("  {key}");
            }
        }
    }
    Ok(())
}
