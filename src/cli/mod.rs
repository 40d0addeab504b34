//! Command-line parsing for the market-data fetcher.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the fetch/decode code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "entsoe",
    version,
    about = "ENTSO-E Transparency Platform time-series fetcher"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch physical cross-border flows between two areas.
    Flows(FlowArgs),
    /// Fetch day-ahead prices for one bidding zone.
    Prices(PriceArgs),
    /// Fetch actual generation per production type for one bidding zone.
    Generation(GenerationArgs),
    /// Batch-fetch flows for every interconnector in a config CSV.
    ///
    /// Output files that already exist are skipped; a failing pair is
    /// logged and the run continues with the next one.
    Pull(PullArgs),
}

/// Date-range options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct RangeArgs {
    /// Range start, `YYYYMMDDHHMM` or `YYYY-MM-DD` (UTC).
    #[arg(long)]
    pub start: String,

    /// Range end (exclusive), same formats as --start.
    #[arg(long)]
    pub end: String,
}

/// Plot options shared by the single-column subcommands.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Render an ASCII preview of the fetched series.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `entsoe flows`.
#[derive(Debug, Parser)]
pub struct FlowArgs {
    /// In-domain area code (e.g. 10YGB----------A), or a key into
    /// --area-table.
    #[arg(long)]
    pub in_domain: String,

    /// Out-domain area code (e.g. 10YFR-RTE------C), or a key into
    /// --area-table.
    #[arg(long)]
    pub out_domain: String,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Area code table (`Key,Code` CSV) for resolving country keys to
    /// domain codes.
    #[arg(long)]
    pub area_table: Option<PathBuf>,

    /// Write the series to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for `entsoe prices`.
#[derive(Debug, Parser)]
pub struct PriceArgs {
    /// Bidding-zone area code (or a key into --area-table), used as both
    /// in- and out-domain.
    #[arg(long)]
    pub domain: String,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Area code table (`Key,Code` CSV) for resolving country keys to
    /// domain codes.
    #[arg(long)]
    pub area_table: Option<PathBuf>,

    /// Write the series to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for `entsoe generation`.
#[derive(Debug, Parser)]
pub struct GenerationArgs {
    /// Bidding-zone area code, or a key into --area-table.
    #[arg(long)]
    pub domain: String,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Area code table (`Key,Code` CSV) for resolving country keys to
    /// domain codes.
    #[arg(long)]
    pub area_table: Option<PathBuf>,

    /// Write the table to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Production-type code table (`Code,Meaning` CSV). Defaults to the
    /// built-in standard table.
    #[arg(long)]
    pub psr_table: Option<PathBuf>,
}

/// Options for `entsoe pull`.
#[derive(Debug, Parser)]
pub struct PullArgs {
    /// Interconnector config CSV with columns
    /// `country,in_country,out_country,in_domain,out_domain`.
    #[arg(long)]
    pub config: PathBuf,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Directory for the per-pair output files.
    #[arg(long, default_value = "data/flow")]
    pub data_dir: PathBuf,
}
