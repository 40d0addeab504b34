//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main"
//! that:
//! - parses CLI arguments
//! - builds the client from the environment
//! - runs the requested query
//! - prints previews and writes optional exports

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::Parser;

use crate::cli::{Cli, Command, FlowArgs, GenerationArgs, PlotArgs, PriceArgs, RangeArgs};
use crate::data::client::EntsoeClient;
use crate::data::transport::HttpTransport;
use crate::domain::TimeColumn;
use crate::error::Error;
use crate::io::tables::{AreaTable, ProductionTypeTable};

pub mod batch;

/// Entry point for the `entsoe` binary.
pub fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Command::Flows(args) => handle_flows(args),
        Command::Prices(args) => handle_prices(args),
        Command::Generation(args) => handle_generation(args),
        Command::Pull(args) => batch::run_pull(&args),
    }
}

fn handle_flows(args: FlowArgs) -> Result<(), Error> {
    let (start, end) = parse_range(&args.range)?;
    let areas = load_area_table(args.area_table.as_deref())?;
    let in_domain = resolve_domain(&args.in_domain, areas.as_ref());
    let out_domain = resolve_domain(&args.out_domain, areas.as_ref());
    let client = EntsoeClient::from_env()?;
    let column = client.physical_flows(&in_domain, &out_domain, start, end)?;
    finish_column(&column, args.out.as_deref(), &args.plot)
}

fn handle_prices(args: PriceArgs) -> Result<(), Error> {
    let (start, end) = parse_range(&args.range)?;
    let areas = load_area_table(args.area_table.as_deref())?;
    let domain = resolve_domain(&args.domain, areas.as_ref());
    let client = EntsoeClient::from_env()?;
    let column = client.day_ahead_prices(&domain, start, end)?;
    finish_column(&column, args.out.as_deref(), &args.plot)
}

fn handle_generation(args: GenerationArgs) -> Result<(), Error> {
    let (start, end) = parse_range(&args.range)?;
    let areas = load_area_table(args.area_table.as_deref())?;
    let domain = resolve_domain(&args.domain, areas.as_ref());
    let production_types = match &args.psr_table {
        Some(path) => ProductionTypeTable::from_csv_path(path)?,
        None => ProductionTypeTable::standard(),
    };
    let client = EntsoeClient::new(HttpTransport::from_env()?, production_types);
    let table = client.generation_per_type(&domain, start, end)?;

    println!(
        "{} rows, {} production types: {}",
        table.rows.len(),
        table.columns.len(),
        table.columns.join(", ")
    );
    if let Some(path) = &args.out {
        crate::io::export::write_table_csv(path, &table)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn finish_column(
    column: &TimeColumn,
    out: Option<&std::path::Path>,
    plot: &PlotArgs,
) -> Result<(), Error> {
    println!("{}: {} points", column.name, column.len());
    if plot.plot {
        println!("{}", crate::plot::render_column(column, plot.width, plot.height));
    }
    if let Some(path) = out {
        crate::io::export::write_column_csv(path, column)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn load_area_table(path: Option<&std::path::Path>) -> Result<Option<AreaTable>, Error> {
    path.map(AreaTable::from_csv_path).transpose()
}

/// Resolve a `--domain` argument: a key found in the area table maps to
/// its code, anything else passes through as a raw domain code.
fn resolve_domain(raw: &str, areas: Option<&AreaTable>) -> String {
    areas
        .and_then(|table| table.code(raw))
        .unwrap_or(raw)
        .to_string()
}

/// Parse both CLI range bounds.
pub fn parse_range(range: &RangeArgs) -> Result<(DateTime<Utc>, DateTime<Utc>), Error> {
    Ok((
        parse_instant_arg(&range.start)?,
        parse_instant_arg(&range.end)?,
    ))
}

/// Parse a CLI range bound: `YYYYMMDDHHMM` (the API's period format) or
/// a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_instant_arg(raw: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M") {
        return Ok(t.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN).and_utc());
    }
    Err(Error::InvalidTime {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_format_arguments_parse() {
        assert_eq!(
            parse_instant_arg("202304010000").unwrap(),
            Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_instant_arg("201910312300").unwrap(),
            Utc.with_ymd_and_hms(2019, 10, 31, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn bare_dates_parse_as_midnight_utc() {
        assert_eq!(
            parse_instant_arg("2023-04-01").unwrap(),
            Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn junk_time_arguments_are_rejected() {
        let err = parse_instant_arg("yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidTime { value } if value == "yesterday"));
    }

    #[test]
    fn unresolved_domains_pass_through() {
        assert_eq!(resolve_domain("10YNL----------L", None), "10YNL----------L");
    }
}
