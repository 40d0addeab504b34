//! Batch driver: fetch flows for every interconnector in a config CSV.
//!
//! Mirrors the one-file-per-pair layout of the pull scripts this tool
//! replaces: outputs land in
//! `<data-dir>/<in_country>_<out_country>_<start>-<end>.csv`, files that
//! already exist are skipped (pre-existence only; contents are not
//! validated), and a failing pair is logged and skipped so one bad
//! interconnector does not abort the whole run.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{error, info, warn};
use serde::Deserialize;

use crate::app::parse_range;
use crate::cli::PullArgs;
use crate::data::client::EntsoeClient;
use crate::error::Error;
use crate::io::export::write_column_csv;

/// One row of the interconnector config CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct Interconnector {
    pub country: String,
    pub in_country: String,
    pub out_country: String,
    pub in_domain: String,
    pub out_domain: String,
}

/// Read the interconnector config.
pub fn read_config(path: &Path) -> Result<Vec<Interconnector>, Error> {
    let file = fs::File::open(path).map_err(|e| Error::Table {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_config_from(file).map_err(|message| Error::Table {
        path: path.display().to_string(),
        message,
    })
}

fn read_config_from(reader: impl Read) -> Result<Vec<Interconnector>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row.map_err(|e| e.to_string())?);
    }
    Ok(rows)
}

/// Run `entsoe pull`.
pub fn run_pull(args: &PullArgs) -> Result<(), Error> {
    let (start, end) = parse_range(&args.range)?;
    let interconnectors = read_config(&args.config)?;
    info!("found {} interconnectors in config", interconnectors.len());

    fs::create_dir_all(&args.data_dir).map_err(|e| Error::Io {
        context: format!("failed to create '{}'", args.data_dir.display()),
        source: e,
    })?;

    let client = EntsoeClient::from_env()?;

    let mut failures = 0usize;
    for ic in &interconnectors {
        let path = args.data_dir.join(format!(
            "{}_{}_{}-{}.csv",
            ic.in_country, ic.out_country, args.range.start, args.range.end
        ));
        if path.exists() {
            info!("{} exists, skipping", path.display());
            continue;
        }

        match client.physical_flows(&ic.in_domain, &ic.out_domain, start, end) {
            Ok(column) => {
                write_column_csv(&path, &column)?;
                info!("wrote {} ({} points)", path.display(), column.len());
            }
            Err(e) => {
                error!("{} ({} -> {}): {e}", ic.country, ic.in_domain, ic.out_domain);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        warn!(
            "{failures} of {} interconnectors failed",
            interconnectors.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rows_deserialize() {
        let csv = "country,in_country,out_country,in_domain,out_domain\n\
                   GB-FR,GB,FR,10YGB----------A,10YFR-RTE------C\n\
                   NL-GB,NL,GB,10YNL----------L,10YGB----------A\n";
        let rows = read_config_from(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "GB-FR");
        assert_eq!(rows[1].in_domain, "10YNL----------L");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let csv = "country,in_country\nGB-FR,GB\n";
        assert!(read_config_from(csv.as_bytes()).is_err());
    }
}
