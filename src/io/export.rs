//! Export fetched series to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or
//! downstream scripts: one `time` column in RFC 3339, then the numeric
//! column(s), with empty cells where a pivot column has no sample.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{TimeColumn, TimeTable};
use crate::error::Error;

/// Write a single-column series (`time,<name>` header).
pub fn write_column_csv(path: &Path, column: &TimeColumn) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| create_error(path, e))?;
    write_column(file, column).map_err(|e| write_error(path, e))
}

/// Write a pivot table (`time,<label...>` header).
pub fn write_table_csv(path: &Path, table: &TimeTable) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| create_error(path, e))?;
    write_table(file, table).map_err(|e| write_error(path, e))
}

fn write_column(mut w: impl Write, column: &TimeColumn) -> std::io::Result<()> {
    writeln!(w, "time,{}", csv_field(&column.name))?;
    for (ts, value) in &column.rows {
        writeln!(w, "{},{value}", ts.to_rfc3339())?;
    }
    Ok(())
}

fn write_table(mut w: impl Write, table: &TimeTable) -> std::io::Result<()> {
    write!(w, "time")?;
    for label in &table.columns {
        write!(w, ",{}", csv_field(label))?;
    }
    writeln!(w)?;

    for (ts, cells) in &table.rows {
        write!(w, "{}", ts.to_rfc3339())?;
        for cell in cells {
            match cell {
                Some(value) => write!(w, ",{value}")?,
                None => write!(w, ",")?,
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Quote a header field if it would break the row; labels come from an
/// external table and are not under our control.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn create_error(path: &Path, e: std::io::Error) -> Error {
    Error::Io {
        context: format!("failed to create '{}'", path.display()),
        source: e,
    }
}

fn write_error(path: &Path, e: std::io::Error) -> Error {
    Error::Io {
        context: format!("failed to write '{}'", path.display()),
        source: e,
    }
}
