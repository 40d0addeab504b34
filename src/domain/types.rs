//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built up incrementally while windows are fetched and decoded
//! - exported to CSV
//! - constructed directly in tests without any network or XML involved

use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::error::Error;

/// Sampling step of a `Period`, keyed by the API's ISO-8601-style codes.
///
/// The set is closed: any code outside it is an
/// [`Error::UnknownResolution`], never a silent default. Sub-monthly
/// resolutions are fixed durations; `P1M`/`P1Y` follow the calendar so
/// positions land on real month boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    QuarterHour,
    HalfHour,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Error> {
        match code {
            "PT15M" => Ok(Resolution::QuarterHour),
            "PT30M" => Ok(Resolution::HalfHour),
            "PT60M" => Ok(Resolution::Hour),
            "P1D" => Ok(Resolution::Day),
            "P7D" => Ok(Resolution::Week),
            "P1M" => Ok(Resolution::Month),
            "P1Y" => Ok(Resolution::Year),
            other => Err(Error::UnknownResolution(other.to_string())),
        }
    }
}

impl Resolution {
    /// The wire code for this resolution.
    pub fn code(self) -> &'static str {
        match self {
            Resolution::QuarterHour => "PT15M",
            Resolution::HalfHour => "PT30M",
            Resolution::Hour => "PT60M",
            Resolution::Day => "P1D",
            Resolution::Week => "P7D",
            Resolution::Month => "P1M",
            Resolution::Year => "P1Y",
        }
    }

    /// Advance a timestamp by one sampling step.
    pub fn advance(self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Resolution::QuarterHour => t + Duration::minutes(15),
            Resolution::HalfHour => t + Duration::minutes(30),
            Resolution::Hour => t + Duration::minutes(60),
            Resolution::Day => t + Duration::days(1),
            Resolution::Week => t + Duration::weeks(1),
            Resolution::Month => t + Months::new(1),
            Resolution::Year => t + Months::new(12),
        }
    }
}

/// The time interval declared by a `Period` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        if start >= end {
            return Err(Error::Decode(format!(
                "period interval start {start} is not before end {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Which element of a `Point` carries the numeric payload.
///
/// Flows and generation use `<quantity>`; day-ahead prices use
/// `<price.amount>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    Quantity,
    PriceAmount,
}

impl ValueColumn {
    /// Column name as it appears on the wire and in CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            ValueColumn::Quantity => "quantity",
            ValueColumn::PriceAmount => "price.amount",
        }
    }
}

/// One decoded series: the optional production-type code plus timestamped
/// values in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSeries {
    pub production_type: Option<String>,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

/// A single named, time-indexed numeric column.
///
/// Rows keep fetch order. Duplicate timestamps are retained: they can
/// only arise from overlapping caller ranges, and the column reflects
/// exactly what was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeColumn {
    pub name: String,
    pub rows: Vec<(DateTime<Utc>, f64)>,
}

impl TimeColumn {
    /// An empty column that still carries its name, for "no data" results.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A time-indexed table with one column per production-type label.
///
/// Columns are ordered alphabetically by label regardless of input order;
/// downstream files and comparisons depend on that determinism. Rows
/// ascend by timestamp, with `None` where a column has no sample at that
/// instant (outer-join alignment).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    pub columns: Vec<String>,
    pub rows: Vec<(DateTime<Utc>, Vec<Option<f64>>)>,
}

impl TimeTable {
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
