//! Query façade and chunked fetch orchestration.
//!
//! The API rejects ranges longer than one year, so a caller's
//! `[start, end)` is walked in ≤365-day windows with one blocking request
//! each, strictly in chronological order. Later stages concatenate
//! without re-sorting, so window order is load-bearing: anything that
//! parallelizes these requests must re-sort before decoding.

use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::data::transport::{HttpTransport, Transport};
use crate::domain::{TimeColumn, TimeTable, ValueColumn};
use crate::error::Error;
use crate::io::decode::{self, MarketDocument};
use crate::io::tables::ProductionTypeTable;
use crate::series;

/// Longest range the API accepts in one request, in days.
const MAX_WINDOW_DAYS: i64 = 365;

/// Period parameter format expected by the API.
const PERIOD_FORMAT: &str = "%Y%m%d%H%M";

/// Split `[start, end)` into the contiguous, non-overlapping request
/// windows the API will see. The final window may be shorter than the
/// maximum; `start >= end` yields no windows at all.
pub fn request_windows(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let window_end = (cursor + Duration::days(MAX_WINDOW_DAYS)).min(end);
        windows.push((cursor, window_end));
        cursor = window_end;
    }
    windows
}

/// Client for the three time-series queries.
///
/// The production-type table is injected at construction (not read from
/// process-wide state) so tests and drivers can supply their own.
pub struct EntsoeClient<T: Transport> {
    transport: T,
    production_types: ProductionTypeTable,
}

impl EntsoeClient<HttpTransport> {
    /// Build a client from the environment with the standard
    /// production-type table.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            HttpTransport::from_env()?,
            ProductionTypeTable::standard(),
        ))
    }
}

impl<T: Transport> EntsoeClient<T> {
    pub fn new(transport: T, production_types: ProductionTypeTable) -> Self {
        Self {
            transport,
            production_types,
        }
    }

    /// Physical cross-border flow between two areas [12.1.G].
    pub fn physical_flows(
        &self,
        in_domain: &str,
        out_domain: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TimeColumn, Error> {
        let docs = self.fetch_documents(
            &[
                ("documentType", "A11".to_string()),
                ("in_Domain", in_domain.to_string()),
                ("out_Domain", out_domain.to_string()),
            ],
            start,
            end,
        )?;
        self.publication_column(&docs, ValueColumn::Quantity)
    }

    /// Day-ahead prices for one bidding zone [12.1.D]. The zone is both
    /// the in- and out-domain of the query.
    pub fn day_ahead_prices(
        &self,
        domain: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TimeColumn, Error> {
        let docs = self.fetch_documents(
            &[
                ("documentType", "A44".to_string()),
                ("in_Domain", domain.to_string()),
                ("out_Domain", domain.to_string()),
            ],
            start,
            end,
        )?;
        self.publication_column(&docs, ValueColumn::PriceAmount)
    }

    /// Actual generation per production type [16.1.B&C], pivoted into one
    /// column per type label.
    pub fn generation_per_type(
        &self,
        domain: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<TimeTable, Error> {
        let docs = self.fetch_documents(
            &[
                ("documentType", "A75".to_string()),
                ("processType", "A16".to_string()),
                ("in_Domain", domain.to_string()),
            ],
            start,
            end,
        )?;
        let mut decoded = Vec::new();
        for doc in &docs {
            if let MarketDocument::Generation(body) = doc {
                decoded.extend(series::decode_document_series(body, ValueColumn::Quantity)?);
            }
        }
        Ok(series::assemble_pivot(&decoded, &self.production_types))
    }

    /// Decode and assemble publication documents; other roots contribute
    /// zero rows, and no matching document at all still yields an empty
    /// column with the right name.
    fn publication_column(
        &self,
        docs: &[MarketDocument],
        column: ValueColumn,
    ) -> Result<TimeColumn, Error> {
        let mut decoded = Vec::new();
        for doc in docs {
            if let MarketDocument::Publication(body) = doc {
                decoded.extend(series::decode_document_series(body, column)?);
            }
        }
        Ok(series::assemble_column(column.name(), &decoded))
    }

    /// Fetch `[start, end)` as a chronological run of documents, one per
    /// request window.
    ///
    /// A transport failure aborts the whole fetch and discards windows
    /// already fetched; the error names the failing window.
    fn fetch_documents(
        &self,
        params: &[(&str, String)],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MarketDocument>, Error> {
        let windows = request_windows(start, end);
        let mut docs = Vec::with_capacity(windows.len());
        for (window_start, window_end) in windows {
            let body = self
                .request_window(params, window_start, window_end)
                .map_err(|e| Error::Fetch {
                    start: window_start,
                    end: window_end,
                    source: Box::new(e),
                })?;
            docs.push(decode::decode_document(&body)?);
        }
        Ok(docs)
    }

    fn request_window(
        &self,
        params: &[(&str, String)],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, Error> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("periodStart", start.format(PERIOD_FORMAT).to_string()));
        query.push(("periodEnd", end.format(PERIOD_FORMAT).to_string()));
        info!("requesting window {start}..{end}");
        self.transport.send(&query)
    }
}
