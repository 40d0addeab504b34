//! Error types shared across the crate.
//!
//! Every failure is a typed, catchable variant with enough context to
//! diagnose without re-running: the failing request window, the offending
//! resolution code, the out-of-range position. A raised error aborts the
//! in-flight query; the batch driver decides whether to skip one query and
//! continue with the next.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The API token is not configured.
    #[error("no security token found; set the environment variable `ENTSOE_TOKEN`")]
    MissingToken,

    /// The API answered with a non-success status.
    #[error("transport error (status {status}): {body}")]
    Transport { status: u16, body: String },

    /// The request itself failed (connect, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A multi-window fetch aborted; `source` carries the transport
    /// failure, this variant pins down which window it hit.
    #[error("fetch failed for window {start}..{end}: {source}")]
    Fetch {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        source: Box<Error>,
    },

    /// A period declared a resolution code outside the fixed table.
    #[error("unknown resolution code '{0}'")]
    UnknownResolution(String),

    /// A point's 1-based position does not land inside the sampling index.
    #[error("point position {position} outside sampling index of length {len}")]
    PositionOutOfRange { position: u32, len: usize },

    /// A point value did not parse as a number.
    #[error("value '{value}' is not numeric")]
    NumericConversion { value: String },

    /// The document tree is malformed (bad XML, bad interval, missing
    /// value element). A missing root tag is NOT this error: unrecognized
    /// documents contribute zero rows instead.
    #[error("document decode failed: {0}")]
    Decode(String),

    /// A reference or config table could not be read.
    #[error("{path}: {message}")]
    Table { path: String, message: String },

    /// A CLI time argument in neither accepted format.
    #[error("invalid time '{value}': expected YYYYMMDDHHMM or YYYY-MM-DD")]
    InvalidTime { value: String },

    /// A local file operation failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code for the `entsoe` binary.
    ///
    /// 2: configuration and file problems, 3: malformed market data,
    /// 4: network failures. A window-annotated fetch error reports its
    /// underlying class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::MissingToken
            | Error::Table { .. }
            | Error::InvalidTime { .. }
            | Error::Io { .. } => 2,
            Error::UnknownResolution(_)
            | Error::PositionOutOfRange { .. }
            | Error::NumericConversion { .. }
            | Error::Decode(_) => 3,
            Error::Transport { .. } | Error::Http(_) => 4,
            Error::Fetch { source, .. } => source.exit_code(),
        }
    }
}
