//! Remote data access.
//!
//! Responsibilities:
//!
//! - the [`transport::Transport`] seam and its blocking HTTP implementation
//! - the query façade with chunked range fetching ([`client::EntsoeClient`])

pub mod client;
pub mod transport;

pub use client::*;
pub use transport::*;
