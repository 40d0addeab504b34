//! Input/output boundaries.
//!
//! Responsibilities:
//!
//! - decode the API's XML responses into tagged documents (`decode`)
//! - load read-only reference tables (`tables`)
//! - export fetched series to CSV (`export`)

pub mod decode;
pub mod export;
pub mod tables;
