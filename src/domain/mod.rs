//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed resolution table (`Resolution`)
//! - period intervals and the value-column selector
//! - decoded series and the two output shapes (`TimeColumn`, `TimeTable`)

pub mod types;

pub use types::*;
