//! Descriptive statistics over parsed chat exports.
//!
//! The core exposes the domain record, the pure aggregation views, and the
//! ports that ingest and presentation adapters implement.

pub mod aggregator;
pub mod application;
pub mod domain;
pub mod error;
pub mod links;
pub mod ports;
pub mod stop_words;
pub mod utils;

pub use error::{Result, StatsError};
