//! filefd-exporter - kernel file descriptor statistics for Prometheus
//!
//! This library reads `/proc/sys/fs/file-nr` and exposes its counters as
//! gauges, either through a Prometheus scrape endpoint or as JSON lines.
pub mod cli;
pub mod collector;
pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod internal_metrics;
pub mod outputs;

// Re-export core types for convenience
pub use crate::core::*;
pub use error::{CollectorError, StatError};
