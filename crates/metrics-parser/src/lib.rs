//! Parser for the mosdns admin `/metrics` exposition text.
//!
//! This crate turns the newline-delimited Prometheus-style payload exposed by
//! a mosdns instance into a structured [`MetricsSnapshot`]: per-tag cache
//! counters with derived hit rates, plus process/runtime statistics formatted
//! for direct display in the dashboard UI.
//!
//! Parsing is best-effort by design: the upstream exposition format is not
//! stable across mosdns versions, so lines that match no known rule are
//! skipped rather than treated as errors.

pub mod format;
pub mod parse;
pub mod snapshot;

pub use parse::parse;
pub use snapshot::{CacheStats, MetricsSnapshot, SystemStats, UNKNOWN_VERSION};
