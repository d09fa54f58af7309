//! Line-matching parser for the mosdns exposition text.
//!
//! The rule set is closed and ordered: per-tag cache counters, a fixed set of
//! scalar process/runtime metrics matched on their exact metric name, and the
//! labeled `go_info` version line. First match wins per line; anything else
//! (comments, unrelated metrics) falls through untouched.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::format;
use crate::snapshot::{CacheStats, MetricsSnapshot, SystemStats, UNKNOWN_VERSION};

/// `mosdns_cache_<name>{tag="<tag>"} <value>`
static CACHE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^mosdns_cache_(\w+)\{tag="([^"]+)"\}\s+(\S+)"#).unwrap()
});

/// `go_info{version="<version>"} 1`
static GO_INFO_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^go_info\{version="([^"]+)"\}"#).unwrap());

/// Raw accumulator for the scalar system metrics, before display formatting.
#[derive(Debug, Default)]
struct RawSystem {
    start_time: Option<f64>,
    cpu_time: Option<f64>,
    resident_memory: Option<f64>,
    heap_idle_memory: Option<f64>,
    threads: Option<i64>,
    open_fds: Option<i64>,
    go_version: Option<String>,
}

/// Parse an exposition payload into a [`MetricsSnapshot`].
///
/// Never fails: unmatched lines are skipped, and a malformed numeric token in
/// an otherwise-matching line drops just that line (logged at debug level).
/// Duplicate lines for the same metric overwrite the earlier value.
pub fn parse(text: &str) -> MetricsSnapshot {
    let mut caches: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    let mut system = RawSystem::default();

    for line in text.lines() {
        if let Some(caps) = CACHE_LINE.captures(line) {
            match caps[3].parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    caches
                        .entry(caps[2].to_string())
                        .or_default()
                        .insert(caps[1].to_string(), value);
                }
                _ => debug!(line, "skipping cache line with malformed value"),
            }
            continue;
        }

        if let Some(caps) = GO_INFO_LINE.captures(line) {
            system.go_version = Some(caps[1].to_string());
            continue;
        }

        // Scalar lines carry no labels, so the metric name is exactly the
        // first whitespace-delimited token.
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        match name {
            "process_start_time_seconds" => set_f64(&mut system.start_time, value, line),
            "process_cpu_seconds_total" => set_f64(&mut system.cpu_time, value, line),
            "process_resident_memory_bytes" => set_f64(&mut system.resident_memory, value, line),
            "go_memstats_heap_idle_bytes" => set_f64(&mut system.heap_idle_memory, value, line),
            "go_threads" => set_i64(&mut system.threads, value, line),
            "process_open_fds" => set_i64(&mut system.open_fds, value, line),
            _ => {}
        }
    }

    MetricsSnapshot {
        caches: caches
            .into_iter()
            .map(|(tag, counters)| (tag, finish_cache(counters)))
            .collect(),
        system: finish_system(system),
    }
}

/// Derive the hit-rate fields once all counters for a tag are collected.
fn finish_cache(counters: BTreeMap<String, f64>) -> CacheStats {
    let query_total = counters.get("query_total").copied().unwrap_or(0.0);
    let hit_total = counters.get("hit_total").copied().unwrap_or(0.0);
    let lazy_hit_total = counters.get("lazy_hit_total").copied().unwrap_or(0.0);

    CacheStats {
        hit_rate: format::percent(hit_total, query_total),
        lazy_hit_rate: format::percent(lazy_hit_total, query_total),
        counters,
    }
}

/// Apply display formatting to whichever system fields were present.
fn finish_system(raw: RawSystem) -> SystemStats {
    SystemStats {
        start_time: raw.start_time.and_then(format::local_datetime),
        cpu_time: raw.cpu_time.map(format::seconds),
        resident_memory: raw.resident_memory.map(format::megabytes),
        heap_idle_memory: raw.heap_idle_memory.map(format::megabytes),
        threads: raw.threads,
        open_fds: raw.open_fds,
        go_version: raw
            .go_version
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
    }
}

// Counter and gauge values are always finite; `NaN`/`Inf` tokens only show
// up on histogram lines this parser does not consume, so treat them as
// malformed rather than letting them poison the derived rates.
fn set_f64(slot: &mut Option<f64>, value: &str, line: &str) {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => *slot = Some(v),
        _ => debug!(line, "skipping system line with malformed value"),
    }
}

fn set_i64(slot: &mut Option<i64>, value: &str, line: &str) {
    match value.parse::<i64>() {
        Ok(v) => *slot = Some(v),
        Err(_) => debug!(line, "skipping system line with malformed value"),
    }
}
