//! Parsed metrics model served to the dashboard UI.

use std::collections::BTreeMap;

use serde::Serialize;

/// Sentinel version string used when no `go_info` line was seen.
pub const UNKNOWN_VERSION: &str = "N/A";

/// Counters and derived rates for a single cache plugin tag.
///
/// Raw counters are serde-flattened so the JSON shape matches what the
/// dashboard expects: `{"query_total": 100.0, "hit_total": 40.0,
/// "hit_rate": "40.00%", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Raw counter values keyed by metric-name suffix (`query_total`,
    /// `hit_total`, `lazy_hit_total`, and any other suffix the upstream
    /// exposes under `mosdns_cache_*`).
    #[serde(flatten)]
    pub counters: BTreeMap<String, f64>,

    /// `hit_total / query_total` as a percentage string, `"0.00%"` when
    /// `query_total` is zero or absent.
    pub hit_rate: String,

    /// Same as `hit_rate` but over `lazy_hit_total`.
    pub lazy_hit_rate: String,
}

impl CacheStats {
    /// Look up a raw counter by metric-name suffix.
    pub fn counter(&self, name: &str) -> Option<f64> {
        self.counters.get(name).copied()
    }
}

/// Process and Go-runtime statistics.
///
/// Every field except `go_version` is optional: a field stays `None` (and is
/// omitted from the JSON) when the corresponding line never appeared in the
/// scrape, which is distinct from a zero value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStats {
    /// Process start time, formatted as local `YYYY-MM-DD HH:MM:SS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Total CPU seconds consumed, formatted as `"N.NN s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_time: Option<String>,

    /// Resident set size, formatted as `"N.NN MB"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_memory: Option<String>,

    /// Idle heap bytes, formatted as `"N.NN MB"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heap_idle_memory: Option<String>,

    /// OS thread count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<i64>,

    /// Open file descriptor count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_fds: Option<i64>,

    /// Go runtime version from the `go_info` label, `"N/A"` if absent.
    pub go_version: String,
}

impl Default for SystemStats {
    fn default() -> Self {
        Self {
            start_time: None,
            cpu_time: None,
            resident_memory: None,
            heap_idle_memory: None,
            threads: None,
            open_fds: None,
            go_version: UNKNOWN_VERSION.to_string(),
        }
    }
}

/// One parsed scrape of the upstream `/metrics` endpoint.
///
/// Constructed fresh on every parse call and immutable afterwards; there is
/// no identity beyond the request/response cycle it serves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Per-cache-tag statistics. Empty (not absent) when the scrape carried
    /// no `mosdns_cache_*` lines at all.
    pub caches: BTreeMap<String, CacheStats>,

    /// Process/runtime statistics.
    pub system: SystemStats,
}
