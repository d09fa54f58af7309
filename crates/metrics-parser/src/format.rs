//! Display formatting for derived metric values.

use chrono::{Local, TimeZone};

/// Format `numerator / denominator` as a two-decimal percentage string.
///
/// Returns `"0.00%"` when the denominator is zero or negative, which covers
/// both "no queries yet" and "counter line missing" without a division error.
pub fn percent(numerator: f64, denominator: f64) -> String {
    if denominator > 0.0 {
        format!("{:.2}%", numerator / denominator * 100.0)
    } else {
        "0.00%".to_string()
    }
}

/// Format a byte count as megabytes with a unit suffix.
pub fn megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / (1024.0 * 1024.0))
}

/// Format a duration in seconds with a unit suffix.
pub fn seconds(secs: f64) -> String {
    format!("{:.2} s", secs)
}

/// Format an epoch timestamp as a local `YYYY-MM-DD HH:MM:SS` string.
///
/// Fractional seconds are truncated. Returns `None` for timestamps outside
/// the representable range, which the caller treats as "field absent".
pub fn local_datetime(epoch_secs: f64) -> Option<String> {
    Local
        .timestamp_opt(epoch_secs.trunc() as i64, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
