//! End-to-end tests for the exposition parser.

use metrics_parser::{parse, UNKNOWN_VERSION};

// ============================================================================
// Cache counter accumulation and derived rates
// ============================================================================

#[test]
fn test_single_tag_with_rates() {
    let text = "mosdns_cache_query_total{tag=\"forward\"} 100\n\
                mosdns_cache_hit_total{tag=\"forward\"} 40\n";
    let snapshot = parse(text);

    let forward = &snapshot.caches["forward"];
    assert_eq!(forward.counter("query_total"), Some(100.0));
    assert_eq!(forward.counter("hit_total"), Some(40.0));
    assert_eq!(forward.hit_rate, "40.00%");
    // No lazy_hit_total line at all: absent counter, rate treats it as zero.
    assert_eq!(forward.counter("lazy_hit_total"), None);
    assert_eq!(forward.lazy_hit_rate, "0.00%");
}

#[test]
fn test_zero_query_total_avoids_division() {
    let text = "mosdns_cache_query_total{tag=\"cache\"} 0\n\
                mosdns_cache_hit_total{tag=\"cache\"} 0\n";
    let snapshot = parse(text);

    let cache = &snapshot.caches["cache"];
    assert_eq!(cache.hit_rate, "0.00%");
    assert_eq!(cache.lazy_hit_rate, "0.00%");
}

#[test]
fn test_rates_need_query_total() {
    // hit_total present but query_total never seen: denominator is absent,
    // so both rates stay at the zero sentinel.
    let snapshot = parse("mosdns_cache_hit_total{tag=\"x\"} 50\n");
    assert_eq!(snapshot.caches["x"].hit_rate, "0.00%");
}

#[test]
fn test_lazy_hit_rate() {
    let text = "mosdns_cache_query_total{tag=\"cn\"} 200\n\
                mosdns_cache_hit_total{tag=\"cn\"} 150\n\
                mosdns_cache_lazy_hit_total{tag=\"cn\"} 30\n";
    let snapshot = parse(text);

    let cn = &snapshot.caches["cn"];
    assert_eq!(cn.hit_rate, "75.00%");
    assert_eq!(cn.lazy_hit_rate, "15.00%");
}

#[test]
fn test_multiple_tags_accumulate_independently() {
    let text = "mosdns_cache_query_total{tag=\"a\"} 10\n\
                mosdns_cache_query_total{tag=\"b\"} 20\n\
                mosdns_cache_hit_total{tag=\"a\"} 5\n";
    let snapshot = parse(text);

    assert_eq!(snapshot.caches.len(), 2);
    assert_eq!(snapshot.caches["a"].hit_rate, "50.00%");
    assert_eq!(snapshot.caches["b"].hit_rate, "0.00%");
}

#[test]
fn test_unknown_cache_suffix_is_kept() {
    let snapshot = parse("mosdns_cache_size_current{tag=\"a\"} 512\n");
    assert_eq!(snapshot.caches["a"].counter("size_current"), Some(512.0));
}

#[test]
fn test_duplicate_line_last_value_wins() {
    let text = "mosdns_cache_query_total{tag=\"x\"} 1\n\
                mosdns_cache_query_total{tag=\"x\"} 2\n";
    let snapshot = parse(text);
    assert_eq!(snapshot.caches["x"].counter("query_total"), Some(2.0));
}

#[test]
fn test_scientific_notation_values() {
    let text = "mosdns_cache_query_total{tag=\"big\"} 1.23e+05\n\
                mosdns_cache_hit_total{tag=\"big\"} 1.23e+04\n";
    let snapshot = parse(text);

    let big = &snapshot.caches["big"];
    assert_eq!(big.counter("query_total"), Some(123_000.0));
    assert_eq!(big.hit_rate, "10.00%");
}

// ============================================================================
// System metrics
// ============================================================================

#[test]
fn test_resident_memory_megabytes() {
    let snapshot = parse("process_resident_memory_bytes 104857600\n");
    assert_eq!(
        snapshot.system.resident_memory.as_deref(),
        Some("100.00 MB")
    );
}

#[test]
fn test_heap_idle_memory_megabytes() {
    let snapshot = parse("go_memstats_heap_idle_bytes 52428800\n");
    assert_eq!(
        snapshot.system.heap_idle_memory.as_deref(),
        Some("50.00 MB")
    );
}

#[test]
fn test_cpu_time_suffix() {
    let snapshot = parse("process_cpu_seconds_total 12.345\n");
    assert_eq!(snapshot.system.cpu_time.as_deref(), Some("12.35 s"));
}

#[test]
fn test_integer_counts_have_no_decimals() {
    let text = "go_threads 13\nprocess_open_fds 42\n";
    let snapshot = parse(text);
    assert_eq!(snapshot.system.threads, Some(13));
    assert_eq!(snapshot.system.open_fds, Some(42));
}

#[test]
fn test_start_time_formatted_as_local_datetime() {
    let snapshot = parse("process_start_time_seconds 1.7e+09\n");
    let start = snapshot.system.start_time.unwrap();
    // "YYYY-MM-DD HH:MM:SS" in the host timezone.
    assert_eq!(start.len(), 19);
    assert!(start.as_bytes()[4] == b'-' && start.as_bytes()[7] == b'-');
    assert!(start.as_bytes()[10] == b' ' && start.as_bytes()[13] == b':');
}

#[test]
fn test_go_version_label() {
    let snapshot = parse("go_info{version=\"go1.21.4\"} 1\n");
    assert_eq!(snapshot.system.go_version, "go1.21.4");
}

// ============================================================================
// Best-effort behaviour
// ============================================================================

#[test]
fn test_empty_input() {
    let snapshot = parse("");
    assert!(snapshot.caches.is_empty());
    assert_eq!(snapshot.system.go_version, UNKNOWN_VERSION);
    assert_eq!(snapshot.system.start_time, None);
    assert_eq!(snapshot.system.cpu_time, None);
    assert_eq!(snapshot.system.resident_memory, None);
    assert_eq!(snapshot.system.heap_idle_memory, None);
    assert_eq!(snapshot.system.threads, None);
    assert_eq!(snapshot.system.open_fds, None);
}

#[test]
fn test_unrelated_lines_are_ignored() {
    let with_noise = "# HELP mosdns_cache_query_total queries\n\
                      # TYPE mosdns_cache_query_total counter\n\
                      mosdns_cache_query_total{tag=\"t\"} 8\n\
                      go_gc_duration_seconds{quantile=\"0\"} 2.1e-05\n\
                      promhttp_metric_handler_requests_total{code=\"200\"} 7\n";
    let without_noise = "mosdns_cache_query_total{tag=\"t\"} 8\n";
    assert_eq!(parse(with_noise), parse(without_noise));
}

#[test]
fn test_non_finite_values_are_skipped() {
    // A non-finite token parses as f64 but must not reach the accumulator:
    // a NaN query_total would otherwise turn the derived rate into "NaN%".
    let text = "mosdns_cache_query_total{tag=\"x\"} NaN\n\
                mosdns_cache_hit_total{tag=\"x\"} +Inf\n\
                process_cpu_seconds_total -Inf\n";
    let snapshot = parse(text);

    assert!(snapshot.caches.is_empty());
    assert_eq!(snapshot.system.cpu_time, None);
}

#[test]
fn test_non_finite_value_does_not_shadow_earlier_one() {
    let text = "mosdns_cache_query_total{tag=\"x\"} 10\n\
                mosdns_cache_query_total{tag=\"x\"} NaN\n\
                mosdns_cache_hit_total{tag=\"x\"} 5\n";
    let snapshot = parse(text);

    assert_eq!(snapshot.caches["x"].counter("query_total"), Some(10.0));
    assert_eq!(snapshot.caches["x"].hit_rate, "50.00%");
}

#[test]
fn test_parse_is_idempotent() {
    let text = "mosdns_cache_query_total{tag=\"forward\"} 100\n\
                mosdns_cache_hit_total{tag=\"forward\"} 40\n\
                process_resident_memory_bytes 104857600\n\
                go_threads 9\n\
                go_info{version=\"go1.21.4\"} 1\n";
    assert_eq!(parse(text), parse(text));
}

// ============================================================================
// JSON shape
// ============================================================================

#[test]
fn test_json_flattens_cache_counters() {
    let text = "mosdns_cache_query_total{tag=\"forward\"} 100\n\
                mosdns_cache_hit_total{tag=\"forward\"} 40\n";
    let json = serde_json::to_value(parse(text)).unwrap();

    let forward = &json["caches"]["forward"];
    assert_eq!(forward["query_total"], 100.0);
    assert_eq!(forward["hit_total"], 40.0);
    assert_eq!(forward["hit_rate"], "40.00%");
    assert_eq!(forward["lazy_hit_rate"], "0.00%");
}

#[test]
fn test_json_omits_absent_system_fields() {
    let json = serde_json::to_value(parse("go_threads 5\n")).unwrap();

    let system = json["system"].as_object().unwrap();
    assert_eq!(system["threads"], 5);
    assert_eq!(system["go_version"], "N/A");
    assert!(!system.contains_key("start_time"));
    assert!(!system.contains_key("resident_memory"));
}
