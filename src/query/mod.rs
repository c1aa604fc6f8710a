//! Query parameter parsing
//!
//! The CLI and the web API receive page, limit, goto and timeout as strings.
//! These helpers turn them into typed values, falling back to defaults for
//! anything missing or invalid:
//! - page: positive integer, else 1
//! - limit: positive integer, else 10
//! - goto: positive integer, else 0 (no goto)
//! - timeout: duration such as `5000ms`, `2s` or `1m30s`, else the default

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Page size used when none is given
pub const DEFAULT_LIMIT: u32 = 10;

static DURATION_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*\.?[0-9]*)(ns|us|µs|μs|ms|s|m|h)").expect("valid regex"));

/// Parse a page number
pub fn parse_page(page: Option<&str>) -> u32 {
    parse_positive(page).unwrap_or(1)
}

/// Parse a page size
pub fn parse_limit(limit: Option<&str>) -> u32 {
    parse_positive(limit).unwrap_or(DEFAULT_LIMIT)
}

/// Parse a goto index
pub fn parse_goto(goto: Option<&str>) -> usize {
    parse_positive(goto).map(|g| g as usize).unwrap_or(0)
}

/// Parse a timeout, falling back to `default`
pub fn parse_timeout(timeout: Option<&str>, default: Duration) -> Duration {
    timeout
        .filter(|t| !t.trim().is_empty())
        .and_then(parse_duration)
        .unwrap_or(default)
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

/// Parse a duration string made of decimal numbers with unit suffixes
///
/// Accepts `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`, possibly combined
/// (`1h15m30.5s`). A bare `0` is zero. Negative durations are rejected.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let mut rest = input.trim();
    if rest == "0" {
        return Some(Duration::ZERO);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total = 0f64;
    while !rest.is_empty() {
        let caps = DURATION_PART.captures(rest)?;
        let number = caps.get(1)?.as_str();
        if number.is_empty() || number == "." {
            return None;
        }
        let value: f64 = number.parse().ok()?;
        let nanos_per_unit = match caps.get(2)?.as_str() {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        total += value * nanos_per_unit;
        rest = &rest[caps.get(0)?.end()..];
    }

    if !total.is_finite() || total > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(total.round() as u64))
}
