// src/config/duration.rs

use std::time::Duration;

/// Parse a human duration such as `"500ms"`, `"3s"`, `"1m"` or `"2h"`.
///
/// A bare number is read as milliseconds. Values that do not fit in a
/// `u64` millisecond count are rejected instead of wrapping.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("duration '{s}' does not start with a number"));
    }

    let millis_per_unit: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        other => {
            return Err(format!(
                "unsupported duration unit '{other}'; expected ms, s, m, or h"
            ));
        }
    };

    digits
        .parse::<u64>()
        .ok()
        .and_then(|value| value.checked_mul(millis_per_unit))
        .map(Duration::from_millis)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}
