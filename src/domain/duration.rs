use chrono::TimeDelta;

/// Parses a compact duration like `30s`, `90m`, `1h`, `2d` or `1w`.
///
/// Returns `None` for anything else (empty input, unknown unit, negative or
/// non-numeric value).
pub fn parse_duration(input: &str) -> Option<TimeDelta> {
    let input = input.trim();
    if input.len() < 2 {
        return None;
    }

    let (digits, unit) = input.split_at(input.len() - 1);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: i64 = digits.parse().ok()?;

    let unit_secs = match unit.to_ascii_lowercase().as_str() {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        "w" => 60 * 60 * 24 * 7,
        _ => return None,
    };

    TimeDelta::try_seconds(value.checked_mul(unit_secs)?)
}

/// Renders a duration as a short wait-time string: `"2h 5m"`, `"45m"`,
/// `"30s"`, or `"now"` for anything that has already elapsed.
pub fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_seconds();
    if secs <= 0 {
        return "now".to_string();
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{secs}s")
    }
}
