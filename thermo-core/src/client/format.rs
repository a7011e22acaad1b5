//! Pure display helpers. None of these fail: unformattable input falls
//! back to a placeholder or to the raw value.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::{Measurement, Tier};

pub const PLACEHOLDER: &str = "--";
pub const NO_RESPONSE: &str = "No response received.";

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// One digit after the decimal point, or `--` for anything non-numeric.
pub fn format_temperature(value: &Measurement) -> String {
    match value.as_f64() {
        Some(v) if v.is_finite() => format!("{v:.1}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Render a timestamp in local time. Absent or `"unknown"` gives `--`;
/// anything unparsable is returned as-is.
pub fn format_timestamp(raw: Option<&str>) -> String {
    format_timestamp_in(raw, &Local)
}

pub fn format_timestamp_in<Tz>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let raw = match raw {
        None | Some("") | Some("unknown") => return PLACEHOLDER.to_string(),
        Some(raw) => raw,
    };

    match parse_timestamp(raw, tz) {
        Some(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Zoned RFC 3339 first; zone-less date-times are taken as local to `tz`
/// (the sensor writes `YYYY-MM-DD HH:MM:SS`), bare dates as UTC midnight.
fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Breakpoints are exclusive upper bounds.
pub fn temperature_tier(celsius: f64) -> Tier {
    if celsius < 16.0 {
        Tier::Cold
    } else if celsius < 20.0 {
        Tier::Cool
    } else if celsius < 24.0 {
        Tier::Comfortable
    } else if celsius < 28.0 {
        Tier::Warm
    } else {
        Tier::Hot
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape an answer and turn newlines into `<br>`.
pub fn format_response(text: &str) -> String {
    if text.is_empty() {
        return NO_RESPONSE.to_string();
    }
    escape_html(text).replace('\n', "<br>")
}
