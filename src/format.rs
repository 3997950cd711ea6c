//! Unit conversions and text for the results table.

use chrono::TimeZone;

const INVALID_DATE: &str = "NaN-NaN-NaN\nNaN:NaN";

/// `YYYY-MM-DD\nHH:MM` in `tz`.
pub fn timestamp_in<Tz: TimeZone>(secs: f64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if !secs.is_finite() {
        return INVALID_DATE.to_string();
    }
    let millis = (secs * 1000.0).trunc() as i64;
    match tz.timestamp_millis_opt(millis).single() {
        Some(at) => at.format("%Y-%m-%d\n%H:%M").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Bytes per second to Mbit/s, rounded to three decimals.
pub fn mbits(bytes_per_sec: f64) -> f64 {
    round_to(bytes_per_sec * 8.0 / 1_000_000.0, 3)
}

/// Seconds to whole milliseconds.
pub fn millis(secs: f64) -> f64 {
    round_to(secs * 1000.0, 0)
}

pub fn millis_text(secs: f64) -> String {
    format!("{} ms", fixed(millis(secs), 0))
}

pub fn rate_text(bytes_per_sec: f64) -> String {
    format!("{} Mbit/s", fixed(mbits(bytes_per_sec), 3))
}

// Infinities are spelled out the way browsers print them.
fn fixed(value: f64, decimals: usize) -> String {
    if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

// Halves round away from zero; the trailing `+ 0.0` turns -0 into 0.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale + 0.0
}
