//! Unit conversion utilities for TAS sensor data
//!
//! ANT+ sensors report measurement intervals as hardware ticks; these helpers
//! turn them into seconds, derive wheel speed from revolution counters, and
//! convert the log's epoch timestamps into local time.

use chrono::{DateTime, Local, TimeZone};

/// Speed sensor event time resolution (ticks per second)
pub const SPEED_TICKS_PER_SECOND: f64 = 1024.0;

/// Power sensor tick length in seconds
pub const POWER_TICK_SECONDS: f64 = 0.0005;

/// Timestamp layout used by every table export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Round to 6 decimal places, the precision of every derived value in the log
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Convert a speed sensor interval (1/1024 s ticks) to seconds
pub fn speed_ticks_to_seconds(ticks: u64) -> f64 {
    round6(ticks as f64 / SPEED_TICKS_PER_SECOND)
}

/// Convert a power sensor interval (0.5 ms ticks) to seconds
pub fn power_ticks_to_seconds(ticks: u64) -> f64 {
    round6(ticks as f64 * POWER_TICK_SECONDS)
}

/// Wheel speed from circumference, revolution count and interval ticks.
///
/// Returns `None` for a zero-length interval.
pub fn wheel_speed(circumference: f64, revolutions: u64, ticks: u64) -> Option<f64> {
    if ticks == 0 {
        return None;
    }
    Some(round6(
        circumference * revolutions as f64 * SPEED_TICKS_PER_SECOND / ticks as f64,
    ))
}

/// Parse a `seconds.fraction` Unix epoch timestamp into local time.
///
/// The fraction is read digit by digit and rounded to microseconds, so
/// `1700000000.5` lands exactly on the half second.
pub fn parse_epoch_timestamp(text: &str) -> Option<DateTime<Local>> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let mut seconds: i64 = whole.parse().ok()?;

    let mut micros: u32 = 0;
    let mut digits = fraction.chars();
    for _ in 0..6 {
        let digit = match digits.next() {
            Some(c) => c.to_digit(10)?,
            None => 0,
        };
        micros = micros * 10 + digit;
    }
    if let Some(next) = digits.next() {
        if next.to_digit(10)? >= 5 {
            micros += 1;
        }
    }
    if micros >= 1_000_000 {
        seconds += 1;
        micros -= 1_000_000;
    }

    Local.timestamp_opt(seconds, micros * 1_000).single()
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS.ffffff`
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round6() {
        assert_eq!(round6(1.23456789), 1.234568);
        assert_eq!(round6(2.0), 2.0);
        assert_eq!(round6(0.0000004), 0.0);
    }

    #[test]
    fn test_tick_conversions() {
        assert_eq!(speed_ticks_to_seconds(2048), 2.0);
        assert_eq!(speed_ticks_to_seconds(1000), 0.976563);
        assert_eq!(power_ticks_to_seconds(1000), 0.5);
        assert_eq!(power_ticks_to_seconds(3), 0.0015);
    }

    #[test]
    fn test_wheel_speed() {
        // 50 revolutions of a 2.105 m wheel in 2 s
        assert_eq!(wheel_speed(2.105, 50, 2048), Some(52.625));
        assert_eq!(wheel_speed(2.105, 50, 0), None);
    }

    #[test]
    fn test_parse_epoch_timestamp() {
        let ts = parse_epoch_timestamp("1700000000.5").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_micros(), 500_000);

        let ts = parse_epoch_timestamp("1700000000.1234567").unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 123_457);

        let ts = parse_epoch_timestamp("1700000000.9999996").unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_001);
        assert_eq!(ts.timestamp_subsec_micros(), 0);

        assert!(parse_epoch_timestamp("abc.5").is_none());
        assert!(parse_epoch_timestamp("1700000000.5x").is_none());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = parse_epoch_timestamp("1700000000.25").unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text.len(), "YYYY-MM-DD HH:MM:SS.ffffff".len());
        assert!(text.ends_with(".250000"));
        assert_eq!(text, ts.format("%F %T%.6f").to_string());
    }
}
