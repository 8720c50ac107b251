//! Time utilities: parsing HH:MM, duration strings, formatting durations.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, TimeDelta};
use regex::Regex;
use std::sync::OnceLock;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

pub fn parse_required_time(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)h)?\s*(?:(\d+)m)?$").expect("duration regex is valid")
    })
}

/// Parse a duration written as `8h`, `7h30m`, `450m` or `HH:MM`.
pub fn parse_duration(s: &str) -> AppResult<TimeDelta> {
    let s = s.trim();
    let invalid = || AppError::InvalidDuration(s.to_string());

    if let Some((h, m)) = s.split_once(':') {
        let hours: i64 = h.parse().map_err(|_| invalid())?;
        let minutes: i64 = m.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) {
            return Err(invalid());
        }
        return total_minutes(hours, minutes).ok_or_else(invalid);
    }

    let caps = duration_re().captures(s).ok_or_else(invalid)?;
    if caps.get(1).is_none() && caps.get(2).is_none() {
        return Err(invalid());
    }

    let part = |i: usize| -> AppResult<i64> {
        caps.get(i)
            .map(|m| m.as_str().parse::<i64>().map_err(|_| invalid()))
            .unwrap_or(Ok(0))
    };

    total_minutes(part(1)?, part(2)?).ok_or_else(invalid)
}

fn total_minutes(hours: i64, minutes: i64) -> Option<TimeDelta> {
    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(TimeDelta::try_minutes)
}

/// `HH:MM`, with a leading `-` for negative durations. Seconds are truncated.
pub fn format_duration(d: TimeDelta) -> String {
    format_minutes(d.num_minutes())
}

pub fn format_minutes(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("8h").unwrap(), TimeDelta::hours(8));
        assert_eq!(parse_duration("7h30m").unwrap(), TimeDelta::minutes(450));
        assert_eq!(parse_duration("450m").unwrap(), TimeDelta::minutes(450));
        assert_eq!(parse_duration("06:15").unwrap(), TimeDelta::minutes(375));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("eight").is_err());
        assert!(parse_duration("8:75").is_err());
    }

    #[test]
    fn test_parse_duration_overflow_is_an_error() {
        assert!(matches!(
            parse_duration("99999999999999999h"),
            Err(AppError::InvalidDuration(_))
        ));
        assert!(parse_duration("99999999999999999:00").is_err());
        assert!(parse_duration("9223372036854775807m").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::hours(8)), "08:00");
        assert_eq!(format_duration(TimeDelta::minutes(530)), "08:50");
        assert_eq!(format_duration(TimeDelta::minutes(-50)), "-00:50");
        assert_eq!(format_duration(TimeDelta::zero()), "00:00");
    }
}
