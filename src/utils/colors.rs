//! ANSI color helper utilities for terminal output.

use crate::models::day_result::DayStatus;
use chrono::TimeDelta;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

pub fn color_for_status(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Regular => GREEN,
        DayStatus::Irregular => RED,
        DayStatus::Justified => YELLOW,
    }
}

/// Zero durations are greyed out.
pub fn color_for_duration(d: TimeDelta, nonzero: &'static str) -> &'static str {
    if d.num_minutes() == 0 { GREY } else { nonzero }
}

pub fn paint(value: &str, color: &str) -> String {
    format!("{color}{value}{RESET}")
}
