use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Saturdays, Sundays and holiday dates are special days: no work is expected.
pub fn is_special_day(date: NaiveDate, holidays: &HashSet<NaiveDate>) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || holidays.contains(&date)
}
