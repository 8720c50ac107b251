use crate::models::day_result::DayResult;
use crate::utils::time::format_duration;
use serde::Serialize;

/// Flat row for exporting one reconciled day.
#[derive(Serialize, Clone, Debug)]
pub struct DayExport {
    pub employee_id: i64,
    pub date: String,
    pub status: String,
    /// Punch times separated by spaces.
    pub punches: String,
    pub worked: String,
    pub extra: String,
    pub short: String,
    pub justification_id: Option<i64>,
    pub observation: String,
}

impl DayExport {
    pub fn from_day(employee_id: i64, day: &DayResult) -> Self {
        Self {
            employee_id,
            date: day.date.format("%Y-%m-%d").to_string(),
            status: day.status.to_db_str().to_string(),
            punches: day.punches.join(" "),
            worked: format_duration(day.worked),
            extra: format_duration(day.extra),
            short: format_duration(day.short),
            justification_id: day.justification_id,
            observation: day.observation.clone(),
        }
    }
}
