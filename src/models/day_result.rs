use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Regular,
    Irregular,
    Justified,
}

impl DayStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DayStatus::Regular => "regular",
            DayStatus::Irregular => "irregular",
            DayStatus::Justified => "justified",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(DayStatus::Regular),
            "irregular" => Some(DayStatus::Irregular),
            "justified" => Some(DayStatus::Justified),
            _ => None,
        }
    }
}

/// Classification of one employee day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResult {
    pub date: NaiveDate,
    pub status: DayStatus,
    /// Punch times of the day (`HH:MM`), in chronological order.
    pub punches: Vec<String>,
    pub worked: TimeDelta,
    pub extra: TimeDelta,
    pub short: TimeDelta,
    pub justification_id: Option<i64>,
    pub observation: String,
}

/// Outcome of reconciling one employee over a date range.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub employee_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: usize,
    pub regular: usize,
    pub irregular: usize,
    pub justified: usize,
    pub per_day: Vec<DayResult>,
    pub errors: Vec<String>,
}

impl AggregateResult {
    pub fn new(employee_id: i64, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            employee_id,
            start,
            end,
            total_days: 0,
            regular: 0,
            irregular: 0,
            justified: 0,
            per_day: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Count a successfully persisted day.
    pub fn record(&mut self, day: DayResult) {
        self.total_days += 1;
        match day.status {
            DayStatus::Regular => self.regular += 1,
            DayStatus::Irregular => self.irregular += 1,
            DayStatus::Justified => self.justified += 1,
        }
        self.per_day.push(day);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
