use super::day_result::DayStatus;
use super::punch_kind::PunchKind;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Projection row owned by the period processor.
///
/// `id` and `processed_at` are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedPunch {
    pub id: i64,
    pub employee_id: i64,
    pub punch_id: Option<i64>,
    pub timestamp: NaiveDateTime,
    pub kind: PunchKind,
    pub status: DayStatus,
    pub justification_id: Option<i64>,
    pub processed_by: String,
    pub processed_at: String,
}
