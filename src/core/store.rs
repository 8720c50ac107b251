//! Collaborator contracts consumed by the reconciliation engine.
//!
//! The SQLite implementation lives in `db::store`; tests plug in their own.

use crate::errors::AppResult;
use crate::models::justification::Justification;
use crate::models::processed_punch::ProcessedPunch;
use crate::models::punch::Punch;
use chrono::{NaiveDate, TimeDelta, Weekday};
use std::collections::HashSet;

pub trait EmployeeDirectory {
    fn employee_exists(&self, employee_id: i64) -> AppResult<bool>;
}

pub trait PunchSource {
    /// Raw punches of the employee with a timestamp inside `[start, end]` (whole days).
    fn list_punches(&self, employee_id: i64, start: NaiveDate, end: NaiveDate)
    -> AppResult<Vec<Punch>>;
}

pub trait JustificationSource {
    /// The most recently approved justification for that employee and date.
    /// Pending and rejected requests are never returned.
    fn find_approved_justification(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<Justification>>;
}

pub trait HolidaySource {
    /// Dates of active holidays inside `[start, end]`.
    fn list_holidays(&self, start: NaiveDate, end: NaiveDate) -> AppResult<HashSet<NaiveDate>>;
}

pub trait ScheduleSource {
    /// `None` when the employee has no schedule for that weekday.
    fn expected_quota(&self, employee_id: i64, weekday: Weekday) -> AppResult<Option<TimeDelta>>;
}

pub trait ProcessedPunchSink {
    /// Atomically swap every processed punch of the employee on `date` for `rows`.
    fn replace_processed_punches(
        &self,
        employee_id: i64,
        date: NaiveDate,
        rows: &[ProcessedPunch],
    ) -> AppResult<()>;
}

/// Every read-side collaborator the period processor needs.
pub trait AttendanceSource:
    EmployeeDirectory + PunchSource + JustificationSource + HolidaySource + ScheduleSource
{
}

impl<T> AttendanceSource for T where
    T: EmployeeDirectory + PunchSource + JustificationSource + HolidaySource + ScheduleSource
{
}
