//! SQLite-backed collaborators for the period processor.

use crate::core::store::{
    EmployeeDirectory, HolidaySource, JustificationSource, ProcessedPunchSink, PunchSource,
    ScheduleSource,
};
use crate::db::pool::DbPool;
use crate::db::{employees, holidays, justifications, processed, punches, schedules};
use crate::errors::AppResult;
use crate::models::justification::Justification;
use crate::models::processed_punch::ProcessedPunch;
use crate::models::punch::Punch;
use chrono::{NaiveDate, TimeDelta, Weekday};
use std::collections::HashSet;

impl EmployeeDirectory for DbPool {
    fn employee_exists(&self, employee_id: i64) -> AppResult<bool> {
        self.with_conn(|conn| employees::employee_exists(conn, employee_id))
    }
}

impl PunchSource for DbPool {
    fn list_punches(&self, employee_id: i64, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Punch>> {
        self.with_conn(|conn| punches::list_punches(conn, employee_id, start, end))
    }
}

impl JustificationSource for DbPool {
    fn find_approved_justification(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> AppResult<Option<Justification>> {
        self.with_conn(|conn| justifications::find_approved(conn, employee_id, date))
    }
}

impl HolidaySource for DbPool {
    fn list_holidays(&self, start: NaiveDate, end: NaiveDate) -> AppResult<HashSet<NaiveDate>> {
        self.with_conn(|conn| holidays::active_dates(conn, start, end))
    }
}

impl ScheduleSource for DbPool {
    fn expected_quota(&self, employee_id: i64, weekday: Weekday) -> AppResult<Option<TimeDelta>> {
        let schedule = self.with_conn(|conn| schedules::load_schedule(conn, employee_id, weekday))?;
        if schedule.periods.is_empty() {
            Ok(None)
        } else {
            Ok(Some(schedule.quota()))
        }
    }
}

impl ProcessedPunchSink for DbPool {
    fn replace_processed_punches(
        &self,
        employee_id: i64,
        date: NaiveDate,
        rows: &[ProcessedPunch],
    ) -> AppResult<()> {
        self.with_conn(|conn| processed::replace_for_day(conn, employee_id, date, rows))
    }
}
