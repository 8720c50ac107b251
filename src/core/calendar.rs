//! Holiday and schedule maintenance.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{employees, holidays, schedules};
use crate::errors::{AppError, AppResult};
use crate::models::holiday::{Holiday, HolidayScope};
use crate::models::schedule::{Schedule, WorkPeriod};
use crate::utils::time::parse_required_time;
use chrono::{NaiveDate, Weekday};

pub struct HolidayLogic;

impl HolidayLogic {
    pub fn add(pool: &DbPool, date: NaiveDate, description: &str, scope: HolidayScope) -> AppResult<i64> {
        pool.with_tx(|conn| {
            let id = holidays::insert_holiday(conn, date, description.trim(), scope)?;
            ttlog(conn, "holiday", &date.to_string(), &format!("added: {description}"))?;
            Ok(id)
        })
    }

    pub fn list(pool: &DbPool, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Holiday>> {
        pool.with_conn(|conn| holidays::list_holidays(conn, start, end))
    }

    pub fn set_active(pool: &DbPool, date: NaiveDate, active: bool) -> AppResult<()> {
        pool.with_tx(|conn| {
            holidays::set_active(conn, date, active)?;
            let what = if active { "activated" } else { "deactivated" };
            ttlog(conn, "holiday", &date.to_string(), what)
        })
    }

    pub fn delete(pool: &DbPool, date: NaiveDate) -> AppResult<()> {
        pool.with_tx(|conn| {
            holidays::delete_holiday(conn, date)?;
            ttlog(conn, "holiday", &date.to_string(), "deleted")
        })
    }
}

/// Parse `HH:MM-HH:MM` into a work period.
pub fn parse_period(s: &str) -> AppResult<WorkPeriod> {
    let (a, b) = s
        .split_once('-')
        .ok_or_else(|| AppError::InvalidValue { field: "period", value: s.to_string() })?;
    let start = parse_required_time(a.trim())?;
    let end = parse_required_time(b.trim())?;
    if end <= start {
        return Err(AppError::InvalidValue { field: "period", value: s.to_string() });
    }
    Ok(WorkPeriod { start, end })
}

/// Weekday from `0..=6` (Monday = 0) or an English name/abbreviation.
pub fn parse_weekday(s: &str) -> AppResult<Weekday> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return Weekday::try_from(n)
            .map_err(|_| AppError::InvalidValue { field: "weekday", value: s.to_string() });
    }
    s.parse::<Weekday>()
        .map_err(|_| AppError::InvalidValue { field: "weekday", value: s.to_string() })
}

pub struct ScheduleLogic;

impl ScheduleLogic {
    /// Replace the periods of one weekday. An empty list clears it, so the
    /// default quota applies again.
    pub fn set(pool: &DbPool, employee_id: i64, weekday: Weekday, periods: &[WorkPeriod]) -> AppResult<()> {
        let mut sorted = periods.to_vec();
        sorted.sort_by_key(|p| p.start);
        if sorted.windows(2).any(|w| w[1].start < w[0].end) {
            return Err(AppError::InvalidValue {
                field: "period",
                value: "overlapping periods".into(),
            });
        }

        pool.with_tx(|conn| {
            if !employees::employee_exists(conn, employee_id)? {
                return Err(AppError::EmployeeNotFound(employee_id.to_string()));
            }
            schedules::replace_schedule(conn, employee_id, weekday, &sorted)?;
            ttlog(
                conn,
                "schedule",
                &employee_id.to_string(),
                &format!("{weekday}: {} period(s)", sorted.len()),
            )
        })
    }

    pub fn week(pool: &DbPool, employee_id: i64) -> AppResult<Vec<Schedule>> {
        pool.with_conn(|conn| schedules::load_week(conn, employee_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::employees::insert_employee;
    use chrono::TimeDelta;

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("0").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("6").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("fri").unwrap(), Weekday::Fri);
        assert!(parse_weekday("7").is_err());
    }

    #[test]
    fn test_parse_period() {
        let p = parse_period("08:00-12:00").unwrap();
        assert_eq!(p.duration(), TimeDelta::hours(4));
        assert!(parse_period("12:00-08:00").is_err());
        assert!(parse_period("08:00").is_err());
    }

    #[test]
    fn test_duplicate_holiday_rejected() {
        let pool = DbPool::open_in_memory().unwrap();
        let d = NaiveDate::from_ymd_opt(2025, 4, 21).unwrap();
        HolidayLogic::add(&pool, d, "Tiradentes", HolidayScope::National).unwrap();
        assert!(matches!(
            HolidayLogic::add(&pool, d, "again", HolidayScope::Local),
            Err(AppError::HolidayExists(_))
        ));
    }

    #[test]
    fn test_schedule_replace_and_overlap() {
        let pool = DbPool::open_in_memory().unwrap();
        let emp = pool.with_conn(|c| insert_employee(c, "Ana", "1")).unwrap();

        let periods = [parse_period("13:00-17:00").unwrap(), parse_period("08:00-12:00").unwrap()];
        ScheduleLogic::set(&pool, emp, Weekday::Mon, &periods).unwrap();
        ScheduleLogic::set(&pool, emp, Weekday::Mon, &periods).unwrap();

        let week = ScheduleLogic::week(&pool, emp).unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].periods.len(), 2);
        assert_eq!(week[0].quota(), TimeDelta::hours(8));

        let overlapping = [parse_period("08:00-12:00").unwrap(), parse_period("11:00-13:00").unwrap()];
        assert!(ScheduleLogic::set(&pool, emp, Weekday::Tue, &overlapping).is_err());
    }
}
