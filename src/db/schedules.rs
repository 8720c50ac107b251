use crate::db::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{Schedule, WorkPeriod};
use chrono::{Datelike, NaiveTime, Weekday};
use rusqlite::{Connection, params};

fn parse_hm(col: usize, s: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| conversion_error(col, AppError::InvalidTime(s.to_string())))
}

/// Replace every period of the employee on `weekday` with `periods`.
/// Callers run it inside a transaction.
pub fn replace_schedule(
    conn: &Connection,
    employee_id: i64,
    weekday: Weekday,
    periods: &[WorkPeriod],
) -> AppResult<()> {
    let wd = weekday.num_days_from_monday();

    conn.execute(
        "DELETE FROM schedules WHERE employee_id = ?1 AND weekday = ?2",
        params![employee_id, wd],
    )?;
    for p in periods {
        conn.execute(
            "INSERT INTO schedules (employee_id, weekday, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                employee_id,
                wd,
                p.start.format("%H:%M").to_string(),
                p.end.format("%H:%M").to_string(),
            ],
        )?;
    }
    Ok(())
}

pub fn load_schedule(conn: &Connection, employee_id: i64, weekday: Weekday) -> AppResult<Schedule> {
    let mut stmt = conn.prepare(
        "SELECT start_time, end_time FROM schedules
         WHERE employee_id = ?1 AND weekday = ?2
         ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map(params![employee_id, weekday.num_days_from_monday()], |row| {
        let start: String = row.get(0)?;
        let end: String = row.get(1)?;
        Ok(WorkPeriod {
            start: parse_hm(0, &start)?,
            end: parse_hm(1, &end)?,
        })
    })?;

    let mut periods = Vec::new();
    for r in rows {
        periods.push(r?);
    }
    Ok(Schedule {
        employee_id,
        weekday,
        periods,
    })
}

/// Schedules of the employee for the weekdays that have at least one period.
pub fn load_week(conn: &Connection, employee_id: i64) -> AppResult<Vec<Schedule>> {
    let mut out = Vec::new();
    let mut wd = Weekday::Mon;
    for _ in 0..7 {
        let s = load_schedule(conn, employee_id, wd)?;
        if !s.periods.is_empty() {
            out.push(s);
        }
        wd = wd.succ();
    }
    Ok(out)
}
