use crate::db::{DATE_FMT, conversion_error, parse_date_col};
use crate::errors::{AppError, AppResult};
use crate::models::holiday::{Holiday, HolidayScope};
use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, Row, params};
use std::collections::HashSet;

fn map_row(row: &Row) -> rusqlite::Result<Holiday> {
    let date: String = row.get(1)?;
    let scope: String = row.get(3)?;
    Ok(Holiday {
        id: row.get(0)?,
        date: parse_date_col(1, &date)?,
        description: row.get(2)?,
        scope: HolidayScope::from_db_str(&scope).ok_or_else(|| {
            conversion_error(3, AppError::InvalidValue { field: "scope", value: scope.clone() })
        })?,
        active: row.get(4)?,
    })
}

pub fn insert_holiday(
    conn: &Connection,
    date: NaiveDate,
    description: &str,
    scope: HolidayScope,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO holidays (date, description, scope, active) VALUES (?1, ?2, ?3, 1)",
        params![date.format(DATE_FMT).to_string(), description, scope.to_db_str()],
    );
    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::HolidayExists(date))
        }
        Err(e) => Err(e.into()),
    }
}

/// Every holiday (active or not) within `[start, end]`, ordered by date.
pub fn list_holidays(conn: &Connection, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<Holiday>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, scope, active
         FROM holidays
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date ASC",
    )?;
    let rows = stmt.query_map(
        params![start.format(DATE_FMT).to_string(), end.format(DATE_FMT).to_string()],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn active_dates(conn: &Connection, start: NaiveDate, end: NaiveDate) -> AppResult<HashSet<NaiveDate>> {
    Ok(list_holidays(conn, start, end)?
        .into_iter()
        .filter(|h| h.active)
        .map(|h| h.date)
        .collect())
}

pub fn set_active(conn: &Connection, date: NaiveDate, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE holidays SET active = ?1 WHERE date = ?2",
        params![active, date.format(DATE_FMT).to_string()],
    )?;
    if n == 0 {
        return Err(AppError::HolidayNotFound(date));
    }
    Ok(())
}

pub fn delete_holiday(conn: &Connection, date: NaiveDate) -> AppResult<()> {
    let n = conn.execute(
        "DELETE FROM holidays WHERE date = ?1",
        [date.format(DATE_FMT).to_string()],
    )?;
    if n == 0 {
        return Err(AppError::HolidayNotFound(date));
    }
    Ok(())
}
