use crate::db::{DATE_FMT, conversion_error, parse_timestamp_col};
use crate::errors::{AppError, AppResult};
use crate::models::punch::{NewPunch, Punch, TIMESTAMP_FMT};
use crate::models::punch_kind::PunchKind;
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Punch> {
    let ts: String = row.get(2)?;
    let kind_str: String = row.get(3)?;
    let kind = PunchKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidPunchKind(kind_str.clone())))?;

    Ok(Punch {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        timestamp: parse_timestamp_col(2, &ts)?,
        kind,
        device: row.get(4)?,
        location: row.get(5)?,
        source_file: row.get(6)?,
        imported_at: row.get(7)?,
    })
}

pub fn insert_punch(conn: &Connection, p: &NewPunch) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO punches (employee_id, timestamp, kind, device, location, source_file, imported_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        p.employee_id,
        p.timestamp.format(TIMESTAMP_FMT).to_string(),
        p.kind.to_db_str(),
        p.device,
        p.location,
        p.source_file,
        Local::now().to_rfc3339(),
    ])?;
    Ok(conn.last_insert_rowid())
}

/// Punches of the employee between `start` 00:00:00 and `end` 23:59:59,
/// ordered by timestamp.
pub fn list_punches(
    conn: &Connection,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<Punch>> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, timestamp, kind, device, location, source_file, imported_at
         FROM punches
         WHERE employee_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3
         ORDER BY timestamp ASC, id ASC",
    )?;

    let from = format!("{} 00:00:00", start.format(DATE_FMT));
    let to = format!("{} 23:59:59", end.format(DATE_FMT));
    let rows = stmt.query_map(params![employee_id, from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<Punch>> {
    let punch = conn
        .query_row(
            "SELECT id, employee_id, timestamp, kind, device, location, source_file, imported_at
             FROM punches WHERE id = ?1",
            [id],
            map_row,
        )
        .optional()?;
    Ok(punch)
}

/// Remove one raw punch. Its processed rows keep their data with `punch_id`
/// cleared until the day is reconciled again.
pub fn delete_punch(conn: &Connection, id: i64) -> AppResult<Punch> {
    let punch = find_by_id(conn, id)?.ok_or(AppError::PunchNotFound(id))?;
    conn.execute("DELETE FROM punches WHERE id = ?1", [id])?;
    Ok(punch)
}

/// Whether the employee already has a punch at exactly `timestamp`.
pub fn exists_at(conn: &Connection, employee_id: i64, timestamp: NaiveDateTime) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT EXISTS(SELECT 1 FROM punches WHERE employee_id = ?1 AND timestamp = ?2)",
    )?;
    let found: bool = stmt.query_row(
        params![employee_id, timestamp.format(TIMESTAMP_FMT).to_string()],
        |r| r.get(0),
    )?;
    Ok(found)
}

/// How many raw punches the employee already has on `date`.
pub fn count_on_day(conn: &Connection, employee_id: i64, date: NaiveDate) -> AppResult<usize> {
    let day = date.format(DATE_FMT).to_string();
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM punches WHERE employee_id = ?1 AND substr(timestamp, 1, 10) = ?2",
        params![employee_id, day],
        |r| r.get(0),
    )?;
    Ok(n as usize)
}
