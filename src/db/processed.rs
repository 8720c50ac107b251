//! Processed-punch projection storage.

use crate::db::{DATE_FMT, conversion_error, parse_timestamp_col};
use crate::errors::{AppError, AppResult};
use crate::models::day_result::DayStatus;
use crate::models::processed_punch::ProcessedPunch;
use crate::models::punch::TIMESTAMP_FMT;
use crate::models::punch_kind::PunchKind;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, Row, TransactionBehavior, params};

fn map_row(row: &Row) -> rusqlite::Result<ProcessedPunch> {
    let ts: String = row.get(3)?;
    let kind: String = row.get(4)?;
    let status: String = row.get(5)?;

    Ok(ProcessedPunch {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        punch_id: row.get(2)?,
        timestamp: parse_timestamp_col(3, &ts)?,
        kind: PunchKind::from_db_str(&kind)
            .ok_or_else(|| conversion_error(4, AppError::InvalidPunchKind(kind.clone())))?,
        status: DayStatus::from_db_str(&status).ok_or_else(|| {
            conversion_error(5, AppError::InvalidValue { field: "status", value: status.clone() })
        })?,
        justification_id: row.get(6)?,
        processed_by: row.get(7)?,
        processed_at: row.get(8)?,
    })
}

/// Delete every processed punch of the employee on `date` and insert `rows`,
/// in a single write transaction. On any failure nothing changes.
pub fn replace_for_day(
    conn: &mut Connection,
    employee_id: i64,
    date: NaiveDate,
    rows: &[ProcessedPunch],
) -> AppResult<()> {
    let day = date.format(DATE_FMT).to_string();
    let now = Local::now().to_rfc3339();

    // Write lock taken up front; other writers wait on the busy timeout.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "DELETE FROM processed_punches WHERE employee_id = ?1 AND day = ?2",
        params![employee_id, day],
    )?;

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO processed_punches
                (employee_id, punch_id, day, timestamp, kind, status,
                 justification_id, processed_by, processed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for r in rows {
            stmt.execute(params![
                employee_id,
                r.punch_id,
                day,
                r.timestamp.format(TIMESTAMP_FMT).to_string(),
                r.kind.to_db_str(),
                r.status.to_db_str(),
                r.justification_id,
                r.processed_by,
                now,
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Processed punches of the employee within `[start, end]`, by timestamp.
pub fn list_processed(
    conn: &Connection,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<ProcessedPunch>> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_id, punch_id, timestamp, kind, status,
                justification_id, processed_by, processed_at
         FROM processed_punches
         WHERE employee_id = ?1 AND day BETWEEN ?2 AND ?3
         ORDER BY timestamp ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![
            employee_id,
            start.format(DATE_FMT).to_string(),
            end.format(DATE_FMT).to_string()
        ],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
