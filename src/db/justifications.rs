use crate::db::{DATE_FMT, conversion_error, parse_date_col};
use crate::errors::{AppError, AppResult};
use crate::models::justification::{Channel, Justification, JustificationStatus, JustificationType};
use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

const COLUMNS: &str =
    "id, employee_id, date, kind, reason, status, approved_by, approved_at, channel, created_at";

fn map_row(row: &Row) -> rusqlite::Result<Justification> {
    let date: String = row.get(2)?;
    let kind: String = row.get(3)?;
    let status: String = row.get(5)?;
    let channel: String = row.get(8)?;

    Ok(Justification {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        date: parse_date_col(2, &date)?,
        kind: JustificationType::from_db_str(&kind).ok_or_else(|| {
            conversion_error(3, AppError::InvalidValue { field: "kind", value: kind.clone() })
        })?,
        reason: row.get(4)?,
        status: JustificationStatus::from_db_str(&status).ok_or_else(|| {
            conversion_error(5, AppError::InvalidValue { field: "status", value: status.clone() })
        })?,
        approved_by: row.get(6)?,
        approved_at: row.get(7)?,
        channel: Channel::from_db_str(&channel).ok_or_else(|| {
            conversion_error(8, AppError::InvalidValue { field: "channel", value: channel.clone() })
        })?,
        created_at: row.get(9)?,
    })
}

pub fn insert_justification(
    conn: &Connection,
    employee_id: i64,
    date: NaiveDate,
    kind: JustificationType,
    reason: &str,
    channel: Channel,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO justifications (employee_id, date, kind, reason, status, channel, created_at)
         VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6)",
        params![
            employee_id,
            date.format(DATE_FMT).to_string(),
            kind.to_db_str(),
            reason,
            channel.to_db_str(),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<Justification>> {
    let sql = format!("SELECT {COLUMNS} FROM justifications WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Latest approved justification for the employee on `date`.
/// Ties on approval time go to the highest id.
pub fn find_approved(
    conn: &Connection,
    employee_id: i64,
    date: NaiveDate,
) -> AppResult<Option<Justification>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM justifications
         WHERE employee_id = ?1 AND date = ?2 AND status = 'approved'
         ORDER BY approved_at DESC, id DESC
         LIMIT 1"
    );
    Ok(conn
        .query_row(
            &sql,
            params![employee_id, date.format(DATE_FMT).to_string()],
            map_row,
        )
        .optional()?)
}

pub fn list_justifications(
    conn: &Connection,
    employee_id: Option<i64>,
    status: Option<JustificationStatus>,
) -> AppResult<Vec<Justification>> {
    let mut sql = format!("SELECT {COLUMNS} FROM justifications WHERE 1 = 1");
    let mut args: Vec<Value> = Vec::new();

    if let Some(e) = employee_id {
        args.push(Value::Integer(e));
        sql.push_str(&format!(" AND employee_id = ?{}", args.len()));
    }
    if let Some(s) = status {
        args.push(Value::Text(s.to_db_str().to_string()));
        sql.push_str(&format!(" AND status = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY date ASC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn ensure_pending(conn: &Connection, id: i64) -> AppResult<()> {
    match find_by_id(conn, id)? {
        None => Err(AppError::JustificationNotFound(id)),
        Some(j) if !j.status.is_pending() => Err(AppError::JustificationDecided {
            id,
            status: j.status.to_db_str().to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Move a pending justification to `approved` or `rejected`.
///
/// The update is guarded by `status = 'pending'` so a concurrent decision
/// cannot be overwritten.
pub fn decide(
    conn: &Connection,
    id: i64,
    outcome: JustificationStatus,
    approver: &str,
) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE justifications
         SET status = ?1, approved_by = ?2, approved_at = ?3
         WHERE id = ?4 AND status = 'pending'",
        params![outcome.to_db_str(), approver, Local::now().to_rfc3339(), id],
    )?;
    if n == 0 {
        ensure_pending(conn, id)?;
    }
    Ok(())
}

/// Delete a justification that is still pending.
pub fn delete_pending(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute(
        "DELETE FROM justifications WHERE id = ?1 AND status = 'pending'",
        [id],
    )?;
    if n == 0 {
        ensure_pending(conn, id)?;
    }
    Ok(())
}
