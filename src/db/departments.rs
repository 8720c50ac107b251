use crate::errors::{AppError, AppResult};
use crate::models::department::Department;
use chrono::Local;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

const COLUMNS: &str = "id, code, name, active, created_at";

fn map_row(row: &Row) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        active: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn insert_department(conn: &Connection, code: &str, name: &str) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO departments (code, name, active, created_at) VALUES (?1, ?2, 1, ?3)",
        params![code, name, Local::now().to_rfc3339()],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::InvalidValue {
                field: "code",
                value: format!("{code} (already registered)"),
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_code(conn: &Connection, code: &str) -> AppResult<Option<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM departments WHERE code = ?1");
    Ok(conn.query_row(&sql, [code.trim()], map_row).optional()?)
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM departments WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Code first, then numeric id.
pub fn resolve(conn: &Connection, key: &str) -> AppResult<Department> {
    if let Some(d) = find_by_code(conn, key)? {
        return Ok(d);
    }
    if let Ok(id) = key.trim().parse::<i64>()
        && let Some(d) = find_by_id(conn, id)?
    {
        return Ok(d);
    }
    Err(AppError::DepartmentNotFound(key.to_string()))
}

pub fn list_departments(conn: &Connection, include_inactive: bool) -> AppResult<Vec<Department>> {
    let filter = if include_inactive { "" } else { "WHERE active = 1" };
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM departments {filter} ORDER BY code ASC"
    ))?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_active(conn: &Connection, id: i64, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE departments SET active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if n == 0 {
        return Err(AppError::DepartmentNotFound(id.to_string()));
    }
    Ok(())
}

pub fn count_members(conn: &Connection, id: i64) -> AppResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE department_id = ?1",
        [id],
        |r| r.get(0),
    )?;
    Ok(n as usize)
}

/// Delete a department nobody belongs to.
pub fn delete_department(conn: &Connection, dept: &Department) -> AppResult<()> {
    let members = count_members(conn, dept.id)?;
    if members > 0 {
        return Err(AppError::DepartmentInUse {
            code: dept.code.clone(),
            employees: members,
        });
    }
    conn.execute("DELETE FROM departments WHERE id = ?1", [dept.id])?;
    Ok(())
}
