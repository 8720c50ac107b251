use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use chrono::Local;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, registration, active, created_at, department_id";

fn map_row(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        registration: row.get(2)?,
        active: row.get(3)?,
        created_at: row.get(4)?,
        department_id: row.get(5)?,
    })
}

pub fn insert_employee(conn: &Connection, name: &str, registration: &str) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO employees (name, registration, active, created_at)
         VALUES (?1, ?2, 1, ?3)",
        params![name, registration, Local::now().to_rfc3339()],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::InvalidValue {
                field: "registration",
                value: format!("{registration} (already registered)"),
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employees WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

pub fn find_by_registration(conn: &Connection, registration: &str) -> AppResult<Option<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employees WHERE registration = ?1");
    Ok(conn
        .query_row(&sql, [registration.trim()], map_row)
        .optional()?)
}

/// Resolve a CLI employee reference: registration number first, then numeric id.
pub fn resolve(conn: &Connection, key: &str) -> AppResult<Employee> {
    if let Some(e) = find_by_registration(conn, key)? {
        return Ok(e);
    }
    if let Ok(id) = key.trim().parse::<i64>()
        && let Some(e) = find_by_id(conn, id)?
    {
        return Ok(e);
    }
    Err(AppError::EmployeeNotFound(key.to_string()))
}

/// Employees ordered by name, optionally restricted to one department.
pub fn list_employees(
    conn: &Connection,
    include_inactive: bool,
    department_id: Option<i64>,
) -> AppResult<Vec<Employee>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employees
         WHERE (?1 OR active = 1) AND (?2 IS NULL OR department_id = ?2)
         ORDER BY name ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![include_inactive, department_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn employee_exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM employees WHERE id = ?1", [id], |r| r.get(0))
        .optional()?;
    Ok(found.is_some())
}

pub fn set_active(conn: &Connection, id: i64, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE employees SET active = ?1 WHERE id = ?2",
        params![active, id],
    )?;
    if n == 0 {
        return Err(AppError::EmployeeNotFound(id.to_string()));
    }
    Ok(())
}

/// Move the employee to `department_id`, or out of any department with `None`.
pub fn assign_department(conn: &Connection, id: i64, department_id: Option<i64>) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE employees SET department_id = ?1 WHERE id = ?2",
        params![department_id, id],
    )?;
    if n == 0 {
        return Err(AppError::EmployeeNotFound(id.to_string()));
    }
    Ok(())
}
