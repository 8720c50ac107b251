//! Schema migrations.
//!
//! Each migration runs once and is recorded in the `log` table with
//! operation `migration_applied` and the migration version as target.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_employees_punches",
        description: "Created employees and punches tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            registration  TEXT NOT NULL UNIQUE,
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS punches (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id   INTEGER NOT NULL REFERENCES employees(id),
            timestamp     TEXT NOT NULL,
            kind          TEXT NOT NULL
                          CHECK(kind IN ('in','out','break-start','break-end')),
            device        TEXT,
            location      TEXT,
            source_file   TEXT,
            imported_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_punches_employee_ts ON punches(employee_id, timestamp);
        "#,
    },
    Migration {
        version: "20250301_0002_calendar_tables",
        description: "Created justifications, holidays and schedules tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS justifications (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id   INTEGER NOT NULL REFERENCES employees(id),
            date          TEXT NOT NULL,
            kind          TEXT NOT NULL
                          CHECK(kind IN ('medical','excused-absence','compensatory','other')),
            reason        TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'pending'
                          CHECK(status IN ('pending','approved','rejected')),
            approved_by   TEXT,
            approved_at   TEXT,
            channel       TEXT NOT NULL DEFAULT 'manual'
                          CHECK(channel IN ('system','manual','email','whatsapp')),
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_justifications_lookup
            ON justifications(employee_id, date, status);

        CREATE TABLE IF NOT EXISTS holidays (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            date          TEXT NOT NULL UNIQUE,
            description   TEXT NOT NULL,
            scope         TEXT NOT NULL DEFAULT 'national'
                          CHECK(scope IN ('national','regional','local')),
            active        INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS schedules (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id   INTEGER NOT NULL REFERENCES employees(id),
            weekday       INTEGER NOT NULL CHECK(weekday BETWEEN 0 AND 6),
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            CHECK(end_time > start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_schedules_employee ON schedules(employee_id, weekday);
        "#,
    },
    Migration {
        version: "20250308_0003_processed_punches",
        description: "Created processed_punches projection table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS processed_punches (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id       INTEGER NOT NULL REFERENCES employees(id),
            punch_id          INTEGER REFERENCES punches(id) ON DELETE SET NULL,
            day               TEXT NOT NULL,
            timestamp         TEXT NOT NULL,
            kind              TEXT NOT NULL CHECK(kind IN ('in','out')),
            status            TEXT NOT NULL
                              CHECK(status IN ('regular','irregular','justified')),
            justification_id  INTEGER REFERENCES justifications(id) ON DELETE SET NULL,
            processed_by      TEXT NOT NULL,
            processed_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_processed_employee_day ON processed_punches(employee_id, day);
        "#,
    },
    Migration {
        version: "20250315_0004_departments",
        description: "Created departments table and employees.department_id",
        sql: r#"
        CREATE TABLE IF NOT EXISTS departments (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            code          TEXT NOT NULL UNIQUE,
            name          TEXT NOT NULL,
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL
        );

        ALTER TABLE employees ADD COLUMN department_id INTEGER REFERENCES departments(id);

        CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department_id);
        "#,
    },
];

/// Ensure that the `log` table exists; migrations are tracked there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {e}", m.version)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;

    tx.commit()?;
    info!(version = m.version, "migration applied");
    Ok(())
}

/// Versions of the migrations not yet recorded as applied.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, in order.
///
/// Returns how many migrations were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }
    Ok(applied)
}
