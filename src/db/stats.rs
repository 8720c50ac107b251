use crate::db::migrate::pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

const TABLES: [&str; 7] = [
    "departments",
    "employees",
    "punches",
    "processed_punches",
    "justifications",
    "holidays",
    "schedules",
];

fn count(conn: &Connection, table: &str) -> AppResult<i64> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?)
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    pool.with_conn(|conn| {
        for t in TABLES {
            println!("{}• {}:{} {}{}{}", CYAN, t, RESET, GREEN, count(conn, t)?, RESET);
        }

        let first: Option<String> = conn
            .query_row("SELECT MIN(timestamp) FROM punches", [], |row| row.get(0))
            .optional()?
            .flatten();
        let last: Option<String> = conn
            .query_row("SELECT MAX(timestamp) FROM punches", [], |row| row.get(0))
            .optional()?
            .flatten();

        println!("{}• Punch range:{}", CYAN, RESET);
        println!(
            "    from: {}",
            first.unwrap_or_else(|| format!("{GREY}--{RESET}"))
        );
        println!(
            "    to:   {}",
            last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
        );

        let pending = pending_migrations(conn)?;
        if pending.is_empty() {
            println!("{}• Schema:{} {}up to date{}", CYAN, RESET, GREEN, RESET);
        } else {
            println!(
                "{}• Schema:{} {}{} pending migration(s){}",
                CYAN,
                RESET,
                RED,
                pending.len(),
                RESET
            );
        }
        Ok(())
    })?;

    println!();
    Ok(())
}

/// Run SQLite's integrity check; returns the reported problems (empty if ok).
pub fn integrity_check(pool: &DbPool) -> AppResult<Vec<String>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare("PRAGMA integrity_check")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut problems = Vec::new();
        for r in rows {
            let line = r?;
            if line != "ok" {
                problems.push(line);
            }
        }
        Ok(problems)
    })
}

pub fn vacuum(pool: &DbPool) -> AppResult<()> {
    pool.with_conn(|conn| {
        conn.execute_batch("VACUUM;")?;
        Ok(())
    })
}
