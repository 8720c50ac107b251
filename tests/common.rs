#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use punchclock::db::employees::insert_employee;
use punchclock::db::pool::DbPool;
use punchclock::db::punches::insert_punch;
use punchclock::models::punch::NewPunch;
use punchclock::models::punch_kind::PunchKind;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn pc() -> Command {
    cargo_bin_cmd!("punchclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_punchclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}-wal")).ok();
    fs::remove_file(format!("{db_path}-shm")).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_punchclock_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB through the CLI and register one employee (registration 0042).
pub fn init_db_with_employee(db_path: &str) {
    pc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    pc().args(["--db", db_path, "employee", "add", "0042", "Ana Souza"])
        .assert()
        .success();
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid timestamp")
}

/// In-memory pool with one employee; returns the pool and the employee id.
pub fn memory_pool() -> (DbPool, i64) {
    let pool = DbPool::open_in_memory().expect("open db");
    let emp = pool
        .with_conn(|c| insert_employee(c, "Ana Souza", "0042"))
        .expect("insert employee");
    (pool, emp)
}

pub fn add_punches(pool: &DbPool, employee_id: i64, stamps: &[&str]) {
    pool.with_conn(|c| {
        for s in stamps {
            insert_punch(c, &NewPunch::manual(employee_id, ts(s), PunchKind::In))?;
        }
        Ok(())
    })
    .expect("insert punches");
}

pub fn processed_count(pool: &DbPool, employee_id: i64) -> i64 {
    pool.with_conn(|c| {
        Ok(c.query_row(
            "SELECT COUNT(*) FROM processed_punches WHERE employee_id = ?1",
            [employee_id],
            |r| r.get(0),
        )?)
    })
    .expect("count processed")
}
