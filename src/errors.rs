//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Database lock poisoned")]
    LockPoisoned,

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid punch kind: {0}")]
    InvalidPunchKind(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Malformed import line {line}: {reason}")]
    ImportLine { line: usize, reason: String },

    // ---------------------------
    // Reconciliation errors
    // ---------------------------
    #[error("Employee {0} not found")]
    EmployeeNotFound(String),

    #[error("Department {0} not found")]
    DepartmentNotFound(String),

    #[error("Department {code} still has {employees} employee(s)")]
    DepartmentInUse { code: String, employees: usize },

    #[error("Punch {0} not found")]
    PunchNotFound(i64),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    // ---------------------------
    // Justification workflow
    // ---------------------------
    #[error("Justification {0} not found")]
    JustificationNotFound(i64),

    #[error("Justification {id} was already {status}")]
    JustificationDecided { id: i64, status: String },

    // ---------------------------
    // Holidays
    // ---------------------------
    #[error("A holiday is already registered for {0}")]
    HolidayExists(NaiveDate),

    #[error("No holiday registered for {0}")]
    HolidayNotFound(NaiveDate),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
