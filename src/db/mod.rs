pub mod departments;
pub mod employees;
pub mod holidays;
pub mod initialize;
pub mod justifications;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod processed;
pub mod punches;
pub mod schedules;
pub mod stats;
pub mod store;

use crate::errors::AppError;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;

pub const DATE_FMT: &str = "%Y-%m-%d";

/// Wrap a domain parse failure into the error rusqlite expects from a row mapper.
pub(crate) fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

pub(crate) fn parse_date_col(col: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|_| conversion_error(col, AppError::InvalidDate(s.to_string())))
}

pub(crate) fn parse_timestamp_col(col: usize, s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, crate::models::punch::TIMESTAMP_FMT)
        .map_err(|_| conversion_error(col, AppError::InvalidTime(s.to_string())))
}
