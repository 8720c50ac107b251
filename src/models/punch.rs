use super::punch_kind::PunchKind;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// A raw clock punch, as ingested. Never mutated after import.
#[derive(Debug, Clone, Serialize)]
pub struct Punch {
    pub id: i64,
    pub employee_id: i64,
    pub timestamp: NaiveDateTime, // ⇔ punches.timestamp (TEXT "YYYY-MM-DD HH:MM:SS")
    pub kind: PunchKind,
    pub device: Option<String>,
    pub location: Option<String>,
    pub source_file: Option<String>,
    pub imported_at: String, // ISO8601
}

/// Insert payload for a raw punch.
#[derive(Debug, Clone)]
pub struct NewPunch {
    pub employee_id: i64,
    pub timestamp: NaiveDateTime,
    pub kind: PunchKind,
    pub device: Option<String>,
    pub location: Option<String>,
    pub source_file: Option<String>,
}

impl Punch {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn time_str(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

impl NewPunch {
    pub fn manual(employee_id: i64, timestamp: NaiveDateTime, kind: PunchKind) -> Self {
        Self {
            employee_id,
            timestamp,
            kind,
            device: None,
            location: None,
            source_file: None,
        }
    }
}
