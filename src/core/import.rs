//! Time-clock export ingestion.
//!
//! Each line is `company|registration|unit|DDMMYYYY|HHMM|mark|terminal_type|terminal`.
//! Valid lines become raw punches; malformed lines are counted and reported
//! without aborting the file.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{employees, punches};
use crate::errors::{AppError, AppResult};
use crate::models::punch::NewPunch;
use crate::models::punch_kind::PunchKind;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const MIN_FIELDS: usize = 8;

/// One parsed line of a time-clock export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockLine {
    pub company: String,
    pub registration: String,
    pub unit: String,
    pub timestamp: NaiveDateTime,
    pub mark: String,
    pub terminal_type: String,
    pub terminal: String,
}

impl ClockLine {
    pub fn parse(line_no: usize, line: &str) -> AppResult<Self> {
        let fields: Vec<&str> = line.trim().split('|').map(str::trim).collect();
        if fields.len() < MIN_FIELDS {
            return Err(AppError::ImportLine {
                line: line_no,
                reason: format!("expected {MIN_FIELDS} fields, found {}", fields.len()),
            });
        }

        let date = NaiveDate::parse_from_str(fields[3], "%d%m%Y").map_err(|_| {
            AppError::ImportLine {
                line: line_no,
                reason: format!("invalid date '{}'", fields[3]),
            }
        })?;
        // always zero-padded HHMM
        let time = (fields[4].len() == 4)
            .then(|| NaiveTime::parse_from_str(fields[4], "%H%M").ok())
            .flatten()
            .ok_or_else(|| AppError::ImportLine {
                line: line_no,
                reason: format!("invalid time '{}'", fields[4]),
            })?;

        if fields[1].is_empty() {
            return Err(AppError::ImportLine {
                line: line_no,
                reason: "empty registration".into(),
            });
        }

        Ok(Self {
            company: fields[0].to_string(),
            registration: fields[1].to_string(),
            unit: fields[2].to_string(),
            timestamp: date.and_time(time),
            mark: fields[5].to_string(),
            terminal_type: fields[6].to_string(),
            terminal: fields[7].to_string(),
        })
    }
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Non-blank lines seen.
    pub total_lines: usize,
    pub imported: usize,
    /// Lines whose punch was already stored (same employee and timestamp).
    pub duplicates: usize,
    pub invalid: usize,
    pub errors: Vec<String>,
    /// Date span touched per employee id.
    pub affected: BTreeMap<i64, (NaiveDate, NaiveDate)>,
}

impl ImportReport {
    fn touch(&mut self, employee_id: i64, date: NaiveDate) {
        self.affected
            .entry(employee_id)
            .and_modify(|(s, e)| {
                *s = (*s).min(date);
                *e = (*e).max(date);
            })
            .or_insert((date, date));
    }

    fn reject(&mut self, err: AppError) {
        warn!("{err}");
        self.invalid += 1;
        self.errors.push(err.to_string());
    }
}

pub struct ImportLogic;

impl ImportLogic {
    pub fn import_file(pool: &DbPool, path: &Path) -> AppResult<ImportReport> {
        let content = fs::read_to_string(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::import_text(pool, &content, &source)
    }

    /// Import every valid line of `content` in a single transaction.
    pub fn import_text(pool: &DbPool, content: &str, source: &str) -> AppResult<ImportReport> {
        let mut report = ImportReport::default();

        pool.with_conn(|conn| {
            let tx = conn.transaction()?;

            let mut registrations: HashMap<String, Option<i64>> = HashMap::new();
            // punches per (employee, day), seeded from the store on first sight
            let mut per_day: HashMap<(i64, NaiveDate), usize> = HashMap::new();

            for (idx, raw) in content.lines().enumerate() {
                if raw.trim().is_empty() {
                    continue;
                }
                report.total_lines += 1;
                let line_no = idx + 1;

                let line = match ClockLine::parse(line_no, raw) {
                    Ok(l) => l,
                    Err(e) => {
                        report.reject(e);
                        continue;
                    }
                };

                let employee_id = match registrations.get(&line.registration) {
                    Some(found) => *found,
                    None => {
                        let found = employees::find_by_registration(&tx, &line.registration)?
                            .map(|e| e.id);
                        registrations.insert(line.registration.clone(), found);
                        found
                    }
                };
                let Some(employee_id) = employee_id else {
                    report.reject(AppError::ImportLine {
                        line: line_no,
                        reason: format!("unknown registration '{}'", line.registration),
                    });
                    continue;
                };

                if punches::exists_at(&tx, employee_id, line.timestamp)? {
                    debug!(employee_id, timestamp = %line.timestamp, "punch already stored");
                    report.duplicates += 1;
                    continue;
                }

                let date = line.timestamp.date();
                let seen = match per_day.get(&(employee_id, date)) {
                    Some(n) => *n,
                    None => punches::count_on_day(&tx, employee_id, date)?,
                };

                punches::insert_punch(
                    &tx,
                    &NewPunch {
                        employee_id,
                        timestamp: line.timestamp,
                        kind: PunchKind::by_position(seen),
                        device: Some(format!("clock {}", line.terminal_type)),
                        location: Some(format!("terminal {}", line.terminal)),
                        source_file: Some(source.to_string()),
                    },
                )?;

                per_day.insert((employee_id, date), seen + 1);
                report.imported += 1;
                report.touch(employee_id, date);
            }

            ttlog(
                &tx,
                "import",
                source,
                &format!(
                    "{} punches imported, {} duplicates skipped, {} lines rejected",
                    report.imported, report.duplicates, report.invalid
                ),
            )?;
            tx.commit()?;
            Ok(())
        })?;

        info!(
            source,
            imported = report.imported,
            duplicates = report.duplicates,
            invalid = report.invalid,
            "import finished"
        );
        Ok(report)
    }
}
