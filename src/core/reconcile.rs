//! Period processor: drives the day classifier over a date range for one
//! employee and maintains the processed-punch projection.

use crate::config::Config;
use crate::core::calculator::calendar::is_special_day;
use crate::core::calculator::expected::QuotaTable;
use crate::core::classifier::{DayInput, classify_day};
use crate::core::store::{AttendanceSource, ProcessedPunchSink};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::day_result::{AggregateResult, DayResult};
use crate::models::processed_punch::ProcessedPunch;
use crate::models::punch::Punch;
use crate::models::punch_kind::PunchKind;
use crate::utils::date::days_between;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Knobs of a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    /// Quota used for weekdays the employee has no schedule for.
    pub default_quota: TimeDelta,
    pub min_break: TimeDelta,
    /// Identity written to `processed_by`.
    pub processor: String,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            default_quota: TimeDelta::hours(8),
            min_break: TimeDelta::minutes(60),
            processor: "system".to_string(),
        }
    }
}

impl ReconcileSettings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            default_quota: cfg.daily_quota()?,
            min_break: cfg.min_break()?,
            processor: cfg.processor.clone(),
        })
    }
}

pub struct PeriodProcessor<'a, S, K> {
    source: &'a S,
    sink: &'a K,
    settings: ReconcileSettings,
}

impl<'a, S, K> PeriodProcessor<'a, S, K>
where
    S: AttendanceSource,
    K: ProcessedPunchSink,
{
    pub fn new(source: &'a S, sink: &'a K, settings: ReconcileSettings) -> Self {
        Self {
            source,
            sink,
            settings,
        }
    }

    /// Classify every day of `[start, end]` and replace the processed punches
    /// of each day.
    ///
    /// Fails as a whole only for an invalid range, an unknown employee or a
    /// read failure. A day whose write fails is rolled back, reported in
    /// `errors` and left out of the totals; later days are still processed.
    pub fn reconcile(
        &self,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<AggregateResult> {
        if start > end {
            return Err(AppError::InvalidRange { start, end });
        }
        if !self.source.employee_exists(employee_id)? {
            return Err(AppError::EmployeeNotFound(employee_id.to_string()));
        }

        let mut by_date = group_by_date(self.source.list_punches(employee_id, start, end)?);
        let holidays = self.source.list_holidays(start, end)?;
        let quotas = self.quota_table(employee_id)?;

        info!(
            employee_id,
            %start,
            %end,
            holidays = holidays.len(),
            "reconciling period"
        );

        let mut result = AggregateResult::new(employee_id, start, end);

        for date in days_between(start, end) {
            let punches = by_date.remove(&date).unwrap_or_default();
            let times: Vec<NaiveDateTime> = punches.iter().map(|p| p.timestamp).collect();
            let justification = self
                .source
                .find_approved_justification(employee_id, date)?;

            let day = classify_day(&DayInput {
                date,
                punches: &times,
                special: is_special_day(date, &holidays),
                justification: justification.as_ref(),
                quota: quotas.quota_for(date.weekday()),
                min_break: self.settings.min_break,
            });

            let rows = self.processed_rows(employee_id, &punches, &day);

            match self
                .sink
                .replace_processed_punches(employee_id, date, &rows)
            {
                Ok(()) => {
                    debug!(employee_id, %date, status = day.status.to_db_str(), rows = rows.len());
                    result.record(day);
                }
                Err(e) => {
                    error!(employee_id, %date, "failed to store processed punches: {e}");
                    result.errors.push(format!("{date}: {e}"));
                }
            }
        }

        info!(
            employee_id,
            total = result.total_days,
            regular = result.regular,
            irregular = result.irregular,
            justified = result.justified,
            errors = result.errors.len(),
            "reconciliation finished"
        );

        Ok(result)
    }

    fn quota_table(&self, employee_id: i64) -> AppResult<QuotaTable> {
        let mut table = QuotaTable::new(self.settings.default_quota);
        for wd in WEEK {
            if let Some(q) = self.source.expected_quota(employee_id, wd)? {
                table.set(wd, q);
            }
        }
        Ok(table)
    }

    /// One projection row per punch of the day, labelled in/out by position.
    fn processed_rows(&self, employee_id: i64, punches: &[Punch], day: &DayResult) -> Vec<ProcessedPunch> {
        punches
            .iter()
            .enumerate()
            .map(|(i, p)| ProcessedPunch {
                id: 0,
                employee_id,
                punch_id: Some(p.id),
                timestamp: p.timestamp,
                kind: PunchKind::by_position(i),
                status: day.status,
                justification_id: day.justification_id,
                processed_by: self.settings.processor.clone(),
                processed_at: String::new(),
            })
            .collect()
    }
}

/// Reconciliation against the SQLite store, with an audit log entry per run.
pub struct ReconcileLogic;

impl ReconcileLogic {
    pub fn run(
        pool: &DbPool,
        settings: ReconcileSettings,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<AggregateResult> {
        let result = PeriodProcessor::new(pool, pool, settings).reconcile(employee_id, start, end)?;

        pool.with_conn(|conn| {
            ttlog(
                conn,
                "reconcile",
                &employee_id.to_string(),
                &format!(
                    "{start}..{end}: {} days ({} regular, {} irregular, {} justified), {} failed",
                    result.total_days,
                    result.regular,
                    result.irregular,
                    result.justified,
                    result.errors.len()
                ),
            )
        })?;

        Ok(result)
    }
}

/// Group punches per calendar day, each day sorted by timestamp.
fn group_by_date(punches: Vec<Punch>) -> BTreeMap<NaiveDate, Vec<Punch>> {
    let mut map: BTreeMap<NaiveDate, Vec<Punch>> = BTreeMap::new();
    for p in punches {
        map.entry(p.date()).or_default().push(p);
    }
    for day in map.values_mut() {
        day.sort_by_key(|p| (p.timestamp, p.id));
    }
    map
}
