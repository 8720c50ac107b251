use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::DayExport;
use crate::models::day_result::AggregateResult;
use crate::ui::messages::warning;
use std::path::Path;
use tracing::debug;

pub struct ExportLogic;

impl ExportLogic {
    /// Write the per-day results of a reconciliation run to `path`.
    pub fn export(
        result: &AggregateResult,
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<()> {
        if result.per_day.is_empty() {
            warning("No reconciled days. Nothing to export.");
            return Ok(());
        }

        ensure_writable(path, force)?;
        debug!(format = format.as_str(), path = %path.display(), days = result.per_day.len(), "exporting");

        let rows: Vec<DayExport> = result
            .per_day
            .iter()
            .map(|d| DayExport::from_day(result.employee_id, d))
            .collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path),
            ExportFormat::Json => export_json(&rows, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::day_result::{DayResult, DayStatus};
    use chrono::{NaiveDate, TimeDelta};

    fn result() -> AggregateResult {
        let d = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut r = AggregateResult::new(1, d, d);
        r.record(DayResult {
            date: d,
            status: DayStatus::Irregular,
            punches: vec!["08:00".into(), "12:00".into()],
            worked: TimeDelta::hours(4),
            extra: TimeDelta::zero(),
            short: TimeDelta::hours(4),
            justification_id: None,
            observation: "shortfall without justification".into(),
        });
        r
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        ExportLogic::export(&result(), ExportFormat::Csv, &path, false).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "employee_id,date,status,punches,worked,extra,short,justification_id,observation"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,2025-03-10,irregular,08:00 12:00,04:00,00:00,04:00,,shortfall without justification"
        );
    }

    #[test]
    fn test_json_export_overwrites_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale").unwrap();

        ExportLogic::export(&result(), ExportFormat::Json, &path, true).unwrap();

        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v[0]["status"], "irregular");
        assert_eq!(v[0]["short"], "04:00");
    }
}
