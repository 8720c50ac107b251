//! Manual punch maintenance and punch listings.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{employees, processed, punches};
use crate::errors::{AppError, AppResult};
use crate::models::processed_punch::ProcessedPunch;
use crate::models::punch::{NewPunch, Punch};
use crate::models::punch_kind::PunchKind;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

pub struct PunchLogic;

impl PunchLogic {
    /// Store a hand-entered punch. Without an explicit kind it alternates
    /// in/out by position within the day.
    pub fn record(
        pool: &DbPool,
        employee_id: i64,
        timestamp: NaiveDateTime,
        kind: Option<PunchKind>,
    ) -> AppResult<(i64, PunchKind)> {
        pool.with_tx(|conn| {
            let emp = employees::find_by_id(conn, employee_id)?
                .ok_or_else(|| AppError::EmployeeNotFound(employee_id.to_string()))?;
            let date = timestamp.date();
            let kind = match kind {
                Some(k) => k,
                None => PunchKind::by_position(punches::count_on_day(conn, emp.id, date)?),
            };

            let mut p = NewPunch::manual(emp.id, timestamp, kind);
            p.device = Some("manual".into());
            let id = punches::insert_punch(conn, &p)?;
            ttlog(
                conn,
                "punch",
                &emp.registration,
                &format!("{} {}", kind.to_db_str(), timestamp.format("%Y-%m-%d %H:%M")),
            )?;
            Ok((id, kind))
        })
    }

    /// Remove a raw punch. The day keeps its old projection until the next
    /// reconcile.
    pub fn delete(pool: &DbPool, id: i64) -> AppResult<Punch> {
        let punch = pool.with_tx(|conn| {
            let punch = punches::delete_punch(conn, id)?;
            ttlog(
                conn,
                "punch",
                &id.to_string(),
                &format!(
                    "deleted {} of employee {}",
                    punch.timestamp.format("%Y-%m-%d %H:%M"),
                    punch.employee_id
                ),
            )?;
            Ok(punch)
        })?;

        info!(id, employee_id = punch.employee_id, "punch deleted");
        Ok(punch)
    }

    pub fn list(
        pool: &DbPool,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Punch>> {
        pool.with_conn(|conn| punches::list_punches(conn, employee_id, start, end))
    }

    pub fn list_processed(
        pool: &DbPool,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProcessedPunch>> {
        pool.with_conn(|conn| processed::list_processed(conn, employee_id, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::employees::insert_employee;
    use crate::db::log::load_log;

    fn setup() -> (DbPool, i64) {
        let pool = DbPool::open_in_memory().unwrap();
        let emp = pool.with_conn(|c| insert_employee(c, "Ana", "1")).unwrap();
        (pool, emp)
    }

    fn at(hm: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2025-03-10 {hm}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_record_alternates_kind() {
        let (pool, emp) = setup();
        let (_, first) = PunchLogic::record(&pool, emp, at("08:00"), None).unwrap();
        let (_, second) = PunchLogic::record(&pool, emp, at("12:00"), None).unwrap();
        let (_, forced) = PunchLogic::record(&pool, emp, at("12:30"), Some(PunchKind::BreakEnd)).unwrap();

        assert_eq!(first, PunchKind::In);
        assert_eq!(second, PunchKind::Out);
        assert_eq!(forced, PunchKind::BreakEnd);

        let list = PunchLogic::list(&pool, emp, day(), day()).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].device.as_deref(), Some("manual"));
    }

    #[test]
    fn test_record_unknown_employee() {
        let (pool, emp) = setup();
        assert!(matches!(
            PunchLogic::record(&pool, emp + 1, at("08:00"), None),
            Err(AppError::EmployeeNotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_punch_and_logs() {
        let (pool, emp) = setup();
        let (id, _) = PunchLogic::record(&pool, emp, at("08:00"), None).unwrap();

        let gone = PunchLogic::delete(&pool, id).unwrap();
        assert_eq!(gone.employee_id, emp);
        assert!(PunchLogic::list(&pool, emp, day(), day()).unwrap().is_empty());
        assert!(matches!(
            PunchLogic::delete(&pool, id),
            Err(AppError::PunchNotFound(_))
        ));

        let log = pool.with_conn(|c| load_log(c, Some(1))).unwrap();
        assert!(log[0].message.starts_with("deleted 2025-03-10 08:00"));
    }

    #[test]
    fn test_punch_without_audit_row_is_rolled_back() {
        let (pool, emp) = setup();
        pool.with_conn(|c| {
            c.execute_batch("DROP TABLE log;")?;
            Ok(())
        })
        .unwrap();

        assert!(PunchLogic::record(&pool, emp, at("08:00"), None).is_err());
        assert!(PunchLogic::list(&pool, emp, day(), day()).unwrap().is_empty());
    }
}
