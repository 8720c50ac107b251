use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{employees, justifications};
use crate::errors::{AppError, AppResult};
use crate::models::justification::{Channel, Justification, JustificationStatus, JustificationType};
use chrono::NaiveDate;
use tracing::info;

pub const REASON_MIN: usize = 10;
pub const REASON_MAX: usize = 500;

/// Request/decision workflow for absence and shortfall justifications.
///
/// pending -> approved | rejected. Decided justifications are final.
pub struct JustificationLogic;

impl JustificationLogic {
    pub fn request(
        pool: &DbPool,
        employee_id: i64,
        date: NaiveDate,
        kind: JustificationType,
        reason: &str,
        channel: Channel,
    ) -> AppResult<i64> {
        let reason = reason.trim();
        let len = reason.chars().count();
        if !(REASON_MIN..=REASON_MAX).contains(&len) {
            return Err(AppError::InvalidValue {
                field: "reason",
                value: format!("{len} characters (expected {REASON_MIN}..{REASON_MAX})"),
            });
        }

        pool.with_tx(|conn| {
            if !employees::employee_exists(conn, employee_id)? {
                return Err(AppError::EmployeeNotFound(employee_id.to_string()));
            }
            let id = justifications::insert_justification(conn, employee_id, date, kind, reason, channel)?;
            ttlog(
                conn,
                "justify",
                &id.to_string(),
                &format!("{} requested for employee {employee_id} on {date}", kind.to_db_str()),
            )?;
            Ok(id)
        })
    }

    pub fn approve(pool: &DbPool, id: i64, approver: &str) -> AppResult<()> {
        Self::decide(pool, id, JustificationStatus::Approved, approver)
    }

    pub fn reject(pool: &DbPool, id: i64, approver: &str) -> AppResult<()> {
        Self::decide(pool, id, JustificationStatus::Rejected, approver)
    }

    fn decide(pool: &DbPool, id: i64, outcome: JustificationStatus, approver: &str) -> AppResult<()> {
        let approver = approver.trim();
        if approver.is_empty() {
            return Err(AppError::InvalidValue {
                field: "approver",
                value: String::new(),
            });
        }

        pool.with_tx(|conn| {
            justifications::decide(conn, id, outcome, approver)?;
            ttlog(
                conn,
                "justify",
                &id.to_string(),
                &format!("{} by {approver}", outcome.to_db_str()),
            )
        })?;

        info!(id, status = outcome.to_db_str(), approver, "justification decided");
        Ok(())
    }

    /// Withdraw a request that has not been decided yet.
    pub fn delete(pool: &DbPool, id: i64) -> AppResult<()> {
        pool.with_tx(|conn| {
            justifications::delete_pending(conn, id)?;
            ttlog(conn, "justify", &id.to_string(), "pending request deleted")
        })
    }

    pub fn list(
        pool: &DbPool,
        employee_id: Option<i64>,
        status: Option<JustificationStatus>,
    ) -> AppResult<Vec<Justification>> {
        pool.with_conn(|conn| justifications::list_justifications(conn, employee_id, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::employees::insert_employee;

    fn setup() -> (DbPool, i64) {
        let pool = DbPool::open_in_memory().unwrap();
        let emp = pool.with_conn(|c| insert_employee(c, "Ana", "1")).unwrap();
        (pool, emp)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_reason_length_enforced() {
        let (pool, emp) = setup();
        let short = JustificationLogic::request(
            &pool,
            emp,
            day(),
            JustificationType::Medical,
            "flu",
            Channel::Manual,
        );
        assert!(matches!(short, Err(AppError::InvalidValue { field: "reason", .. })));

        let long = "x".repeat(REASON_MAX + 1);
        assert!(
            JustificationLogic::request(&pool, emp, day(), JustificationType::Other, &long, Channel::Manual)
                .is_err()
        );
    }

    #[test]
    fn test_decision_is_final() {
        let (pool, emp) = setup();
        let id = JustificationLogic::request(
            &pool,
            emp,
            day(),
            JustificationType::Medical,
            "medical certificate attached",
            Channel::Email,
        )
        .unwrap();

        JustificationLogic::approve(&pool, id, "hr").unwrap();

        let again = JustificationLogic::reject(&pool, id, "hr");
        assert!(matches!(again, Err(AppError::JustificationDecided { .. })));
        assert!(matches!(
            JustificationLogic::delete(&pool, id),
            Err(AppError::JustificationDecided { .. })
        ));

        let approved =
            JustificationLogic::list(&pool, Some(emp), Some(JustificationStatus::Approved)).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].approved_by.as_deref(), Some("hr"));
    }

    #[test]
    fn test_pending_can_be_deleted() {
        let (pool, emp) = setup();
        let id = JustificationLogic::request(
            &pool,
            emp,
            day(),
            JustificationType::Compensatory,
            "compensating saturday work",
            Channel::Manual,
        )
        .unwrap();

        JustificationLogic::delete(&pool, id).unwrap();
        assert!(JustificationLogic::list(&pool, None, None).unwrap().is_empty());
        assert!(matches!(
            JustificationLogic::approve(&pool, id, "hr"),
            Err(AppError::JustificationNotFound(_))
        ));
    }

    #[test]
    fn test_decision_without_audit_row_is_rolled_back() {
        let (pool, emp) = setup();
        let id = JustificationLogic::request(
            &pool,
            emp,
            day(),
            JustificationType::Medical,
            "medical certificate attached",
            Channel::Manual,
        )
        .unwrap();

        pool.with_conn(|c| {
            c.execute_batch("DROP TABLE log;")?;
            Ok(())
        })
        .unwrap();

        assert!(JustificationLogic::approve(&pool, id, "hr").is_err());
        let pending =
            JustificationLogic::list(&pool, Some(emp), Some(JustificationStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].approved_by.is_none());
    }

    #[test]
    fn test_unknown_employee() {
        let (pool, _) = setup();
        let res = JustificationLogic::request(
            &pool,
            404,
            day(),
            JustificationType::Medical,
            "medical certificate attached",
            Channel::Manual,
        );
        assert!(matches!(res, Err(AppError::EmployeeNotFound(_))));
    }
}
