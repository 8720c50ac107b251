//! Departments and department-wide reconciliation.

use crate::core::reconcile::{ReconcileLogic, ReconcileSettings};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::{departments, employees};
use crate::errors::{AppError, AppResult};
use crate::models::day_result::AggregateResult;
use crate::models::department::Department;
use crate::models::employee::Employee;
use chrono::NaiveDate;
use tracing::info;

pub struct DepartmentLogic;

impl DepartmentLogic {
    pub fn add(pool: &DbPool, code: &str, name: &str) -> AppResult<i64> {
        let (code, name) = (code.trim(), name.trim());
        if code.is_empty() || name.is_empty() {
            return Err(AppError::InvalidValue {
                field: "department",
                value: format!("'{code}' / '{name}'"),
            });
        }
        pool.with_tx(|conn| {
            let id = departments::insert_department(conn, code, name)?;
            ttlog(conn, "department", code, &format!("added {name}"))?;
            Ok(id)
        })
    }

    pub fn list(pool: &DbPool, include_inactive: bool) -> AppResult<Vec<Department>> {
        pool.with_conn(|conn| departments::list_departments(conn, include_inactive))
    }

    pub fn set_active(pool: &DbPool, key: &str, active: bool) -> AppResult<Department> {
        pool.with_tx(|conn| {
            let dept = departments::resolve(conn, key)?;
            departments::set_active(conn, dept.id, active)?;
            let what = if active { "activated" } else { "deactivated" };
            ttlog(conn, "department", &dept.code, what)?;
            Ok(dept)
        })
    }

    pub fn delete(pool: &DbPool, key: &str) -> AppResult<Department> {
        pool.with_tx(|conn| {
            let dept = departments::resolve(conn, key)?;
            departments::delete_department(conn, &dept)?;
            ttlog(conn, "department", &dept.code, "deleted")?;
            Ok(dept)
        })
    }

    /// Move an employee into a department, or out of any with `None`.
    pub fn assign(
        pool: &DbPool,
        employee: &str,
        department: Option<&str>,
    ) -> AppResult<(Employee, Option<Department>)> {
        pool.with_tx(|conn| {
            let emp = employees::resolve(conn, employee)?;
            let dept = department
                .map(|key| departments::resolve(conn, key))
                .transpose()?;
            employees::assign_department(conn, emp.id, dept.as_ref().map(|d| d.id))?;
            ttlog(
                conn,
                "employee",
                &emp.registration,
                &match &dept {
                    Some(d) => format!("assigned to {}", d.code),
                    None => "removed from department".to_string(),
                },
            )?;
            Ok((emp, dept))
        })
    }

    /// Reconcile every active member of the department over the same range.
    pub fn reconcile(
        pool: &DbPool,
        settings: &ReconcileSettings,
        key: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<(Department, Vec<(Employee, AggregateResult)>)> {
        let (dept, members) = pool.with_conn(|conn| {
            let dept = departments::resolve(conn, key)?;
            let members = employees::list_employees(conn, false, Some(dept.id))?;
            Ok((dept, members))
        })?;

        let mut out = Vec::with_capacity(members.len());
        for emp in members {
            let result = ReconcileLogic::run(pool, settings.clone(), emp.id, start, end)?;
            out.push((emp, result));
        }

        info!(department = %dept.code, employees = out.len(), %start, %end, "department reconciled");
        Ok((dept, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::punches::insert_punch;
    use crate::models::punch::NewPunch;
    use crate::models::punch_kind::PunchKind;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_reconcile_covers_active_members_only() {
        let pool = DbPool::open_in_memory().unwrap();
        DepartmentLogic::add(&pool, "SEMED", "Education").unwrap();
        let (ana, bruno, carla) = pool
            .with_conn(|c| {
                Ok((
                    employees::insert_employee(c, "Ana", "1")?,
                    employees::insert_employee(c, "Bruno", "2")?,
                    employees::insert_employee(c, "Carla", "3")?,
                ))
            })
            .unwrap();
        DepartmentLogic::assign(&pool, "1", Some("SEMED")).unwrap();
        DepartmentLogic::assign(&pool, "2", Some("SEMED")).unwrap();
        pool.with_conn(|c| {
            employees::set_active(c, bruno, false)?;
            for t in ["2025-03-10 08:00", "2025-03-10 16:00"] {
                insert_punch(c, &NewPunch::manual(ana, ts(t), PunchKind::In))?;
                insert_punch(c, &NewPunch::manual(carla, ts(t), PunchKind::In))?;
            }
            Ok(())
        })
        .unwrap();

        let d = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let (dept, results) =
            DepartmentLogic::reconcile(&pool, &ReconcileSettings::default(), "SEMED", d, d).unwrap();

        assert_eq!(dept.code, "SEMED");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, ana);
        assert_eq!(results[0].1.regular, 1);
    }

    #[test]
    fn test_assign_and_unassign() {
        let pool = DbPool::open_in_memory().unwrap();
        let dept = DepartmentLogic::add(&pool, "SEMUS", "Health").unwrap();
        pool.with_conn(|c| employees::insert_employee(c, "Ana", "1"))
            .unwrap();

        let (emp, d) = DepartmentLogic::assign(&pool, "1", Some("SEMUS")).unwrap();
        assert_eq!(d.map(|d| d.id), Some(dept));
        assert!(matches!(
            DepartmentLogic::delete(&pool, "SEMUS"),
            Err(AppError::DepartmentInUse { .. })
        ));

        DepartmentLogic::assign(&pool, &emp.registration, None).unwrap();
        DepartmentLogic::delete(&pool, "SEMUS").unwrap();
        assert!(matches!(
            DepartmentLogic::assign(&pool, "1", Some("SEMUS")),
            Err(AppError::DepartmentNotFound(_))
        ));
    }
}
