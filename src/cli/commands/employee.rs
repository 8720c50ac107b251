use crate::cli::parser::{Commands, EmployeeAction};
use crate::config::Config;
use crate::core::department::DepartmentLogic;
use crate::db::{departments, employees};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::table::Table;
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;

    match action {
        EmployeeAction::Add {
            registration,
            name,
            department,
        } => {
            let registration = registration.trim();
            if registration.is_empty() || name.trim().is_empty() {
                return Err(AppError::InvalidValue {
                    field: "employee",
                    value: format!("'{registration}' / '{name}'"),
                });
            }
            let id = pool.with_tx(|conn| {
                let dept = department
                    .as_deref()
                    .map(|key| departments::resolve(conn, key))
                    .transpose()?;
                let id = employees::insert_employee(conn, name.trim(), registration)?;
                if let Some(d) = &dept {
                    employees::assign_department(conn, id, Some(d.id))?;
                }
                ttlog(conn, "employee", registration, &format!("added {}", name.trim()))?;
                Ok(id)
            })?;
            success(format!("Employee {} added (id {id}, registration {registration})", name.trim()));
        }

        EmployeeAction::List { all, department } => {
            let (list, codes) = pool.with_conn(|conn| {
                let filter = department
                    .as_deref()
                    .map(|key| departments::resolve(conn, key))
                    .transpose()?;
                let list = employees::list_employees(conn, *all, filter.map(|d| d.id))?;
                let codes: HashMap<i64, String> = departments::list_departments(conn, true)?
                    .into_iter()
                    .map(|d| (d.id, d.code))
                    .collect();
                Ok((list, codes))
            })?;
            if list.is_empty() {
                info("No employees registered.");
                return Ok(());
            }
            let mut t = Table::new(["id", "registration", "name", "department", "active"]);
            for e in list {
                let dept = e
                    .department_id
                    .and_then(|id| codes.get(&id).cloned())
                    .unwrap_or_else(|| "-".into());
                t.add_row(vec![
                    e.id.to_string(),
                    e.registration,
                    e.name,
                    dept,
                    if e.active { "yes".into() } else { "no".into() },
                ]);
            }
            print!("{}", t.render());
        }

        EmployeeAction::Assign {
            employee,
            department,
            ..
        } => {
            let (emp, dept) = DepartmentLogic::assign(&pool, employee, department.as_deref())?;
            match dept {
                Some(d) => success(format!("Employee {} assigned to {}", emp.name, d.code)),
                None => success(format!("Employee {} removed from department", emp.name)),
            }
        }

        EmployeeAction::Deactivate { employee } => {
            let e = pool.with_tx(|conn| {
                let e = employees::resolve(conn, employee)?;
                employees::set_active(conn, e.id, false)?;
                ttlog(conn, "employee", &e.registration, "deactivated")?;
                Ok(e)
            })?;
            success(format!("Employee {} deactivated", e.name));
        }
    }

    Ok(())
}
