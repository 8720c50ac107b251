use crate::cli::parser::{Commands, DepartmentAction};
use crate::config::Config;
use crate::core::department::DepartmentLogic;
use crate::core::reconcile::ReconcileSettings;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{error, header, info, success, warning};
use crate::utils::date::{first_day_of_month, last_day_of_month, resolve_period, today};
use crate::utils::formatting::bold;
use crate::utils::table::Table;
use crate::utils::time::format_duration;
use chrono::TimeDelta;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Department { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;

    match action {
        DepartmentAction::Add { code, name } => {
            let id = DepartmentLogic::add(&pool, code, name)?;
            success(format!("Department {} added (id {id})", code.trim()));
        }

        DepartmentAction::List { all } => {
            let list = DepartmentLogic::list(&pool, *all)?;
            if list.is_empty() {
                info("No departments registered.");
                return Ok(());
            }
            let mut t = Table::new(["id", "code", "name", "active"]);
            for d in list {
                t.add_row(vec![
                    d.id.to_string(),
                    d.code,
                    d.name,
                    if d.active { "yes".into() } else { "no".into() },
                ]);
            }
            print!("{}", t.render());
        }

        DepartmentAction::Activate { department } => {
            let d = DepartmentLogic::set_active(&pool, department, true)?;
            success(format!("Department {} activated", d.code));
        }

        DepartmentAction::Deactivate { department } => {
            let d = DepartmentLogic::set_active(&pool, department, false)?;
            success(format!("Department {} deactivated", d.code));
        }

        DepartmentAction::Del { department } => {
            let d = DepartmentLogic::delete(&pool, department)?;
            success(format!("Department {} deleted", d.code));
        }

        DepartmentAction::Reconcile { department, period } => {
            let (start, end) = match period {
                Some(p) => resolve_period(p)?,
                None => (first_day_of_month(today()), last_day_of_month(today())),
            };
            let settings = ReconcileSettings::from_config(cfg)?;
            let (dept, results) = DepartmentLogic::reconcile(&pool, &settings, department, start, end)?;

            header(format!("{} ({}) {start} → {end}", dept.name, dept.code));
            if results.is_empty() {
                info("No active employees in this department.");
                return Ok(());
            }

            let mut t = Table::new([
                "registration", "name", "days", "regular", "irregular", "justified", "worked",
                "short",
            ]);
            let mut failed = 0;
            for (emp, r) in &results {
                let worked = r.per_day.iter().fold(TimeDelta::zero(), |acc, d| acc + d.worked);
                let short = r.per_day.iter().fold(TimeDelta::zero(), |acc, d| acc + d.short);
                t.add_row(vec![
                    emp.registration.clone(),
                    emp.name.clone(),
                    r.total_days.to_string(),
                    r.regular.to_string(),
                    r.irregular.to_string(),
                    r.justified.to_string(),
                    format_duration(worked),
                    format_duration(short),
                ]);
                failed += r.errors.len();
            }
            print!("{}", t.render());

            println!();
            println!(
                "{} {} employees: {} regular, {} irregular, {} justified days",
                bold("Total:"),
                results.len(),
                results.iter().map(|(_, r)| r.regular).sum::<usize>(),
                results.iter().map(|(_, r)| r.irregular).sum::<usize>(),
                results.iter().map(|(_, r)| r.justified).sum::<usize>(),
            );

            if failed > 0 {
                warning(format!("{failed} day(s) could not be stored:"));
                for (emp, r) in &results {
                    for e in &r.errors {
                        error(format!("{}: {e}", emp.registration));
                    }
                }
            }
        }
    }

    Ok(())
}
