use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::ImportLogic;
use crate::core::reconcile::{ReconcileLogic, ReconcileSettings};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file, reconcile } = cmd {
        let path = expand_tilde(file);
        let pool = DbPool::open(&cfg.database)?;

        info(format!("Importing {}", path.display()));
        let report = ImportLogic::import_file(&pool, &path)?;

        success(format!(
            "{} of {} lines imported",
            report.imported, report.total_lines
        ));
        if report.duplicates > 0 {
            info(format!(
                "{} punches already stored, skipped",
                report.duplicates
            ));
        }
        if report.invalid > 0 {
            warning(format!("{} lines rejected:", report.invalid));
            for e in &report.errors {
                println!("    {e}");
            }
        }

        if *reconcile {
            let settings = ReconcileSettings::from_config(cfg)?;
            for (employee_id, (start, end)) in &report.affected {
                let result =
                    ReconcileLogic::run(&pool, settings.clone(), *employee_id, *start, *end)?;
                info(format!(
                    "Employee {employee_id}: {start} → {end}: {} regular, {} irregular, {} justified",
                    result.regular, result.irregular, result.justified
                ));
                for e in &result.errors {
                    error(e);
                }
            }
        }
    }

    Ok(())
}
