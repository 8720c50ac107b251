use crate::cli::parser::{Commands, HolidayAction};
use crate::config::Config;
use crate::core::calendar::HolidayLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::holiday::HolidayScope;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, paint};
use crate::utils::date::{parse_required_date, resolve_period, today};
use crate::utils::table::Table;
use chrono::Datelike;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Holiday { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;

    match action {
        HolidayAction::Add {
            date,
            description,
            scope,
        } => {
            let date = parse_required_date(date)?;
            let scope = HolidayScope::from_input(scope).ok_or_else(|| AppError::InvalidValue {
                field: "scope",
                value: scope.clone(),
            })?;
            HolidayLogic::add(&pool, date, description, scope)?;
            success(format!("Holiday added: {date} {description}"));
        }

        HolidayAction::List { period } => {
            let period = period
                .clone()
                .unwrap_or_else(|| today().year().to_string());
            let (start, end) = resolve_period(&period)?;
            let list = HolidayLogic::list(&pool, start, end)?;
            if list.is_empty() {
                info(format!("No holidays between {start} and {end}."));
                return Ok(());
            }
            let mut t = Table::new(["date", "weekday", "scope", "description"]);
            for h in list {
                let desc = if h.active {
                    h.description
                } else {
                    paint(&format!("{} (inactive)", h.description), GREY)
                };
                t.add_row(vec![
                    h.date.to_string(),
                    h.date.weekday().to_string(),
                    h.scope.to_db_str().to_string(),
                    desc,
                ]);
            }
            print!("{}", t.render());
        }

        HolidayAction::Activate { date } => {
            let date = parse_required_date(date)?;
            HolidayLogic::set_active(&pool, date, true)?;
            success(format!("Holiday {date} activated"));
        }

        HolidayAction::Deactivate { date } => {
            let date = parse_required_date(date)?;
            HolidayLogic::set_active(&pool, date, false)?;
            success(format!("Holiday {date} deactivated"));
        }

        HolidayAction::Del { date } => {
            let date = parse_required_date(date)?;
            HolidayLogic::delete(&pool, date)?;
            success(format!("Holiday {date} deleted"));
        }
    }

    Ok(())
}
