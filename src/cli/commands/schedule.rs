use crate::cli::parser::{Commands, ScheduleAction};
use crate::config::Config;
use crate::core::calendar::{ScheduleLogic, parse_period, parse_weekday};
use crate::db::employees;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;
use crate::utils::time::format_duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Schedule { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;

    match action {
        ScheduleAction::Set {
            employee,
            weekday,
            periods,
        } => {
            let emp = pool.with_conn(|conn| employees::resolve(conn, employee))?;
            let weekday = parse_weekday(weekday)?;
            let periods = periods
                .iter()
                .map(|p| parse_period(p))
                .collect::<AppResult<Vec<_>>>()?;

            ScheduleLogic::set(&pool, emp.id, weekday, &periods)?;
            if periods.is_empty() {
                success(format!("{weekday} cleared for {}; default quota applies", emp.name));
            } else {
                success(format!("{weekday} schedule set for {}", emp.name));
            }
        }

        ScheduleAction::Show { employee } => {
            let emp = pool.with_conn(|conn| employees::resolve(conn, employee))?;
            let week = ScheduleLogic::week(&pool, emp.id)?;
            if week.is_empty() {
                info(format!(
                    "No schedule for {}; the default quota ({}) applies every weekday.",
                    emp.name, cfg.daily_quota
                ));
                return Ok(());
            }
            let mut t = Table::new(["weekday", "periods", "quota"]);
            for s in week {
                let periods: Vec<String> = s
                    .periods
                    .iter()
                    .map(|p| format!("{}-{}", p.start.format("%H:%M"), p.end.format("%H:%M")))
                    .collect();
                t.add_row(vec![s.weekday.to_string(), periods.join(" "), format_duration(s.quota())]);
            }
            print!("{}", t.render());
        }
    }

    Ok(())
}
