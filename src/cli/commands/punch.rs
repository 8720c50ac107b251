use crate::cli::parser::{Commands, PunchAction};
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::db::employees;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::punch_kind::PunchKind;
use crate::ui::messages::{info, success};
use crate::utils::colors::{color_for_status, paint};
use crate::utils::date::{
    first_day_of_month, last_day_of_month, parse_required_date, resolve_period, today,
};
use crate::utils::table::Table;
use crate::utils::time::parse_required_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Punch { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;

    match action {
        PunchAction::Add {
            employee,
            date,
            time,
            kind,
        } => {
            let date = parse_required_date(date)?;
            let time = parse_required_time(time)?;
            let explicit = kind
                .as_deref()
                .map(|k| {
                    PunchKind::from_input(k).ok_or_else(|| AppError::InvalidPunchKind(k.to_string()))
                })
                .transpose()?;

            let emp = pool.with_conn(|conn| employees::resolve(conn, employee))?;
            let (id, kind) = PunchLogic::record(&pool, emp.id, date.and_time(time), explicit)?;

            success(format!(
                "Punch {id} recorded for {}: {date} {} ({})",
                emp.name,
                time.format("%H:%M"),
                kind.to_db_str()
            ));
        }

        PunchAction::List {
            employee,
            period,
            processed,
        } => {
            let (start, end) = match period {
                Some(p) => resolve_period(p)?,
                None => (first_day_of_month(today()), last_day_of_month(today())),
            };
            let emp = pool.with_conn(|conn| employees::resolve(conn, employee))?;

            if *processed {
                let rows = PunchLogic::list_processed(&pool, emp.id, start, end)?;
                if rows.is_empty() {
                    info(format!("No processed punches between {start} and {end}."));
                    return Ok(());
                }
                let mut t = Table::new(["id", "punch", "date", "time", "kind", "status", "by"]);
                for r in rows {
                    t.add_row(vec![
                        r.id.to_string(),
                        r.punch_id.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                        r.timestamp.date().to_string(),
                        r.timestamp.format("%H:%M").to_string(),
                        r.kind.to_db_str().to_string(),
                        paint(r.status.to_db_str(), color_for_status(r.status)),
                        r.processed_by,
                    ]);
                }
                print!("{}", t.render());
            } else {
                let rows = PunchLogic::list(&pool, emp.id, start, end)?;
                if rows.is_empty() {
                    info(format!("No punches between {start} and {end}."));
                    return Ok(());
                }
                let mut t = Table::new(["id", "date", "time", "kind", "device", "source"]);
                for p in rows {
                    t.add_row(vec![
                        p.id.to_string(),
                        p.date().to_string(),
                        p.time_str(),
                        p.kind.to_db_str().to_string(),
                        p.device.unwrap_or_default(),
                        p.source_file.unwrap_or_default(),
                    ]);
                }
                print!("{}", t.render());
            }
        }

        PunchAction::Del { id } => {
            let p = PunchLogic::delete(&pool, *id)?;
            success(format!(
                "Punch {id} deleted ({} {}). Reconcile {} again to refresh its results.",
                p.date(),
                p.time_str(),
                p.date()
            ));
        }
    }

    Ok(())
}
