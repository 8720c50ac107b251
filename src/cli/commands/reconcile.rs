use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile::{ReconcileLogic, ReconcileSettings};
use crate::db::employees;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::day_result::AggregateResult;
use crate::models::employee::Employee;
use crate::ui::messages::{error, header, warning};
use crate::utils::colors::{GREEN, RED, color_for_duration, color_for_status, paint};
use crate::utils::date::{
    first_day_of_month, last_day_of_month, parse_required_date, resolve_period, today,
};
use crate::utils::formatting::bold;
use crate::utils::path::expand_tilde;
use crate::utils::table::Table;
use crate::utils::time::format_duration;
use chrono::{Datelike, NaiveDate, TimeDelta};

/// Date bounds from `--period`, `--from`/`--to`, or the current month.
fn resolve_range(
    period: &Option<String>,
    start: &Option<String>,
    end: &Option<String>,
) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some(p) = period {
        return resolve_period(p);
    }
    match (start, end) {
        (Some(a), Some(b)) => Ok((parse_required_date(a)?, parse_required_date(b)?)),
        (Some(a), None) => {
            let a = parse_required_date(a)?;
            Ok((a, last_day_of_month(a)))
        }
        (None, Some(b)) => {
            let b = parse_required_date(b)?;
            Ok((first_day_of_month(b), b))
        }
        (None, None) => {
            let t = today();
            Ok((first_day_of_month(t), last_day_of_month(t)))
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reconcile {
        employee,
        period,
        start,
        end,
        export,
        format,
        force,
    } = cmd
    {
        let (start, end) = resolve_range(period, start, end)?;
        let settings = ReconcileSettings::from_config(cfg)?;

        let pool = DbPool::open(&cfg.database)?;
        let emp = pool.with_conn(|conn| employees::resolve(conn, employee))?;

        let result = ReconcileLogic::run(&pool, settings, emp.id, start, end)?;
        print_result(&emp, &result);

        if let Some(file) = export {
            ExportLogic::export(&result, *format, &expand_tilde(file), *force)?;
        }
    }

    Ok(())
}

fn print_result(emp: &Employee, result: &AggregateResult) {
    header(format!(
        "{} ({}) {} → {}",
        emp.name, emp.registration, result.start, result.end
    ));

    let mut t = Table::new([
        "date", "day", "status", "punches", "worked", "extra", "short", "observation",
    ]);
    let mut worked = TimeDelta::zero();
    let mut extra = TimeDelta::zero();
    let mut short = TimeDelta::zero();

    for d in &result.per_day {
        worked += d.worked;
        extra += d.extra;
        short += d.short;

        t.add_row(vec![
            d.date.to_string(),
            d.date.weekday().to_string(),
            paint(d.status.to_db_str(), color_for_status(d.status)),
            d.punches.join(" "),
            format_duration(d.worked),
            paint(&format_duration(d.extra), color_for_duration(d.extra, GREEN)),
            paint(&format_duration(d.short), color_for_duration(d.short, RED)),
            d.observation.clone(),
        ]);
    }
    print!("{}", t.render());

    println!();
    println!(
        "{} {} days: {} regular, {} irregular, {} justified",
        bold("Total:"),
        result.total_days,
        result.regular,
        result.irregular,
        result.justified
    );
    println!(
        "{} worked {}, extra {}, short {}",
        bold("Hours:"),
        format_duration(worked),
        format_duration(extra),
        format_duration(short)
    );

    if result.has_errors() {
        warning(format!(
            "{} day(s) could not be stored and are left out of the totals:",
            result.errors.len()
        ));
        for e in &result.errors {
            error(e);
        }
    }
}
