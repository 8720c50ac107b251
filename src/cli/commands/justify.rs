use crate::cli::parser::{Commands, JustifyAction};
use crate::config::Config;
use crate::core::justification::JustificationLogic;
use crate::db::employees;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::justification::{Channel, JustificationStatus, JustificationType};
use crate::ui::messages::{info, success};
use crate::utils::date::parse_required_date;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Justify { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;

    match action {
        JustifyAction::Request {
            employee,
            date,
            kind,
            reason,
            channel,
        } => {
            let date = parse_required_date(date)?;
            let kind = JustificationType::from_input(kind).ok_or_else(|| AppError::InvalidValue {
                field: "type",
                value: kind.clone(),
            })?;
            let channel = Channel::from_db_str(&channel.trim().to_lowercase()).ok_or_else(|| {
                AppError::InvalidValue {
                    field: "channel",
                    value: channel.clone(),
                }
            })?;
            let emp = pool.with_conn(|conn| employees::resolve(conn, employee))?;

            let id = JustificationLogic::request(&pool, emp.id, date, kind, reason, channel)?;
            success(format!("Justification {id} filed for {} on {date} (pending)", emp.name));
        }

        JustifyAction::List { employee, status } => {
            let employee_id = match employee {
                Some(key) => Some(pool.with_conn(|conn| employees::resolve(conn, key))?.id),
                None => None,
            };
            let status = status
                .as_deref()
                .map(|s| {
                    JustificationStatus::from_db_str(&s.trim().to_lowercase()).ok_or_else(|| {
                        AppError::InvalidValue {
                            field: "status",
                            value: s.to_string(),
                        }
                    })
                })
                .transpose()?;

            let list = JustificationLogic::list(&pool, employee_id, status)?;
            if list.is_empty() {
                info("No justifications found.");
                return Ok(());
            }
            let mut t = Table::new(["id", "employee", "date", "type", "status", "by", "reason"]);
            for j in list {
                t.add_row(vec![
                    j.id.to_string(),
                    j.employee_id.to_string(),
                    j.date.to_string(),
                    j.kind.to_db_str().to_string(),
                    j.status.to_db_str().to_string(),
                    j.approved_by.unwrap_or_default(),
                    j.reason,
                ]);
            }
            print!("{}", t.render());
        }

        JustifyAction::Approve { id, by } => {
            JustificationLogic::approve(&pool, *id, by)?;
            success(format!("Justification {id} approved by {by}"));
        }

        JustifyAction::Reject { id, by } => {
            JustificationLogic::reject(&pool, *id, by)?;
            success(format!("Justification {id} rejected by {by}"));
        }

        JustifyAction::Del { id } => {
            JustificationLogic::delete(&pool, *id)?;
            success(format!("Justification {id} deleted"));
        }
    }

    Ok(())
}
