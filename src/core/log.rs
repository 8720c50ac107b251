use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::{strip_ansi, truncate_visible};
use ansi_term::Colour;

const OP_WIDTH: usize = 40;

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "reconcile" => Colour::Green,
        "import" => Colour::Cyan,
        "justify" => Colour::Yellow,
        "holiday" | "schedule" => Colour::Blue,
        "employee" | "punch" => Colour::White,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let entries = pool.with_conn(|conn| load_log(conn, limit))?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");

        // oldest first, like a journal
        for e in entries.iter().rev() {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| e.date.clone());

            let op = color_for_operation(&e.operation).paint(e.operation.as_str()).to_string();
            let label = if e.target.is_empty() {
                op
            } else {
                format!("{op} ({})", e.target)
            };
            let label = truncate_visible(&label, OP_WIDTH);
            let padding = " ".repeat(OP_WIDTH.saturating_sub(strip_ansi(&label).chars().count()));

            println!(
                "{:>id_w$}: {:<25} | {}{} => {}",
                e.id,
                date,
                label,
                padding,
                e.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}
