use clap::Subcommand;
use pullfocus_core::SessionLog;
use serde_json::json;

use super::common::{print_json, CmdResult, Host};

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List logged sessions, newest first
    List {
        /// Only show the most recent N sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sessions started today plus today's focus total
    Today,
    /// Sessions grouped by the local day they started on
    Grouped,
    /// Delete one session by id
    Remove {
        /// Session id (epoch milliseconds)
        id: i64,
    },
    /// Delete the whole history
    Clear,
}

pub fn run(action: SessionsAction, host: &Host) -> CmdResult {
    let mut log = SessionLog::load(host.open_store()?);

    match action {
        SessionsAction::List { limit } => {
            let records = log.records();
            let shown = &records[..limit.unwrap_or(records.len()).min(records.len())];
            print_json(shown)?;
        }
        SessionsAction::Today => {
            print_json(&json!({
                "sessions": log.today(),
                "totalFocusMinutes": log.total_focus_minutes_today(),
                "totalFocusHours": log.total_focus_hours_today(),
            }))?;
        }
        SessionsAction::Grouped => print_json(&log.grouped_by_day())?,
        SessionsAction::Remove { id } => {
            let removed = log.remove(id);
            print_json(&json!({ "id": id, "removed": removed }))?;
        }
        SessionsAction::Clear => {
            let count = log.len();
            log.clear();
            print_json(&json!({ "cleared": count }))?;
        }
    }
    Ok(())
}
