use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mode::{Mode, Status};

/// Complete state of the single live timer. Replaced wholesale on every
/// transition and persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Creation time in epoch milliseconds.
    pub id: i64,
    pub mode: Mode,
    pub status: Status,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub completed_at: Option<DateTime<Utc>>,
    pub remaining_seconds: u64,
    /// Completed focus intervals since the last cycle reset.
    pub cycles_count: u32,
}

impl TimerSnapshot {
    pub fn fresh(id: i64, mode: Mode, remaining_seconds: u64) -> Self {
        Self {
            id,
            mode,
            status: Status::Idle,
            started_at: None,
            paused_at: None,
            completed_at: None,
            remaining_seconds,
            cycles_count: 0,
        }
    }

    /// Same timer, back to Idle in `mode` with all timestamps cleared.
    pub fn idle_in(&self, mode: Mode, remaining_seconds: u64) -> Self {
        Self {
            mode,
            status: Status::Idle,
            started_at: None,
            paused_at: None,
            completed_at: None,
            remaining_seconds,
            ..self.clone()
        }
    }
}

/// Read model handed to observers. Always derived from the current snapshot
/// and settings, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerView {
    pub mode: Mode,
    pub status: Status,
    pub remaining_seconds: u64,
    pub cycles_count: u32,
    pub duration_seconds: u64,
    /// `MM:SS`
    pub formatted: String,
    /// 0.0 .. 100.0
    pub progress_pct: f64,
}

impl TimerView {
    pub fn derive(snapshot: &TimerSnapshot, duration_seconds: u64) -> Self {
        Self {
            mode: snapshot.mode,
            status: snapshot.status,
            remaining_seconds: snapshot.remaining_seconds,
            cycles_count: snapshot.cycles_count,
            duration_seconds,
            formatted: format_clock(snapshot.remaining_seconds),
            progress_pct: progress_pct(duration_seconds, snapshot.remaining_seconds),
        }
    }
}

/// `MM:SS`, minutes not wrapped at 60.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn progress_pct(duration_seconds: u64, remaining_seconds: u64) -> f64 {
    if duration_seconds == 0 {
        return 0.0;
    }
    let elapsed = duration_seconds.saturating_sub(remaining_seconds);
    elapsed as f64 / duration_seconds as f64 * 100.0
}
