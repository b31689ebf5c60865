use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sessions::SessionRecord;
use crate::settings::SettingsProfile;
use crate::timer::Mode;

/// Every state change in the system produces an Event.
/// Observers subscribe to them through [`crate::timer::TimerService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_seconds: u64,
        /// True when continuing a paused interval.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero. `cycles_count` already includes it.
    TimerCompleted {
        mode: Mode,
        cycles_count: u32,
        at: DateTime<Utc>,
    },
    SessionLogged {
        session: SessionRecord,
    },
    SettingsUpdated {
        settings: SettingsProfile,
        at: DateTime<Utc>,
    },
    CyclesReset {
        at: DateTime<Utc>,
    },
    FullReset {
        at: DateTime<Utc>,
    },
}
