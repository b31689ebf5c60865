use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::settings::SettingsProfile;

/// Which interval kind is active. Doubles as the session type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Running,
    Paused,
    Completed,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "short-break",
            Mode::LongBreak => "long-break",
        }
    }

    /// Mode that follows this one.
    ///
    /// `cycles_count` must already include the focus interval that just
    /// ended: every `round_interval`-th focus leads into a long break.
    pub fn next(self, cycles_count: u32, round_interval: u32) -> Mode {
        match self {
            Mode::Focus => {
                if cycles_count > 0 && round_interval > 0 && cycles_count % round_interval == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "focus" => Ok(Mode::Focus),
            "short-break" | "short" => Ok(Mode::ShortBreak),
            "long-break" | "long" => Ok(Mode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("unknown mode '{other}'"),
            }),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Focus
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Idle
    }
}

/// Length of `mode` in seconds under `settings`.
///
/// Always recomputed from the live settings, never cached.
pub fn duration_secs(mode: Mode, settings: &SettingsProfile) -> u64 {
    let minutes = match mode {
        Mode::Focus => settings.focus_duration,
        Mode::ShortBreak => settings.short_break_duration,
        Mode::LongBreak => settings.long_break_duration,
    };
    u64::from(minutes).saturating_mul(60)
}
