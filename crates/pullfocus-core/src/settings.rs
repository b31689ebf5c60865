//! Timer preferences: interval lengths, round interval and auto-start.
//!
//! The profile is replaced wholesale on every update and written through to
//! the store immediately. Invalid profiles never reach the store.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ValidationError;
use crate::storage::{JsonSlot, KeyValueStore, SETTINGS_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsProfile {
    pub id: u32,
    /// Minutes.
    pub focus_duration: u32,
    /// Minutes.
    pub short_break_duration: u32,
    /// Minutes.
    pub long_break_duration: u32,
    /// Focus intervals per long-break cycle.
    pub round_interval: u32,
    pub auto_start: bool,
}

impl Default for SettingsProfile {
    fn default() -> Self {
        Self {
            id: 1,
            focus_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            round_interval: 4,
            auto_start: false,
        }
    }
}

impl SettingsProfile {
    /// # Errors
    /// Returns the first field that is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("focusDuration", self.focus_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("roundInterval", self.round_interval),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::NonPositive { field });
            }
        }
        Ok(())
    }
}

/// Owner of the single live [`SettingsProfile`].
pub struct SettingsStore {
    profile: SettingsProfile,
    slot: JsonSlot<SettingsProfile>,
}

impl SettingsStore {
    /// Load the saved profile, or fall back to (and persist) the defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let slot = JsonSlot::new(store, SETTINGS_KEY);
        let saved = slot.load().filter(|p: &SettingsProfile| match p.validate() {
            Ok(()) => true,
            Err(err) => {
                info!(error = %err, "ignoring invalid saved settings");
                false
            }
        });

        let profile = match saved {
            Some(profile) => profile,
            None => {
                let defaults = SettingsProfile::default();
                slot.save(&defaults);
                defaults
            }
        };

        Self { profile, slot }
    }

    pub fn profile(&self) -> &SettingsProfile {
        &self.profile
    }

    /// Replace the whole profile.
    ///
    /// # Errors
    /// Rejects non-positive durations or round interval; the current profile
    /// is left untouched in that case.
    pub fn update(&mut self, profile: SettingsProfile) -> Result<(), ValidationError> {
        profile.validate()?;
        debug!(?profile, "settings updated");
        self.profile = profile;
        self.slot.save(&self.profile);
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.profile = SettingsProfile::default();
        self.slot.save(&self.profile);
    }
}
