//! Timer engine implementation.
//!
//! The engine is a synchronous state machine that owns the live
//! [`TimerSnapshot`] together with the settings store and the session log.
//! It does not spawn anything: a countdown is an armed [`Scheduler`]
//! deadline, and the owner (usually [`super::TimerService`]) sleeps until
//! that deadline and calls [`TimerEngine::poll_scheduler`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle ──start──▶ Running ──pause──▶ Paused ──start──▶ Running
//!                    │
//!                 tick at 0
//!                    ▼
//!                Completed ──(next mode)──▶ Idle [──auto start──▶ Running]
//! ```
//!
//! `reset`, `change_mode` and `next_mode` return to Idle from anywhere.
//! Every mutation replaces the snapshot and writes it through to storage
//! before the call returns.

use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::mode::{duration_secs, Mode, Status};
use super::scheduler::Scheduler;
use super::snapshot::{TimerSnapshot, TimerView};
use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::events::Event;
use crate::sessions::{elapsed_minutes, SessionLog, SessionRecord, SessionStatus};
use crate::settings::{SettingsProfile, SettingsStore};
use crate::storage::{JsonSlot, KeyValueStore, TIMER_KEY};

pub struct TimerEngine {
    snapshot: TimerSnapshot,
    scheduler: Scheduler,
    settings: SettingsStore,
    sessions: SessionLog,
    slot: JsonSlot<TimerSnapshot>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    /// Attached to the next session that gets logged.
    note: Option<String>,
    outbox: Vec<Event>,
}

impl TimerEngine {
    /// Restore the engine from `store` using the system clock.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Restore the engine from `store`.
    ///
    /// A saved snapshot is taken verbatim. If it was Running, the countdown
    /// resumes right away from the saved remaining seconds; time spent while
    /// the process was gone is not deducted.
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let settings = SettingsStore::load(Arc::clone(&store));
        let sessions = SessionLog::load(Arc::clone(&store));
        let slot = JsonSlot::new(Arc::clone(&store), TIMER_KEY);

        let (snapshot, restored) = match slot.load() {
            Some(saved) => (saved, true),
            None => {
                let fresh = TimerSnapshot::fresh(
                    clock.now().timestamp_millis(),
                    Mode::Focus,
                    duration_secs(Mode::Focus, settings.profile()),
                );
                (fresh, false)
            }
        };

        let mut engine = Self {
            snapshot,
            scheduler: Scheduler::default(),
            settings,
            sessions,
            slot,
            store,
            clock,
            note: None,
            outbox: Vec::new(),
        };

        if !restored {
            engine.slot.save(&engine.snapshot);
        }

        match engine.snapshot.status {
            Status::Running => {
                info!(
                    mode = %engine.snapshot.mode,
                    remaining = engine.snapshot.remaining_seconds,
                    "resuming countdown from saved state"
                );
                engine.scheduler.start(Instant::now());
            }
            _ => engine.sync_with_settings(),
        }

        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &TimerSnapshot {
        &self.snapshot
    }

    pub fn mode(&self) -> Mode {
        self.snapshot.mode
    }

    pub fn status(&self) -> Status {
        self.snapshot.status
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.snapshot.remaining_seconds
    }

    pub fn cycles_count(&self) -> u32 {
        self.snapshot.cycles_count
    }

    pub fn settings(&self) -> &SettingsProfile {
        self.settings.profile()
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    /// Full length of the current mode under the current settings.
    pub fn duration_seconds(&self) -> u64 {
        duration_secs(self.snapshot.mode, self.settings.profile())
    }

    pub fn view(&self) -> TimerView {
        TimerView::derive(&self.snapshot, self.duration_seconds())
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. No-op while already Running.
    pub fn start(&mut self) -> Option<Event> {
        if self.snapshot.status == Status::Running {
            return None;
        }

        let now = self.clock.now();
        let resumed = self.snapshot.status == Status::Paused;
        let next = TimerSnapshot {
            status: Status::Running,
            started_at: self.snapshot.started_at.or(Some(now)),
            ..self.snapshot.clone()
        };
        self.commit(next);
        self.scheduler.start(Instant::now());

        Some(self.emit(Event::TimerStarted {
            mode: self.snapshot.mode,
            remaining_seconds: self.snapshot.remaining_seconds,
            resumed,
            at: now,
        }))
    }

    /// Pause a running countdown. No-op in any other state.
    pub fn pause(&mut self) -> Option<Event> {
        if self.snapshot.status != Status::Running {
            return None;
        }

        self.scheduler.stop();
        let now = self.clock.now();
        let next = TimerSnapshot {
            status: Status::Paused,
            paused_at: Some(now),
            ..self.snapshot.clone()
        };
        self.commit(next);

        Some(self.emit(Event::TimerPaused {
            mode: self.snapshot.mode,
            remaining_seconds: self.snapshot.remaining_seconds,
            at: now,
        }))
    }

    /// Back to Idle in the current mode with a full interval.
    pub fn reset(&mut self) -> Option<Event> {
        self.scheduler.stop();
        let mode = self.snapshot.mode;
        let next = self.snapshot.idle_in(mode, self.duration_for(mode));
        self.commit(next);

        Some(self.emit(Event::TimerReset {
            mode,
            remaining_seconds: self.snapshot.remaining_seconds,
            at: self.clock.now(),
        }))
    }

    /// Switch to `mode`, Idle, with a full interval.
    pub fn change_mode(&mut self, mode: Mode) -> Option<Event> {
        self.scheduler.stop();
        let from = self.snapshot.mode;
        let next = self.snapshot.idle_in(mode, self.duration_for(mode));
        self.commit(next);

        Some(self.emit(Event::ModeChanged {
            from,
            to: mode,
            remaining_seconds: self.snapshot.remaining_seconds,
            at: self.clock.now(),
        }))
    }

    /// Advance to the mode that follows the current one.
    ///
    /// With `log_skipped`, an interval that was Running or Paused and has a
    /// start time is recorded as a skipped session covering start..now.
    pub fn next_mode(&mut self, log_skipped: bool) -> Option<Event> {
        let current = self.snapshot.mode;
        let active = matches!(self.snapshot.status, Status::Running | Status::Paused);

        if log_skipped && active {
            if let Some(started_at) = self.snapshot.started_at {
                let ended_at = self.clock.now();
                let record = SessionRecord::new(
                    current,
                    SessionStatus::Skipped,
                    started_at,
                    ended_at,
                    elapsed_minutes(started_at, ended_at),
                );
                self.log_session(record);
            }
        }

        let next = current.next(self.snapshot.cycles_count, self.settings.profile().round_interval);
        self.change_mode(next)
    }

    /// Manual skip: [`Self::next_mode`] with skip logging.
    pub fn skip(&mut self) -> Option<Event> {
        self.next_mode(true)
    }

    /// Apply one scheduler tick if one is due at `now`.
    pub fn poll_scheduler(&mut self, now: Instant) -> Option<Event> {
        if self.scheduler.poll(now) {
            self.tick()
        } else {
            None
        }
    }

    /// One elapsed second. Decrements while time remains; at zero, performs
    /// the completion transition and returns its event.
    pub fn tick(&mut self) -> Option<Event> {
        if self.snapshot.status != Status::Running {
            return None;
        }

        if self.snapshot.remaining_seconds > 0 {
            let next = TimerSnapshot {
                remaining_seconds: self.snapshot.remaining_seconds - 1,
                ..self.snapshot.clone()
            };
            self.commit(next);
            return None;
        }

        Some(self.complete())
    }

    /// Replace the settings profile, then re-sync an idle countdown.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when any duration or the round interval
    /// is zero; nothing changes in that case.
    pub fn update_settings(&mut self, profile: SettingsProfile) -> Result<Event, ValidationError> {
        self.settings.update(profile)?;
        self.sync_with_settings();
        Ok(self.emit(Event::SettingsUpdated {
            settings: self.settings.profile().clone(),
            at: self.clock.now(),
        }))
    }

    pub fn reset_cycles(&mut self) -> Option<Event> {
        let next = TimerSnapshot {
            cycles_count: 0,
            ..self.snapshot.clone()
        };
        self.commit(next);
        Some(self.emit(Event::CyclesReset { at: self.clock.now() }))
    }

    /// Wipe everything: session history, settings and timer state.
    ///
    /// The whole call completes before any observer can read the engine
    /// again, so the three stores are never seen out of step.
    pub fn full_reset(&mut self) -> Option<Event> {
        self.scheduler.stop();
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to purge store during full reset");
        }

        self.sessions.clear();
        self.settings.reset_to_defaults();
        self.note = None;

        let next = TimerSnapshot {
            cycles_count: 0,
            ..self
                .snapshot
                .idle_in(Mode::Focus, self.duration_for(Mode::Focus))
        };
        self.commit(next);
        info!("full reset");

        Some(self.emit(Event::FullReset { at: self.clock.now() }))
    }

    /// Note attached to the next logged session (completed or skipped).
    pub fn set_session_note(&mut self, note: Option<String>) {
        self.note = note.filter(|n| !n.trim().is_empty());
    }

    pub fn remove_session(&mut self, id: i64) -> bool {
        self.sessions.remove(id)
    }

    pub fn clear_sessions(&mut self) {
        self.sessions.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        self.scheduler.stop();

        let now = self.clock.now();
        let mode = self.snapshot.mode;
        let started_at = self.snapshot.started_at.unwrap_or(now);
        let cycles_count = if mode == Mode::Focus {
            self.snapshot.cycles_count + 1
        } else {
            self.snapshot.cycles_count
        };

        let next = TimerSnapshot {
            status: Status::Completed,
            completed_at: Some(now),
            cycles_count,
            ..self.snapshot.clone()
        };
        self.commit(next);

        // Nominal interval length, not measured wall time.
        let minutes = (self.duration_for(mode) as f64 / 60.0).round() as u32;
        self.log_session(SessionRecord::new(
            mode,
            SessionStatus::Completed,
            started_at,
            now,
            minutes,
        ));

        let completed = self.emit(Event::TimerCompleted {
            mode,
            cycles_count,
            at: now,
        });
        info!(%mode, cycles_count, "interval completed");

        self.next_mode(false);
        if self.settings.profile().auto_start {
            self.start();
        }

        completed
    }

    fn log_session(&mut self, record: SessionRecord) {
        let record = record.with_description(self.note.take());
        let logged = self.sessions.append(record);
        self.emit(Event::SessionLogged { session: logged });
    }

    /// Snap an idle countdown to the current duration of its mode.
    fn sync_with_settings(&mut self) {
        if self.snapshot.status != Status::Idle {
            return;
        }
        let duration = self.duration_seconds();
        if self.snapshot.remaining_seconds != duration {
            debug!(
                from = self.snapshot.remaining_seconds,
                to = duration,
                "re-syncing idle countdown to settings"
            );
            let next = TimerSnapshot {
                remaining_seconds: duration,
                ..self.snapshot.clone()
            };
            self.commit(next);
        }
    }

    fn duration_for(&self, mode: Mode) -> u64 {
        duration_secs(mode, self.settings.profile())
    }

    fn commit(&mut self, next: TimerSnapshot) {
        self.snapshot = next;
        self.slot.save(&self.snapshot);
    }

    fn emit(&mut self, event: Event) -> Event {
        debug!(?event, "timer event");
        self.outbox.push(event.clone());
        event
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        if self.scheduler.stop() {
            debug!("countdown driver stopped on teardown");
        }
    }
}
