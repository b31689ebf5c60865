//! # PullFocus Core Library
//!
//! Business logic for the PullFocus Pomodoro timer. The CLI binary is a thin
//! front end over this crate; every write path lives here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a synchronous state machine (Idle, Running, Paused,
//!   Completed) that cycles focus and break intervals and logs sessions
//! - **Scheduler**: the one-second countdown deadline owned by the engine
//! - **Timer Service**: a tokio task that owns the engine, serialises
//!   commands and ticks, and publishes views and events
//! - **Session Log**: most-recent-first history with daily views
//! - **Settings**: validated interval lengths, round interval, auto start
//! - **Storage**: a synchronous key-value port with SQLite and in-memory
//!   implementations; all writes are best-effort
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerService`]: Async single-owner driver
//! - [`SessionLog`]: Session history
//! - [`SettingsStore`]: Timer preferences
//! - [`KeyValueStore`]: Persistence port

pub mod clock;
pub mod error;
pub mod events;
pub mod sessions;
pub mod settings;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use sessions::{DayGroup, SessionLog, SessionRecord, SessionStatus};
pub use settings::{SettingsProfile, SettingsStore};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{Mode, Status, TimerEngine, TimerHandle, TimerService, TimerSnapshot, TimerView};
