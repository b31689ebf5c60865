mod engine;
mod mode;
mod scheduler;
mod service;
mod snapshot;

pub use engine::TimerEngine;
pub use mode::{duration_secs, Mode, Status};
pub use scheduler::{Scheduler, TICK_PERIOD};
pub use service::{TimerHandle, TimerService};
pub use snapshot::{format_clock, progress_pct, TimerSnapshot, TimerView};
