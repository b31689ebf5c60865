mod log;
mod record;

pub use log::{elapsed_minutes, DayGroup, SessionLog};
pub use record::{SessionRecord, SessionStatus};
