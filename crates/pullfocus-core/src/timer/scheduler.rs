//! One-second countdown driver.
//!
//! The scheduler holds at most one armed deadline. Arming it again replaces
//! the previous deadline, so there is never more than one active driver.
//! Whoever owns the engine sleeps until [`Scheduler::deadline`] and then
//! calls [`Scheduler::poll`]; each successful poll is exactly one tick.

use tokio::time::{Duration, Instant};
use tracing::trace;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Scheduler {
    period: Duration,
    next_due: Option<Instant>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the driver; the first tick lands one period after `now`.
    /// Any previously armed deadline is dropped first.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.take().is_some() {
            trace!("replacing active countdown driver");
        }
        self.next_due = Some(now + self.period);
    }

    /// Disarm. Returns whether a driver was active.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consume one due tick. At most one tick per call; a late wake-up
    /// leaves the following deadline in the past so it fires immediately.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }
}
