//! Week numbering for plans and weight history

use chrono::{DateTime, Datelike, Local, Utc};

/// Source of the current time. Plans are keyed by ISO week number.
pub trait WeekClock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// ISO 8601 week number (1..=53) of the local date
    fn current_week(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WeekClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn current_week(&self) -> u32 {
        Local::now().iso_week().week()
    }
}
