use chrono::{DateTime, Duration, DurationRound, Utc};
use std::sync::RwLock;

/// Bucket key of the calendar hour (UTC) containing `instant`, e.g. `2024-05-01T14`
pub fn hour_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H").to_string()
}

/// Seconds left until the next hour starts, at least 1 while inside an hour
pub fn seconds_until_next_hour(instant: DateTime<Utc>) -> i64 {
    let start = instant
        .duration_trunc(Duration::hours(1))
        .unwrap_or(instant);
    let remaining = start + Duration::hours(1) - instant;
    let whole = remaining.num_seconds();
    // Round a partial second up
    if remaining > Duration::seconds(whole) {
        whole + 1
    } else {
        whole.max(0)
    }
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut guard = self
            .instant
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .instant
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
