//! Remaining-time breakdown until an event starts.
//!
//! [`compute_remaining`] is a pure function of the target and the current
//! instant. [`CountdownTicker`] re-runs it on a fixed period to keep a display
//! live.

mod clock;
mod ticker;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::parse_date_time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ticker::{CountdownTicker, FrameStream, TickerHandle, DEFAULT_REFRESH_PERIOD};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownStatus {
    /// The target is still in the future.
    Running,
    /// The target is at or before the current instant.
    Elapsed,
    /// The target could not be parsed.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub status: CountdownStatus,
}

impl Countdown {
    fn zeroed(status: CountdownStatus) -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            status,
        }
    }

    pub fn invalid() -> Self {
        Self::zeroed(CountdownStatus::Invalid)
    }

    /// Breakdown of `target - now`, floored to whole seconds.
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if target <= now {
            return Self::zeroed(CountdownStatus::Elapsed);
        }

        let total = (target - now).num_seconds();
        Self {
            days: total / SECONDS_PER_DAY,
            hours: ((total % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u8,
            minutes: ((total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
            seconds: (total % SECONDS_PER_MINUTE) as u8,
            status: CountdownStatus::Running,
        }
    }

    pub fn is_elapsed(&self) -> bool {
        self.status == CountdownStatus::Elapsed
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    pub fn display(&self) -> CountdownDisplay {
        CountdownDisplay {
            days: format!("{:02}", self.days),
            hours: format!("{:02}", self.hours),
            minutes: format!("{:02}", self.minutes),
            seconds: format!("{:02}", self.seconds),
            elapsed: self.is_elapsed(),
            expired: !self.is_running(),
            status: self.status,
        }
    }
}

/// Text form of a [`Countdown`] as shown on a card.
///
/// `elapsed` is true only when the target has passed. `expired` drives the
/// expired visual state and is also set for unparseable targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub elapsed: bool,
    pub expired: bool,
    pub status: CountdownStatus,
}

/// Parses a target timestamp, trying in order:
/// 1. the canonical `YYYY-MM-DDTHH:mm:ss[.sss]Z` form
/// 2. RFC 3339 with any offset
/// 3. RFC 2822
/// 4. a zone-less date-time, read as UTC
/// 5. a plain `YYYY-MM-DD` date, read as UTC midnight
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Some(instant) = parse_date_time(input) {
        return Some(instant);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(input) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Never fails: an unparseable target yields the zeroed
/// [`CountdownStatus::Invalid`] breakdown.
pub fn compute_remaining(target: &str, now: DateTime<Utc>) -> Countdown {
    match parse_instant(target) {
        Some(instant) => Countdown::between(instant, now),
        None => Countdown::invalid(),
    }
}
