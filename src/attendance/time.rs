use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use derive_more::Display;

/// 12-hour wall clock format used for check-in / check-out, e.g. `09:05 AM`
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Written to `total_hours` when either end of a shift can't be parsed
pub const TOTAL_HOURS_ERROR: &str = "Error";

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Source of "now" in the server's local timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A time of day at minute precision, rendered as `HH:MM AM/PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn parse(input: &str) -> Option<Self> {
        NaiveTime::parse_from_str(input.trim(), TIME_FORMAT)
            .ok()
            .map(Self)
    }

    /// Anchors this time of day on `date`.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(fmt = "{}h {}m", hours, minutes)]
pub struct WorkedDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl WorkedDuration {
    pub fn from_minutes(total: i64) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    pub fn total_minutes(&self) -> i64 {
        self.hours * 60 + self.minutes
    }

    /// Elapsed time between two clock strings on `date`.
    ///
    /// A check-out earlier in the day than the check-in is taken to be on the
    /// following day. Shifts longer than 24 hours are not representable.
    pub fn between(date: NaiveDate, check_in: &str, check_out: &str) -> Option<Self> {
        let start = ClockTime::parse(check_in)?.on(date);
        let end = ClockTime::parse(check_out)?.on(date);

        let mut minutes = (end - start).num_minutes();
        if minutes < 0 {
            minutes += MINUTES_PER_DAY;
        }
        Some(Self::from_minutes(minutes))
    }
}

/// `total_hours` value for a closed record.
pub fn total_hours(date: NaiveDate, check_in: &str, check_out: &str) -> String {
    WorkedDuration::between(date, check_in, check_out)
        .map(|duration| duration.to_string())
        .unwrap_or_else(|| TOTAL_HOURS_ERROR.to_string())
}

#[cfg(test)]
pub use testing::ManualClock;

#[cfg(test)]
mod testing {
    use std::sync::Mutex;

    use chrono::NaiveDateTime;

    use super::Clock;

    /// Clock pinned to a settable instant, `YYYY-MM-DD HH:MM`.
    pub struct ManualClock(Mutex<NaiveDateTime>);

    impl ManualClock {
        pub fn at(instant: &str) -> Self {
            Self(Mutex::new(parse(instant)))
        }

        pub fn set(&self, instant: &str) {
            *self.0.lock().unwrap() = parse(instant);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            *self.0.lock().unwrap()
        }
    }

    fn parse(instant: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(instant, "%Y-%m-%d %H:%M").unwrap()
    }
}
