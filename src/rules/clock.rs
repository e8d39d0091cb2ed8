//! Minute-of-day arithmetic on `HH:MM` wall-clock times.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

/// Minutes from `start` to `end` on the same day. Negative when `end` is earlier.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    minute_of_day(end) - minute_of_day(start)
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Hours for a span of minutes, clamped at zero and rounded half-up to two decimals.
pub fn hours_from_minutes(minutes: i64) -> f64 {
    round2(minutes.max(0) as f64 / 60.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole minutes required by a (possibly fractional) hour threshold.
pub fn required_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Time still missing before a minimum is met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub minutes: u32,
}

impl Remaining {
    pub fn new(minutes: i64) -> Self {
        Self {
            minutes: minutes.clamp(0, i64::from(u32::MAX)) as u32,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.minutes / 60;
        let minutes = self.minutes % 60;
        let unit = |n: u32, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        match (hours, minutes) {
            (0, m) => write!(f, "{}", unit(m, "minute")),
            (h, 0) => write!(f, "{}", unit(h, "hour")),
            (h, m) => write!(f, "{} {}", unit(h, "hour"), unit(m, "minute")),
        }
    }
}
