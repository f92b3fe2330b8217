//! Wall-clock times of day and the ranges between them.
//!
//! All times are local and scoped to the date of the record that holds them.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

use crate::duration::Duration;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors from constructing or parsing a [`Time`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("malformed time: {0:?}")]
    Malformed(String),

    #[error("time out of range: {hour}:{minute:02}")]
    OutOfRange { hour: u32, minute: u32 },
}

/// A range whose end precedes its start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("illegal range: {end} is before {start}")]
    Illegal { start: Time, end: Time },
}

/// A point in the day with minute resolution, from `0:00` to `24:00`.
///
/// `24:00` exists so that a range can end exactly at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    minute_of_day: u32,
}

impl Time {
    pub const MIDNIGHT: Self = Self { minute_of_day: 0 };
    pub const END_OF_DAY: Self = Self {
        minute_of_day: MINUTES_PER_DAY,
    };

    pub const fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        let in_day = hour < 24 && minute < 60;
        let end_of_day = hour == 24 && minute == 0;
        if !in_day && !end_of_day {
            return Err(TimeError::OutOfRange { hour, minute });
        }
        Ok(Self {
            minute_of_day: hour * 60 + minute,
        })
    }

    pub const fn hour(self) -> u32 {
        self.minute_of_day / 60
    }

    pub const fn minute(self) -> u32 {
        self.minute_of_day % 60
    }

    pub const fn minute_of_day(self) -> u32 {
        self.minute_of_day
    }

    /// Returns `self - earlier`; negative when `earlier` is later in the day.
    pub fn minutes_since(self, earlier: Self) -> Duration {
        Duration::from_minutes(i64::from(self.minute_of_day) - i64::from(earlier.minute_of_day))
    }
}

impl From<NaiveTime> for Time {
    /// Truncates to the minute.
    fn from(t: NaiveTime) -> Self {
        Self {
            minute_of_day: t.hour() * 60 + t.minute(),
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = TIME_RE
            .captures(s.trim())
            .ok_or_else(|| TimeError::Malformed(s.to_string()))?;
        // Both groups are bounded to two digits, so parsing cannot overflow.
        let hour: u32 = caps[1].parse().map_err(|_| TimeError::Malformed(s.to_string()))?;
        let minute: u32 = caps[2].parse().map_err(|_| TimeError::Malformed(s.to_string()))?;
        Self::new(hour, minute)
    }
}

/// A closed interval between two times of the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: Time,
    end: Time,
}

impl Range {
    pub const fn new(start: Time, end: Time) -> Result<Self, RangeError> {
        if end.minute_of_day < start.minute_of_day {
            return Err(RangeError::Illegal { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> Time {
        self.start
    }

    pub const fn end(&self) -> Time {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end.minutes_since(self.start)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// The start of a range whose end is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenRangeStart(Time);

impl OpenRangeStart {
    pub const fn new(start: Time) -> Self {
        Self(start)
    }

    pub const fn start(self) -> Time {
        self.0
    }

    /// Turns the open range into a closed one ending at `end`.
    pub const fn close(self, end: Time) -> Result<Range, RangeError> {
        Range::new(self.0, end)
    }
}

impl fmt::Display for OpenRangeStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - ?", self.0)
    }
}
