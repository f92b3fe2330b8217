//! Signed, minute-resolution durations and their compact text form.
//!
//! The text form is `-?(\d+h)?( )?(\d+m)?`, e.g. `-3h 45m`, `2h`, `45m`.
//! The zero duration is written `0m`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pre-compiled duration grammar. Groups: sign, hours, minutes.
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-)?(?:(\d+)h)?\s*(?:(\d+)m)?\s*$").unwrap());

/// Errors from parsing duration text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The text does not follow the duration grammar.
    #[error("malformed duration: {0:?}")]
    Malformed(String),

    /// The text is well-formed but its value cannot be represented.
    #[error("unrepresentable duration: {0:?}")]
    Unrepresentable(String),
}

/// A signed span of time in whole minutes.
///
/// Durations are plain values: every operation returns a new `Duration`.
/// Arithmetic saturates instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration of `hours * 60 + minutes` minutes.
    ///
    /// Both parts are summed algebraically, so `new(1, -30)` is 30 minutes.
    /// Out-of-range values saturate at the `i64` bounds.
    pub const fn new(hours: i64, minutes: i64) -> Self {
        Self(hours.saturating_mul(60).saturating_add(minutes))
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes)
    }

    /// Returns the exact length in minutes.
    pub const fn in_minutes(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Formats the duration with an explicit `+` for positive values.
    ///
    /// Used wherever a duration is shown as a difference to a target.
    pub fn to_diff_string(self) -> String {
        if self.0 > 0 {
            format!("+{self}")
        } else {
            self.to_string()
        }
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Duration {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0m");
        }
        let magnitude = self.0.unsigned_abs();
        let hours = magnitude / 60;
        let minutes = magnitude % 60;

        if self.0 < 0 {
            f.write_str("-")?;
        }
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 && minutes > 0 {
            f.write_str(" ")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DurationError::Malformed(s.to_string());
        let unrepresentable = || DurationError::Unrepresentable(s.to_string());

        let caps = DURATION_RE.captures(s).ok_or_else(malformed)?;
        let (hours, minutes) = (caps.get(2), caps.get(3));
        if hours.is_none() && minutes.is_none() {
            return Err(malformed());
        }

        let hours = parse_component(hours).ok_or_else(unrepresentable)?;
        let minutes = parse_component(minutes).ok_or_else(unrepresentable)?;

        // Exactly 60 minutes is accepted.
        if minutes > 60 {
            return Err(unrepresentable());
        }

        let total = hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or_else(unrepresentable)?;

        if caps.get(1).is_some() {
            Ok(Self(-total))
        } else {
            Ok(Self(total))
        }
    }
}

/// Parses an optional digit group; an absent group counts as zero.
fn parse_component(part: Option<regex::Match<'_>>) -> Option<i64> {
    part.map_or(Some(0), |m| m.as_str().parse().ok())
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Duration, DurationError> {
        s.parse()
    }

    #[test]
    fn parses_documented_examples() {
        assert_eq!(parse("-3h 15m").unwrap().in_minutes(), -195);
        assert_eq!(parse("2h").unwrap().in_minutes(), 120);
        assert_eq!(parse("45m").unwrap().in_minutes(), 45);
        assert_eq!(parse("0m").unwrap().in_minutes(), 0);
    }

    #[test]
    fn parses_with_surrounding_and_inner_whitespace() {
        assert_eq!(parse("  1h30m ").unwrap().in_minutes(), 90);
        assert_eq!(parse("1h   30m").unwrap().in_minutes(), 90);
        assert_eq!(parse("-90h").unwrap().in_minutes(), -5400);
    }

    #[test]
    fn sign_applies_to_both_components() {
        assert_eq!(parse("-1h 1m").unwrap(), Duration::new(-1, -1));
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "   ", "-", "abc", "1x", "h", "m", "30m 1h", "1.5h", "- 3h"] {
            assert_eq!(
                parse(text),
                Err(DurationError::Malformed(text.to_string())),
                "expected {text:?} to be malformed"
            );
        }
    }

    #[test]
    fn minutes_above_sixty_are_unrepresentable() {
        assert_eq!(
            parse("90m"),
            Err(DurationError::Unrepresentable("90m".to_string()))
        );
        assert!(matches!(
            parse("1h 61m"),
            Err(DurationError::Unrepresentable(_))
        ));
    }

    #[test]
    fn sixty_minutes_is_still_accepted() {
        assert_eq!(parse("60m").unwrap().in_minutes(), 60);
        assert_eq!(parse("1h 60m").unwrap().in_minutes(), 120);
    }

    #[test]
    fn overflowing_numbers_are_unrepresentable() {
        assert!(matches!(
            parse("99999999999999999999h"),
            Err(DurationError::Unrepresentable(_))
        ));
        assert!(matches!(
            parse("999999999999999999h"),
            Err(DurationError::Unrepresentable(_))
        ));
    }

    #[test]
    fn display_uses_canonical_form() {
        assert_eq!(Duration::new(-3, -45).to_string(), "-3h 45m");
        assert_eq!(Duration::new(2, 0).to_string(), "2h");
        assert_eq!(Duration::new(0, 45).to_string(), "45m");
        assert_eq!(Duration::ZERO.to_string(), "0m");
        assert_eq!(Duration::new(1, -30).to_string(), "30m");
        assert_eq!(Duration::from_minutes(-5).to_string(), "-5m");
        assert_eq!(Duration::from_minutes(i64::MIN).to_string().chars().next(), Some('-'));
    }

    #[test]
    fn text_form_roundtrips() {
        for minutes in (-2000..=2000).step_by(7) {
            let d = Duration::from_minutes(minutes);
            assert_eq!(parse(&d.to_string()), Ok(d), "roundtrip failed for {d}");
        }
    }

    #[test]
    fn addition_is_associative_and_commutative() {
        let a = Duration::new(1, 15);
        let b = Duration::from_minutes(-40);
        let c = Duration::new(0, 5);
        assert_eq!((a + b) + c, a + (b + c));
        assert_eq!(a + b, b + a);
        assert_eq!((a + b).in_minutes(), 35);
    }

    #[test]
    fn sums_iterators() {
        let total: Duration = [Duration::new(1, 0), Duration::new(0, 30), Duration::from_minutes(-10)]
            .iter()
            .sum();
        assert_eq!(total, Duration::from_minutes(80));

        let empty: Duration = std::iter::empty::<Duration>().sum();
        assert_eq!(empty, Duration::ZERO);
    }

    #[test]
    fn arithmetic_saturates_at_the_bounds() {
        let huge = parse("153722867280912930h").unwrap();
        assert_eq!(huge + huge, Duration::from_minutes(i64::MAX));
        assert_eq!(-huge - huge, Duration::from_minutes(i64::MIN));
        assert_eq!(-Duration::from_minutes(i64::MIN), Duration::from_minutes(i64::MAX));
        assert_eq!(Duration::new(i64::MAX, 1), Duration::from_minutes(i64::MAX));

        let total: Duration = [huge, huge, Duration::from_minutes(-1)].into_iter().sum();
        assert_eq!(total, Duration::from_minutes(i64::MAX - 1));
    }

    #[test]
    fn diff_string_marks_positive_values() {
        assert_eq!(Duration::new(1, 0).to_diff_string(), "+1h");
        assert_eq!(Duration::new(-1, 0).to_diff_string(), "-1h");
        assert_eq!(Duration::ZERO.to_diff_string(), "0m");
    }

    #[test]
    fn serde_uses_text_form() {
        let d = Duration::new(-3, -15);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"-3h 15m\"");
        let parsed: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);

        let bad: Result<Duration, _> = serde_json::from_str("\"90m\"");
        assert!(bad.is_err());
    }
}
