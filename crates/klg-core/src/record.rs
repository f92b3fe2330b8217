//! Daily records and the entries logged inside them.
//!
//! A [`Record`] is one calendar day: its date, an optional target duration,
//! a free-text summary and the ordered list of [`Entry`] values. At most one
//! entry of a record can be an open range at any time.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::duration::Duration;
use crate::time::{OpenRangeStart, Range, RangeError, Time};

/// Errors from mutating a [`Record`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record already holds an open range.
    #[error("record already has an open range")]
    DuplicateOpenRange,

    /// There is no open range to close.
    #[error("record has no open range")]
    NoOpenRange,

    /// A summary line is blank or starts with whitespace.
    #[error("summary lines must not be blank or start with whitespace")]
    MalformedSummary,

    /// An entry summary spans more than one line.
    #[error("entry summaries must fit on one line")]
    MalformedEntrySummary,

    #[error(transparent)]
    IllegalRange(#[from] RangeError),
}

/// What an entry measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryValue {
    Duration(Duration),
    Range(Range),
    OpenRange(OpenRangeStart),
}

impl EntryValue {
    /// Time this value adds to a total. Open ranges have no end yet and add nothing.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            Self::Range(r) => Some(r.duration()),
            Self::OpenRange(_) => None,
        }
    }
}

impl fmt::Display for EntryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration(d) => d.fmt(f),
            Self::Range(r) => r.fmt(f),
            Self::OpenRange(o) => o.fmt(f),
        }
    }
}

/// The one-line text attached to an entry.
///
/// Surrounding whitespace is dropped; line breaks are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntrySummary(String);

impl EntrySummary {
    pub fn new(text: impl Into<String>) -> Result<Self, RecordError> {
        let text = text.into();
        if text.contains(['\n', '\r']) {
            return Err(RecordError::MalformedEntrySummary);
        }
        Ok(Self(text.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&str> for EntrySummary {
    type Error = RecordError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl TryFrom<String> for EntrySummary {
    type Error = RecordError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl fmt::Display for EntrySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One logged item of a record, with its one-line summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: EntryValue,
    summary: EntrySummary,
}

impl Entry {
    pub const fn value(&self) -> &EntryValue {
        &self.value
    }

    pub fn summary(&self) -> &str {
        self.summary.as_str()
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.value, EntryValue::OpenRange(_))
    }
}

/// One day of logged time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    date: NaiveDate,
    should_total: Option<Duration>,
    summary: String,
    entries: Vec<Entry>,
}

impl Record {
    /// Creates an empty record for `date`.
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            should_total: None,
            summary: String::new(),
            entries: Vec::new(),
        }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The time that should have been worked on this day, if declared.
    pub const fn should_total(&self) -> Option<Duration> {
        self.should_total
    }

    pub fn set_should_total(&mut self, should_total: Option<Duration>) {
        self.should_total = should_total;
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Replaces the summary.
    ///
    /// No line, including the first, may be blank or start with whitespace.
    /// Trailing whitespace of each line is dropped. On error the previous
    /// summary is kept.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), RecordError> {
        let summary = summary.into();
        if summary.is_empty() {
            self.summary = summary;
            return Ok(());
        }
        let lines: Vec<&str> = summary.split('\n').map(str::trim_end).collect();
        let malformed = |line: &&str| {
            line.is_empty() || line.starts_with(char::is_whitespace) || line.contains('\r')
        };
        if lines.iter().any(malformed) {
            return Err(RecordError::MalformedSummary);
        }
        self.summary = lines.join("\n");
        Ok(())
    }

    /// Entries in the order they were added.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn add_duration(&mut self, duration: Duration, summary: EntrySummary) {
        self.push(EntryValue::Duration(duration), summary);
    }

    pub fn add_range(&mut self, range: Range, summary: EntrySummary) {
        self.push(EntryValue::Range(range), summary);
    }

    /// Returns the start of the open range, if there is one.
    pub fn open_range(&self) -> Option<OpenRangeStart> {
        self.entries.iter().find_map(|e| match e.value {
            EntryValue::OpenRange(start) => Some(start),
            _ => None,
        })
    }

    /// Appends an open range. Fails if the record already has one.
    pub fn start_open_range(
        &mut self,
        start: OpenRangeStart,
        summary: EntrySummary,
    ) -> Result<(), RecordError> {
        if self.open_range().is_some() {
            return Err(RecordError::DuplicateOpenRange);
        }
        self.push(EntryValue::OpenRange(start), summary);
        Ok(())
    }

    /// Closes the open range at `end`.
    ///
    /// The entry keeps its position and summary; only its value turns into a
    /// [`Range`]. The entry count does not change.
    pub fn end_open_range(&mut self, end: Time) -> Result<(), RecordError> {
        for entry in &mut self.entries {
            if let EntryValue::OpenRange(start) = entry.value {
                let range = start.close(end)?;
                entry.value = EntryValue::Range(range);
                tracing::debug!(date = %self.date, range = %range, "closed open range");
                return Ok(());
            }
        }
        Err(RecordError::NoOpenRange)
    }

    /// All plain duration entries, in entry order.
    pub fn durations(&self) -> impl Iterator<Item = Duration> + Clone + '_ {
        self.entries.iter().filter_map(|e| match e.value {
            EntryValue::Duration(d) => Some(d),
            _ => None,
        })
    }

    /// All closed range entries, in entry order.
    pub fn ranges(&self) -> impl Iterator<Item = Range> + Clone + '_ {
        self.entries.iter().filter_map(|e| match e.value {
            EntryValue::Range(r) => Some(r),
            _ => None,
        })
    }

    /// Sum of all durations and closed ranges. Open ranges are not counted.
    pub fn total(&self) -> Duration {
        self.entries.iter().filter_map(|e| e.value.duration()).sum()
    }

    /// `total - should_total`, when a should-total is declared.
    pub fn diff(&self) -> Option<Duration> {
        self.should_total.map(|should| self.total() - should)
    }

    fn push(&mut self, value: EntryValue, summary: EntrySummary) {
        self.entries.push(Entry { value, summary });
    }
}
