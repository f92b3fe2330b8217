//! Reading records from their text form.
//!
//! ```text
//! 2023-01-05 (8h!)
//! Summary line one
//! Summary line two
//!     1h30m Wrote the report
//!     9:00 - 12:30 Meeting
//!     13:00 - ? Coding
//! ```
//!
//! Records are separated by blank lines. The header holds the date and an
//! optional should-total, followed by unindented summary lines. Entry lines
//! are indented by a tab or at least two spaces.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::duration::{Duration, DurationError};
use crate::record::{EntrySummary, Record, RecordError};
use crate::time::{OpenRangeStart, Range, Time, TimeError};

/// Groups: date, should-total.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}|\d{4}/\d{2}/\d{2})(?:\s+\(([^()]*)!\))?\s*$").unwrap()
});

/// Groups: start, end (or `?`), summary.
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2}|\?+)(?:\s+(.*))?$").unwrap()
});

/// Groups: duration, summary.
static DURATION_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?(?:\d+h(?: ?\d+m)?|\d+m))(?:\s+(.*))?$").unwrap());

/// What went wrong on a line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("invalid record header: {0:?}")]
    InvalidHeader(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid entry: {0:?}")]
    InvalidEntry(String),

    /// An unindented line after the first entry of a record.
    #[error("summary text after entries: {0:?}")]
    SummaryAfterEntries(String),

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Every error found in one input, in line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(Vec<ParseError>);

impl ParseErrors {
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<ParseError> {
        self.0
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            error.fmt(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

#[derive(Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

impl Line<'_> {
    fn error(self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.number,
            kind,
        }
    }
}

struct Block<'a> {
    header: Line<'a>,
    body: Vec<Line<'a>>,
}

/// Parses every record of `text`, in the order they appear.
///
/// A broken record does not stop the parse; all errors are collected and
/// returned together.
pub fn parse(text: &str) -> Result<Vec<Record>, ParseErrors> {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for block in blocks(text) {
        match parse_block(&block) {
            Ok(record) => records.push(record),
            Err(mut block_errors) => errors.append(&mut block_errors),
        }
    }

    if errors.is_empty() {
        tracing::debug!(records = records.len(), "parsed records");
        Ok(records)
    } else {
        Err(ParseErrors(errors))
    }
}

fn blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;

    for (i, text) in text.lines().enumerate() {
        let line = Line { number: i + 1, text };
        if text.trim().is_empty() {
            blocks.extend(current.take());
        } else if let Some(block) = current.as_mut() {
            block.body.push(line);
        } else {
            current = Some(Block {
                header: line,
                body: Vec::new(),
            });
        }
    }
    blocks.extend(current);
    blocks
}

const fn is_indented(text: &str) -> bool {
    let bytes = text.as_bytes();
    matches!(bytes, [b'\t', ..] | [b' ', b' ', ..])
}

fn parse_block(block: &Block<'_>) -> Result<Record, Vec<ParseError>> {
    let mut record = parse_header(block.header).map_err(|e| vec![e])?;
    let mut errors = Vec::new();
    let mut summary = Vec::new();
    let mut in_entries = false;

    for &line in &block.body {
        if is_indented(line.text) {
            in_entries = true;
            if let Err(kind) = parse_entry(&mut record, line.text.trim()) {
                errors.push(line.error(kind));
            }
        } else if in_entries {
            errors.push(line.error(ParseErrorKind::SummaryAfterEntries(
                line.text.to_string(),
            )));
        } else if line.text.starts_with(' ') {
            errors.push(line.error(RecordError::MalformedSummary.into()));
        } else {
            summary.push(line.text.trim_end());
        }
    }

    if let Err(e) = record.set_summary(summary.join("\n")) {
        errors.push(block.header.error(e.into()));
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}

fn parse_header(line: Line<'_>) -> Result<Record, ParseError> {
    let caps = HEADER_RE
        .captures(line.text)
        .ok_or_else(|| line.error(ParseErrorKind::InvalidHeader(line.text.to_string())))?;

    let date = NaiveDate::parse_from_str(&caps[1].replace('/', "-"), "%Y-%m-%d")
        .map_err(|_| line.error(ParseErrorKind::InvalidDate(caps[1].to_string())))?;

    let mut record = Record::new(date);
    if let Some(should) = caps.get(2) {
        let should: Duration = should
            .as_str()
            .parse()
            .map_err(|e| line.error(ParseErrorKind::Duration(e)))?;
        record.set_should_total(Some(should));
    }
    Ok(record)
}

fn parse_entry(record: &mut Record, text: &str) -> Result<(), ParseErrorKind> {
    if let Some(caps) = RANGE_RE.captures(text) {
        let summary = EntrySummary::new(caps.get(3).map_or("", |m| m.as_str()))?;
        let start: Time = caps[1].parse()?;
        if caps[2].starts_with('?') {
            record.start_open_range(OpenRangeStart::new(start), summary)?;
        } else {
            let end: Time = caps[2].parse()?;
            let range = Range::new(start, end).map_err(RecordError::from)?;
            record.add_range(range, summary);
        }
        return Ok(());
    }

    if let Some(caps) = DURATION_ENTRY_RE.captures(text) {
        let summary = EntrySummary::new(caps.get(2).map_or("", |m| m.as_str()))?;
        let duration: Duration = caps[1].parse()?;
        record.add_duration(duration, summary);
        return Ok(());
    }

    Err(ParseErrorKind::InvalidEntry(text.to_string()))
}
