//! Writing records back to their text form.
//!
//! The output is the canonical form read by [`crate::parser::parse`]:
//! dates as `YYYY-MM-DD`, durations as `1h 30m`, entries indented by four
//! spaces and one blank line between records.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::{Entry, EntryValue, Record};

const INDENT: &str = "    ";

/// A summary the parser would read as the minutes of a preceding `Nh`.
static LEADING_MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+m(?:\s|$)").unwrap());

/// Serialises all records, separated by blank lines.
pub fn serialise(records: &[Record]) -> String {
    records
        .iter()
        .map(serialise_record)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialises a single record, ending with a newline.
pub fn serialise_record(record: &Record) -> String {
    let mut out = record.date().format("%Y-%m-%d").to_string();
    if let Some(should) = record.should_total() {
        out.push_str(&format!(" ({should}!)"));
    }
    out.push('\n');

    for line in record.summary().lines() {
        out.push_str(line);
        out.push('\n');
    }

    for entry in record.entries() {
        out.push_str(INDENT);
        out.push_str(&entry_value(entry));
        if !entry.summary().is_empty() {
            out.push(' ');
            out.push_str(entry.summary());
        }
        out.push('\n');
    }
    out
}

/// The value text of an entry.
///
/// Whole hours get an explicit `0m` when the summary starts with a minutes
/// token, so `1h` with summary `30m extra` is not read back as `1h 30m`.
fn entry_value(entry: &Entry) -> String {
    match entry.value() {
        EntryValue::Duration(d)
            if d.in_minutes() % 60 == 0
                && !d.is_zero()
                && LEADING_MINUTES_RE.is_match(entry.summary()) =>
        {
            format!("{d} 0m")
        }
        value => value.to_string(),
    }
}
