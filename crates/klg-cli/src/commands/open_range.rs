//! Start and stop commands: open and close a range in a record file.
//!
//! Both commands parse the whole file, change one record and write the file
//! back in canonical form.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use klg_core::{EntrySummary, OpenRangeStart, Record, Time};

use crate::error::AppError;

/// Reads the records of a file that is about to be modified.
///
/// A missing file has no records yet.
fn read_for_update(path: &Path) -> Result<Vec<Record>> {
    match std::fs::read_to_string(path) {
        Ok(text) => klg_core::parse(&text)
            .with_context(|| format!("invalid records in {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(AppError::io("read", path, e).into()),
    }
}

fn write_back(path: &Path, records: &[Record]) -> Result<()> {
    std::fs::write(path, klg_core::serialise(records))
        .map_err(|e| AppError::io("write", path, e))?;
    Ok(())
}

/// Opens a range at `time` in the record for `date`, creating the record if
/// the file has none for that day.
pub fn start<W: Write>(
    writer: &mut W,
    path: &Path,
    date: NaiveDate,
    time: Time,
    summary: &str,
) -> Result<()> {
    let summary = EntrySummary::new(summary).context("invalid summary")?;
    let mut records = read_for_update(path)?;

    let index = if let Some(index) = records.iter().rposition(|r| r.date() == date) {
        index
    } else {
        tracing::debug!(%date, "creating record");
        records.push(Record::new(date));
        records.len() - 1
    };

    let open = OpenRangeStart::new(time);
    records[index]
        .start_open_range(open, summary)
        .with_context(|| format!("cannot start a range on {date}"))?;
    write_back(path, &records)?;

    writeln!(writer, "Started {open} on {date}")?;
    Ok(())
}

/// Closes the open range of the record for `date` at `time`.
pub fn stop<W: Write>(writer: &mut W, path: &Path, date: NaiveDate, time: Time) -> Result<()> {
    let mut records = read_for_update(path)?;

    let record = records
        .iter_mut()
        .rev()
        .find(|r| r.date() == date)
        .with_context(|| format!("no record for {date} in {}", path.display()))?;
    record
        .end_open_range(time)
        .with_context(|| format!("cannot stop a range on {date}"))?;
    let total = record.total();
    write_back(path, &records)?;

    writeln!(writer, "Stopped at {time} on {date} (total {total})")?;
    Ok(())
}
