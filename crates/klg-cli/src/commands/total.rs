//! Total command: the time logged across all records.

use std::io::Write;

use anyhow::Result;
use klg_core::{Duration, Record};

pub fn run<W: Write>(writer: &mut W, records: &[Record], diff: bool) -> Result<()> {
    let total: Duration = records.iter().map(Record::total).sum();
    writeln!(writer, "Total: {total}")?;

    if diff {
        let should: Duration = records.iter().filter_map(Record::should_total).sum();
        writeln!(writer, "Should: {should}!")?;
        writeln!(writer, "Diff: {}", (total - should).to_diff_string())?;
    }

    let count = records.len();
    let plural = if count == 1 { "" } else { "s" };
    writeln!(writer, "(In {count} record{plural})")?;

    let open: Vec<String> = records
        .iter()
        .filter(|r| r.open_range().is_some())
        .map(|r| r.date().to_string())
        .collect();
    if !open.is_empty() {
        writeln!(writer, "Open ranges not counted: {}", open.join(", "))?;
    }
    Ok(())
}
