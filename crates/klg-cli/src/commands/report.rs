//! Report command: totals per day, week, month, quarter or year.

use std::io::Write;

use anyhow::{Context, Result};
use klg_core::{AggregatorKind, Record, ReportBuilder};

pub fn run<W: Write>(
    writer: &mut W,
    records: &[Record],
    kind: AggregatorKind,
    diff: bool,
    json: bool,
) -> Result<()> {
    let builder = ReportBuilder::new(kind.build()).with_diff(diff);
    tracing::debug!(aggregate = %kind, diff, json, "building report");

    if json {
        let rows = builder.rows(records);
        let json = serde_json::to_string_pretty(&rows).context("failed to serialize report")?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    write!(writer, "{}", builder.render(records).render())?;
    Ok(())
}
