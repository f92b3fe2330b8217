//! Period reports over a sequence of records.
//!
//! # Algorithm
//!
//! 1. Walk the records in the given order and hash each date with the
//!    aggregator.
//! 2. Consecutive records with equal hashes form one group (one report row).
//!    Grouping is by contiguous run, so the input must be ordered by date.
//! 3. Each group totals the durations and closed ranges of its records. Open
//!    ranges are not counted but flagged on the row.
//! 4. Rows are rendered in input order, each prefixed by the aggregator's
//!    labels for the group's first date.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregator::{Aggregator, PeriodHash};
use crate::duration::Duration;
use crate::record::Record;
use crate::table::Table;

/// Separator cell drawn above the grand total.
const RULE: &str = "========";

/// One period of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub hash: PeriodHash,
    /// Date of the first record in the group.
    pub date: NaiveDate,
    pub total: Duration,
    /// Sum of the declared should-totals; `None` if no record declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_total: Option<Duration>,
    pub record_count: usize,
    /// Whether any record of the group still has an open range.
    pub has_open_range: bool,
}

impl ReportRow {
    fn start(hash: PeriodHash, record: &Record) -> Self {
        let mut row = Self {
            hash,
            date: record.date(),
            total: Duration::ZERO,
            should_total: None,
            record_count: 0,
            has_open_range: false,
        };
        row.absorb(record);
        row
    }

    fn absorb(&mut self, record: &Record) {
        self.total = self.total + record.total();
        if let Some(should) = record.should_total() {
            self.should_total = Some(self.should_total.unwrap_or_default() + should);
        }
        self.record_count += 1;
        self.has_open_range |= record.open_range().is_some();
    }

    /// `total - should_total`, when any should-total is declared.
    pub fn diff(&self) -> Option<Duration> {
        self.should_total.map(|should| self.total - should)
    }
}

/// Groups records into periods and renders them as a table.
///
/// The builder owns its aggregator, whose label state lives for exactly one
/// [`render`](Self::render) call.
pub struct ReportBuilder {
    aggregator: Box<dyn Aggregator>,
    with_diff: bool,
}

impl ReportBuilder {
    pub fn new(aggregator: Box<dyn Aggregator>) -> Self {
        Self {
            aggregator,
            with_diff: false,
        }
    }

    /// Adds `Should` and `Diff` columns.
    #[must_use]
    pub const fn with_diff(mut self, with_diff: bool) -> Self {
        self.with_diff = with_diff;
        self
    }

    /// Groups date-ordered records into report rows.
    ///
    /// Records must arrive ordered by date. Out-of-order input is not
    /// re-sorted; it is logged and its periods may show up as several rows.
    pub fn rows(&self, records: &[Record]) -> Vec<ReportRow> {
        let mut rows: Vec<ReportRow> = Vec::new();
        let mut previous: Option<NaiveDate> = None;

        for record in records {
            let date = record.date();
            if let Some(previous) = previous {
                if date < previous {
                    tracing::warn!(%date, %previous, "records are not ordered by date");
                }
            }
            previous = Some(date);

            let hash = self.aggregator.date_hash(date);
            match rows.last_mut() {
                Some(row) if row.hash == hash => row.absorb(record),
                _ => rows.push(ReportRow::start(hash, record)),
            }
        }

        tracing::debug!(
            records = records.len(),
            rows = rows.len(),
            "grouped records into report rows"
        );
        rows
    }

    /// Renders the report: header, one row per period, rule and grand total.
    pub fn render(mut self, records: &[Record]) -> Table {
        let rows = self.rows(records);
        let prefix = self.aggregator.number_of_prefix_columns();
        let data_columns = if self.with_diff { 3 } else { 1 };
        let mut table = Table::new(prefix + data_columns, " ");

        self.aggregator.on_header_prefix(&mut table);
        table.cell_r("Total");
        if self.with_diff {
            table.cell_r("Should").cell_r("Diff");
        }

        for row in &rows {
            self.aggregator.on_row_prefix(&mut table, row.date);
            table.cell_r(row.total.to_string());
            if self.with_diff {
                push_optional(&mut table, row.should_total.map(|s| format!("{s}!")));
                push_optional(&mut table, row.diff().map(Duration::to_diff_string));
            }
        }

        let grand_total: Duration = rows.iter().map(|r| r.total).sum();
        table.skip(prefix).cell_r(RULE);
        if self.with_diff {
            table.cell_r(RULE).cell_r(RULE);
        }
        table.skip(prefix).cell_r(grand_total.to_string());
        if self.with_diff {
            let grand_should: Duration = rows.iter().filter_map(|r| r.should_total).sum();
            table
                .cell_r(format!("{grand_should}!"))
                .cell_r((grand_total - grand_should).to_diff_string());
        }

        table
    }
}

fn push_optional(table: &mut Table, text: Option<String>) {
    match text {
        Some(text) => table.cell_r(text),
        None => table.skip(1),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{AggregatorKind, DayAggregator, MonthAggregator};
    use crate::record::EntrySummary;
    use crate::time::{OpenRangeStart, Range, Time};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_with(date: NaiveDate, minutes: i64) -> Record {
        let mut record = Record::new(date);
        record.add_duration(Duration::from_minutes(minutes), EntrySummary::default());
        record
    }

    fn lines(lines: &[&str]) -> String {
        lines.join("\n") + "\n"
    }

    fn month_fixture() -> Vec<Record> {
        vec![
            record_with(date(2023, 1, 5), 60),
            record_with(date(2023, 1, 20), 120),
            record_with(date(2023, 2, 1), 30),
        ]
    }

    #[test]
    fn month_groups_contiguous_records() {
        let builder = ReportBuilder::new(Box::new(MonthAggregator::new()));
        let rows = builder.rows(&month_fixture());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(2023, 1, 5));
        assert_eq!(rows[0].total, Duration::new(3, 0));
        assert_eq!(rows[0].record_count, 2);
        assert_eq!(rows[1].date, date(2023, 2, 1));
        assert_eq!(rows[1].total, Duration::new(0, 30));
        assert_eq!(rows[1].record_count, 1);
    }

    #[test]
    fn month_report_prints_year_once() {
        let table = ReportBuilder::new(Box::new(MonthAggregator::new())).render(&month_fixture());
        assert_eq!(
            table.render(),
            lines(&[
                "            Total",
                "2023 Jan       3h",
                "     Feb      30m",
                "         ========",
                "           3h 30m",
            ])
        );
    }

    #[test]
    fn year_label_returns_when_year_changes() {
        let records = vec![
            record_with(date(2022, 12, 1), 60),
            record_with(date(2023, 1, 1), 60),
            record_with(date(2023, 2, 1), 60),
        ];
        let table = ReportBuilder::new(AggregatorKind::Month.build()).render(&records);
        assert_eq!(
            table.render(),
            lines(&[
                "            Total",
                "2022 Dec       1h",
                "2023 Jan       1h",
                "     Feb       1h",
                "         ========",
                "               3h",
            ])
        );
    }

    #[test]
    fn open_ranges_are_flagged_but_not_counted() {
        let mut record = Record::new(date(2023, 1, 5));
        let nine = Time::new(9, 0).unwrap();
        let ten = Time::new(10, 0).unwrap();
        record.add_range(Range::new(nine, ten).unwrap(), EntrySummary::default());
        record
            .start_open_range(
                OpenRangeStart::new(Time::new(11, 0).unwrap()),
                EntrySummary::default(),
            )
            .unwrap();

        let rows = ReportBuilder::new(Box::new(DayAggregator::new())).rows(&[record]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, Duration::new(1, 0));
        assert!(rows[0].has_open_range);
    }

    #[test]
    fn unordered_input_fragments_groups() {
        let records = vec![
            record_with(date(2023, 1, 5), 60),
            record_with(date(2023, 2, 1), 30),
            record_with(date(2023, 1, 20), 120),
        ];
        let rows = ReportBuilder::new(Box::new(MonthAggregator::new())).rows(&records);
        let hashes: Vec<_> = rows.iter().map(|r| r.hash.value()).collect();
        assert_eq!(hashes, [202_301, 202_302, 202_301]);
    }

    #[test]
    fn rows_are_idempotent() {
        let records = month_fixture();
        let builder = ReportBuilder::new(Box::new(MonthAggregator::new()));
        assert_eq!(builder.rows(&records), builder.rows(&records));
    }

    #[test]
    fn empty_input_renders_zero_total() {
        let table = ReportBuilder::new(AggregatorKind::Year.build()).render(&[]);
        assert_eq!(table.render(), lines(&["        Total", "     ========", "           0m"]));
    }

    #[test]
    fn diff_columns_sum_should_totals() {
        let mut first = record_with(date(2023, 1, 2), 7 * 60);
        first.set_should_total(Some(Duration::new(8, 0)));
        let mut second = record_with(date(2023, 1, 3), 9 * 60);
        second.set_should_total(Some(Duration::new(8, 0)));
        let third = record_with(date(2023, 1, 9), 30);

        let records = [first, second, third];
        let builder = ReportBuilder::new(AggregatorKind::Week.build()).with_diff(true);
        let rows = builder.rows(&records);
        assert_eq!(rows[0].should_total, Some(Duration::new(16, 0)));
        assert_eq!(rows[0].diff(), Some(Duration::ZERO));
        assert_eq!(rows[1].should_total, None);
        assert_eq!(rows[1].diff(), None);

        assert_eq!(
            builder.render(&records).render(),
            lines(&[
                "                Total   Should     Diff",
                "2023  Week 1      16h     16h!       0m",
                "      Week 2      30m",
                "             ======== ======== ========",
                "              16h 30m     16h!     +30m",
            ])
        );
    }

    #[test]
    fn rows_serialize_for_machine_output() {
        let rows = ReportBuilder::new(Box::new(MonthAggregator::new())).rows(&month_fixture());
        let json = serde_json::to_string_pretty(&rows).unwrap();
        insta::assert_snapshot!(json, @r#"
[
  {
    "hash": 202301,
    "date": "2023-01-05",
    "total": "3h",
    "record_count": 2,
    "has_open_range": false
  },
  {
    "hash": 202302,
    "date": "2023-02-01",
    "total": "30m",
    "record_count": 1,
    "has_open_range": false
  }
]
"#);
    }
}
