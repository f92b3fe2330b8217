//! Reporting granularities.
//!
//! An [`Aggregator`] decides which period a date belongs to and renders the
//! label columns in front of each report row. Labels that repeat the value of
//! the row above are left blank (control-break suppression), so a year is
//! printed once and then only again when it changes.
//!
//! Aggregators carry the last emitted labels as state. Create a fresh one for
//! every report.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Opaque key identifying the period a date falls into.
///
/// Two dates belong to the same report row iff their hashes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PeriodHash(i64);

impl PeriodHash {
    pub const fn value(self) -> i64 {
        self.0
    }
}

/// Strategy for one reporting granularity.
pub trait Aggregator {
    /// How many label columns precede the data columns.
    fn number_of_prefix_columns(&self) -> usize;

    /// Maps a date to the key of its period.
    fn date_hash(&self, date: NaiveDate) -> PeriodHash;

    /// Appends blank header cells, one per label column.
    fn on_header_prefix(&self, table: &mut Table);

    /// Appends the label cells for the row starting at `date`.
    fn on_row_prefix(&mut self, table: &mut Table, date: NaiveDate);
}

/// Remembers the last label of one column and blanks exact repeats.
#[derive(Debug, Default)]
struct Suppressed {
    last: Option<String>,
}

impl Suppressed {
    fn emit(&mut self, table: &mut Table, label: String) {
        if self.last.as_deref() == Some(label.as_str()) {
            table.skip(1);
        } else {
            table.cell_r(label.clone());
            self.last = Some(label);
        }
    }
}

/// Appends one left-aligned placeholder per width.
fn header_placeholders(table: &mut Table, widths: &[usize]) {
    for &width in widths {
        table.cell_l(" ".repeat(width));
    }
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

/// One row per calendar day: year, month, weekday, day.
#[derive(Debug, Default)]
pub struct DayAggregator {
    year: Suppressed,
    month: Suppressed,
}

impl DayAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for DayAggregator {
    fn number_of_prefix_columns(&self) -> usize {
        4
    }

    fn date_hash(&self, date: NaiveDate) -> PeriodHash {
        PeriodHash(
            i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day()),
        )
    }

    fn on_header_prefix(&self, table: &mut Table) {
        header_placeholders(table, &[4, 3, 3, 2]);
    }

    fn on_row_prefix(&mut self, table: &mut Table, date: NaiveDate) {
        // Each column is suppressed on its own; a new year does not force the month.
        self.year.emit(table, date.year().to_string());
        self.month.emit(table, month_label(date));
        table.cell_r(date.format("%a").to_string());
        table.cell_r(date.day().to_string());
    }
}

/// One row per ISO week: ISO year, week number.
#[derive(Debug, Default)]
pub struct WeekAggregator {
    year: Suppressed,
}

impl WeekAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for WeekAggregator {
    fn number_of_prefix_columns(&self) -> usize {
        2
    }

    fn date_hash(&self, date: NaiveDate) -> PeriodHash {
        let week = date.iso_week();
        PeriodHash(i64::from(week.year()) * 100 + i64::from(week.week()))
    }

    fn on_header_prefix(&self, table: &mut Table) {
        header_placeholders(table, &[4, 7]);
    }

    fn on_row_prefix(&mut self, table: &mut Table, date: NaiveDate) {
        let week = date.iso_week();
        self.year.emit(table, week.year().to_string());
        table.cell_r(format!("Week {}", week.week()));
    }
}

/// One row per calendar month: year, abbreviated month name.
#[derive(Debug, Default)]
pub struct MonthAggregator {
    year: Suppressed,
}

impl MonthAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for MonthAggregator {
    fn number_of_prefix_columns(&self) -> usize {
        2
    }

    fn date_hash(&self, date: NaiveDate) -> PeriodHash {
        PeriodHash(i64::from(date.year()) * 100 + i64::from(date.month()))
    }

    fn on_header_prefix(&self, table: &mut Table) {
        header_placeholders(table, &[4, 3]);
    }

    fn on_row_prefix(&mut self, table: &mut Table, date: NaiveDate) {
        self.year.emit(table, date.year().to_string());
        table.cell_r(month_label(date));
    }
}

/// One row per quarter: year, `Q1`..`Q4`.
#[derive(Debug, Default)]
pub struct QuarterAggregator {
    year: Suppressed,
}

impl QuarterAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn quarter(date: NaiveDate) -> u32 {
        date.month0() / 3 + 1
    }
}

impl Aggregator for QuarterAggregator {
    fn number_of_prefix_columns(&self) -> usize {
        2
    }

    fn date_hash(&self, date: NaiveDate) -> PeriodHash {
        PeriodHash(i64::from(date.year()) * 10 + i64::from(Self::quarter(date)))
    }

    fn on_header_prefix(&self, table: &mut Table) {
        header_placeholders(table, &[4, 2]);
    }

    fn on_row_prefix(&mut self, table: &mut Table, date: NaiveDate) {
        self.year.emit(table, date.year().to_string());
        table.cell_r(format!("Q{}", Self::quarter(date)));
    }
}

/// One row per year.
#[derive(Debug, Default)]
pub struct YearAggregator {
    year: Suppressed,
}

impl YearAggregator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for YearAggregator {
    fn number_of_prefix_columns(&self) -> usize {
        1
    }

    fn date_hash(&self, date: NaiveDate) -> PeriodHash {
        PeriodHash(i64::from(date.year()))
    }

    fn on_header_prefix(&self, table: &mut Table) {
        header_placeholders(table, &[4]);
    }

    fn on_row_prefix(&mut self, table: &mut Table, date: NaiveDate) {
        self.year.emit(table, date.year().to_string());
    }
}

/// Selectable granularity, e.g. from the command line or config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorKind {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl AggregatorKind {
    /// Creates a fresh aggregator with empty suppression state.
    pub fn build(self) -> Box<dyn Aggregator> {
        match self {
            Self::Day => Box::new(DayAggregator::new()),
            Self::Week => Box::new(WeekAggregator::new()),
            Self::Month => Box::new(MonthAggregator::new()),
            Self::Quarter => Box::new(QuarterAggregator::new()),
            Self::Year => Box::new(YearAggregator::new()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for AggregatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for unknown aggregator names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aggregation: {0} (expected day, week, month, quarter or year)")]
pub struct UnknownAggregator(String);

impl FromStr for AggregatorKind {
    type Err = UnknownAggregator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "quarter" | "q" => Ok(Self::Quarter),
            "year" | "y" => Ok(Self::Year),
            _ => Err(UnknownAggregator(s.to_string())),
        }
    }
}
