//! Core domain logic for klg.
//!
//! This crate contains the value types and algorithms of the time tracker:
//! - Durations, times of day and ranges
//! - Records and their entries, including the open-range state machine
//! - Aggregators that group dates into periods, and the report builder
//! - The plain-text record format (parser and serialiser)

pub mod aggregator;
pub mod duration;
pub mod parser;
pub mod record;
pub mod report;
pub mod serialiser;
pub mod table;
pub mod time;

pub use aggregator::{
    Aggregator, AggregatorKind, DayAggregator, MonthAggregator, PeriodHash, QuarterAggregator,
    UnknownAggregator, WeekAggregator, YearAggregator,
};
pub use duration::{Duration, DurationError};
pub use parser::{ParseError, ParseErrorKind, ParseErrors, parse};
pub use record::{Entry, EntrySummary, EntryValue, Record, RecordError};
pub use report::{ReportBuilder, ReportRow};
pub use serialiser::{serialise, serialise_record};
pub use table::{Align, Cell, Table};
pub use time::{OpenRangeStart, Range, RangeError, Time, TimeError};
