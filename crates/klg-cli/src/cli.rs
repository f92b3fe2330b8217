//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use klg_core::{AggregatorKind, Time};

/// Time tracking in plain-text files.
///
/// Reads records from `.klg` files, bookmarks or stdin and evaluates them.
#[derive(Debug, Parser)]
#[command(name = "klg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Files to read records from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// `.klg` files or `@bookmark` aliases. Falls back to stdin, then to the
    /// default bookmark.
    pub files: Vec<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the total time of all records.
    Total {
        #[command(flatten)]
        input: InputArgs,

        /// Also show should-total and difference.
        #[arg(long)]
        diff: bool,
    },

    /// Print totals grouped by day, week, month, quarter or year.
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Period to group by (defaults to the configured aggregation).
        #[arg(short, long)]
        aggregate: Option<AggregatorKind>,

        /// Add should-total and difference columns.
        #[arg(long)]
        diff: bool,

        /// Print the report rows as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Open a range in a record.
    Start {
        /// File or `@bookmark` to modify (defaults to the default bookmark).
        file: Option<String>,

        /// Start time, `H:MM` (defaults to now).
        #[arg(long)]
        time: Option<Time>,

        /// Summary of the new entry.
        #[arg(short, long)]
        summary: Option<String>,

        /// Date of the record, `YYYY-MM-DD` (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Close the open range of a record.
    Stop {
        /// File or `@bookmark` to modify (defaults to the default bookmark).
        file: Option<String>,

        /// End time, `H:MM` (defaults to now).
        #[arg(long)]
        time: Option<Time>,

        /// Date of the record, `YYYY-MM-DD` (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Manage bookmarks.
    #[command(subcommand)]
    Bookmarks(BookmarksAction),
}

/// Bookmark subcommands.
#[derive(Debug, Subcommand)]
pub enum BookmarksAction {
    /// List all bookmarks.
    List,

    /// Point a bookmark at a file.
    Set {
        /// The file to bookmark.
        file: PathBuf,

        /// Bookmark name (defaults to `default`).
        alias: Option<String>,
    },

    /// Remove a bookmark.
    Unset {
        /// Bookmark name (defaults to `default`).
        alias: Option<String>,
    },

    /// Rename a bookmark.
    Rename {
        /// Current name.
        old: String,

        /// New name.
        new: String,
    },
}
