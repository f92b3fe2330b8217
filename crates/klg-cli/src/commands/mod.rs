//! CLI subcommand implementations.

pub mod bookmarks;
pub mod open_range;
pub mod report;
pub mod total;
pub mod util;
