//! Shared utilities for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use klg_core::{Record, Time};
use rayon::prelude::*;

use crate::bookmarks::{BookmarksCollection, normalize_alias};
use crate::error::AppError;

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Files(Vec<PathBuf>),
    Stdin(String),
}

/// Resolves a file argument; `@alias` names a bookmark.
pub fn resolve_path(arg: &str, bookmarks: &BookmarksCollection) -> Result<PathBuf> {
    if arg.starts_with('@') {
        let bookmark = bookmarks
            .lookup(arg)
            .ok_or_else(|| AppError::BookmarkNotSet(normalize_alias(arg).to_string()))?;
        return Ok(bookmark.path);
    }
    Ok(PathBuf::from(arg))
}

/// Picks the input: explicit files, then piped stdin, then the default
/// bookmark.
pub fn resolve_input(
    files: &[String],
    stdin: Option<String>,
    bookmarks: &BookmarksCollection,
) -> Result<Input> {
    if !files.is_empty() {
        let paths: Vec<PathBuf> = files
            .iter()
            .map(|f| resolve_path(f, bookmarks))
            .collect::<Result<_>>()?;
        return Ok(Input::Files(paths));
    }
    if let Some(text) = stdin {
        if !text.trim().is_empty() {
            return Ok(Input::Stdin(text));
        }
    }
    if let Some(bookmark) = bookmarks.default_bookmark() {
        return Ok(Input::Files(vec![bookmark.path]));
    }
    Err(AppError::NoInput.into())
}

/// Resolves the single file a modifying command works on.
pub fn resolve_target(file: Option<&str>, bookmarks: &BookmarksCollection) -> Result<PathBuf> {
    match file {
        Some(arg) => resolve_path(arg, bookmarks),
        None => bookmarks
            .default_bookmark()
            .map(|b| b.path)
            .ok_or_else(|| anyhow::Error::from(AppError::NoTargetFile)),
    }
}

/// Reads and parses one file.
pub fn read_file(path: &Path) -> Result<Vec<Record>> {
    let text =
        std::fs::read_to_string(path).map_err(|source| AppError::io("read", path, source))?;
    klg_core::parse(&text).with_context(|| format!("invalid records in {}", path.display()))
}

/// Parses all records of `input`, sorted by date.
///
/// Files are parsed in parallel. The sort is stable, so records of the same
/// date keep their file and position order.
pub fn load_records(input: &Input) -> Result<Vec<Record>> {
    let mut records = match input {
        Input::Stdin(text) => klg_core::parse(text).context("invalid records on stdin")?,
        Input::Files(paths) => {
            let parsed: Vec<Result<Vec<Record>>> =
                paths.par_iter().map(|path| read_file(path)).collect();
            let mut records = Vec::new();
            for result in parsed {
                records.extend(result?);
            }
            records
        }
    };
    records.sort_by_key(Record::date);
    tracing::debug!(records = records.len(), "loaded records");
    Ok(records)
}

/// The current local date and time of day.
pub fn now() -> (NaiveDate, Time) {
    let now = Local::now().naive_local();
    (now.date(), Time::from(now.time()))
}
