//! Bookmarks command: list and edit named shortcuts to record files.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::Config;
use crate::bookmarks::{BookmarksCollection, DEFAULT_ALIAS, normalize_alias};
use crate::error::AppError;

pub fn list<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let bookmarks = BookmarksCollection::load_from(&config.bookmarks_path())?;
    if bookmarks.count() == 0 {
        writeln!(writer, "No bookmarks set.")?;
        return Ok(());
    }
    for bookmark in bookmarks.all() {
        writeln!(
            writer,
            "{} -> {}",
            bookmark.pretty_alias(),
            bookmark.path.display()
        )?;
    }
    Ok(())
}

pub fn set<W: Write>(
    writer: &mut W,
    config: &Config,
    file: &Path,
    alias: Option<&str>,
) -> Result<()> {
    let target =
        std::fs::canonicalize(file).map_err(|source| AppError::io("bookmark", file, source))?;
    let alias = normalize_alias(alias.unwrap_or(DEFAULT_ALIAS));

    let path = config.bookmarks_path();
    let mut bookmarks = BookmarksCollection::load_from(&path)?;
    bookmarks.set(alias, &target);
    bookmarks.save_to(&path)?;

    writeln!(writer, "Bookmarked @{alias} -> {}", target.display())?;
    Ok(())
}

pub fn unset<W: Write>(writer: &mut W, config: &Config, alias: Option<&str>) -> Result<()> {
    let alias = normalize_alias(alias.unwrap_or(DEFAULT_ALIAS));

    let path = config.bookmarks_path();
    let mut bookmarks = BookmarksCollection::load_from(&path)?;
    if !bookmarks.unset(alias) {
        return Err(AppError::BookmarkNotSet(alias.to_string()).into());
    }
    bookmarks.save_to(&path)?;

    writeln!(writer, "Removed bookmark @{alias}")?;
    Ok(())
}

pub fn rename<W: Write>(writer: &mut W, config: &Config, old: &str, new: &str) -> Result<()> {
    let path = config.bookmarks_path();
    let mut bookmarks = BookmarksCollection::load_from(&path)?;
    bookmarks.rename(old, new)?;
    bookmarks.save_to(&path)?;

    writeln!(
        writer,
        "Renamed @{} to @{}",
        normalize_alias(old),
        normalize_alias(new)
    )?;
    Ok(())
}
