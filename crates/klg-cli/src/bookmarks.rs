//! Bookmarks: named shortcuts to record files.
//!
//! Stored in `bookmarks.json` inside the klog folder as a list of
//! `{"alias": ..., "path": ...}` objects, sorted by alias. Older versions
//! kept a single default bookmark as the `bookmark.klg` symlink in the same
//! folder; it is read as `@default` and removed on the next save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Alias used when no file is given on the command line.
pub const DEFAULT_ALIAS: &str = "default";

const LEGACY_BOOKMARK: &str = "bookmark.klg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Alias without the leading `@`.
    pub alias: String,
    pub path: PathBuf,
}

impl Bookmark {
    /// The alias as typed on the command line, e.g. `@work`.
    pub fn pretty_alias(&self) -> String {
        format!("@{}", self.alias)
    }
}

/// Strips the optional `@` prefix of an alias.
pub fn normalize_alias(alias: &str) -> &str {
    alias.strip_prefix('@').unwrap_or(alias)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarksCollection {
    bookmarks: BTreeMap<String, PathBuf>,
}

impl BookmarksCollection {
    /// Parses the JSON form. Later duplicates of an alias win.
    pub fn parse(json: &str) -> Result<Self> {
        let list: Vec<Bookmark> =
            serde_json::from_str(json).context("bookmarks file is not correctly formatted")?;
        let mut collection = Self::default();
        for bookmark in list {
            collection.set(&bookmark.alias, bookmark.path);
        }
        Ok(collection)
    }

    /// Pretty-printed JSON, sorted by alias.
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(&self.all()).context("failed to serialize bookmarks")?;
        json.push('\n');
        Ok(json)
    }

    pub fn count(&self) -> usize {
        self.bookmarks.len()
    }

    /// All bookmarks, sorted by alias.
    pub fn all(&self) -> Vec<Bookmark> {
        self.bookmarks
            .iter()
            .map(|(alias, path)| Bookmark {
                alias: alias.clone(),
                path: path.clone(),
            })
            .collect()
    }

    pub fn lookup(&self, alias: &str) -> Option<Bookmark> {
        let alias = normalize_alias(alias);
        self.bookmarks.get(alias).map(|path| Bookmark {
            alias: alias.to_string(),
            path: path.clone(),
        })
    }

    pub fn default_bookmark(&self) -> Option<Bookmark> {
        self.lookup(DEFAULT_ALIAS)
    }

    /// Adds a bookmark or repoints an existing one.
    pub fn set(&mut self, alias: &str, path: impl Into<PathBuf>) {
        self.bookmarks
            .insert(normalize_alias(alias).to_string(), path.into());
    }

    /// Moves the bookmark `old` to `new`, replacing any bookmark named `new`.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let path = self
            .bookmarks
            .remove(normalize_alias(old))
            .ok_or_else(|| AppError::BookmarkNotSet(normalize_alias(old).to_string()))?;
        self.set(new, path);
        Ok(())
    }

    /// Removes a bookmark; returns whether it existed.
    pub fn unset(&mut self, alias: &str) -> bool {
        self.bookmarks.remove(normalize_alias(alias)).is_some()
    }

    /// Loads bookmarks from `path`.
    ///
    /// A missing file is an empty collection; an unreadable or malformed one
    /// is an error. Without a default bookmark, the legacy symlink next to
    /// `path` supplies it.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut collection = match std::fs::read_to_string(path) {
            Ok(content) => {
                Self::parse(&content).map_err(|e| AppError::bookmarks("load", path, e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(AppError::bookmarks("read", path, e).into()),
        };

        if collection.default_bookmark().is_none() {
            if let Some(target) = read_legacy_bookmark(path) {
                tracing::debug!(target = ?target, "using legacy default bookmark");
                collection.set(DEFAULT_ALIAS, target);
            }
        }
        Ok(collection)
    }

    /// Writes bookmarks to `path`, creating its folder if needed.
    ///
    /// A legacy bookmark symlink is removed once its content is saved.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::bookmarks("create folder for", path, e))?;
        }
        std::fs::write(path, self.to_json()?)
            .map_err(|e| AppError::bookmarks("write", path, e))?;
        tracing::debug!(path = ?path, count = self.count(), "saved bookmarks");
        remove_legacy_bookmark(path);
        Ok(())
    }
}

fn legacy_bookmark_path(bookmarks_path: &Path) -> Option<PathBuf> {
    bookmarks_path.parent().map(|dir| dir.join(LEGACY_BOOKMARK))
}

/// Target of the legacy default bookmark symlink, if there is one.
fn read_legacy_bookmark(bookmarks_path: &Path) -> Option<PathBuf> {
    let link = legacy_bookmark_path(bookmarks_path)?;
    let target = std::fs::read_link(&link).ok()?;
    match link.parent() {
        Some(dir) if target.is_relative() => Some(dir.join(target)),
        _ => Some(target),
    }
}

fn remove_legacy_bookmark(bookmarks_path: &Path) {
    let Some(link) = legacy_bookmark_path(bookmarks_path) else {
        return;
    };
    let is_symlink = std::fs::symlink_metadata(&link).is_ok_and(|m| m.file_type().is_symlink());
    if !is_symlink {
        return;
    }
    match std::fs::remove_file(&link) {
        Ok(()) => tracing::debug!(path = ?link, "removed legacy bookmark"),
        Err(e) => tracing::warn!(path = ?link, error = %e, "failed to remove legacy bookmark"),
    }
}
