//! CLI failures that map to stable process exit codes.
//!
//! Anything not covered here exits with code 1.

use std::path::{Path, PathBuf};

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No input given. Pass a file, pipe records to stdin or set a default bookmark.")]
    NoInput,

    /// A modifying command has neither a file argument nor a default bookmark.
    #[error("No input given. Pass a file or set a default bookmark.")]
    NoTargetFile,

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {action} bookmarks file {}", path.display())]
    BookmarkAccess {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("no bookmark named @{0}")]
    BookmarkNotSet(String),

    #[error("no such file or directory: {}", .0.display())]
    NoSuchFile(PathBuf),
}

impl AppError {
    /// Wraps an I/O failure on a record file; a missing file gets its own code.
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NoSuchFile(path.to_path_buf())
        } else {
            Self::Io {
                action,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn bookmarks(action: &'static str, path: &Path, source: impl Into<BoxError>) -> Self {
        Self::BookmarkAccess {
            action,
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NoInput => 2,
            Self::NoTargetFile => 3,
            Self::Io { .. } => 4,
            Self::BookmarkAccess { .. } => 5,
            Self::BookmarkNotSet(_) => 6,
            Self::NoSuchFile(_) => 7,
        }
    }

    /// Exit code for any error, looking through its context chain.
    pub fn exit_code_of(err: &anyhow::Error) -> u8 {
        err.chain()
            .find_map(|e| e.downcast_ref::<Self>())
            .map_or(1, Self::exit_code)
    }
}
