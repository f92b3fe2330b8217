//! klg command-line library.
//!
//! This crate provides the CLI interface over `klg-core`: argument parsing,
//! configuration, bookmarks and the subcommands.

pub mod bookmarks;
mod cli;
pub mod commands;
mod config;
pub mod error;

pub use cli::{BookmarksAction, Cli, Commands, InputArgs};
pub use config::Config;
pub use error::AppError;
