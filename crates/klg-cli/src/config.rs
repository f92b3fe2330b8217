//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use klg_core::AggregatorKind;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder holding `bookmarks.json`.
    pub klog_folder: PathBuf,

    /// Aggregation used by `klg report` when none is given.
    pub default_aggregate: AggregatorKind,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            klog_folder: home.join(".klog"),
            default_aggregate: AggregatorKind::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // KLG_KLOG_FOLDER, KLG_DEFAULT_AGGREGATE
        figment = figment.merge(Env::prefixed("KLG_"));

        figment.extract()
    }

    /// Location of the bookmarks file.
    pub fn bookmarks_path(&self) -> PathBuf {
        self.klog_folder.join("bookmarks.json")
    }
}

/// Returns the platform-specific config directory for klg.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("klg"))
}
