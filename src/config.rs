// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for versefind
//!
//! Loads configuration from .versefindrc.toml in current directory or
//! ~/.config/versefind/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::search::{MatchOptions, DEFAULT_LIMIT};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".versefindrc.toml";
/// Database used when neither the CLI nor the config names one.
pub const DEFAULT_DATABASE: &str = "versefind.db";

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Matcher knobs from the `[search]` table
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub window_cap: Option<usize>,
    pub ngram_size: Option<usize>,
    pub edit_distance_max_len: Option<usize>,
    pub ratio_max_len: Option<usize>,
    pub min_similarity: Option<f64>,
}

/// Configuration loaded from .versefindrc.toml or ~/.config/versefind/config.toml
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of results to return
    pub max_results: Option<usize>,
    /// Default output format (text or json)
    pub default_format: Option<String>,
    /// Corpus database path
    pub database: Option<PathBuf>,
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .versefindrc.toml in current directory
    /// 2. ~/.config/versefind/config.toml
    pub fn load() -> Self {
        // Try current directory first
        if let Some(config) = Self::load_from_path(Path::new(LOCAL_CONFIG_FILE)) {
            return config;
        }

        // Try home directory config
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("versefind").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format.as_ref().and_then(|s| match s.to_lowercase().as_str() {
            "json" => Some(ConfigOutputFormat::Json),
            "text" => Some(ConfigOutputFormat::Text),
            _ => None,
        })
    }

    /// Merge CLI options with config (CLI wins)
    pub fn merge_max_results(&self, cli_value: Option<usize>) -> usize {
        cli_value.or(self.max_results).unwrap_or(DEFAULT_LIMIT)
    }

    pub fn merge_database(&self, cli_value: Option<PathBuf>) -> PathBuf {
        cli_value
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    /// Matcher options from the `[search]` table over the built-in defaults
    pub fn match_options(&self) -> MatchOptions {
        let defaults = MatchOptions::default();
        MatchOptions {
            window_cap: self.search.window_cap.unwrap_or(defaults.window_cap),
            ngram_size: self.search.ngram_size.unwrap_or(defaults.ngram_size),
            edit_distance_max_len: self
                .search
                .edit_distance_max_len
                .unwrap_or(defaults.edit_distance_max_len),
            ratio_max_len: self.search.ratio_max_len.unwrap_or(defaults.ratio_max_len),
            min_similarity: self.search.min_similarity.unwrap_or(defaults.min_similarity),
            limit: self.max_results.unwrap_or(defaults.limit),
        }
    }
}
