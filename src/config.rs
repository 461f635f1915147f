//! Configuration file parser for ~/.config/newsflow/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::feed::{Category, QueryState, SortOrder};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
///
/// `Debug` is implemented by hand so `news_api_key` never reaches logs.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// NewsAPI key (alternative to the NEWS_API_KEY env var).
    /// Env var takes precedence over config file.
    pub news_api_key: Option<String>,

    /// Override for the API origin, mainly for proxies and local mocks.
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,

    /// Search term the first load uses. Empty string starts in headlines mode.
    pub initial_search_term: Option<String>,

    pub initial_category: Option<Category>,

    pub initial_sort: Option<SortOrder>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            news_api_key: None,
            api_base_url: None,
            request_timeout_secs: 20,
            keybindings: HashMap::new(),
            initial_search_term: None,
            initial_category: None,
            initial_sort: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("theme", &self.theme)
            .field(
                "news_api_key",
                &self.news_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("keybindings", &self.keybindings)
            .field("initial_search_term", &self.initial_search_term)
            .field("initial_category", &self.initial_category)
            .field("initial_sort", &self.initial_sort)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "theme",
        "news_api_key",
        "api_base_url",
        "request_timeout_secs",
        "keybindings",
        "initial_search_term",
        "initial_category",
        "initial_sort",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Over 1 MB → `Err(ConfigError::TooLarge)`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(theme = %config.theme, "Loaded configuration");
        Ok(config)
    }

    /// Query state for the first load, with config overrides applied over
    /// the built-in defaults.
    pub fn initial_query(&self) -> QueryState {
        let defaults = QueryState::default();
        QueryState {
            search_term: self
                .initial_search_term
                .clone()
                .unwrap_or(defaults.search_term),
            category: self.initial_category.unwrap_or(defaults.category),
            sort_order: self.initial_sort.unwrap_or(defaults.sort_order),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
