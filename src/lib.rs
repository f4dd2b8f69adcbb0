//! Football match report extraction
//!
//! Walks parsed match report pages and pulls out in-game events, starting
//! lineups and benches, and per-side statistics tables. Missing or renamed
//! page sections are recorded in a diagnostics ledger instead of aborting.

pub mod data;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use data::extractors::extract_match;
pub use data::record::{Event, EventKind, MatchRecord, SideRecord, StatsEntry};

/// Which team a fact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Home, Side::Away];

    /// Positional index used by the report layout (home first)
    pub fn index(&self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("Document source failed for {location}: {message}")]
    Source { location: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("Malformed node: {0}")]
    MalformedNode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub layout: Layout,
}

/// Where report pages come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Prefix joined with relative report links
    pub base_url: String,
    /// Results listing; the date (YYYY-MM-DD) is appended
    pub reports_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Optional cache directory for fetched HTML
    pub cache_dir: Option<String>,
    /// Only serve from the cache
    pub offline: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: "https://fbref.com".to_string(),
            reports_url: "https://fbref.com/en/matches/".to_string(),
            user_agent: "match-report/0.1".to_string(),
            timeout_secs: 30,
            cache_dir: None,
            offline: false,
        }
    }
}

/// CSS selectors describing the report page layout.
///
/// Kept in config so a renamed page section can be followed without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub home_events: String,
    pub away_events: String,
    /// Nested node whose second class is the event type token
    pub event_icon: String,
    pub event_player: String,
    pub minute_delimiter: String,
    pub lineup_tables: String,
    /// One group per side, home first
    pub stats_groups: String,
    pub stats_tables: String,
    pub stats_headings: String,
    pub stats_tabs: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            home_events: "div.event.a".to_string(),
            away_events: "div.event.b".to_string(),
            event_icon: "div.event_icon".to_string(),
            event_player: "a".to_string(),
            minute_delimiter: "’".to_string(),
            lineup_tables: "div.lineup table".to_string(),
            stats_groups: "div.stats_group".to_string(),
            stats_tables: "div.table_container".to_string(),
            stats_headings: "div.section_heading h2".to_string(),
            stats_tabs: "div.filter.switcher a".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_index_order() {
        assert_eq!(Side::ALL.map(|s| s.index()), [0, 1]);
        assert_eq!(Side::Away.to_string(), "away");
    }

    #[test]
    fn test_partial_config_keeps_layout_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            base_url = "http://localhost:8080"

            [layout]
            lineup_tables = "div.teams table"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.base_url, "http://localhost:8080");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.layout.lineup_tables, "div.teams table");
        assert_eq!(config.layout.home_events, "div.event.a");
    }

    #[test]
    fn test_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.source.offline = true;
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert!(loaded.source.offline);
        assert_eq!(loaded.layout.minute_delimiter, "’");
    }
}
