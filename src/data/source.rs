//! Document sources
//!
//! Turn a location string into a parsed report page. The extractors only ever
//! see the parsed [`Html`]; fetching, caching and offline handling live here.

use crate::{Error, Result, SourceConfig};
use scraper::Html;
use std::path::{Path, PathBuf};

/// Anything that can hand back report HTML for a location
pub trait DocumentSource {
    /// Raw page content
    fn fetch(&self, location: &str) -> Result<String>;

    /// Parsed document tree
    fn document(&self, location: &str) -> Result<Html> {
        let html = self.fetch(location)?;
        Ok(Html::parse_document(&html))
    }
}

/// Blocking HTTP source with an optional on-disk cache
pub struct HttpSource {
    client: reqwest::blocking::Client,
    /// Optional cache directory for fetched HTML files
    cache_dir: Option<PathBuf>,
    /// If true, only use cache (no network requests)
    offline_only: bool,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut source = HttpSource {
            client,
            cache_dir: None,
            offline_only: config.offline,
        };
        if let Some(dir) = &config.cache_dir {
            source = source.with_cache(dir);
        }
        Ok(source)
    }

    /// Create source with a cache directory
    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    /// Set offline-only mode (no network requests, cache must exist)
    pub fn offline_only(mut self, offline: bool) -> Self {
        self.offline_only = offline;
        self
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(cache_file_name(url)))
    }

    fn load_from_cache(&self, url: &str) -> Option<String> {
        let path = self.cache_path(url)?;
        if path.exists() {
            log::debug!("Loading from cache: {}", path.display());
            std::fs::read_to_string(&path).ok()
        } else {
            None
        }
    }

    fn save_to_cache(&self, url: &str, html: &str) -> Result<()> {
        if let Some(path) = self.cache_path(url) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, html)?;
            log::debug!("Saved to cache: {}", path.display());
        }
        Ok(())
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        if let Some(html) = self.load_from_cache(url) {
            return Ok(html);
        }

        if self.offline_only {
            return Err(Error::Source {
                location: url.to_string(),
                message: "no cached copy (offline mode)".to_string(),
            });
        }

        log::debug!("Fetching {}", url);
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(Error::Source {
                location: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let html = response.text()?;
        if let Err(e) = self.save_to_cache(url, &html) {
            log::warn!("Failed to cache {}: {}", url, e);
        }
        Ok(html)
    }
}

/// Reads locations as file paths relative to a root directory
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FileSource {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, location: &str) -> Result<String> {
        let path = self.root.join(location.trim_start_matches('/'));
        std::fs::read_to_string(&path).map_err(|e| Error::Source {
            location: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Safe file name for a URL
pub fn cache_file_name(url: &str) -> String {
    url.replace("https://", "")
        .replace("http://", "")
        .replace(['/', '?', ':'], "_")
        + ".html"
}
