//! Configuration management for Diario.
//!
//! Configuration is read from `~/.config/diario/config.toml` (or an explicit
//! path) at startup. If the file doesn't exist, a default configuration with
//! comments is created. The loaded [`Config`] is immutable and handed to the
//! composer and the store when they are built.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fetcher::parallel::DEFAULT_WORKERS;

/// Placeholder replaced by the percent-encoded section id.
pub const SECTION_PLACEHOLDER: &str = "{section}";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub store: StoreConfig,
    pub http: HttpConfig,
}

/// Where the feeds come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url_template: String,
    /// Fetch and display order.
    pub sections: Vec<String>,
    pub accept: String,
    /// Stamped into every snapshot as `source`.
    pub source: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url_template:
                "https://www.eluniverso.com/arc/outboundfeeds/rss-subsection/{section}/?outputType=xml"
                    .to_string(),
            sections: [
                "guayaquil/comunidad",
                "noticias/ecuador",
                "noticias/internacional",
                "noticias/politica",
                "deportes/futbol",
                "noticias/economia",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            accept: "application/xml,text/xml;q=0.9,*/*;q=0.8".to_string(),
            source: "eluniverso".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn url_for(&self, section: &str) -> String {
        self.url_template
            .replace(SECTION_PLACEHOLDER, &urlencoding::encode(section))
    }
}

/// REST endpoint holding the snapshots.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://news-reader-2acd6-default-rtdb.firebaseio.com".to_string(),
            collection: "eluniverso".to_string(),
        }
    }
}

impl StoreConfig {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn collection_path(&self) -> &str {
        self.collection.trim_matches('/')
    }

    /// `<base>/<collection>.json`
    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base(), self.collection_path())
    }

    /// `<base>/<collection>/<date_key>.json`
    pub fn snapshot_url(&self, date_key: &str) -> String {
        format!("{}/{}/{}.json", self.base(), self.collection_path(), date_key)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of feeds fetched at once.
    pub workers: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("diario/", env!("CARGO_PKG_VERSION")).to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/diario/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("diario").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.sections.is_empty() {
            return Err(ConfigError::Invalid("feed.sections must not be empty".into()));
        }
        if !self.feed.url_template.contains(SECTION_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "feed.url_template must contain {}",
                SECTION_PLACEHOLDER
            )));
        }
        url::Url::parse(&self.feed.url_for("section")).map_err(|e| {
            ConfigError::Invalid(format!("feed.url_template is not a valid URL: {}", e))
        })?;
        url::Url::parse(&self.store.base_url).map_err(|e| {
            ConfigError::Invalid(format!("store.base_url is not a valid URL: {}", e))
        })?;
        if self.store.collection_path().is_empty() {
            return Err(ConfigError::Invalid("store.collection must not be empty".into()));
        }
        if self.http.workers == 0 {
            return Err(ConfigError::Invalid("http.workers must be at least 1".into()));
        }
        Ok(())
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Diario Configuration

[feed]
# {section} is replaced by the percent-encoded section id
url_template = "https://www.eluniverso.com/arc/outboundfeeds/rss-subsection/{section}/?outputType=xml"

# Fetched concurrently; stored and listed in this order
sections = [
    "guayaquil/comunidad",
    "noticias/ecuador",
    "noticias/internacional",
    "noticias/politica",
    "deportes/futbol",
    "noticias/economia",
]

accept = "application/xml,text/xml;q=0.9,*/*;q=0.8"
source = "eluniverso"

[store]
# Snapshots live at <base_url>/<collection>/<YYYY-MM-DD>.json
base_url = "https://news-reader-2acd6-default-rtdb.firebaseio.com"
collection = "eluniverso"

[http]
# Per-request timeout in seconds
timeout_secs = 30

# Maximum concurrent feed requests
workers = 10
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
