//! Site configuration
//!
//! Loaded from an optional `folio.toml`; every field has a default, so an empty
//! or missing file yields a working configuration.
//!
//! ```toml
//! [content]
//! root = "content/blog"
//! extensions = ["md", "mdx"]
//!
//! [output]
//! metadata = "generated/blog-metadata.json"
//! sitemap = "public/sitemap.xml"
//!
//! [site]
//! domain = "https://example.com"
//! timezone_offset_minutes = -360
//!
//! [watch]
//! debounce_ms = 100
//! ```

use crate::error::{FolioError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub content: ContentConfig,
    pub output: OutputConfig,
    pub site: SiteInfo,
    pub watch: WatchConfig,
}

/// Where content lives and which files count as posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub root: PathBuf,
    /// Extensions without the leading dot, matched case-insensitively
    pub extensions: Vec<String>,
    pub include_hidden: bool,
    pub follow_links: bool,
    pub max_depth: Option<usize>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content/blog"),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            include_hidden: false,
            follow_links: false,
            max_depth: None,
        }
    }
}

/// Generated files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub metadata: PathBuf,
    pub sitemap: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metadata: PathBuf::from("generated/blog-metadata.json"),
            sitemap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Absolute origin used in sitemap URLs, without trailing slash
    pub domain: String,
    /// UTC offset used when displaying post dates
    pub timezone_offset_minutes: i32,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            domain: "http://localhost".to_string(),
            timezone_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Window for collapsing a burst of raw file events into one trigger
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FolioError::file_not_found(path));
        }
        let text = fs::read_to_string(path)?;
        let config: SiteConfig = toml::from_str(&text)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else `folio.toml` if present, else defaults
    ///
    /// An explicitly requested file that does not exist is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.extensions.is_empty() {
            return Err(FolioError::validation(
                "content.extensions must list at least one extension",
            ));
        }
        if self.content.extensions.iter().any(|e| e.starts_with('.') || e.is_empty()) {
            return Err(FolioError::validation(
                "content.extensions entries are bare extensions such as \"md\"",
            ));
        }
        if self.site.timezone_offset_minutes.abs() >= 24 * 60 {
            return Err(FolioError::validation(
                "site.timezone_offset_minutes must be within one day",
            ));
        }
        Ok(())
    }

    /// The site origin without a trailing slash
    pub fn domain(&self) -> &str {
        self.site.domain.trim_end_matches('/')
    }
}
