//! Content discovery
//!
//! Walks the content root and collects every file with a content extension.
//! The result is sorted by path, which fixes the discovery order that the
//! index uses to break date ties.

use crate::config::ContentConfig;
use crate::core::slug::has_content_extension;
use crate::error::{FolioError, Result};
use log::debug;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for content discovery
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Maximum recursion depth below the root
    pub max_depth: Option<usize>,
    /// Include hidden files and directories (starting with .)
    pub include_hidden: bool,
    /// Content file extensions
    pub extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&ContentConfig::default())
    }
}

impl From<&ContentConfig> for ResolverConfig {
    fn from(content: &ContentConfig) -> Self {
        Self {
            follow_links: content.follow_links,
            max_depth: content.max_depth,
            include_hidden: content.include_hidden,
            extensions: content.extensions.clone(),
        }
    }
}

/// Finds content files below a root directory
#[derive(Debug, Clone, Default)]
pub struct ContentResolver {
    config: ResolverConfig,
}

impl ContentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// All content files under `root`, sorted by path
    pub fn resolve(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(FolioError::file_not_found(root));
        }

        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| entry.depth() == 0 || include_hidden || !is_hidden(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                FolioError::validation(format!("error traversing {}: {}", root.display(), e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if !has_content_extension(entry.path(), &self.config.extensions) {
                continue;
            }
            files.push(entry.into_path());
        }

        files.sort();
        debug!("Discovered {} content files under {}", files.len(), root.display());
        Ok(files)
    }

    /// Whether `path`, relative to the content root, would be picked up by
    /// [`resolve`](Self::resolve)
    pub fn is_content_file(&self, path: &Path) -> bool {
        has_content_extension(path, &self.config.extensions)
            && (self.config.include_hidden
                || !path.components().any(|c| match c {
                    Component::Normal(part) => part.to_string_lossy().starts_with('.'),
                    _ => false,
                }))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
