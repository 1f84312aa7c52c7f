//! Metadata extraction: the generation step
//!
//! Turns the set of content files into one [`PostMetadata`] per file and then
//! into a [`MetadataIndex`]. Every problem found (missing fields, bad dates,
//! colliding slugs) fails the run; nothing is silently dropped.

use crate::config::ContentConfig;
use crate::core::{derive_slug, Frontmatter, MetadataIndex, PostMetadata};
use crate::error::{FolioError, Result};
use crate::io::{ContentReader, ContentResolver, ResolverConfig};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Produces post metadata from the files under a content root
pub struct Extractor {
    root: PathBuf,
    extensions: Vec<String>,
    resolver: ContentResolver,
    reader: ContentReader,
}

impl Extractor {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            root: config.root.clone(),
            extensions: config.extensions.clone(),
            resolver: ContentResolver::with_config(ResolverConfig::from(config)),
            reader: ContentReader::new(),
        }
    }

    /// Extractor for `root` with default settings
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self::new(&ContentConfig {
            root: root.into(),
            ..ContentConfig::default()
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Content files in discovery order
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.resolver.resolve(&self.root)
    }

    /// Metadata for a single content file
    pub fn extract_file(&self, path: &Path) -> Result<PostMetadata> {
        let mut file = self.reader.read_file(path)?;
        let display_path = self.relative_path(path);

        let front_matter = file
            .take_front_matter()
            .ok_or_else(|| FolioError::malformed_frontmatter(&display_path, "no front matter block"))?;
        let front_matter = Frontmatter::from_yaml(front_matter, Path::new(&display_path))?;
        let slug = derive_slug(&self.root, path, &self.extensions)?;

        debug!("{} -> {}", display_path, slug);
        Ok(PostMetadata::new(slug, front_matter, display_path))
    }

    /// Metadata for every file, in the given order
    ///
    /// All per-file failures are collected so one run reports every bad file.
    pub fn extract(&self, files: &[PathBuf]) -> Result<Vec<PostMetadata>> {
        let mut posts = Vec::with_capacity(files.len());
        let mut errors = Vec::new();

        for path in files {
            match self.extract_file(path) {
                Ok(post) => posts.push(post),
                Err(e) => errors.push(e),
            }
        }

        match errors.len() {
            0 => Ok(posts),
            1 => Err(errors.remove(0)),
            _ => Err(FolioError::multiple(errors)),
        }
    }

    /// Discover, extract, and index
    ///
    /// Slug collisions surface here, from [`MetadataIndex::build`].
    pub fn generate(&self) -> Result<MetadataIndex> {
        let started = Instant::now();
        let files = self.discover()?;
        let posts = self.extract(&files)?;
        let index = MetadataIndex::build(posts)?;
        info!(
            "Indexed {} posts and {} tags from {} in {:?}",
            index.len(),
            index.all_tags().len(),
            self.root.display(),
            started.elapsed()
        );
        Ok(index)
    }

    /// `path` relative to the root, `/`-separated
    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
