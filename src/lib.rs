//! folio: blog content resolution and metadata pipeline
//!
//! This library discovers markdown/MDX posts under a content root, extracts
//! their YAML front matter, derives URL slugs from file paths, and serves the
//! result as an immutable [`MetadataIndex`] that page renderers query. Post
//! bodies are resolved separately, on demand, through a [`ContentLoader`], so
//! listing pages never pay for loading full posts.
//!
//! # Features
//!
//! - **Strict generation**: missing `title`/`date`, unparseable dates, and slug
//!   collisions fail the run with a diagnostic naming the file
//! - **Immutable snapshots**: the index is rebuilt wholesale and swapped in atomically
//! - **Lazy content**: slug → factory registry, optional memoization, parallel batch loads
//! - **Regeneration watcher**: rebuilds on add/change/remove, never two builds at once
//! - **Generated artifacts**: JSON metadata and sitemap, written atomically
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::{ContentLoader, Extractor, Result};
//!
//! fn main() -> Result<()> {
//!     let extractor = Extractor::for_root("content/blog");
//!     let index = extractor.generate()?;
//!
//!     for post in index.all_posts(Some(5)) {
//!         println!("{} {}", post.date, post.title);
//!     }
//!
//!     if let Some(post) = index.post_by_slug("hello-world") {
//!         let loader = ContentLoader::from_index(&index, extractor.root());
//!         let content = loader.load(&post.slug)?;
//!         println!("{}", content.html);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Watching for changes
//!
//! ```rust,no_run
//! use folio::{ContentWatcher, Extractor, Outputs, Regenerator, SiteConfig};
//! use std::sync::Arc;
//!
//! fn main() -> folio::Result<()> {
//!     let config = SiteConfig::load_or_default(None)?;
//!     let regenerator = Regenerator::new(Extractor::new(&config.content))
//!         .with_outputs(Outputs::from_config(&config));
//!     ContentWatcher::new(Arc::new(regenerator), &config).run()
//! }
//! ```

pub use config::SiteConfig;
pub use error::{ErrorSeverity, FolioError, Result};

pub use crate::core::{
    derive_slug, Frontmatter, MetadataArtifact, MetadataIndex, PostDate, PostMetadata,
};
pub use extract::Extractor;
pub use io::{
    read_artifact, ArtifactWriter, ContentFile, ContentReader, ContentResolver, ReaderConfig,
    ResolverConfig, WriteResult, WriterConfig,
};
pub use loader::{render_markdown, ContentLoader, LoadFn, PostContent};
pub use sitemap::Sitemap;
pub use watch::{ContentWatcher, Generate, Outputs, Regenerator, WatchState};

pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod io;
pub mod loader;
pub mod sitemap;
pub mod watch;

/// Convenience functions for common operations
pub mod convenience {
    use super::*;
    use std::path::Path;

    /// Scan `root` with default settings and build the index
    pub fn generate_index<P: AsRef<Path>>(root: P) -> Result<MetadataIndex> {
        Extractor::for_root(root.as_ref()).generate()
    }

    /// Build the index described by `config` and write its configured outputs
    pub fn generate_and_write(config: &SiteConfig) -> Result<MetadataIndex> {
        let index = Extractor::new(&config.content).generate()?;
        let writer = ArtifactWriter::new();
        writer.write_artifact(&index, &config.output.metadata)?;
        if let Some(path) = &config.output.sitemap {
            writer.write_text(path, &Sitemap::from_index(&index, config.domain()).to_xml())?;
        }
        Ok(index)
    }

    /// Index plus a filesystem-backed loader for the same root
    pub fn index_with_loader<P: AsRef<Path>>(root: P) -> Result<(MetadataIndex, ContentLoader)> {
        let index = generate_index(root.as_ref())?;
        let loader = ContentLoader::from_index(&index, root.as_ref());
        Ok((index, loader))
    }
}
