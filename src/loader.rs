//! Content loading
//!
//! The index only carries metadata; post bodies are resolved on demand through
//! a registry of per-slug factories. Listing pages never touch this module.

use crate::core::MetadataIndex;
use crate::error::{FolioError, Result};
use crate::io::ContentReader;
use log::debug;
use parking_lot::Mutex;
use pulldown_cmark::{html, Options, Parser};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded post body
#[derive(Debug, Clone, PartialEq)]
pub struct PostContent {
    pub slug: String,
    /// Body text with the front matter removed
    pub source: String,
    /// Body rendered to HTML
    pub html: String,
}

impl PostContent {
    /// Render markdown `source` to HTML
    pub fn from_markdown(slug: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let html = render_markdown(&source);
        Self {
            slug: slug.into(),
            source,
            html,
        }
    }
}

/// Render markdown to HTML with the common extensions enabled
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Factory producing a post body
pub type LoadFn = Arc<dyn Fn() -> Result<PostContent> + Send + Sync>;

/// Resolves slugs to post bodies
#[derive(Default)]
pub struct ContentLoader {
    loaders: HashMap<String, LoadFn>,
    memo: Option<Mutex<HashMap<String, Arc<PostContent>>>>,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every post in `index` to a factory reading its file under `root`
    pub fn from_index(index: &MetadataIndex, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut loader = Self::new();
        for post in index.all_posts(None) {
            loader.register(post.slug.clone(), file_loader(post.slug.clone(), root.join(&post.file_path)));
        }
        loader
    }

    /// Cache loaded bodies so repeated loads of one slug share a result
    pub fn with_memo(mut self, enabled: bool) -> Self {
        self.memo = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    /// Bind `slug` to `factory`, replacing any previous binding
    pub fn register(&mut self, slug: impl Into<String>, factory: LoadFn) {
        let slug = slug.into();
        if let Some(memo) = &self.memo {
            memo.lock().remove(&slug);
        }
        self.loaders.insert(slug, factory);
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.loaders.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Load the body for `slug`
    ///
    /// An unbound slug is [`FolioError::PostNotFound`]; a failing factory is
    /// reported as [`FolioError::ContentLoad`].
    pub fn load(&self, slug: &str) -> Result<Arc<PostContent>> {
        if let Some(memo) = &self.memo {
            if let Some(hit) = memo.lock().get(slug) {
                return Ok(Arc::clone(hit));
            }
        }

        let factory = self
            .loaders
            .get(slug)
            .ok_or_else(|| FolioError::post_not_found(slug))?;

        let content = Arc::new(factory().map_err(|e| match e {
            FolioError::ContentLoad { .. } => e,
            other => FolioError::content_load(slug, other.to_string()),
        })?);
        debug!("Loaded content for {}", slug);

        if let Some(memo) = &self.memo {
            memo.lock().insert(slug.to_string(), Arc::clone(&content));
        }
        Ok(content)
    }

    /// Load several slugs in parallel; results line up with `slugs`
    pub fn load_many<S: AsRef<str> + Sync>(&self, slugs: &[S]) -> Vec<Result<Arc<PostContent>>> {
        slugs.par_iter().map(|slug| self.load(slug.as_ref())).collect()
    }
}

/// A factory that re-reads `path` and renders its body
pub fn file_loader(slug: String, path: PathBuf) -> LoadFn {
    Arc::new(move || -> Result<PostContent> {
        let file = ContentReader::new()
            .read_file(&path)
            .map_err(|e| FolioError::content_load(&slug, e.to_string()))?;
        Ok(PostContent::from_markdown(slug.clone(), file.into_body()))
    })
}
