//! Writing generated files
//!
//! The metadata artifact and sitemap are written atomically: content goes to a
//! temporary file next to the target, which is then renamed over it. Readers
//! of the artifact therefore never observe a half-written index.

use crate::core::{MetadataArtifact, MetadataIndex};
use crate::error::{FolioError, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Configuration for the artifact writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Use atomic writes (write to temp file first, then rename)
    pub atomic_writes: bool,
    /// Skip the write when the target already holds identical content
    pub skip_unchanged: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
            skip_unchanged: true,
        }
    }
}

/// Result of a write operation
#[derive(Debug)]
pub struct WriteResult {
    /// Whether the file was actually modified
    pub modified: bool,
    /// Path where the content was written
    pub output_path: PathBuf,
}

/// Writes generated files
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter {
    config: WriterConfig,
}

impl ArtifactWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Serialize the index as pretty JSON
    pub fn write_artifact<P: AsRef<Path>>(&self, index: &MetadataIndex, path: P) -> Result<WriteResult> {
        let mut json = serde_json::to_string_pretty(&index.to_artifact())?;
        json.push('\n');
        self.write_text(path, &json)
    }

    /// Write arbitrary generated text
    pub fn write_text<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<WriteResult> {
        let path = path.as_ref();

        if self.config.skip_unchanged {
            if let Ok(existing) = fs::read_to_string(path) {
                if existing == content {
                    debug!("{} is up to date", path.display());
                    return Ok(WriteResult {
                        modified: false,
                        output_path: path.to_path_buf(),
                    });
                }
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if self.config.atomic_writes {
            self.write_atomic(path, content)?;
        } else {
            fs::write(path, content)?;
        }
        debug!("Wrote {}", path.display());

        Ok(WriteResult {
            modified: true,
            output_path: path.to_path_buf(),
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let parent_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp_file = NamedTempFile::new_in(parent_dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(path).map_err(|e| {
            FolioError::Io(std::io::Error::other(format!(
                "Failed to persist temporary file: {}",
                e
            )))
        })?;

        Ok(())
    }
}

/// Load an index from a previously written artifact
pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<MetadataIndex> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FolioError::file_not_found(path));
    }
    let text = fs::read_to_string(path)?;
    let artifact: MetadataArtifact = serde_json::from_str(&text)?;
    MetadataIndex::from_artifact(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PostDate, PostMetadata};
    use tempfile::TempDir;

    fn index() -> MetadataIndex {
        MetadataIndex::build(vec![PostMetadata {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            date: PostDate::parse("2024-01-04").unwrap(),
            tags: vec!["x".to_string()],
            summary: Some("First post".to_string()),
            note: None,
            image: None,
            file_path: "hello.md".to_string(),
        }])
        .unwrap()
    }

    #[test]
    fn test_write_then_read_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("generated/blog-metadata.json");

        let result = ArtifactWriter::new().write_artifact(&index(), &path).unwrap();
        assert!(result.modified);
        assert_eq!(result.output_path, path);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"filePath\": \"hello.md\""));

        let loaded = read_artifact(&path).unwrap();
        assert_eq!(loaded.post_by_slug("hello").unwrap().summary.as_deref(), Some("First post"));
        assert_eq!(loaded.all_tags().to_vec(), vec!["x"]);
    }

    #[test]
    fn test_unchanged_content_not_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");
        let writer = ArtifactWriter::new();

        assert!(writer.write_artifact(&index(), &path).unwrap().modified);
        assert!(!writer.write_artifact(&index(), &path).unwrap().modified);
    }

    #[test]
    fn test_read_missing_artifact() {
        let err = read_artifact("/nonexistent/meta.json").unwrap_err();
        assert!(matches!(err, FolioError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_corrupt_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_artifact(&path).unwrap_err(), FolioError::Json(_)));
    }
}
