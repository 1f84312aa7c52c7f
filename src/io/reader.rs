//! Content file reading and front matter splitting

use crate::error::{FolioError, Result};
use gray_matter::{engine::YAML, Matter};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the content reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
        }
    }
}

/// A content file split into its front matter block and body
///
/// Immutable once read; a change on disk means reading it again.
#[derive(Debug, Clone)]
pub struct ContentFile {
    path: PathBuf,
    front_matter: Option<serde_yaml::Value>,
    body: String,
}

impl ContentFile {
    pub fn new(path: impl Into<PathBuf>, front_matter: Option<serde_yaml::Value>, body: String) -> Self {
        Self {
            path: path.into(),
            front_matter,
            body,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decoded front matter block, if the file has one
    pub fn front_matter(&self) -> Option<&serde_yaml::Value> {
        self.front_matter.as_ref()
    }

    /// Take ownership of the front matter block
    pub fn take_front_matter(&mut self) -> Option<serde_yaml::Value> {
        self.front_matter.take()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

/// Reads content files and splits off their YAML front matter
pub struct ContentReader {
    config: ReaderConfig,
    matter: Matter<YAML>,
}

impl ContentReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default())
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            matter: Matter::<YAML>::new(),
        }
    }

    /// Read a content file from disk
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<ContentFile> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(FolioError::file_not_found(path));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path).map_err(|e| FolioError::read_file(path, e))?;
            if metadata.len() as usize > max_size {
                return Err(FolioError::validation(format!(
                    "{} is too large: {} bytes (limit: {} bytes)",
                    path.display(),
                    metadata.len(),
                    max_size
                )));
            }
        }

        let content = fs::read_to_string(path).map_err(|e| FolioError::read_file(path, e))?;
        self.parse_content(&content, path)
    }

    /// Split already-loaded text; `path` is recorded on the result and used in diagnostics
    pub fn parse_content(&self, content: &str, path: &Path) -> Result<ContentFile> {
        if !content.trim_start().starts_with("---") {
            return Ok(ContentFile::new(path, None, content.to_string()));
        }

        let parsed = self.matter.parse(content);

        let decoded = match parsed.data {
            Some(data) => match data.deserialize::<serde_yaml::Value>() {
                Ok(serde_yaml::Value::Null) => None,
                Ok(value) => Some(value),
                Err(e) => {
                    return Err(FolioError::malformed_frontmatter(
                        path,
                        format!("failed to decode front matter: {}", e),
                    ));
                }
            },
            None => None,
        };

        // gray_matter swallows YAML syntax errors; decode the block again to report them
        let front_matter = match (decoded, fenced_block(content)) {
            (Some(value), _) => Some(value),
            (None, Some(block)) => match serde_yaml::from_str::<serde_yaml::Value>(block) {
                Ok(serde_yaml::Value::Null) => None,
                Ok(value) => Some(value),
                Err(e) => {
                    return Err(FolioError::malformed_frontmatter(
                        path,
                        format!("invalid YAML in front matter: {}", e),
                    ));
                }
            },
            (None, None) => None,
        };

        Ok(ContentFile::new(path, front_matter, parsed.content))
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

/// Text between the opening `---` line and the next `---` line
fn fenced_block(content: &str) -> Option<&str> {
    let rest = content.trim_start().strip_prefix("---")?;
    let (first_line, body) = rest.split_once('\n')?;
    if !first_line.trim().is_empty() {
        return None;
    }

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&body[..offset]);
        }
        offset += line.len();
    }
    None
}

impl Default for ContentReader {
    fn default() -> Self {
        Self::new()
    }
}
