//! Error types for the folio library
//!
//! Generation errors (malformed front matter, slug collisions, bad dates) abort a
//! build run. Lookup errors (`PostNotFound`, `ContentLoad`) are serving-time
//! conditions and are always recoverable.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum FolioError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML decoding errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encoding/decoding errors (metadata artifact)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file decoding errors
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File system watcher errors
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// A content file lacks required front matter fields or is not decodable
    #[error("Malformed front matter in {path}: {reason}")]
    MalformedFrontmatter { path: PathBuf, reason: String },

    /// The `date` field of a content file cannot be parsed
    #[error("Invalid date in {path}: {value:?} (expected YYYY-MM-DD or an ISO-8601 datetime)")]
    InvalidDate { path: PathBuf, value: String },

    /// Two content files normalize to the same slug
    #[error("Slug collision: {slug:?} is produced by both {first} and {second}")]
    SlugCollision {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// No post exists for the requested slug
    #[error("Post not found: {slug}")]
    PostNotFound { slug: String },

    /// A content loader failed to produce the post body
    #[error("Failed to load content for {slug}: {reason}")]
    ContentLoad { slug: String, reason: String },

    /// A content file exists but cannot be read (permissions, invalid UTF-8)
    #[error("Failed to read {path}: {cause}")]
    ReadFile { path: PathBuf, cause: std::io::Error },

    /// File or directory not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Multiple errors (for batch operations)
    #[error("{} errors occurred", errors.len())]
    Multiple { errors: Vec<FolioError> },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FolioError>;

impl FolioError {
    /// Create a new malformed front matter error
    pub fn malformed_frontmatter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedFrontmatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid date error
    pub fn invalid_date(path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Create a new slug collision error
    pub fn slug_collision(
        slug: impl Into<String>,
        first: impl Into<PathBuf>,
        second: impl Into<PathBuf>,
    ) -> Self {
        Self::SlugCollision {
            slug: slug.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a new post not found error
    pub fn post_not_found(slug: impl Into<String>) -> Self {
        Self::PostNotFound { slug: slug.into() }
    }

    /// Create a new content load error
    pub fn content_load(slug: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContentLoad {
            slug: slug.into(),
            reason: reason.into(),
        }
    }

    /// Create a new read error for `path`
    pub fn read_file(path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            cause,
        }
    }

    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a multiple errors wrapper
    pub fn multiple(errors: Vec<FolioError>) -> Self {
        Self::Multiple { errors }
    }

    /// Whether this is a lookup miss the page layer should render as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound { .. })
    }

    /// Check if this error is recoverable
    ///
    /// Serving-time conditions are recoverable; anything that invalidates a
    /// generation run is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PostNotFound { .. } | Self::ContentLoad { .. } => true,
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::Watch(_) => true,
            Self::MalformedFrontmatter { .. }
            | Self::InvalidDate { .. }
            | Self::SlugCollision { .. }
            | Self::FileNotFound { .. }
            | Self::ReadFile { .. }
            | Self::Validation { .. }
            | Self::Yaml(_)
            | Self::Json(_)
            | Self::Toml(_) => false,
            Self::Multiple { errors } => errors.iter().all(|e| e.is_recoverable()),
        }
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FileNotFound { .. } | Self::SlugCollision { .. } => ErrorSeverity::Critical,
            Self::MalformedFrontmatter { .. }
            | Self::InvalidDate { .. }
            | Self::ReadFile { .. }
            | Self::Yaml(_) => {
                ErrorSeverity::High
            }
            Self::ContentLoad { .. } | Self::Json(_) | Self::Toml(_) => ErrorSeverity::Medium,
            Self::PostNotFound { .. } | Self::Validation { .. } => ErrorSeverity::Low,
            Self::Multiple { errors } => errors
                .iter()
                .map(|e| e.severity())
                .max()
                .unwrap_or(ErrorSeverity::Low),
            _ => ErrorSeverity::Medium,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
