//! Post metadata model
//!
//! [`Frontmatter`] is the validated header of one content file;
//! [`PostMetadata`] is what the index stores and the artifact serializes.

use crate::core::date::PostDate;
use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawFrontmatter {
    title: Option<serde_yaml::Value>,
    date: Option<serde_yaml::Value>,
    tags: Option<serde_yaml::Value>,
    summary: Option<serde_yaml::Value>,
    note: Option<serde_yaml::Value>,
    image: Option<serde_yaml::Value>,
}

/// Strings, numbers, and booleans read as text; `title: 2024` is the string `"2024"`
fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(value: Option<serde_yaml::Value>, field: &str, path: &Path) -> Result<Option<String>> {
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => scalar_text(&value).map(Some).ok_or_else(|| {
            FolioError::malformed_frontmatter(path, format!("field `{}` must be a single value", field))
        }),
    }
}

/// `tags: rust` and `tags: [rust, 2024]` are both accepted
fn tag_list(value: Option<serde_yaml::Value>, path: &Path) -> Result<Vec<String>> {
    let invalid = || FolioError::malformed_frontmatter(path, "`tags` must be a value or a list of values");
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(Vec::new()),
        Some(serde_yaml::Value::Sequence(items)) => items
            .iter()
            .map(|item| scalar_text(item).ok_or_else(invalid))
            .collect(),
        Some(other) => scalar_text(&other).map(|tag| vec![tag]).ok_or_else(invalid),
    }
}

/// Validated front matter of a content file
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub title: String,
    pub date: PostDate,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub note: Option<String>,
    pub image: Option<String>,
}

impl Frontmatter {
    /// Validate a decoded YAML header; `path` is only used in diagnostics
    pub fn from_yaml(value: serde_yaml::Value, path: &Path) -> Result<Self> {
        if !value.is_mapping() {
            return Err(FolioError::malformed_frontmatter(
                path,
                "front matter must be a mapping of `key: value` pairs",
            ));
        }

        let raw: RawFrontmatter = serde_yaml::from_value(value)
            .map_err(|e| FolioError::malformed_frontmatter(path, e.to_string()))?;

        let title = text_field(raw.title, "title", path)?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FolioError::malformed_frontmatter(path, "missing required field `title`"))?;

        let date_raw = text_field(raw.date, "date", path)?
            .ok_or_else(|| FolioError::malformed_frontmatter(path, "missing required field `date`"))?;
        let date = PostDate::parse(&date_raw).ok_or_else(|| FolioError::invalid_date(path, date_raw))?;

        Ok(Self {
            title,
            date,
            tags: normalize_tags(tag_list(raw.tags, path)?),
            summary: non_empty(text_field(raw.summary, "summary", path)?),
            note: non_empty(text_field(raw.note, "note", path)?),
            image: non_empty(text_field(raw.image, "image", path)?),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trim, drop empties, and deduplicate keeping first occurrence
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Metadata for one post, keyed by its slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub slug: String,
    pub title: String,
    pub date: PostDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Path relative to the content root, `/`-separated
    pub file_path: String,
}

impl PostMetadata {
    pub fn new(slug: impl Into<String>, front_matter: Frontmatter, file_path: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: front_matter.title,
            date: front_matter.date,
            tags: front_matter.tags,
            summary: front_matter.summary,
            note: front_matter.note,
            image: front_matter.image,
            file_path: file_path.into(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
