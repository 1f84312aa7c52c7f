//! Slug derivation from content paths
//!
//! `<root>/2024/hello-world.mdx` becomes `2024/hello-world`.

use crate::error::{FolioError, Result};
use std::path::{Component, Path};

/// Derive the slug for `path`, which must live under `root`
///
/// The root prefix and a trailing extension from `extensions` (matched
/// case-insensitively) are stripped; remaining segments are joined with `/`.
pub fn derive_slug(root: &Path, path: &Path, extensions: &[String]) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        FolioError::validation(format!(
            "{} is not under the content root {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(FolioError::validation(format!(
                    "unsupported path component in {}",
                    relative.display()
                )))
            }
        }
    }

    if let Some(last) = segments.last_mut() {
        *last = strip_extension(last, extensions).to_string();
    }

    let slug = segments.join("/");
    if slug.is_empty() {
        return Err(FolioError::validation(format!(
            "{} does not produce a slug",
            path.display()
        )));
    }
    Ok(slug)
}

/// Strip one recognised extension from a file name
pub fn strip_extension<'a>(name: &'a str, extensions: &[String]) -> &'a str {
    if let Some((stem, ext)) = name.rsplit_once('.') {
        if !stem.is_empty() && extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return stem;
        }
    }
    name
}

/// Whether the path carries one of the content extensions
pub fn has_content_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn exts() -> Vec<String> {
        vec!["md".to_string(), "mdx".to_string()]
    }

    #[test]
    fn test_flat_slug() {
        let root = PathBuf::from("/site/content/blog");
        let slug = derive_slug(&root, &root.join("2024-01-04-a.md"), &exts()).unwrap();
        assert_eq!(slug, "2024-01-04-a");
    }

    #[test]
    fn test_nested_slug_keeps_segments() {
        let root = PathBuf::from("content");
        let slug = derive_slug(&root, &root.join("2024").join("intro.MDX"), &exts()).unwrap();
        assert_eq!(slug, "2024/intro");
    }

    #[test]
    fn test_only_known_extension_is_stripped() {
        assert_eq!(strip_extension("notes.v2.md", &exts()), "notes.v2");
        assert_eq!(strip_extension("notes.txt", &exts()), "notes.txt");
        assert_eq!(strip_extension(".md", &exts()), ".md");
    }

    #[test]
    fn test_outside_root_is_rejected() {
        let err = derive_slug(Path::new("content"), Path::new("elsewhere/a.md"), &exts());
        assert!(err.is_err());
    }

    #[test]
    fn test_content_extension_check() {
        assert!(has_content_extension(Path::new("a/b.Md"), &exts()));
        assert!(!has_content_extension(Path::new("a/b.txt"), &exts()));
        assert!(!has_content_extension(Path::new("a/README"), &exts()));
    }
}
