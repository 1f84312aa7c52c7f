//! The metadata index
//!
//! An immutable snapshot of every post's metadata. It is built wholesale from a
//! generation run and never mutated afterwards; a rebuild produces a new index
//! that replaces the old one.

use crate::core::metadata::PostMetadata;
use crate::error::{FolioError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Serializable form of the index, written as the generated metadata artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataArtifact {
    /// Posts, newest first
    pub posts: Vec<PostMetadata>,
    /// Distinct tags, ascending
    pub tags: Vec<String>,
}

/// Slug-addressable, date-ordered collection of post metadata
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    posts: Vec<PostMetadata>,
    by_slug: HashMap<String, usize>,
    tags: Vec<String>,
    tag_set: HashSet<String>,
}

impl MetadataIndex {
    /// An index with no posts
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from posts in discovery order
    ///
    /// Posts are ordered newest first; equal dates keep their discovery order.
    /// Fails with [`FolioError::SlugCollision`] if two posts share a slug.
    pub fn build(mut posts: Vec<PostMetadata>) -> Result<Self> {
        {
            let mut first_seen: HashMap<&str, &str> = HashMap::with_capacity(posts.len());
            for post in &posts {
                if let Some(first) = first_seen.insert(&post.slug, &post.file_path) {
                    return Err(FolioError::slug_collision(&post.slug, first, &post.file_path));
                }
            }
        }

        // sort_by is stable
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(i, post)| (post.slug.clone(), i))
            .collect();

        let tags: BTreeSet<String> = posts.iter().flat_map(|p| p.tags.iter().cloned()).collect();
        let tag_set = tags.iter().cloned().collect();

        Ok(Self {
            posts,
            by_slug,
            tags: tags.into_iter().collect(),
            tag_set,
        })
    }

    /// Rebuild from a previously written artifact
    pub fn from_artifact(artifact: MetadataArtifact) -> Result<Self> {
        Self::build(artifact.posts)
    }

    /// Snapshot this index in its artifact form
    pub fn to_artifact(&self) -> MetadataArtifact {
        MetadataArtifact {
            posts: self.posts.clone(),
            tags: self.tags.clone(),
        }
    }

    /// All posts, newest first, optionally truncated to the `limit` most recent
    pub fn all_posts(&self, limit: Option<usize>) -> &[PostMetadata] {
        match limit {
            Some(n) => &self.posts[..n.min(self.posts.len())],
            None => &self.posts,
        }
    }

    /// Posts carrying `tag`, newest first
    pub fn posts_by_tag(&self, tag: &str) -> Vec<&PostMetadata> {
        self.posts.iter().filter(|p| p.has_tag(tag)).collect()
    }

    /// Every distinct tag, ascending
    pub fn all_tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_valid_tag(&self, candidate: &str) -> bool {
        self.tag_set.contains(candidate)
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&PostMetadata> {
        self.by_slug.get(slug).map(|&i| &self.posts[i])
    }

    /// Like [`post_by_slug`](Self::post_by_slug) but a miss is a
    /// [`FolioError::PostNotFound`]
    pub fn get(&self, slug: &str) -> Result<&PostMetadata> {
        self.post_by_slug(slug)
            .ok_or_else(|| FolioError::post_not_found(slug))
    }

    pub fn has_post(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::PostDate;
    use pretty_assertions::assert_eq;

    fn post(slug: &str, date: &str, tags: &[&str]) -> PostMetadata {
        PostMetadata {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            date: PostDate::parse(date).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: None,
            note: None,
            image: None,
            file_path: format!("{}.md", slug),
        }
    }

    fn slugs<'a>(posts: impl IntoIterator<Item = &'a PostMetadata>) -> Vec<&'a str> {
        posts.into_iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_newest_first() {
        let index = MetadataIndex::build(vec![
            post("old", "2024-01-01", &[]),
            post("new", "2024-06-01", &[]),
        ])
        .unwrap();
        assert_eq!(slugs(index.all_posts(None)), vec!["new", "old"]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let index = MetadataIndex::build(vec![
            post("first", "2024-01-01", &[]),
            post("second", "2024-01-01", &[]),
            post("newest", "2024-02-01", &[]),
            post("third", "2024-01-01", &[]),
        ])
        .unwrap();
        assert_eq!(
            slugs(index.all_posts(None)),
            vec!["newest", "first", "second", "third"]
        );
    }

    #[test]
    fn test_limit() {
        let index = MetadataIndex::build(vec![
            post("a", "2024-01-01", &[]),
            post("b", "2024-02-01", &[]),
            post("c", "2024-03-01", &[]),
        ])
        .unwrap();
        assert_eq!(slugs(index.all_posts(Some(2))), vec!["c", "b"]);
        assert_eq!(index.all_posts(Some(10)).len(), 3);
        assert!(index.all_posts(Some(0)).is_empty());
    }

    #[test]
    fn test_tags_sorted_and_deduplicated() {
        let index = MetadataIndex::build(vec![
            post("one", "2024-01-01", &["b", "a"]),
            post("two", "2024-02-01", &["a", "c"]),
        ])
        .unwrap();
        assert_eq!(index.all_tags().to_vec(), vec!["a", "b", "c"]);
        for tag in index.all_tags() {
            assert!(index.is_valid_tag(tag));
        }
        assert!(!index.is_valid_tag("nonexistent"));
    }

    #[test]
    fn test_posts_by_tag_keeps_global_order() {
        let index = MetadataIndex::build(vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2024-03-01", &["x", "y"]),
            post("c", "2024-02-01", &["x"]),
        ])
        .unwrap();
        assert_eq!(slugs(index.posts_by_tag("x")), vec!["b", "c", "a"]);
        assert_eq!(slugs(index.posts_by_tag("y")), vec!["b"]);
        assert!(index.posts_by_tag("z").is_empty());
    }

    #[test]
    fn test_lookup() {
        let index = MetadataIndex::build(vec![post("a", "2024-01-01", &[])]).unwrap();
        assert_eq!(index.post_by_slug("a").unwrap().title, "A");
        assert!(index.has_post("a"));
        assert!(!index.has_post("missing"));
        assert!(index.post_by_slug("missing").is_none());
        assert!(index.get("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let mut dup = post("a", "2024-02-01", &[]);
        dup.file_path = "a.mdx".to_string();
        let err = MetadataIndex::build(vec![post("a", "2024-01-01", &[]), dup]).unwrap_err();
        match err {
            FolioError::SlugCollision { slug, first, second } => {
                assert_eq!(slug, "a");
                assert_eq!(first.to_string_lossy(), "a.md");
                assert_eq!(second.to_string_lossy(), "a.mdx");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_artifact_rebuild() {
        let index = MetadataIndex::build(vec![
            post("a", "2024-01-01", &["x"]),
            post("b", "2024-03-01", &["y"]),
        ])
        .unwrap();
        let artifact = index.to_artifact();
        assert_eq!(artifact.tags, vec!["x", "y"]);

        let rebuilt = MetadataIndex::from_artifact(artifact.clone()).unwrap();
        assert_eq!(rebuilt.to_artifact(), artifact);
    }
}
