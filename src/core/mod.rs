//! Core data types for the blog content pipeline
//!
//! - PostDate: front matter dates with their source text preserved
//! - Slug derivation from content paths
//! - Frontmatter / PostMetadata: validated per-post metadata
//! - MetadataIndex: the immutable, slug-addressable snapshot served to pages

pub mod date;
pub mod index;
pub mod metadata;
pub mod slug;

pub use date::PostDate;
pub use index::{MetadataArtifact, MetadataIndex};
pub use metadata::{normalize_tags, Frontmatter, PostMetadata};
pub use slug::{derive_slug, has_content_extension, strip_extension};
