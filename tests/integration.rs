//! Integration tests for the folio library
//!
//! These build real content directories on disk and drive the whole pipeline:
//! discovery, front matter extraction, indexing, content loading, and the
//! regeneration watcher.

use folio::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn titles(posts: &[&PostMetadata]) -> Vec<String> {
    posts.iter().map(|p| p.title.clone()).collect()
}

/// Content root holding the two-post example site
fn example_site() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let posts = temp_dir.path().join("posts");
    write(
        &posts,
        "2024-01-04-a.md",
        "---\ntitle: A\ndate: 2024-01-04\ntags: [x]\n---\nPost A body.\n",
    );
    write(
        &posts,
        "2024-03-01-b.md",
        "---\ntitle: B\ndate: 2024-03-01\ntags: [x, y]\nsummary: The second post\n---\n# B\n\nPost B body.\n",
    );
    temp_dir
}

#[test]
fn test_example_site_queries() {
    let site = example_site();
    let index = convenience::generate_index(site.path().join("posts")).unwrap();

    let all: Vec<&PostMetadata> = index.all_posts(None).iter().collect();
    assert_eq!(titles(&all), vec!["B", "A"]);
    assert_eq!(index.all_tags().to_vec(), vec!["x", "y"]);
    assert_eq!(titles(&index.posts_by_tag("y")), vec!["B"]);

    let a = index.post_by_slug("2024-01-04-a").unwrap();
    assert_eq!(a.title, "A");
    assert_eq!(a.date.as_str(), "2024-01-04");
    assert_eq!(a.tags, vec!["x"]);
    assert_eq!(a.file_path, "2024-01-04-a.md");

    assert!(index.post_by_slug("missing").is_none());
    assert!(!index.has_post("missing"));
    assert!(index.get("missing").unwrap_err().is_not_found());
}

#[test]
fn test_front_matter_round_trips_into_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "2023/notes.mdx",
        "---\ntitle: \"Notes: part 1\"\ndate: 2023-11-30T18:00:00-06:00\ntags:\n  - rust\n  - notes\nnote: Updated later\nimage: /images/notes.png\n---\nimport X from './x'\n",
    );

    let index = convenience::generate_index(root).unwrap();
    let post = index.post_by_slug("2023/notes").unwrap();
    assert_eq!(post.title, "Notes: part 1");
    assert_eq!(post.date.as_str(), "2023-11-30T18:00:00-06:00");
    assert_eq!(post.tags, vec!["rust", "notes"]);
    assert_eq!(post.note.as_deref(), Some("Updated later"));
    assert_eq!(post.image.as_deref(), Some("/images/notes.png"));
    assert_eq!(post.summary, None);
    assert_eq!(post.date.format_display(0), "Dec 1, 2023");
}

#[test]
fn test_malformed_content_fails_generation() {
    let site = example_site();
    let posts = site.path().join("posts");
    write(&posts, "broken.md", "---\ntags: [x]\n---\nNo title or date\n");

    let err = convenience::generate_index(&posts).unwrap_err();
    assert!(matches!(err, FolioError::MalformedFrontmatter { .. }));
    assert!(err.to_string().contains("broken.md"));
}

#[test]
fn test_slug_collision_fails_generation() {
    let site = example_site();
    let posts = site.path().join("posts");
    write(&posts, "2024-01-04-a.mdx", "---\ntitle: A again\ndate: 2024-01-05\n---\n");

    let err = convenience::generate_index(&posts).unwrap_err();
    assert!(matches!(err, FolioError::SlugCollision { ref slug, .. } if slug == "2024-01-04-a"));
}

#[test]
fn test_loader_is_independent_of_listing() {
    let site = example_site();
    let posts = site.path().join("posts");
    let (index, loader) = convenience::index_with_loader(&posts).unwrap();

    // Deleting a body does not affect metadata queries, only loading
    fs::remove_file(posts.join("2024-01-04-a.md")).unwrap();
    assert_eq!(index.all_posts(None).len(), 2);

    let b = loader.load("2024-03-01-b").unwrap();
    assert!(b.html.contains("<h1>B</h1>"));
    assert!(b.html.contains("Post B body."));

    let err = loader.load("2024-01-04-a").unwrap_err();
    assert!(matches!(err, FolioError::ContentLoad { .. }));
    assert!(loader.load("missing").unwrap_err().is_not_found());

    let results = loader.load_many(&["2024-03-01-b", "2024-01-04-a"]);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_artifact_serves_same_queries() {
    let site = example_site();
    let index = convenience::generate_index(site.path().join("posts")).unwrap();
    let artifact = site.path().join("generated/blog-metadata.json");
    ArtifactWriter::new().write_artifact(&index, &artifact).unwrap();

    let loaded = read_artifact(&artifact).unwrap();
    assert_eq!(loaded.to_artifact(), index.to_artifact());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&artifact).unwrap()).unwrap();
    assert_eq!(json["tags"], serde_json::json!(["x", "y"]));
    assert_eq!(json["posts"][0]["slug"], "2024-03-01-b");
    assert_eq!(json["posts"][0]["summary"], "The second post");
}

#[test]
fn test_regenerator_tracks_content_and_survives_bad_edits() {
    let site = example_site();
    let mut config = SiteConfig::default();
    config.content.root = site.path().join("posts");
    config.output.metadata = site.path().join("generated/meta.json");

    let regenerator = Arc::new(
        Regenerator::new(Extractor::new(&config.content)).with_outputs(Outputs::from_config(&config)),
    );
    regenerator.trigger("startup").unwrap().join().unwrap();
    assert_eq!(regenerator.index().len(), 2);
    assert!(config.output.metadata.is_file());

    // A new post shows up after the next run
    write(&config.content.root, "2024-05-01-c.md", "---\ntitle: C\ndate: 2024-05-01\n---\n");
    regenerator.run_now("change").unwrap().unwrap();
    assert_eq!(regenerator.index().all_posts(Some(1))[0].title, "C");

    // A broken edit keeps the last good index
    write(&config.content.root, "2024-05-01-c.md", "---\ntitle: C\n---\n");
    assert!(regenerator.run_now("change").unwrap().is_err());
    assert_eq!(regenerator.state(), WatchState::Idle);
    assert_eq!(regenerator.index().len(), 3);
    assert_eq!(read_artifact(&config.output.metadata).unwrap().len(), 3);

    // Removing the file fixes the site again
    fs::remove_file(config.content.root.join("2024-05-01-c.md")).unwrap();
    regenerator.run_now("change").unwrap().unwrap();
    assert_eq!(regenerator.index().len(), 2);
}
