//! Sitemap generation.
//!
//! Lists the resume page, the blog index, every post, and every tag page.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/blog/posts/hello</loc>
//!     <lastmod>2024-01-04</lastmod>
//!     <changefreq>yearly</changefreq>
//!     <priority>0.7</priority>
//!   </url>
//! </urlset>
//! ```

use crate::core::MetadataIndex;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Characters left alone in a path segment (RFC 3986 unreserved)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

impl Sitemap {
    /// Entries for every route backed by `index`, rooted at `domain`
    pub fn from_index(index: &MetadataIndex, domain: &str) -> Self {
        let domain = domain.trim_end_matches('/');
        let mut urls = vec![
            UrlEntry {
                loc: format!("{domain}/"),
                lastmod: None,
                changefreq: ChangeFreq::Monthly,
                priority: 1.0,
            },
            UrlEntry {
                loc: format!("{domain}/blog"),
                lastmod: None,
                changefreq: ChangeFreq::Weekly,
                priority: 0.8,
            },
        ];

        urls.extend(index.all_posts(None).iter().map(|post| UrlEntry {
            loc: format!("{domain}/blog/posts/{}", encode_slug(&post.slug)),
            lastmod: Some(post.date.as_str().to_string()),
            changefreq: ChangeFreq::Yearly,
            priority: 0.7,
        }));

        urls.extend(index.all_tags().iter().map(|tag| UrlEntry {
            loc: format!("{domain}/blog/tags/{}", utf8_percent_encode(tag, SEGMENT)),
            lastmod: None,
            changefreq: ChangeFreq::Weekly,
            priority: 0.6,
        }));

        Self { urls }
    }

    pub fn urls(&self) -> &[UrlEntry] {
        &self.urls
    }

    /// Generate sitemap XML string.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in &self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = &entry.lastmod {
                xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
            }
            xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Nested slugs keep their `/` separators
fn encode_slug(slug: &str) -> String {
    slug.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PostDate, PostMetadata};

    fn index() -> MetadataIndex {
        let post = |slug: &str, date: &str, tags: &[&str]| PostMetadata {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: PostDate::parse(date).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: None,
            note: None,
            image: None,
            file_path: format!("{slug}.md"),
        };
        MetadataIndex::build(vec![
            post("hello", "2024-01-04", &["rust"]),
            post("2024/deep dive", "2024-03-01", &["c++", "rust"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
    }

    #[test]
    fn test_entries() {
        let sitemap = Sitemap::from_index(&index(), "https://example.com/");
        let locs: Vec<_> = sitemap.urls().iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com/",
                "https://example.com/blog",
                "https://example.com/blog/posts/2024/deep%20dive",
                "https://example.com/blog/posts/hello",
                "https://example.com/blog/tags/c%2B%2B",
                "https://example.com/blog/tags/rust",
            ]
        );
        assert_eq!(sitemap.urls()[3].lastmod.as_deref(), Some("2024-01-04"));
    }

    #[test]
    fn test_xml() {
        let xml = Sitemap::from_index(&index(), "https://example.com").to_xml();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(xml.contains("<changefreq>yearly</changefreq>"));
        assert!(xml.contains("<lastmod>2024-03-01</lastmod>"));
        assert!(xml.ends_with("</urlset>\n"));
    }
}
