//! Command-line argument definitions and parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Generate and query blog post metadata from markdown/MDX content",
    long_about = "folio scans a content directory for markdown/MDX posts, extracts their \
                  front matter, and writes a metadata index (and optionally a sitemap) for \
                  the site to consume. It can also watch the directory and regenerate on change."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Content root, overriding the configuration
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan content and write the metadata artifact
    Generate(GenerateArgs),
    /// Regenerate the metadata artifact whenever content changes
    Watch(WatchArgs),
    /// List posts, newest first
    List(ListArgs),
    /// List all tags
    Tags(TagsArgs),
    /// Show one post
    Show(ShowArgs),
    /// Print or write the sitemap
    Sitemap(SitemapArgs),
}

/// Where query commands get their index from
#[derive(Args, Debug, Clone, Default)]
pub struct IndexSource {
    /// Read a generated artifact instead of scanning the content root
    #[arg(long, value_name = "FILE")]
    pub artifact: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Metadata artifact path, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write a sitemap to this path
    #[arg(long, value_name = "FILE")]
    pub sitemap: Option<PathBuf>,

    /// Validate content without writing anything
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Metadata artifact path, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also keep a sitemap up to date at this path
    #[arg(long, value_name = "FILE")]
    pub sitemap: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: IndexSource,

    /// Only the N most recent posts
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only posts with this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(flatten)]
    pub source: IndexSource,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: IndexSource,

    /// Post slug, e.g. `2024-01-04-hello`
    pub slug: String,

    /// Also print the body rendered to HTML
    #[arg(long)]
    pub html: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct SitemapArgs {
    #[command(flatten)]
    pub source: IndexSource,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Site origin, overriding the configuration
    #[arg(long)]
    pub domain: Option<String>,
}

/// Output formats for query commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
}
