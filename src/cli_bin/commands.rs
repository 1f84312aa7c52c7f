//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use folio::config::SiteConfig;
use folio::core::{MetadataIndex, PostMetadata};
use folio::error::{FolioError, Result};
use folio::io::{read_artifact, ArtifactWriter};
use folio::loader::ContentLoader;
use folio::sitemap::Sitemap;
use folio::watch::{ContentWatcher, Outputs, Regenerator};
use folio::Extractor;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

/// Execute the generate command
pub fn generate_command(args: GenerateArgs, mut config: SiteConfig) -> Result<()> {
    debug!("Executing generate command with args: {:?}", args);

    if let Some(output) = args.output {
        config.output.metadata = output;
    }
    if let Some(sitemap) = args.sitemap {
        config.output.sitemap = Some(sitemap);
    }

    let index = Extractor::new(&config.content).generate()?;
    if args.check {
        info!("{} posts OK", index.len());
        return Ok(());
    }

    let writer = ArtifactWriter::new();
    let result = writer.write_artifact(&index, &config.output.metadata)?;
    if result.modified {
        info!("Wrote {}", result.output_path.display());
    } else {
        info!("{} is up to date", result.output_path.display());
    }

    if let Some(path) = &config.output.sitemap {
        let xml = Sitemap::from_index(&index, config.domain()).to_xml();
        writer.write_text(path, &xml)?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}

/// Execute the watch command
pub fn watch_command(args: WatchArgs, mut config: SiteConfig) -> Result<()> {
    debug!("Executing watch command with args: {:?}", args);

    if let Some(output) = args.output {
        config.output.metadata = output;
    }
    if let Some(sitemap) = args.sitemap {
        config.output.sitemap = Some(sitemap);
    }

    let regenerator = Regenerator::new(Extractor::new(&config.content))
        .with_outputs(Outputs::from_config(&config));
    ContentWatcher::new(Arc::new(regenerator), &config).run()
}

/// Execute the list command
pub fn list_command(args: ListArgs, config: SiteConfig) -> Result<()> {
    let index = load_index(&args.source, &config)?;

    let posts: Vec<&PostMetadata> = match &args.tag {
        Some(tag) => {
            if !index.is_valid_tag(tag) {
                warn!("No posts are tagged {:?}", tag);
            }
            let mut tagged = index.posts_by_tag(tag);
            if let Some(limit) = args.limit {
                tagged.truncate(limit);
            }
            tagged
        }
        None => index.all_posts(args.limit).iter().collect(),
    };

    match args.format {
        OutputFormat::Text => {
            let offset = config.site.timezone_offset_minutes;
            for post in posts {
                print_post_line(post, offset);
            }
            Ok(())
        }
        format => output_structured(&posts, format),
    }
}

/// Execute the tags command
pub fn tags_command(args: TagsArgs, config: SiteConfig) -> Result<()> {
    let index = load_index(&args.source, &config)?;

    match args.format {
        OutputFormat::Text => {
            for tag in index.all_tags() {
                println!("{} ({})", tag, index.posts_by_tag(tag).len());
            }
            Ok(())
        }
        format => output_structured(&index.all_tags(), format),
    }
}

/// Execute the show command
pub fn show_command(args: ShowArgs, config: SiteConfig) -> Result<()> {
    let index = load_index(&args.source, &config)?;
    let post = index.get(&args.slug)?;

    let html = if args.html {
        let loader = ContentLoader::from_index(&index, &config.content.root);
        Some(loader.load(&post.slug)?.html.clone())
    } else {
        None
    };

    match args.format {
        OutputFormat::Text => {
            let offset = config.site.timezone_offset_minutes;
            println!("title:    {}", post.title);
            println!("slug:     {}", post.slug);
            println!("date:     {}", post.date.format_display(offset));
            println!("tags:     {}", post.tags.join(", "));
            println!("file:     {}", post.file_path);
            if let Some(summary) = &post.summary {
                println!("summary:  {}", summary);
            }
            if let Some(note) = &post.note {
                println!("note:     {}", note);
            }
            if let Some(image) = &post.image {
                println!("image:    {}", image);
            }
            if let Some(html) = html {
                println!();
                print!("{}", html);
            }
            Ok(())
        }
        format => {
            #[derive(Serialize)]
            struct Shown<'a> {
                #[serde(flatten)]
                post: &'a PostMetadata,
                #[serde(skip_serializing_if = "Option::is_none")]
                html: Option<String>,
            }
            output_structured(&Shown { post, html }, format)
        }
    }
}

/// Execute the sitemap command
pub fn sitemap_command(args: SitemapArgs, config: SiteConfig) -> Result<()> {
    let index = load_index(&args.source, &config)?;
    let domain = args.domain.as_deref().unwrap_or_else(|| config.domain());
    let xml = Sitemap::from_index(&index, domain).to_xml();

    match args.output {
        Some(path) => {
            ArtifactWriter::new().write_text(&path, &xml)?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", xml),
    }
    Ok(())
}

fn load_index(source: &IndexSource, config: &SiteConfig) -> Result<MetadataIndex> {
    match &source.artifact {
        Some(path) => {
            debug!("Reading index from {}", path.display());
            read_artifact(path)
        }
        None => Extractor::new(&config.content).generate(),
    }
}

fn print_post_line(post: &PostMetadata, offset_minutes: i32) {
    let tags = if post.tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", post.tags.join(", "))
    };
    println!(
        "{:<12}  {}  {}{}",
        post.date.format_display(offset_minutes),
        post.slug,
        post.title,
        tags
    );
}

fn output_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Text => {
            return Err(FolioError::validation("text output is not structured"));
        }
    }
    Ok(())
}
