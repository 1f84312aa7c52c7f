mod cli_bin;

use anyhow::{Context, Result};
use clap::Parser;
use cli_bin::args::{Cli, Commands};
use cli_bin::commands;
use folio::SiteConfig;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        if let Some(folio::FolioError::Multiple { errors }) = e.downcast_ref::<folio::FolioError>() {
            for inner in errors {
                eprintln!("  - {}", inner);
            }
        }
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SiteConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(root) = cli.root {
        config.content.root = root;
    }

    match cli.command {
        Commands::Generate(args) => commands::generate_command(args, config)?,
        Commands::Watch(args) => commands::watch_command(args, config)?,
        Commands::List(args) => commands::list_command(args, config)?,
        Commands::Tags(args) => commands::tags_command(args, config)?,
        Commands::Show(args) => commands::show_command(args, config)?,
        Commands::Sitemap(args) => commands::sitemap_command(args, config)?,
    }
    Ok(())
}
