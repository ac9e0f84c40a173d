//! filetundra: index a directory tree and serve it over HTTP

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filetundra::{
    config::{init_logging, Config},
    lifecycle::{prepare_index, Service},
};
use tracing::info;

#[derive(Parser)]
#[command(name = "filetundra")]
#[command(about = "Index a directory tree and serve it for browsing, search and download")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory to index and serve (overrides the config file and FILETUNDRA_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl if needed, then serve HTTP until interrupted (default)
    Serve,

    /// Run one update pass against the index
    Update,

    /// Search the index and print matching paths
    Search {
        /// Query text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_sources(cli.config.as_deref(), cli.root)?;
    init_logging(&config.logging, cli.verbose)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let service = Service::start(config).await?;
            service.run().await?;
        }
        Commands::Update => {
            let root = config.root_dir()?;
            let (_, stats) =
                tokio::task::spawn_blocking(move || prepare_index(&config, &root, true))
                    .await
                    .context("Update task panicked")??;
            if let Some(stats) = stats {
                println!(
                    "visited {}, inserted {}, updated {}, skipped {}",
                    stats.visited, stats.inserted, stats.updated, stats.skipped
                );
            }
        }
        Commands::Search { text } => {
            let root = config.root_dir()?;
            let ids = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
                let (index, _) = prepare_index(&config, &root, false)?;
                let snapshot = index.snapshot();
                let mut ids = snapshot
                    .search(&text)?
                    .map(|record| record.map(|r| r.id))
                    .collect::<Result<Vec<_>, _>>()?;
                ids.sort();
                Ok(ids)
            })
            .await
            .context("Search task panicked")??;

            info!("{} matches", ids.len());
            for id in ids {
                println!("{}", id);
            }
        }
    }

    Ok(())
}
