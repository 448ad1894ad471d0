//! Image Explorer - command-line front end for the explorer core.
//!
//! Loads the image metadata catalog from Azure Table Storage, filters it by
//! category and writes gallery pages of images from Blob Storage to disk.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use explorer_core::config::GalleryConfig;
use explorer_core::{ExplorerApi, ExplorerConfig, StaticCredential};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "image-explorer")]
#[command(about = "Browse image metadata and images stored in Azure")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Storage account name (overrides EXPLORER_STORAGE_ACCOUNT)
    #[arg(long, global = true)]
    account: Option<String>,

    /// Metadata table name (overrides EXPLORER_TABLE_NAME)
    #[arg(long, global = true)]
    table: Option<String>,

    /// Blob container name (overrides EXPLORER_CONTAINER_NAME)
    #[arg(long, global = true)]
    container: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the distinct image categories
    Categories,

    /// Print the records in the selected categories
    List {
        /// Category to include (repeatable; all categories when omitted)
        #[arg(short, long = "category")]
        categories: Vec<String>,
    },

    /// Download one page of images
    Gallery {
        /// Directory the images are written to
        #[arg(short, long)]
        out: PathBuf,

        /// Category to include (repeatable; all categories when omitted)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Images per page
        #[arg(long, default_value_t = GalleryConfig::DEFAULT_PAGE_SIZE as u32, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: u32,

        /// Images fetched at the same time
        #[arg(long, default_value_t = GalleryConfig::DEFAULT_CONCURRENCY as u32, value_parser = clap::value_parser!(u32).range(1..))]
        concurrency: u32,
    },
}

impl Args {
    /// Environment config with command-line overrides applied.
    fn explorer_config(&self) -> Result<ExplorerConfig> {
        let mut config = ExplorerConfig::from_env()?;
        if let Some(account) = &self.account {
            config.account_name = account.clone();
        }
        if let Some(table) = &self.table {
            config.table_name = table.clone();
        }
        if let Some(container) = &self.container {
            config.container_name = container.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging; RUST_LOG takes precedence over --debug
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = args.explorer_config()?;
    info!(
        "Using table {} and container {} on account {}",
        config.table_name, config.container_name, config.account_name
    );

    let api = ExplorerApi::builder()
        .config(config)
        .credential(Arc::new(StaticCredential::from_env()))
        .build()?;

    let mut stdout = std::io::stdout();
    match args.command {
        Command::Categories => commands::categories(&api, &mut stdout).await?,
        Command::List { categories } => commands::list(&api, &categories, &mut stdout).await?,
        Command::Gallery {
            out,
            categories,
            page,
            page_size,
            concurrency,
        } => {
            let options = commands::GalleryOptions {
                out_dir: out,
                categories,
                page: page as usize,
                page_size: page_size as usize,
                concurrency: concurrency as usize,
            };
            commands::gallery(&api, &options, &mut stdout).await?;
        }
    }

    Ok(())
}
