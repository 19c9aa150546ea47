//! blogsync CLI
//!
//! Command-line blog reader over the local-first data layer.
//!
//! # Commands
//!
//! - `posts` - Page through posts, serving cached pages first
//! - `post` - Show a cached post with its author and comments
//! - `users` - List users
//! - `comments` - List comments, optionally for one post
//! - `refresh` - Refetch every collection from the remote API

mod commands;
mod renderer;

use blogsync_engine::{BlogRepository, EngineConfig, LocalStores, SyncPolicy, WriteBackFeed};
use blogsync_model::EntityId;
use blogsync_remote::{HttpRemoteSource, RemoteConfig, RetryConfig, DEFAULT_BASE_URL};
use clap::{Parser, Subcommand};
use commands::OutputFormat;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Local-first blog reader.
#[derive(Parser)]
#[command(name = "blogsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the blog API
    #[arg(global = true, long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory holding the local cache
    #[arg(global = true, short, long, default_value = "blogsync-data")]
    data_dir: PathBuf,

    /// Posts per page
    #[arg(global = true, long, default_value_t = blogsync_engine::DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Request timeout in seconds
    #[arg(global = true, long, default_value_t = 30)]
    timeout_secs: u64,

    /// Attempts per request for transient failures
    #[arg(global = true, long, default_value_t = 3)]
    retries: u32,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through posts
    Posts {
        /// Number of pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Open a post from the loaded pages
        #[arg(short, long)]
        open: Option<u32>,
    },

    /// Show a cached post with its author and comments
    Post {
        /// Post id
        id: u32,
    },

    /// List users
    Users,

    /// List comments
    Comments {
        /// Only comments on this post
        #[arg(short, long)]
        post: Option<u32>,
    },

    /// Refetch every collection from the remote API
    Refresh,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("blogsync CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("blogsync engine v{}", blogsync_engine::VERSION);
        return Ok(());
    }

    let remote_config = RemoteConfig::new(cli.base_url.as_str())
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_retry(RetryConfig::new(cli.retries));
    let engine_config = EngineConfig::new().with_page_size(cli.page_size);

    let remote = HttpRemoteSource::from_config(&remote_config)?;
    let stores = LocalStores::open_json(&cli.data_dir)?;
    let feed = Arc::new(WriteBackFeed::with_max_history(
        engine_config.write_back_history,
    ));
    let policy = SyncPolicy::with_feed(Arc::clone(&feed));
    let repo = Arc::new(BlogRepository::new(remote, stores, policy));
    tracing::debug!(
        base_url = %repo.remote().base_url(),
        data_dir = %cli.data_dir.display(),
        "repository ready"
    );

    let mut out = io::stdout().lock();
    let result = match cli.command {
        Commands::Posts { pages, open } => {
            commands::posts::run(
                Arc::clone(&repo),
                &engine_config,
                pages,
                open.map(EntityId::new),
                cli.format,
                &mut out,
            )
            .await
        }
        Commands::Post { id } => {
            commands::post::run(&repo, EntityId::new(id), cli.format, &mut out).await
        }
        Commands::Users => commands::list::users(&repo, cli.format, &mut out).await,
        Commands::Comments { post } => {
            commands::list::comments(&repo, post.map(EntityId::new), cli.format, &mut out).await
        }
        Commands::Refresh => {
            commands::refresh::run(&repo, engine_config.page_size, cli.format, &mut out).await
        }
        Commands::Version => Ok(()),
    };

    repo.policy().flush().await;
    let failures = feed.failures();
    if !failures.is_empty() {
        tracing::warn!(
            failures = failures.len(),
            "some records could not be cached"
        );
    }

    result?;
    Ok(())
}
