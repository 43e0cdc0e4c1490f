use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use super::browse::BrowseCommand;
use boardlist::config::Config;
use boardlist::session::AppSession;
use boardlist::source::PageSource;

/// boardlist - browse a bulletin board's post list from the terminal
#[derive(Parser)]
#[command(
    name = "boardlist",
    version,
    about = "Browse a bulletin board's post list from the terminal",
    long_about = r#"boardlist pages through a board's posts with keyset pagination,
caching every page it has seen and revealing rows as you ask for more.

Examples:
  boardlist browse                          # Browse with the configured page size
  boardlist browse --page-size 20           # Start with 20 posts per page
  boardlist --base-url http://board:8080 count"#
)]
pub struct Cli {
    /// Configuration file to use instead of the default search path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the board API
    #[arg(short = 'u', long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through the post list interactively
    Browse(BrowseCommand),

    /// Print the total number of posts
    Count,

    /// Print the effective configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let mut config = Config::init(self.config.as_deref()).await?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        debug!("Configuration initialized");

        match self.command {
            Commands::Browse(browse) => {
                let session = AppSession::start(config)?;
                let result = browse.execute(&session).await;
                session.shutdown();
                result
            }
            Commands::Count => {
                let session = AppSession::start(config)?;
                let total = session
                    .source()
                    .count()
                    .await
                    .context("Failed to fetch post count")?;
                println!("{}", total);
                session.shutdown();
                Ok(())
            }
            Commands::Config => {
                info!("Showing effective configuration");
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        }
    }
}
