//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod crawl;
mod exclude;
mod helpers;
mod init;
mod logs;
mod sources;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings, LoadOptions};
use crate::models::SourceTag;
use crate::repository::DEFAULT_LOG_LIMIT;

/// User whose exclusions apply when `--user` is not given.
const DEFAULT_USER_ID: i64 = 1;

#[derive(Parser)]
#[command(name = "gonggo")]
#[command(about = "Funding announcement aggregation pipeline")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "GONGGO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// List the built-in agency sources
    Sources,

    /// Run the pipeline once over the selected sources
    Crawl {
        /// Sources to include: bizinfo, agency, g2b (repeatable, default: all)
        #[arg(short, long = "source", value_parser = parse_source_tag)]
        sources: Vec<SourceTag>,
        /// User whose exclusion list applies
        #[arg(short, long, default_value_t = DEFAULT_USER_ID)]
        user: i64,
    },

    /// Manage a user's "not interested" list
    Exclude {
        /// User the exclusions belong to
        #[arg(short, long, global = true, default_value_t = DEFAULT_USER_ID)]
        user: i64,

        #[command(subcommand)]
        command: ExcludeCommands,
    },

    /// Show recent crawl log entries
    Logs {
        /// Number of entries to show
        #[arg(short, long, default_value_t = DEFAULT_LOG_LIMIT)]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum ExcludeCommands {
    /// Exclude a notice URL
    Add {
        url: String,
        /// Why the notice is not interesting
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// List exclusions, newest first
    List,
    /// Remove an exclusion by id
    Remove { id: i64 },
    /// Remove an exclusion by URL
    RemoveUrl { url: String },
}

fn parse_source_tag(s: &str) -> Result<SourceTag, String> {
    SourceTag::from_str(s).ok_or_else(|| {
        let valid: Vec<&str> = SourceTag::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown source '{}' (expected one of: {})", s, valid.join(", "))
    })
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let (settings, _config) = load_settings(options).await?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Sources => sources::cmd_sources(&settings).await,
        Commands::Crawl { sources, user } => crawl::cmd_crawl(&settings, &sources, user).await,
        Commands::Exclude { user, command } => match command {
            ExcludeCommands::Add { url, reason } => {
                exclude::cmd_exclude_add(&settings, user, &url, reason.as_deref()).await
            }
            ExcludeCommands::List => exclude::cmd_exclude_list(&settings, user).await,
            ExcludeCommands::Remove { id } => {
                exclude::cmd_exclude_remove(&settings, user, id).await
            }
            ExcludeCommands::RemoveUrl { url } => {
                exclude::cmd_exclude_remove_url(&settings, user, &url).await
            }
        },
        Commands::Logs { limit } => logs::cmd_logs(&settings, limit).await,
    }
}
