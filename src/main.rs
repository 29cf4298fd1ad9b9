//! Order scheduling calendar MCP server - main entry point
//!
//! The server itself lives in the `ordercal_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use ordercal_mcp::{DEFAULT_MAX_WALK_DAYS, OrderCalendarHandler, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Order scheduling calendar with holiday-aware working-day planning, over Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the schedule data file (TOML)
    file: PathBuf,

    /// Commit every save to the enclosing git repository and push it
    #[arg(long, env = "ORDERCAL_SYNC_GIT")]
    sync_git: bool,

    /// Maximum calendar days a working-day walk may visit
    #[arg(long, env = "ORDERCAL_MAX_WALK_DAYS", default_value_t = DEFAULT_MAX_WALK_DAYS)]
    max_walk_days: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();

    // stdout carries the MCP channel, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ordercal_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServerConfig::new(args.file)
        .with_sync_git(args.sync_git)
        .with_max_walk_days(args.max_walk_days);
    config.validate()?;

    tracing::info!(
        "Starting ordercal-mcp on {} (sync_git={}, max_walk_days={})",
        config.storage_path.display(),
        config.sync_git,
        config.max_walk_days
    );
    let handler = OrderCalendarHandler::new(config)?;
    serve_stdio(handler).await?;
    Ok(())
}
