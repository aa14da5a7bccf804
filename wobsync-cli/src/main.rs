//! wobsync — mirror RSS feeds into Wobble forum topics.
//!
//! # Usage
//!
//! ```text
//! wobsync sync  [-c config.json] [--dry-run] [--pace-ms <millis>]
//! wobsync diff  [-c config.json] [--feed <url>]
//! wobsync feeds [-c config.json] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, feeds::FeedsArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "wobsync",
    version,
    about = "Mirror RSS feeds into topics of a Wobble forum",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch every configured feed and converge its topic.
    Sync(SyncArgs),

    /// Show unified diffs of what sync would change, writing nothing.
    Diff(DiffArgs),

    /// List configured feeds and their derived topic ids.
    Feeds(FeedsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Feeds(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
