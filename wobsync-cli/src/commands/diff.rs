//! `wobsync diff` — show unified diffs of pending changes, writing nothing.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use wobsync_client::{HttpFeedFetcher, WobbleClient};
use wobsync_core::config;
use wobsync_engine::{diff_feed, FeedDiff};
use wobsync_renderer::Renderer;

/// Arguments for `wobsync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    pub config: PathBuf,

    /// Only diff the configured feed with this URL.
    #[arg(long)]
    pub feed: Option<String>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let config = config::load(&self.config).with_context(|| {
            format!(
                "failed to load configuration from '{}'",
                self.config.display()
            )
        })?;

        let mut feeds = config.feeds.clone();
        if let Some(url) = &self.feed {
            feeds.retain(|f| &f.url == url);
            if feeds.is_empty() {
                bail!("no configured feed with url '{url}'");
            }
        }

        let mut client = WobbleClient::new(&config.wobble.endpoint);
        client
            .login(&config.wobble.username, &config.wobble.password)
            .context("login to wobble service failed")?;

        let fetcher = HttpFeedFetcher::default();
        let renderer = Renderer::new().context("template engine init failed")?;

        for feed in &feeds {
            match diff_feed(&client, &fetcher, &renderer, &config.wobble.username, feed) {
                Ok(diff) => print_feed_diff(&diff),
                Err(err) => println!("{} '{}' failed: {err}", "✗".red(), feed.display_name()),
            }
        }

        if let Err(err) = client.logout() {
            tracing::warn!(error = %err, "logout failed");
        }
        Ok(())
    }
}

fn print_feed_diff(diff: &FeedDiff) {
    if diff.is_empty() {
        println!("No differences for '{}'.", diff.feed);
        return;
    }

    println!("{}", format!("'{}' (topic {})", diff.feed, diff.topic_id).bold());
    if diff.topic_missing {
        println!("topic does not exist yet; sync would create it");
    }
    for entry in &diff.entries {
        println!("{} post {}", entry.kind, entry.post_id);
        print!("{}", entry.unified_diff);
        if !entry.unified_diff.ends_with('\n') {
            println!();
        }
    }
}
