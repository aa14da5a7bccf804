//! `wobsync feeds` — list configured feeds without touching the network.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use wobsync_core::config;
use wobsync_core::types::TopicId;
use wobsync_renderer::shorten;

/// Arguments for `wobsync feeds`.
#[derive(Args, Debug)]
pub struct FeedsArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    pub config: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FeedsReportJson {
    summary: FeedsSummaryJson,
    feeds: Vec<FeedRowJson>,
}

#[derive(Serialize)]
struct FeedsSummaryJson {
    feeds: usize,
}

#[derive(Serialize)]
struct FeedRowJson {
    name: Option<String>,
    url: String,
    max_items: Option<usize>,
    topic_id: String,
}

#[derive(Tabled)]
struct FeedTableRow {
    #[tabled(rename = "feed")]
    feed: String,
    #[tabled(rename = "url")]
    url: String,
    #[tabled(rename = "item cap")]
    item_cap: String,
    #[tabled(rename = "topic id")]
    topic_id: String,
}

impl FeedsArgs {
    pub fn run(self) -> Result<()> {
        let config = config::load(&self.config).with_context(|| {
            format!(
                "failed to load configuration from '{}'",
                self.config.display()
            )
        })?;
        let username = &config.wobble.username;

        if self.json {
            let payload = FeedsReportJson {
                summary: FeedsSummaryJson {
                    feeds: config.feeds.len(),
                },
                feeds: config
                    .feeds
                    .iter()
                    .map(|feed| FeedRowJson {
                        name: feed.name.clone(),
                        url: feed.url.clone(),
                        max_items: feed.max_items,
                        topic_id: TopicId::derive(&feed.url, username).to_string(),
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize feeds JSON")?
            );
            return Ok(());
        }

        println!(
            "wobsync v{} | {} feed(s) | endpoint {}",
            env!("CARGO_PKG_VERSION"),
            config.feeds.len(),
            config.wobble.endpoint,
        );
        if config.feeds.is_empty() {
            println!("No feeds configured.");
            return Ok(());
        }

        let rows: Vec<FeedTableRow> = config
            .feeds
            .iter()
            .map(|feed| FeedTableRow {
                feed: feed.display_name().to_owned(),
                url: feed.url.clone(),
                item_cap: feed
                    .max_items
                    .map_or_else(|| "all".to_string(), |cap| cap.to_string()),
                topic_id: shorten(&TopicId::derive(&feed.url, username).to_string(), 12),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
