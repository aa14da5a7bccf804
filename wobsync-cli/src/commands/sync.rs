//! `wobsync sync` — fetch every configured feed and converge its topic.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wobsync_client::{HttpFeedFetcher, WobbleClient};
use wobsync_core::config;
use wobsync_engine::{
    FeedSyncReport, FixedDelayPacer, OpKind, OpOutcome, SyncError, Syncer,
};
use wobsync_renderer::Renderer;

/// Arguments for `wobsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    pub config: PathBuf,

    /// Compute and report every operation without writing to the service.
    #[arg(long)]
    pub dry_run: bool,

    /// Milliseconds to pause before each write batch.
    #[arg(long, default_value_t = 1000)]
    pub pace_ms: u64,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = config::load(&self.config).with_context(|| {
            format!(
                "failed to load configuration from '{}'",
                self.config.display()
            )
        })?;

        if config.feeds.is_empty() {
            println!("No feeds configured in '{}'.", self.config.display());
            return Ok(());
        }

        let mut client = WobbleClient::new(&config.wobble.endpoint);
        client
            .login(&config.wobble.username, &config.wobble.password)
            .context("login to wobble service failed")?;

        let fetcher = HttpFeedFetcher::default();
        let renderer = Renderer::new().context("template engine init failed")?;
        let pacer = FixedDelayPacer::new(Duration::from_millis(self.pace_ms));
        let syncer = Syncer::new(
            &client,
            &fetcher,
            &renderer,
            &pacer,
            config.wobble.username.as_str(),
            self.dry_run,
        );

        let results = syncer.sync_all(&config);

        if let Err(err) = client.logout() {
            tracing::warn!(error = %err, "logout failed");
        }

        print_results(&results, self.dry_run);
        // Per-feed failures are recorded above but do not fail the process;
        // the next scheduled run recomputes the delta and catches up.
        Ok(())
    }
}

fn print_results(results: &[(String, Result<FeedSyncReport, SyncError>)], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for (feed, result) in results {
        match result {
            Ok(report) => print_feed_report(prefix, feed, report, dry_run),
            Err(err) => println!("{prefix}{} '{feed}' failed: {err}", "✗".red()),
        }
    }

    let failed_feeds = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed_feeds > 0 {
        println!("{failed_feeds} of {} feed(s) failed.", results.len());
    }
}

fn print_feed_report(prefix: &str, feed: &str, report: &FeedSyncReport, dry_run: bool) {
    if report.ops.is_empty() && !report.topic_created {
        println!("{prefix}{} '{feed}' — nothing to do", "✓".green());
        return;
    }

    let created_ids: HashSet<_> = report
        .ops
        .iter()
        .filter(|op| op.kind == OpKind::Create)
        .map(|op| &op.post_id)
        .collect();
    let new = created_ids.len();
    let updated = report
        .ops
        .iter()
        .filter(|op| {
            matches!(op.kind, OpKind::Edit | OpKind::EditRoot)
                && !created_ids.contains(&op.post_id)
        })
        .count();
    let deleted = report
        .ops
        .iter()
        .filter(|op| op.kind == OpKind::Delete)
        .count();

    let glyph = if report.is_clean() {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!(
        "{prefix}{glyph} '{feed}' synced ({new} new, {updated} updated, {deleted} deleted, {} failed)",
        report.failed()
    );

    if report.topic_created {
        let verb = if dry_run { "would create" } else { "created" };
        println!("  +  {verb} topic {}", report.topic_id);
    }
    for op in &report.ops {
        if let OpOutcome::Failed(reason) = &op.outcome {
            println!("  ✗  {} {}: {reason}", op.kind, op.post_id);
        }
    }
}
