//! Read-only unified diff support for `wobsync diff`.

use similar::TextDiff;

use wobsync_core::types::{FeedSource, PostId, Topic, TopicId};
use wobsync_core::{ApiError, FeedFetcher, WobbleApi};
use wobsync_renderer::Renderer;

use crate::error::SyncError;
use crate::plan::{desired_state, reconcile, SyncPlan};
use crate::syncer::{cap_items, OpKind};

/// A single pending change rendered as a unified diff. Creations diff from
/// empty, deletions to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDiff {
    pub post_id: PostId,
    pub kind: OpKind,
    pub unified_diff: String,
}

/// Diff result for one feed's topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDiff {
    pub feed: String,
    pub topic_id: TopicId,
    /// The topic has never been created; every entry is a creation.
    pub topic_missing: bool,
    pub entries: Vec<PostDiff>,
}

impl FeedDiff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute what a sync pass would change for `feed` and render each pending
/// operation as a unified diff.
///
/// Nothing is written: a missing topic is diffed against a synthetic empty
/// one instead of being created.
pub fn diff_feed(
    api: &dyn WobbleApi,
    fetcher: &dyn FeedFetcher,
    renderer: &Renderer,
    username: &str,
    feed: &FeedSource,
) -> Result<FeedDiff, SyncError> {
    let topic_id = TopicId::derive(&feed.url, username);
    let (topic, topic_missing) = match api.get_topic(&topic_id) {
        Ok(topic) => (topic, false),
        Err(ApiError::NotFound) => (Topic::empty(topic_id.clone()), true),
        Err(source) => return Err(SyncError::TopicResolution { topic_id, source }),
    };

    let mut channel = fetcher.fetch_channel(&feed.url)?;
    cap_items(&mut channel, feed.max_items);

    let desired = desired_state(feed, &channel, renderer)?;
    let plan = reconcile(&topic, &desired);

    Ok(FeedDiff {
        feed: feed.display_name().to_owned(),
        topic_id,
        topic_missing,
        entries: diff_plan(&topic, &plan),
    })
}

/// Render every operation in `plan` as a unified diff against the stored
/// content in `topic`. Pure presentation; plan order is preserved.
pub fn diff_plan(topic: &Topic, plan: &SyncPlan) -> Vec<PostDiff> {
    let mut entries = Vec::with_capacity(plan.len());

    if let Some(edit) = &plan.root_edit {
        entries.push(PostDiff {
            post_id: edit.post_id.clone(),
            kind: OpKind::EditRoot,
            unified_diff: unified(&edit.post_id, &stored_content(topic, &edit.post_id), &edit.content),
        });
    }
    for post_id in &plan.deletions {
        entries.push(PostDiff {
            post_id: post_id.clone(),
            kind: OpKind::Delete,
            unified_diff: unified(post_id, &stored_content(topic, post_id), ""),
        });
    }
    for post in &plan.creations {
        entries.push(PostDiff {
            post_id: post.id.clone(),
            kind: OpKind::Create,
            unified_diff: unified(&post.id, "", &post.content),
        });
    }
    for edit in &plan.edits {
        entries.push(PostDiff {
            post_id: edit.post_id.clone(),
            kind: OpKind::Edit,
            unified_diff: unified(&edit.post_id, &stored_content(topic, &edit.post_id), &edit.content),
        });
    }
    entries
}

fn stored_content(topic: &Topic, post_id: &PostId) -> String {
    topic
        .post(post_id)
        .and_then(|p| p.content.clone())
        .unwrap_or_default()
}

fn unified(post_id: &PostId, stored: &str, composed: &str) -> String {
    let old_header = format!("a/post/{post_id}");
    let new_header = format!("b/post/{post_id}");
    TextDiff::from_lines(stored, composed)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}
