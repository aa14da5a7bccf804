//! Reconciliation planning — a pure diff of remote topic posts against
//! composed feed state.
//!
//! Planning is split in two so the comparison itself cannot fail:
//! [`desired_state`] renders all content up front, then [`reconcile`] is a
//! pure function from (topic, desired) to a [`SyncPlan`].

use std::collections::{HashMap, HashSet};

use wobsync_core::types::{Channel, FeedSource, Post, PostId, Topic};
use wobsync_renderer::{RenderError, Renderer};

// ---------------------------------------------------------------------------
// Desired state
// ---------------------------------------------------------------------------

/// Composed target state for one feed: the root body plus one desired post
/// per feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub root_content: String,
    pub posts: Vec<DesiredPost>,
}

/// One item post as it should exist remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredPost {
    pub id: PostId,
    pub guid: String,
    pub content: String,
}

/// Compose the desired state for `feed`'s fetched `channel`.
///
/// Post identity is a pure function of (channel link, item guid). A
/// malformed feed repeating that pair keeps its first occurrence in feed
/// order; later duplicates are dropped, so apply order stays deterministic.
pub fn desired_state(
    feed: &FeedSource,
    channel: &Channel,
    renderer: &Renderer,
) -> Result<DesiredState, RenderError> {
    let root_content = renderer.render_root(feed, channel)?;

    let mut seen = HashSet::new();
    let mut posts = Vec::with_capacity(channel.items.len());
    for item in &channel.items {
        let id = PostId::for_item(&channel.link, &item.guid);
        if !seen.insert(id.clone()) {
            tracing::warn!("duplicate item identity for guid {}; keeping first", item.guid);
            continue;
        }
        posts.push(DesiredPost {
            id,
            guid: item.guid.clone(),
            content: renderer.render_post(item)?,
        });
    }

    Ok(DesiredState { root_content, posts })
}

// ---------------------------------------------------------------------------
// Sync plan
// ---------------------------------------------------------------------------

/// A content change to an existing post, carrying its stored revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEdit {
    pub post_id: PostId,
    pub content: String,
    pub revision: u32,
}

/// The operations needed to converge a topic on the desired state.
///
/// Application order is root edit, deletions, creations, edits. Deletions
/// come out in topic post order, creations and edits in feed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub root_edit: Option<ContentEdit>,
    pub deletions: Vec<PostId>,
    pub creations: Vec<DesiredPost>,
    pub edits: Vec<ContentEdit>,
}

impl SyncPlan {
    /// True when the topic already matches the desired state.
    pub fn is_empty(&self) -> bool {
        self.root_edit.is_none()
            && self.deletions.is_empty()
            && self.creations.is_empty()
            && self.edits.is_empty()
    }

    /// Number of planned operation groups.
    pub fn len(&self) -> usize {
        usize::from(self.root_edit.is_some())
            + self.deletions.len()
            + self.creations.len()
            + self.edits.len()
    }
}

/// Diff `topic` against `desired`. Pure computation: no I/O, cannot fail.
///
/// - The root post is refreshed only once the service has stored a body for
///   it, and never deleted.
/// - A post whose item vanished from the feed is deleted only if it is
///   neither still unread nor already deleted.
/// - A matched post with no stored body is left to the creation path's
///   follow-up edit; it is never edited from here.
pub fn reconcile(topic: &Topic, desired: &DesiredState) -> SyncPlan {
    let desired_ids: HashSet<&PostId> = desired.posts.iter().map(|p| &p.id).collect();
    let existing: HashMap<&PostId, &Post> = topic.posts.iter().map(|p| (&p.id, p)).collect();

    let root_edit = topic.root_post().and_then(|root| match &root.content {
        Some(stored) if stored != &desired.root_content => Some(ContentEdit {
            post_id: root.id.clone(),
            content: desired.root_content.clone(),
            revision: root.revision,
        }),
        _ => None,
    });

    let deletions = topic
        .posts
        .iter()
        .filter(|p| !p.id.is_root() && !p.deleted && !p.unread)
        .filter(|p| !desired_ids.contains(&p.id))
        .map(|p| p.id.clone())
        .collect();

    let mut creations = Vec::new();
    let mut edits = Vec::new();
    for want in &desired.posts {
        match existing.get(&want.id) {
            None => creations.push(want.clone()),
            Some(have) => {
                if let Some(stored) = &have.content {
                    if stored != &want.content {
                        edits.push(ContentEdit {
                            post_id: want.id.clone(),
                            content: want.content.clone(),
                            revision: have.revision,
                        });
                    }
                }
            }
        }
    }

    SyncPlan {
        root_edit,
        deletions,
        creations,
        edits,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
