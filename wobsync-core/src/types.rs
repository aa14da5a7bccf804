//! Domain types for feed-to-topic synchronization.
//!
//! Remote state (topics, posts) and feed state (channels, items) are kept as
//! plain data; all behavior that compares or mutates them lives in the engine
//! crate. Configuration types are serializable via serde + serde_json.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved identifier of the root/info post of every topic.
pub const ROOT_POST_ID: &str = "1";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a remote topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(pub String);

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TopicId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TopicId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a post within a topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    /// The reserved root post id.
    pub fn root() -> Self {
        Self(ROOT_POST_ID.to_owned())
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_POST_ID
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Remote state
// ---------------------------------------------------------------------------

/// A single post inside a topic, as the remote service reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    /// `None` until the service has stored a body for this post.
    pub content: Option<String>,
    pub revision: u32,
    pub unread: bool,
    pub deleted: bool,
}

/// A remote topic and its posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub posts: Vec<Post>,
}

impl Topic {
    /// An empty topic with no posts, as used before the service has seeded it.
    pub fn empty(id: TopicId) -> Self {
        Self { id, posts: Vec::new() }
    }

    /// Look up a post by id.
    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    /// The root/info post, if the service reported one.
    pub fn root_post(&self) -> Option<&Post> {
        self.post(&PostId::root())
    }
}

// ---------------------------------------------------------------------------
// Feed state
// ---------------------------------------------------------------------------

/// A parsed feed channel, reduced to the fields synchronization needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Channel {
    pub title: String,
    pub description: String,
    pub link: String,
    pub items: Vec<ChannelItem>,
}

/// One feed entry.
///
/// `pub_date` stays exactly as the feed supplied it. Reformatting it would
/// change composed post bodies between runs and trigger spurious edits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelItem {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub pub_date: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One feed source entry from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Explicit display name; falls back to the channel title in post bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    /// Upper bound on feed items considered per run (first N in feed order).
    #[serde(rename = "max-items", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl FeedSource {
    /// Human-facing label: the explicit name when configured, else the URL.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// Connection and credential settings for the messaging service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WobbleConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

/// Root of the JSON configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub wobble: WobbleConfig,
    #[serde(default)]
    pub feeds: Vec<FeedSource>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
