//! Template contexts — serializable rendering payloads built from feed data.
//!
//! Escaping and link shortening happen here, not in the templates: every
//! field is final display text by the time Tera sees it.

use serde::Serialize;

use wobsync_core::types::{Channel, ChannelItem, FeedSource};

use crate::error::RenderError;
use crate::text::{escape_html, shorten};

/// Upper bound on link label length in item posts; the full URL stays in the
/// `href`.
pub const LINK_LABEL_MAX: usize = 100;

/// Rendering payload for the root/info post.
#[derive(Debug, Clone, Serialize)]
pub struct RootContext {
    /// Feed display title: the configured name when set, else the channel
    /// title as published.
    pub title: String,
    pub description: String,
    pub link: String,
}

impl RootContext {
    /// Build a [`RootContext`] for `feed`'s fetched `channel`.
    pub fn new(feed: &FeedSource, channel: &Channel) -> Self {
        let title = feed
            .name
            .clone()
            .unwrap_or_else(|| channel.title.clone());
        RootContext {
            title,
            description: channel.description.clone(),
            link: channel.link.clone(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// Rendering payload for one item post.
#[derive(Debug, Clone, Serialize)]
pub struct PostContext {
    /// Item title, HTML-escaped. Feed titles are untrusted text.
    pub title: String,
    /// Publish date exactly as the feed supplied it; empty when absent.
    pub pub_date: String,
    pub link: String,
    /// Display label for the link, capped at [`LINK_LABEL_MAX`] chars.
    pub link_label: String,
    /// Item body: full content when the feed carries one, else the
    /// description, else empty.
    pub body: String,
}

impl PostContext {
    /// Build a [`PostContext`] from a feed item.
    pub fn new(item: &ChannelItem) -> Self {
        let body = item
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(item.description.as_deref())
            .unwrap_or_default()
            .to_owned();
        PostContext {
            title: escape_html(&item.title),
            pub_date: item.pub_date.clone().unwrap_or_default(),
            link: item.link.clone(),
            link_label: shorten(&item.link, LINK_LABEL_MAX),
            body,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
