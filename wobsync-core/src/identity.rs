//! Stable identifier derivation.
//!
//! Topic and post ids are SHA-256 digests over their semantic keys, so the
//! same (user, feed) or (channel, item) pair maps to the same remote object
//! on every run. Not a security boundary; collision resistance just keeps
//! unrelated items from sharing a post.

use sha2::{Digest, Sha256};

use crate::types::{PostId, TopicId};

/// Digest the given parts joined with a `:` delimiter, as lowercase hex.
///
/// The delimiter sits only between parts, never leading or trailing, so
/// `["ab", "c"]` and `["a", "bc"]` digest differently.
pub fn digest(parts: &[&str]) -> String {
    let joined = parts.join(":");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

impl TopicId {
    /// Derive the topic id owned by `username` for the feed at `feed_url`.
    pub fn derive(feed_url: &str, username: &str) -> Self {
        Self(digest(&[feed_url, username]))
    }
}

impl PostId {
    /// Derive the post id for the item with `guid` in the channel at
    /// `channel_link`.
    pub fn for_item(channel_link: &str, guid: &str) -> Self {
        Self(digest(&[channel_link, guid]))
    }
}
