//! HTTP feed fetcher — downloads a feed document and maps it into the
//! domain channel.
//!
//! Mapping from the parsed RSS form is a standalone pure function so the
//! whole shape, including guid fallback, is covered by offline tests on
//! inline XML fixtures.

use std::io::BufReader;
use std::time::Duration;

use wobsync_core::types::{Channel, ChannelItem};
use wobsync_core::{FeedFetcher, FetchError};

/// Idle time before a feed download is abandoned.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking feed fetcher over HTTP(S).
pub struct HttpFeedFetcher {
    agent: ureq::Agent,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        HttpFeedFetcher { agent }
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch_channel(&self, url: &str) -> Result<Channel, FetchError> {
        tracing::debug!(url, "fetching feed");
        let response = self.agent.get(url).call().map_err(|e| FetchError::Request {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let reader = BufReader::new(response.into_reader());
        let channel = rss::Channel::read_from(reader).map_err(|e| FetchError::Parse {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(channel_from_rss(channel))
    }
}

/// Map a parsed RSS channel into the domain form.
pub fn channel_from_rss(channel: rss::Channel) -> Channel {
    let items = channel.items.into_iter().map(item_from_rss).collect();
    Channel {
        title: channel.title,
        description: channel.description,
        link: channel.link,
        items,
    }
}

/// Items without a `<guid>` (or with an empty one) fall back to their link
/// for identity; feeds in the wild omit one or the other.
fn item_from_rss(item: rss::Item) -> ChannelItem {
    let link = item.link.unwrap_or_default();
    let guid = item
        .guid
        .map(|g| g.value)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| link.clone());
    ChannelItem {
        guid,
        title: item.title.unwrap_or_default(),
        link,
        pub_date: item.pub_date,
        description: item.description,
        content: item.content,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
