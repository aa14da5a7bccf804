//! Trait contracts between the sync engine and the outside world.
//!
//! The engine never talks HTTP or parses XML; it sees exactly these two
//! seams. Production implementations live in wobsync-client, tests use
//! hand-rolled recording fakes.

use crate::error::{ApiError, FetchError};
use crate::types::{Channel, PostId, Topic, TopicId};

/// Remote messaging-service operations the synchronizer needs.
///
/// Authentication is not part of the contract: a client hands out an already
/// usable session, and the CLI brackets the whole run with login/logout.
pub trait WobbleApi {
    /// Fetch a topic and all its posts.
    fn get_topic(&self, topic_id: &TopicId) -> Result<Topic, ApiError>;

    /// Create a topic under the given id. The service seeds it with a root
    /// post (id "1"); no content travels with this call.
    fn create_topic(&self, topic_id: &TopicId) -> Result<(), ApiError>;

    /// Create an empty post under `parent_id`. Content is written by a
    /// follow-up [`WobbleApi::edit_post`] at revision 1.
    fn create_post(
        &self,
        topic_id: &TopicId,
        post_id: &PostId,
        parent_id: &PostId,
        intended_post: bool,
    ) -> Result<(), ApiError>;

    /// Replace a post's content. `revision` must match the stored revision.
    fn edit_post(
        &self,
        topic_id: &TopicId,
        post_id: &PostId,
        content: &str,
        revision: u32,
    ) -> Result<(), ApiError>;

    /// Soft-delete a post.
    fn delete_post(&self, topic_id: &TopicId, post_id: &PostId) -> Result<(), ApiError>;

    /// Flip a post's read marker for the current user.
    fn change_post_read(
        &self,
        topic_id: &TopicId,
        post_id: &PostId,
        read: bool,
    ) -> Result<(), ApiError>;
}

/// Feed retrieval seam.
pub trait FeedFetcher {
    /// Download and parse the feed at `url`.
    fn fetch_channel(&self, url: &str) -> Result<Channel, FetchError>;
}
