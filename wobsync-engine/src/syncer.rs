//! Sync orchestration — one full feed-to-topic pass.
//!
//! Per feed: resolve the topic (creating it when absent), fetch the channel,
//! compose the desired state, reconcile, then apply the plan through the
//! service client. Operation failures are logged and recorded but never abort
//! the feed; the next run recomputes the delta from live remote state, so a
//! skipped operation heals itself.

use std::fmt;

use wobsync_core::types::{Channel, Configuration, FeedSource, PostId, Topic, TopicId};
use wobsync_core::{ApiError, FeedFetcher, WobbleApi};
use wobsync_renderer::Renderer;

use crate::error::SyncError;
use crate::pacer::Pacer;
use crate::plan::{desired_state, reconcile, ContentEdit, DesiredPost, SyncPlan};

// ---------------------------------------------------------------------------
// Operation reports
// ---------------------------------------------------------------------------

/// Kind of remote mutation issued while applying a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    EditRoot,
    Delete,
    Create,
    Edit,
    MarkUnread,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OpKind::EditRoot => "edit root",
            OpKind::Delete => "delete",
            OpKind::Create => "create",
            OpKind::Edit => "edit",
            OpKind::MarkUnread => "mark unread",
        };
        f.write_str(label)
    }
}

/// How one operation went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    Applied,
    /// Recorded instead of `Applied` on dry runs; nothing was sent.
    WouldApply,
    Failed(String),
}

/// One applied (or attempted, or dry-run) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpReport {
    pub kind: OpKind,
    pub post_id: PostId,
    pub outcome: OpOutcome,
}

/// Outcome of one feed's sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSyncReport {
    pub feed: String,
    pub topic_id: TopicId,
    pub topic_created: bool,
    pub ops: Vec<OpReport>,
}

impl FeedSyncReport {
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, OpOutcome::Applied))
    }

    pub fn would_apply(&self) -> usize {
        self.count(|o| matches!(o, OpOutcome::WouldApply))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, OpOutcome::Failed(_)))
    }

    /// True when nothing went wrong (including the trivial empty pass).
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&OpOutcome) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(&op.outcome)).count()
    }
}

fn report(kind: OpKind, post_id: &PostId, outcome: OpOutcome) -> OpReport {
    OpReport {
        kind,
        post_id: post_id.clone(),
        outcome,
    }
}

// ---------------------------------------------------------------------------
// Syncer
// ---------------------------------------------------------------------------

/// Drives sync passes over an already-authenticated client.
///
/// Holds its collaborators by reference; one `Syncer` serves a whole run.
pub struct Syncer<'a> {
    api: &'a dyn WobbleApi,
    fetcher: &'a dyn FeedFetcher,
    renderer: &'a Renderer,
    pacer: &'a dyn Pacer,
    username: String,
    dry_run: bool,
}

impl<'a> Syncer<'a> {
    pub fn new(
        api: &'a dyn WobbleApi,
        fetcher: &'a dyn FeedFetcher,
        renderer: &'a Renderer,
        pacer: &'a dyn Pacer,
        username: impl Into<String>,
        dry_run: bool,
    ) -> Self {
        Syncer {
            api,
            fetcher,
            renderer,
            pacer,
            username: username.into(),
            dry_run,
        }
    }

    /// Sync every configured feed in order. A failed feed never stops the
    /// ones after it; each feed gets its own result.
    pub fn sync_all(&self, config: &Configuration) -> Vec<(String, Result<FeedSyncReport, SyncError>)> {
        config
            .feeds
            .iter()
            .map(|feed| {
                tracing::info!("syncing feed {}...", feed.display_name());
                (feed.display_name().to_owned(), self.sync_feed(feed))
            })
            .collect()
    }

    /// One feed-to-topic pass: resolve, fetch, reconcile, apply.
    pub fn sync_feed(&self, feed: &FeedSource) -> Result<FeedSyncReport, SyncError> {
        let topic_id = TopicId::derive(&feed.url, &self.username);
        let (topic, topic_created) = self.resolve_topic(&topic_id)?;

        let mut channel = self.fetcher.fetch_channel(&feed.url)?;
        cap_items(&mut channel, feed.max_items);

        let desired = desired_state(feed, &channel, self.renderer)?;
        let plan = reconcile(&topic, &desired);
        tracing::debug!(
            "feed {}: {} pending operation(s)",
            feed.display_name(),
            plan.len()
        );

        let ops = self.apply(&topic_id, &plan);
        Ok(FeedSyncReport {
            feed: feed.display_name().to_owned(),
            topic_id,
            topic_created,
            ops,
        })
    }

    /// Fetch the feed's topic, creating it first if the service has never
    /// seen it. Only a definite `NotFound` triggers creation; a transport
    /// error must not be mistaken for an absent topic.
    fn resolve_topic(&self, topic_id: &TopicId) -> Result<(Topic, bool), SyncError> {
        let resolution_err = |source| SyncError::TopicResolution {
            topic_id: topic_id.clone(),
            source,
        };

        match self.api.get_topic(topic_id) {
            Ok(topic) => Ok((topic, false)),
            Err(ApiError::NotFound) if self.dry_run => {
                tracing::info!("topic {} does not exist, would create it", topic_id);
                Ok((Topic::empty(topic_id.clone()), true))
            }
            Err(ApiError::NotFound) => {
                tracing::info!("topic {} does not exist, creating it", topic_id);
                self.api.create_topic(topic_id).map_err(resolution_err)?;
                let topic = self.api.get_topic(topic_id).map_err(resolution_err)?;
                Ok((topic, true))
            }
            Err(source) => Err(resolution_err(source)),
        }
    }

    // -- plan application ---------------------------------------------------

    fn apply(&self, topic_id: &TopicId, plan: &SyncPlan) -> Vec<OpReport> {
        let mut ops = Vec::with_capacity(plan.len());

        if let Some(edit) = &plan.root_edit {
            ops.push(self.apply_root_edit(topic_id, edit));
        }
        for post_id in &plan.deletions {
            self.pace();
            ops.push(self.apply_deletion(topic_id, post_id));
        }
        for post in &plan.creations {
            self.pace();
            self.apply_creation(topic_id, post, &mut ops);
        }
        for edit in &plan.edits {
            self.pace();
            self.apply_update(topic_id, edit, &mut ops);
        }
        ops
    }

    /// Mutation pacing. The root edit is deliberately unpaced; every other
    /// mutation group sleeps once up front. Dry runs mutate nothing and skip
    /// pacing entirely.
    fn pace(&self) {
        if !self.dry_run {
            self.pacer.pace();
        }
    }

    fn apply_root_edit(&self, topic_id: &TopicId, edit: &ContentEdit) -> OpReport {
        if self.dry_run {
            tracing::info!("would update root post of topic {}", topic_id);
            return report(OpKind::EditRoot, &edit.post_id, OpOutcome::WouldApply);
        }
        tracing::info!("updating root post of topic {}", topic_id);
        let outcome = match self
            .api
            .edit_post(topic_id, &edit.post_id, &edit.content, edit.revision)
        {
            Ok(()) => OpOutcome::Applied,
            Err(err) => {
                tracing::warn!("failed to edit root post. t: {} p: {} - {}", topic_id, edit.post_id, err);
                OpOutcome::Failed(err.to_string())
            }
        };
        report(OpKind::EditRoot, &edit.post_id, outcome)
    }

    fn apply_deletion(&self, topic_id: &TopicId, post_id: &PostId) -> OpReport {
        if self.dry_run {
            tracing::info!("would delete post {}", post_id);
            return report(OpKind::Delete, post_id, OpOutcome::WouldApply);
        }
        tracing::info!("deleting post {} for vanished item", post_id);
        let outcome = match self.api.delete_post(topic_id, post_id) {
            Ok(()) => OpOutcome::Applied,
            Err(err) => {
                tracing::warn!("failed to delete post. t: {} p: {} - {}", topic_id, post_id, err);
                OpOutcome::Failed(err.to_string())
            }
        };
        report(OpKind::Delete, post_id, outcome)
    }

    /// Create chain: create under the root post, write the first content
    /// revision, flag the post unread. A failed step skips the rest of the
    /// chain; there is nothing to edit or flag yet.
    fn apply_creation(&self, topic_id: &TopicId, post: &DesiredPost, ops: &mut Vec<OpReport>) {
        if self.dry_run {
            tracing::info!("would create post for item {}", post.guid);
            ops.push(report(OpKind::Create, &post.id, OpOutcome::WouldApply));
            ops.push(report(OpKind::Edit, &post.id, OpOutcome::WouldApply));
            ops.push(report(OpKind::MarkUnread, &post.id, OpOutcome::WouldApply));
            return;
        }

        tracing::info!("creating new post for item {}", post.guid);
        if let Err(err) = self.api.create_post(topic_id, &post.id, &PostId::root(), true) {
            tracing::warn!("failed to create post. t: {} p: {} - {}", topic_id, post.id, err);
            ops.push(report(OpKind::Create, &post.id, OpOutcome::Failed(err.to_string())));
            return;
        }
        ops.push(report(OpKind::Create, &post.id, OpOutcome::Applied));

        // A freshly created post is at revision 1.
        if let Err(err) = self.api.edit_post(topic_id, &post.id, &post.content, 1) {
            tracing::warn!("failed to edit post. t: {} p: {} - {}", topic_id, post.id, err);
            ops.push(report(OpKind::Edit, &post.id, OpOutcome::Failed(err.to_string())));
            return;
        }
        ops.push(report(OpKind::Edit, &post.id, OpOutcome::Applied));

        ops.push(self.mark_unread(topic_id, &post.id));
    }

    /// Update chain: rewrite changed content, then flag the post unread. The
    /// unread flag is flipped even after a failed edit; the next run retries
    /// the content.
    fn apply_update(&self, topic_id: &TopicId, edit: &ContentEdit, ops: &mut Vec<OpReport>) {
        if self.dry_run {
            tracing::info!("would update changed post {}", edit.post_id);
            ops.push(report(OpKind::Edit, &edit.post_id, OpOutcome::WouldApply));
            ops.push(report(OpKind::MarkUnread, &edit.post_id, OpOutcome::WouldApply));
            return;
        }

        tracing::info!("updating changed post {}", edit.post_id);
        let outcome = match self
            .api
            .edit_post(topic_id, &edit.post_id, &edit.content, edit.revision)
        {
            Ok(()) => OpOutcome::Applied,
            Err(err) => {
                tracing::warn!("failed to edit post. t: {} p: {} - {}", topic_id, edit.post_id, err);
                OpOutcome::Failed(err.to_string())
            }
        };
        ops.push(report(OpKind::Edit, &edit.post_id, outcome));

        ops.push(self.mark_unread(topic_id, &edit.post_id));
    }

    fn mark_unread(&self, topic_id: &TopicId, post_id: &PostId) -> OpReport {
        match self.api.change_post_read(topic_id, post_id, false) {
            Ok(()) => report(OpKind::MarkUnread, post_id, OpOutcome::Applied),
            Err(err) => {
                tracing::warn!("failed to mark post unread. t: {} p: {} - {}", topic_id, post_id, err);
                report(OpKind::MarkUnread, post_id, OpOutcome::Failed(err.to_string()))
            }
        }
    }
}

pub(crate) fn cap_items(channel: &mut Channel, max_items: Option<usize>) {
    if let Some(cap) = max_items {
        if channel.items.len() > cap {
            tracing::debug!("capping channel at {} of {} items", cap, channel.items.len());
            channel.items.truncate(cap);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};

    use wobsync_core::types::{ChannelItem, Post, WobbleConfig};
    use wobsync_core::FetchError;

    const USERNAME: &str = "tester";

    // -- fakes --------------------------------------------------------------

    /// In-memory service: one optional topic, a readable call trace, and
    /// per-call failure injection keyed by the trace line.
    #[derive(Default)]
    struct FakeApi {
        topic: RefCell<Option<Topic>>,
        calls: RefCell<Vec<String>>,
        failures: RefCell<HashSet<String>>,
    }

    impl FakeApi {
        fn absent() -> Self {
            FakeApi::default()
        }

        fn with_topic(topic: Topic) -> Self {
            let api = FakeApi::default();
            *api.topic.borrow_mut() = Some(topic);
            api
        }

        fn fail_on(&self, call: impl Into<String>) {
            self.failures.borrow_mut().insert(call.into());
        }

        fn record(&self, call: String) -> Result<(), ApiError> {
            let failing = self.failures.borrow().contains(&call);
            self.calls.borrow_mut().push(call);
            if failing {
                Err(ApiError::Transport("injected failure".into()))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn mutation_count(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| !c.starts_with("get_topic"))
                .count()
        }

        fn with_post<R>(&self, post_id: &PostId, f: impl FnOnce(&mut Post) -> R) -> Result<R, ApiError> {
            let mut slot = self.topic.borrow_mut();
            let topic = slot.as_mut().ok_or(ApiError::NotFound)?;
            let post = topic
                .posts
                .iter_mut()
                .find(|p| &p.id == post_id)
                .ok_or(ApiError::NotFound)?;
            Ok(f(post))
        }

        fn stored_topic(&self) -> Topic {
            self.topic.borrow().clone().expect("topic should exist")
        }
    }

    impl WobbleApi for FakeApi {
        fn get_topic(&self, topic_id: &TopicId) -> Result<Topic, ApiError> {
            self.record(format!("get_topic {topic_id}"))?;
            self.topic.borrow().clone().ok_or(ApiError::NotFound)
        }

        fn create_topic(&self, topic_id: &TopicId) -> Result<(), ApiError> {
            self.record(format!("create_topic {topic_id}"))?;
            // The service seeds every new topic with an empty-bodied root post.
            *self.topic.borrow_mut() = Some(Topic {
                id: topic_id.clone(),
                posts: vec![Post {
                    id: PostId::root(),
                    content: Some(String::new()),
                    revision: 1,
                    unread: false,
                    deleted: false,
                }],
            });
            Ok(())
        }

        fn create_post(
            &self,
            _topic_id: &TopicId,
            post_id: &PostId,
            parent_id: &PostId,
            intended_post: bool,
        ) -> Result<(), ApiError> {
            self.record(format!(
                "create_post {post_id} parent {parent_id} intended {intended_post}"
            ))?;
            let mut slot = self.topic.borrow_mut();
            let topic = slot.as_mut().ok_or(ApiError::NotFound)?;
            topic.posts.push(Post {
                id: post_id.clone(),
                content: None,
                revision: 1,
                unread: false,
                deleted: false,
            });
            Ok(())
        }

        fn edit_post(
            &self,
            _topic_id: &TopicId,
            post_id: &PostId,
            content: &str,
            revision: u32,
        ) -> Result<(), ApiError> {
            self.record(format!("edit_post {post_id} rev {revision}"))?;
            self.with_post(post_id, |p| {
                p.content = Some(content.to_owned());
                p.revision += 1;
            })
        }

        fn delete_post(&self, _topic_id: &TopicId, post_id: &PostId) -> Result<(), ApiError> {
            self.record(format!("delete_post {post_id}"))?;
            self.with_post(post_id, |p| p.deleted = true)
        }

        fn change_post_read(
            &self,
            _topic_id: &TopicId,
            post_id: &PostId,
            read: bool,
        ) -> Result<(), ApiError> {
            self.record(format!("change_post_read {post_id} read {read}"))?;
            self.with_post(post_id, |p| p.unread = !read)
        }
    }

    /// Serves canned channels by URL; unknown URLs fail like a dead host.
    #[derive(Default)]
    struct FakeFetcher {
        channels: HashMap<String, Channel>,
    }

    impl FakeFetcher {
        fn serving(url: &str, channel: Channel) -> Self {
            let mut fetcher = FakeFetcher::default();
            fetcher.channels.insert(url.to_owned(), channel);
            fetcher
        }
    }

    impl FeedFetcher for FakeFetcher {
        fn fetch_channel(&self, url: &str) -> Result<Channel, FetchError> {
            self.channels.get(url).cloned().ok_or_else(|| FetchError::Request {
                url: url.to_owned(),
                reason: "connection refused".into(),
            })
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        count: Cell<usize>,
    }

    impl Pacer for CountingPacer {
        fn pace(&self) {
            self.count.set(self.count.get() + 1);
        }
    }

    // -- fixtures -----------------------------------------------------------

    const FEED_URL: &str = "https://example.com/feed.xml";
    const SITE_LINK: &str = "https://example.com";

    fn feed() -> FeedSource {
        FeedSource {
            name: Some("News".into()),
            url: FEED_URL.into(),
            max_items: None,
        }
    }

    fn item(guid: &str, title: &str) -> ChannelItem {
        ChannelItem {
            guid: guid.into(),
            title: title.into(),
            link: format!("{SITE_LINK}/{guid}"),
            pub_date: Some("Mon, 02 Jan 2006 15:04:05 GMT".into()),
            description: Some(format!("about {title}")),
            content: None,
        }
    }

    fn channel(items: Vec<ChannelItem>) -> Channel {
        Channel {
            title: "Example Site".into(),
            description: "All the news".into(),
            link: SITE_LINK.into(),
            items,
        }
    }

    fn topic_id() -> TopicId {
        TopicId::derive(FEED_URL, USERNAME)
    }

    fn item_post_id(guid: &str) -> PostId {
        PostId::for_item(SITE_LINK, guid)
    }

    fn seeded_topic(posts: Vec<Post>) -> Topic {
        let mut all = vec![Post {
            id: PostId::root(),
            content: None,
            revision: 1,
            unread: false,
            deleted: false,
        }];
        all.extend(posts);
        Topic {
            id: topic_id(),
            posts: all,
        }
    }

    fn synced_post(id: &PostId, content: &str) -> Post {
        Post {
            id: id.clone(),
            content: Some(content.to_owned()),
            revision: 2,
            unread: false,
            deleted: false,
        }
    }

    fn rendered_post(guid: &str, title: &str) -> String {
        Renderer::new().unwrap().render_post(&item(guid, title)).unwrap()
    }

    // -- tests --------------------------------------------------------------

    #[test]
    fn creates_missing_topic_then_syncs_into_it() {
        let _ = env_logger::builder().is_test(true).try_init();

        let api = FakeApi::absent();
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("a", "Alpha")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert!(rep.topic_created);
        assert_eq!(rep.topic_id, topic_id());
        assert_eq!(rep.failed(), 0);

        let calls = api.calls();
        assert_eq!(calls[0], format!("get_topic {}", topic_id()));
        assert_eq!(calls[1], format!("create_topic {}", topic_id()));
        assert_eq!(calls[2], format!("get_topic {}", topic_id()));

        let stored = api.stored_topic();
        let created = stored.post(&item_post_id("a")).expect("post for item a");
        assert_eq!(created.content.as_deref(), Some(rendered_post("a", "Alpha").as_str()));
        assert!(created.unread);

        // The seeded empty root body gets the feed info on the same run.
        let root = stored.root_post().expect("root post");
        let info = Renderer::new()
            .unwrap()
            .render_root(&feed(), &channel(vec![]))
            .unwrap();
        assert_eq!(root.content.as_deref(), Some(info.as_str()));
    }

    #[test]
    fn transport_error_on_fetch_is_not_treated_as_missing() {
        let api = FakeApi::absent();
        api.fail_on(format!("get_topic {}", topic_id()));
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let err = syncer.sync_feed(&feed()).unwrap_err();
        assert!(matches!(err, SyncError::TopicResolution { .. }));
        assert!(!api.calls().iter().any(|c| c.starts_with("create_topic")));
    }

    #[test]
    fn failed_topic_creation_aborts_the_feed() {
        let api = FakeApi::absent();
        api.fail_on(format!("create_topic {}", topic_id()));
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("a", "Alpha")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let err = syncer.sync_feed(&feed()).unwrap_err();
        assert!(matches!(err, SyncError::TopicResolution { .. }));
        assert_eq!(api.mutation_count(), 1, "only the failed create_topic");
    }

    #[test]
    fn new_item_runs_create_edit_unread_in_order() {
        let api = FakeApi::with_topic(seeded_topic(vec![]));
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("a", "Alpha")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        let id = item_post_id("a");
        assert_eq!(
            api.calls()[1..],
            [
                format!("create_post {id} parent 1 intended true"),
                format!("edit_post {id} rev 1"),
                format!("change_post_read {id} read false"),
            ]
        );
        assert_eq!(
            rep.ops.iter().map(|o| o.kind).collect::<Vec<_>>(),
            [OpKind::Create, OpKind::Edit, OpKind::MarkUnread]
        );
        assert_eq!(rep.applied(), 3);
    }

    #[test]
    fn failed_create_skips_rest_of_that_chain_only() {
        let first = item_post_id("a");
        let api = FakeApi::with_topic(seeded_topic(vec![]));
        api.fail_on(format!("create_post {first} parent 1 intended true"));
        let fetcher = FakeFetcher::serving(
            FEED_URL,
            channel(vec![item("a", "Alpha"), item("b", "Beta")]),
        );
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert_eq!(rep.failed(), 1);
        assert_eq!(rep.applied(), 3, "second item's full chain");

        let calls = api.calls();
        assert!(!calls.iter().any(|c| c == &format!("edit_post {first} rev 1")));
        assert!(!calls.iter().any(|c| c.starts_with(&format!("change_post_read {first}"))));
        let second = item_post_id("b");
        assert!(calls.iter().any(|c| c == &format!("edit_post {second} rev 1")));
    }

    #[test]
    fn failed_first_content_write_skips_mark_unread() {
        let id = item_post_id("a");
        let api = FakeApi::with_topic(seeded_topic(vec![]));
        api.fail_on(format!("edit_post {id} rev 1"));
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("a", "Alpha")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert_eq!(rep.ops.last().unwrap().kind, OpKind::Edit);
        assert!(matches!(rep.ops.last().unwrap().outcome, OpOutcome::Failed(_)));
        assert!(!api.calls().iter().any(|c| c.starts_with("change_post_read")));
    }

    #[test]
    fn failed_update_edit_still_marks_unread() {
        let id = item_post_id("a");
        let api = FakeApi::with_topic(seeded_topic(vec![synced_post(&id, "stale body")]));
        api.fail_on(format!("edit_post {id} rev 2"));
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("a", "Alpha")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert_eq!(rep.failed(), 1);
        assert!(api
            .calls()
            .iter()
            .any(|c| c == &format!("change_post_read {id} read false")));
        assert_eq!(rep.ops.last().unwrap().kind, OpKind::MarkUnread);
        assert_eq!(rep.ops.last().unwrap().outcome, OpOutcome::Applied);
    }

    #[test]
    fn failed_delete_does_not_stop_later_creations() {
        let gone = item_post_id("gone");
        let api = FakeApi::with_topic(seeded_topic(vec![synced_post(&gone, "old")]));
        api.fail_on(format!("delete_post {gone}"));
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("new", "Fresh")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert_eq!(rep.failed(), 1);
        assert_eq!(rep.applied(), 3);
        assert!(api.stored_topic().post(&item_post_id("new")).is_some());
    }

    #[test]
    fn pacer_runs_per_mutation_group_but_not_for_root_edit() {
        let stale = item_post_id("stale");
        let gone = item_post_id("gone");
        let root = Post {
            id: PostId::root(),
            content: Some("old info".into()),
            revision: 3,
            unread: false,
            deleted: false,
        };
        let api = FakeApi::with_topic(Topic {
            id: topic_id(),
            posts: vec![root, synced_post(&stale, "old body"), synced_post(&gone, "old")],
        });
        let fetcher = FakeFetcher::serving(
            FEED_URL,
            channel(vec![item("stale", "Updated"), item("new", "Fresh")]),
        );
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert_eq!(rep.failed(), 0);
        // Groups: one deletion, one creation chain, one update chain.
        assert_eq!(pacer.count.get(), 3);
        assert!(rep.ops.iter().any(|o| o.kind == OpKind::EditRoot));
    }

    #[test]
    fn dry_run_reports_everything_and_mutates_nothing() {
        let api = FakeApi::absent();
        let fetcher = FakeFetcher::serving(FEED_URL, channel(vec![item("a", "Alpha")]));
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, true);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert!(rep.topic_created);
        assert_eq!(rep.would_apply(), 3);
        assert_eq!(rep.applied(), 0);
        assert_eq!(api.mutation_count(), 0);
        assert_eq!(pacer.count.get(), 0);
    }

    #[test]
    fn item_cap_limits_what_gets_synced() {
        // Item "c" was synced on an earlier, uncapped run.
        let stale = synced_post(&item_post_id("c"), &rendered_post("c", "Gamma"));
        let api = FakeApi::with_topic(seeded_topic(vec![stale]));
        let fetcher = FakeFetcher::serving(
            FEED_URL,
            channel(vec![item("a", "Alpha"), item("b", "Beta"), item("c", "Gamma")]),
        );
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let capped = FeedSource {
            max_items: Some(1),
            ..feed()
        };
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&capped).unwrap();
        assert_eq!(rep.ops.iter().filter(|o| o.kind == OpKind::Create).count(), 1);
        // Only the first item survives the cap; the post for the now-capped
        // item "c" is retired like any vanished item.
        assert_eq!(rep.ops[0].post_id, item_post_id("c"));
        assert_eq!(rep.ops[0].kind, OpKind::Delete);
        assert_eq!(rep.ops[1].post_id, item_post_id("a"));
        assert!(rep.ops.iter().all(|o| o.post_id != item_post_id("b")));
    }

    #[test]
    fn unchanged_topic_yields_empty_report() {
        let renderer = Renderer::new().unwrap();
        let ch = channel(vec![item("a", "Alpha")]);
        let want = desired_state(&feed(), &ch, &renderer).unwrap();

        let id = item_post_id("a");
        let mut posts = vec![synced_post(&id, &want.posts[0].content)];
        posts[0].unread = true;
        let mut topic = seeded_topic(posts);
        topic.posts[0].content = Some(want.root_content.clone());

        let api = FakeApi::with_topic(topic);
        let fetcher = FakeFetcher::serving(FEED_URL, ch);
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let rep = syncer.sync_feed(&feed()).unwrap();
        assert!(rep.ops.is_empty());
        assert!(rep.is_clean());
        assert_eq!(api.mutation_count(), 0);
    }

    #[test]
    fn sync_all_continues_past_a_broken_feed() {
        let ok_url = "https://ok.example.com/feed.xml";
        let api = FakeApi::absent();
        let mut ok_channel = channel(vec![]);
        ok_channel.link = "https://ok.example.com".into();
        let fetcher = FakeFetcher::serving(ok_url, ok_channel);
        let renderer = Renderer::new().unwrap();
        let pacer = CountingPacer::default();
        let syncer = Syncer::new(&api, &fetcher, &renderer, &pacer, USERNAME, false);

        let config = Configuration {
            wobble: WobbleConfig {
                endpoint: "https://wobble.example.com".into(),
                username: USERNAME.into(),
                password: "secret".into(),
            },
            feeds: vec![
                FeedSource {
                    name: Some("dead".into()),
                    url: "https://dead.example.com/feed.xml".into(),
                    max_items: None,
                },
                FeedSource {
                    name: Some("alive".into()),
                    url: ok_url.into(),
                    max_items: None,
                },
            ],
        };

        let results = syncer.sync_all(&config);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "dead");
        assert!(matches!(results[0].1, Err(SyncError::Fetch(_))));
        assert_eq!(results[1].0, "alive");
        assert!(results[1].1.is_ok());
    }
}
