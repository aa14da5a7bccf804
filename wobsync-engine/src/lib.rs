//! # wobsync-engine
//!
//! Reconciliation planning and sync orchestration.
//!
//! Call [`desired_state`] + [`reconcile`] to compute what a feed pass would
//! change, or hand a [`Syncer`] the service ports and let
//! [`Syncer::sync_all`] drive every configured feed.

pub mod diff;
pub mod error;
pub mod pacer;
pub mod plan;
pub mod syncer;

pub use diff::{diff_feed, diff_plan, FeedDiff, PostDiff};
pub use error::SyncError;
pub use pacer::{FixedDelayPacer, NoopPacer, Pacer};
pub use plan::{desired_state, reconcile, ContentEdit, DesiredPost, DesiredState, SyncPlan};
pub use syncer::{FeedSyncReport, OpKind, OpOutcome, OpReport, Syncer};
