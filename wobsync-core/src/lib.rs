//! Wobsync core library — domain types, identity derivation, configuration,
//! service ports, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`identity`] — stable digest-based topic/post identifiers
//! - [`config`] — configuration file loading
//! - [`ports`] — [`WobbleApi`] / [`FeedFetcher`] trait contracts
//! - [`error`] — [`ConfigError`], [`ApiError`], [`FetchError`]

pub mod config;
pub mod error;
pub mod identity;
pub mod ports;
pub mod types;

pub use error::{ApiError, ConfigError, FetchError};
pub use ports::{FeedFetcher, WobbleApi};
pub use types::{
    Channel, ChannelItem, Configuration, FeedSource, Post, PostId, Topic, TopicId, WobbleConfig,
};
