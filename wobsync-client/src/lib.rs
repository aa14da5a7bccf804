//! # wobsync-client
//!
//! Production implementations of the wobsync-core ports: a JSON-RPC client
//! for the Wobble messaging service and an HTTP feed fetcher.
//!
//! Wire building and parsing live in [`protocol`] as pure functions so the
//! whole encode/decode surface is testable without a network.

pub mod feed;
pub mod protocol;
pub mod wobble;

pub use feed::HttpFeedFetcher;
pub use wobble::WobbleClient;
