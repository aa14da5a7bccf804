//! Error types for wobsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading. Fatal: the run
/// aborts before any feed is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exceeds the hard size ceiling. Rejected before
    /// any byte is parsed.
    #[error("configuration file {path} is {size} bytes; refusing to parse more than {limit}")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// JSON parse error on load — includes file path and position context
    /// from serde_json.
    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}

/// All errors a [`crate::ports::WobbleApi`] implementation can surface.
///
/// The engine only branches on `NotFound` (topic resolution); everything else
/// is reported and skipped per the no-retry policy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed topic or post does not exist.
    #[error("not found")]
    NotFound,

    /// The operation conflicts with current remote state (stale revision,
    /// duplicate create).
    #[error("conflict with remote state")]
    Conflict,

    /// The service rejected the credentials or the session expired.
    #[error("authentication rejected")]
    Auth,

    /// Transport failure or an application error with no closer mapping.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// All errors a [`crate::ports::FeedFetcher`] implementation can surface.
/// Per-feed fatal: the affected feed is skipped, the run continues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The feed could not be downloaded.
    #[error("failed to fetch feed {url}: {reason}")]
    Request { url: String, reason: String },

    /// The downloaded document is not a parseable feed.
    #[error("failed to parse feed {url}: {reason}")]
    Parse { url: String, reason: String },
}
