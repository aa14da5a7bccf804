//! Error types for wobsync-engine.

use thiserror::Error;

use wobsync_core::types::TopicId;
use wobsync_core::{ApiError, FetchError};
use wobsync_renderer::RenderError;

/// Per-feed fatal errors. Any of these aborts the affected feed's pass; the
/// run continues with the next feed. Individual remote operation failures
/// are not errors at this level — they land in the feed report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The feed could not be downloaded or parsed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The topic could not be brought to a usable state, even after
    /// attempting creation.
    #[error("failed to resolve topic {topic_id}: {source}")]
    TopicResolution {
        topic_id: TopicId,
        #[source]
        source: ApiError,
    },
}
