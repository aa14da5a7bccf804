//! Error types for wobsync-renderer.

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error, including context serialization failures.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),
}
