//! Configuration file loading.
//!
//! The configuration is a single JSON document:
//!
//! ```json
//! {
//!   "wobble": { "endpoint": "...", "username": "...", "password": "..." },
//!   "feeds": [ { "name": "...", "url": "...", "max-items": 10 } ]
//! }
//! ```
//!
//! Loading enforces a hard size ceiling before reading, so a mispointed or
//! hostile file never reaches the parser.

use std::path::Path;

use crate::error::{io_err, ConfigError};
use crate::types::Configuration;

/// Hard ceiling on configuration file size.
pub const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

/// Load and parse the configuration at `path`.
pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
    let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
    if meta.len() > MAX_CONFIG_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            limit: MAX_CONFIG_BYTES,
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
