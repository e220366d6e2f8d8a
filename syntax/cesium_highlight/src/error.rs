//! Options file errors.
//!
//! Grammar problems are not errors here; they degrade the resolved
//! configuration instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("failed to read highlight options '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid highlight options: {0}")]
    Json(#[from] serde_json::Error),
}
