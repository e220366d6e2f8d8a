//! Grammar loading and compilation errors.

use std::path::PathBuf;

use cesium_fixture::ScopeError;

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("failed to read grammar '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid grammar document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grammar field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("cannot compile pattern `{pattern}`: {message}")]
    Regex { pattern: String, message: String },
    #[error("unknown include `{0}`")]
    UnknownInclude(String),
    #[error("rule has no `match`, `begin`, `include` or `patterns`")]
    EmptyRule,
    #[error("rule with begin `{0}` has no `end`")]
    MissingEnd(String),
    #[error("capture key `{0}` is not a group number")]
    InvalidCaptureIndex(String),
    #[error("invalid scope name: {0}")]
    Scope(#[from] ScopeError),
}
