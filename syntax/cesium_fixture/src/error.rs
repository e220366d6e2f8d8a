//! Malformed fixture errors.

use crate::parse::ColumnSpan;
use crate::scope::ScopeError;

/// A fixture that cannot be parsed.
///
/// `line` is the 1-based line of the offending annotation in the fixture
/// file, so it can be printed next to the path as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed fixture at line {line}: {kind}")]
pub struct FixtureError {
    pub line: usize,
    pub kind: FixtureErrorKind,
}

impl FixtureError {
    #[cold]
    pub(crate) fn new(line_index: usize, kind: FixtureErrorKind) -> Self {
        FixtureError {
            line: line_index + 1,
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FixtureErrorKind {
    /// Annotation appears before any source line.
    #[error("annotation has no preceding source line")]
    NoTargetLine,
    /// Annotation span does not fit on the annotated line.
    #[error(
        "columns {span} are outside line {shown_line} ({line_len} characters)",
        shown_line = .target_line + 1
    )]
    SpanOutOfBounds {
        /// 0-based index of the annotated line.
        target_line: usize,
        span: ColumnSpan,
        line_len: usize,
    },
    #[error("annotation declares no scopes")]
    MissingScopes,
    #[error("`<` arrow has no `-`")]
    EmptyArrow,
    #[error(transparent)]
    InvalidScope(#[from] ScopeError),
}
