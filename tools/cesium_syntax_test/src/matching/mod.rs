//! Comparing grammar output against one assertion.

use cesium_fixture::{Scope, ScopeAssertion, ScopeSet};
use cesium_grammar::ScopeOracle;

use crate::result::{AssertionResult, Mismatch};

/// How expected scopes are compared with the scopes a grammar assigns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Every expected scope must be present; others may be too.
    #[default]
    Superset,
    /// The assigned scopes, ignoring the grammar's root scope, must be
    /// exactly the expected ones.
    Exact,
}

/// Check `assertion` at every column of its span.
///
/// The first failing column is reported. Excluded scopes fail the assertion
/// in both modes.
pub fn check_assertion(
    assertion: &ScopeAssertion,
    oracle: &dyn ScopeOracle,
    text: &str,
    mode: MatchMode,
) -> AssertionResult {
    for column in assertion.span.columns() {
        let actual = oracle.scopes_at(text, assertion.source_line, column);
        if let Some(mismatch) = compare(assertion, column, actual, mode) {
            tracing::trace!(
                line = assertion.source_line + 1,
                column,
                missing = mismatch.missing.len(),
                forbidden = mismatch.forbidden.len(),
                "assertion failed"
            );
            return AssertionResult::failed(assertion, mismatch);
        }
    }
    tracing::trace!(
        line = assertion.source_line + 1,
        span = %assertion.span,
        "assertion passed"
    );
    AssertionResult::passed(assertion)
}

fn compare(
    assertion: &ScopeAssertion,
    column: usize,
    actual: ScopeSet,
    mode: MatchMode,
) -> Option<Mismatch> {
    let missing: Vec<Scope> = actual
        .missing(&assertion.expected)
        .into_iter()
        .cloned()
        .collect();

    let mut forbidden: Vec<Scope> = assertion
        .excluded
        .iter()
        .filter(|s| actual.contains(s))
        .cloned()
        .collect();

    if mode == MatchMode::Exact {
        let extra: Vec<Scope> = actual
            .iter()
            .filter(|s| !is_root_scope(s))
            .filter(|s| !assertion.expected.contains(s) && !forbidden.contains(s))
            .cloned()
            .collect();
        forbidden.extend(extra);
    }

    if missing.is_empty() && forbidden.is_empty() {
        return None;
    }
    Some(Mismatch {
        column,
        actual,
        missing,
        forbidden,
    })
}

/// `source.cesium`, `text.html`: the scope a grammar puts on everything.
fn is_root_scope(scope: &Scope) -> bool {
    matches!(scope.segments().next(), Some("source" | "text"))
}
