//! Check result types.

use std::path::PathBuf;
use std::time::Duration;

use cesium_fixture::{ColumnSpan, Scope, ScopeAssertion, ScopeSet};

/// Where and how an assertion failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// First failing column.
    pub column: usize,
    /// Scopes the grammar assigned at `column`.
    pub actual: ScopeSet,
    /// Expected scopes absent at `column`.
    pub missing: Vec<Scope>,
    /// Scopes present at `column` that must not be.
    pub forbidden: Vec<Scope>,
}

/// Outcome of a single assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssertionOutcome {
    Passed,
    Failed(Mismatch),
}

impl AssertionOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AssertionOutcome::Failed(_))
    }
}

/// Result of checking one assertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionResult {
    /// 0-based line the assertion targets.
    pub source_line: usize,
    pub span: ColumnSpan,
    pub expected: Vec<Scope>,
    pub excluded: Vec<Scope>,
    pub outcome: AssertionOutcome,
}

impl AssertionResult {
    pub fn passed(assertion: &ScopeAssertion) -> Self {
        Self::with_outcome(assertion, AssertionOutcome::Passed)
    }

    #[cold]
    pub fn failed(assertion: &ScopeAssertion, mismatch: Mismatch) -> Self {
        Self::with_outcome(assertion, AssertionOutcome::Failed(mismatch))
    }

    fn with_outcome(assertion: &ScopeAssertion, outcome: AssertionOutcome) -> Self {
        AssertionResult {
            source_line: assertion.source_line,
            span: assertion.span,
            expected: assertion.expected.clone(),
            excluded: assertion.excluded.clone(),
            outcome,
        }
    }
}

/// Summary of one fixture file.
#[derive(Clone, Debug, Default)]
pub struct FileSummary {
    pub path: PathBuf,
    /// Suite name from the fixture header.
    pub suite: Option<String>,
    /// Assertion results in source order.
    pub results: Vec<AssertionResult>,
    pub passed: usize,
    pub failed: usize,
    /// Read or malformed-fixture errors; the file's assertions did not run.
    pub errors: Vec<String>,
    pub duration: Duration,
}

impl FileSummary {
    pub fn new(path: PathBuf) -> Self {
        FileSummary {
            path,
            ..Default::default()
        }
    }

    pub fn add_result(&mut self, result: AssertionResult) {
        match result.outcome {
            AssertionOutcome::Passed => self.passed += 1,
            AssertionOutcome::Failed(_) => self.failed += 1,
        }
        self.results.push(result);
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || !self.errors.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }
}

/// Overall summary of a checker run.
#[derive(Clone, Debug, Default)]
pub struct CheckSummary {
    /// File summaries in path order.
    pub files: Vec<FileSummary>,
    pub passed: usize,
    pub failed: usize,
    /// Files that could not be read or parsed.
    pub error_files: usize,
    pub duration: Duration,
}

impl CheckSummary {
    pub fn new() -> Self {
        CheckSummary::default()
    }

    pub fn add_file(&mut self, summary: FileSummary) {
        self.passed += summary.passed;
        self.failed += summary.failed;
        if !summary.errors.is_empty() {
            self.error_files += 1;
        }
        self.files.push(summary);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.error_files > 0
    }

    /// Get exit code: 0 = all pass, 1 = failures or file errors, 2 = nothing checked.
    pub fn exit_code(&self) -> i32 {
        if self.total() == 0 && self.error_files == 0 {
            2
        } else {
            i32::from(self.has_failures())
        }
    }
}
