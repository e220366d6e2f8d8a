//! Plain-text rendering of check results, parsed fixtures and tokens.
//!
//! Line numbers are printed 1-based, columns 0-based, matching how
//! annotations count them.

use std::fmt;

use cesium_fixture::{AnnotationKind, Fixture, Scope};
use cesium_grammar::Document;

use crate::result::{AssertionOutcome, AssertionResult, CheckSummary, FileSummary};

/// Render a run summary.
///
/// Files that passed are listed only when `verbose` is set. Failing
/// assertions and file errors are always listed.
pub fn render_summary(summary: &CheckSummary, verbose: bool) -> String {
    SummaryReport { summary, verbose }.to_string()
}

/// Render every assertion of a parsed fixture.
pub fn render_fixture(fixture: &Fixture) -> String {
    FixtureReport(fixture).to_string()
}

/// Render the tokens of `text`, line by line.
pub fn render_tokens(document: &Document, text: &str) -> String {
    TokenReport { document, text }.to_string()
}

struct ScopeList<'a>(&'a [Scope]);

impl fmt::Display for ScopeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        for (i, scope) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{scope}")?;
        }
        Ok(())
    }
}

struct SummaryReport<'a> {
    summary: &'a CheckSummary,
    verbose: bool,
}

impl SummaryReport<'_> {
    fn write_file(&self, f: &mut fmt::Formatter<'_>, file: &FileSummary) -> fmt::Result {
        if file.total() == 0 && file.errors.is_empty() {
            return Ok(());
        }
        if !self.verbose && !file.has_failures() {
            return Ok(());
        }

        write!(f, "\n{}", file.path.display())?;
        if let Some(suite) = &file.suite {
            write!(f, " ({suite})")?;
        }
        writeln!(f)?;

        for error in &file.errors {
            writeln!(f, "  ERROR: {error}")?;
        }
        for result in &file.results {
            write_result(f, result, self.verbose)?;
        }
        Ok(())
    }
}

fn write_result(
    f: &mut fmt::Formatter<'_>,
    result: &AssertionResult,
    verbose: bool,
) -> fmt::Result {
    let location = format!(
        "{}:{}-{}",
        result.source_line + 1,
        result.span.start,
        result.span.end
    );
    match &result.outcome {
        AssertionOutcome::Passed => {
            if verbose {
                writeln!(f, "  PASS {location} {}", ScopeList(&result.expected))?;
            }
        }
        AssertionOutcome::Failed(mismatch) => {
            writeln!(f, "  FAIL {location} (column {})", mismatch.column)?;
            writeln!(f, "    expected:  {}", ScopeList(&result.expected))?;
            if !result.excluded.is_empty() {
                writeln!(f, "    excluded:  {}", ScopeList(&result.excluded))?;
            }
            writeln!(f, "    actual:    {}", mismatch.actual)?;
            if !mismatch.missing.is_empty() {
                writeln!(f, "    missing:   {}", ScopeList(&mismatch.missing))?;
            }
            for missing in &mismatch.missing {
                // Prefix relations only hint at typos; they never pass an assertion.
                let near = mismatch
                    .actual
                    .iter()
                    .find(|actual| missing.is_prefix_of(actual) || actual.is_prefix_of(missing));
                if let Some(near) = near {
                    writeln!(f, "    did you mean `{near}` instead of `{missing}`?")?;
                }
            }
            if !mismatch.forbidden.is_empty() {
                writeln!(f, "    forbidden: {}", ScopeList(&mismatch.forbidden))?;
            }
        }
    }
    Ok(())
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        for file in &summary.files {
            self.write_file(f, file)?;
        }

        writeln!(f)?;
        writeln!(f, "Check Summary:")?;
        writeln!(
            f,
            "  {} passed, {} failed, {} file errors ({} assertions in {} files)",
            summary.passed,
            summary.failed,
            summary.error_files,
            summary.total(),
            summary.files.len()
        )?;
        writeln!(f, "  Completed in {:.2?}", summary.duration)?;
        writeln!(f)?;

        let verdict = if summary.has_failures() {
            "FAILED"
        } else if summary.total() == 0 {
            "NO FIXTURES FOUND"
        } else {
            "OK"
        };
        writeln!(f, "{verdict}")
    }
}

struct FixtureReport<'a>(&'a Fixture);

impl fmt::Display for FixtureReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixture = self.0;
        match &fixture.header {
            Some(header) => writeln!(
                f,
                "suite: {} ({}), comment token {:?}",
                header.suite, header.scope_name, header.comment_token
            )?,
            None => writeln!(f, "suite: (no header)")?,
        }
        writeln!(f, "assertions: {}", fixture.assertion_count())?;

        for line in fixture.lines.iter().filter(|l| !l.assertions.is_empty()) {
            writeln!(f, "\n{:>4} | {}", line.index + 1, line.text)?;
            for assertion in &line.assertions {
                let kind = match assertion.kind {
                    AnnotationKind::CaretRun => "carets",
                    AnnotationKind::Caret => "caret",
                    AnnotationKind::Arrow => "arrow",
                };
                write!(
                    f,
                    "       {}-{} {kind} (line {}): {}",
                    assertion.span.start,
                    assertion.span.end,
                    assertion.annotation_line + 1,
                    ScopeList(&assertion.expected)
                )?;
                if !assertion.excluded.is_empty() {
                    write!(f, " - {}", ScopeList(&assertion.excluded))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

struct TokenReport<'a> {
    document: &'a Document,
    text: &'a str,
}

impl fmt::Display for TokenReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (line, tokens)) in self.text.lines().zip(&self.document.lines).enumerate() {
            writeln!(f, "{:>4} | {line}", index + 1)?;
            for token in &tokens.tokens {
                let lexeme: String = line
                    .chars()
                    .skip(token.start)
                    .take(token.end - token.start)
                    .collect();
                writeln!(
                    f,
                    "       {}-{} {lexeme:?} {}",
                    token.start,
                    token.end,
                    ScopeList(&token.scopes)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
