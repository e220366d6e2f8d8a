//! Fixture parsing.
//!
//! Splits a fixture into source lines and annotation lines, and resolves
//! every annotation to a column span on the nearest preceding source line.
//!
//! # Annotation forms
//!
//! ```text
//! if (true) {
//! // <- keyword.control.cesium          first non-blank column of the line above
//! //  ^^^^ constant.language.cesium     absolute columns of the carets
//! //  ^^^^ source.cesium - string       `-` starts the excluded scopes
//! ```
//!
//! `<~~--` shifts the arrow two columns right and widens it to two columns.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{FixtureError, FixtureErrorKind};
use crate::scope::Scope;

/// Comment token assumed when a fixture has no `SYNTAX TEST` header.
pub const DEFAULT_COMMENT_TOKEN: &str = "//";

const HEADER_MARKER: &str = "SYNTAX TEST";

/// `// SYNTAX TEST "source.cesium" "Keyword Tests"`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureHeader {
    /// Text before the marker; annotation lines start with it.
    pub comment_token: String,
    /// Grammar scope the fixture is written against.
    pub scope_name: String,
    /// Human-readable suite name.
    pub suite: String,
}

/// Inclusive range of character columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

impl ColumnSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted column span {start}..={end}");
        ColumnSpan { start, end }
    }

    pub fn single(column: usize) -> Self {
        ColumnSpan::new(column, column)
    }

    /// Number of columns covered.
    pub fn width(self) -> usize {
        self.end - self.start + 1
    }

    pub fn columns(self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(self, column: usize) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for ColumnSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Marker used by an annotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnnotationKind {
    /// `^^^` under a span.
    CaretRun,
    /// A single `^`.
    Caret,
    /// `<-` pointing at the start of the line above.
    Arrow,
}

/// One expectation: the scopes a grammar must (and must not) assign over a span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeAssertion {
    /// 0-based file line the assertion refers to.
    pub source_line: usize,
    /// 0-based file line the assertion was written on.
    pub annotation_line: usize,
    pub span: ColumnSpan,
    pub kind: AnnotationKind,
    /// Required scopes, in declared order.
    pub expected: Vec<Scope>,
    /// Scopes that must be absent.
    pub excluded: Vec<Scope>,
}

/// A non-annotation line together with the assertions targeting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    /// 0-based line in the fixture file.
    pub index: usize,
    pub text: String,
    pub assertions: Vec<ScopeAssertion>,
}

/// A parsed fixture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub header: Option<FixtureHeader>,
    /// Complete file contents. Grammars run over this, annotation lines included.
    pub text: String,
    /// Source lines in file order.
    pub lines: Vec<SourceLine>,
}

impl Fixture {
    /// All assertions in source order.
    pub fn assertions(&self) -> impl Iterator<Item = &ScopeAssertion> {
        self.lines.iter().flat_map(|line| line.assertions.iter())
    }

    pub fn assertion_count(&self) -> usize {
        self.lines.iter().map(|line| line.assertions.len()).sum()
    }

    pub fn suite_name(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.suite.as_str())
    }

    pub fn scope_name(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.scope_name.as_str())
    }

    /// Look up a source line by its file line index.
    pub fn source_line(&self, index: usize) -> Option<&SourceLine> {
        self.lines
            .binary_search_by_key(&index, |line| line.index)
            .ok()
            .map(|i| &self.lines[i])
    }
}

/// Parse fixture text.
///
/// Fails on the first malformed annotation; nothing is returned for the
/// rest of the file in that case.
pub fn parse_fixture(text: &str) -> Result<Fixture, FixtureError> {
    let header = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .and_then(parse_header);
    let comment_token = header
        .as_ref()
        .map_or(DEFAULT_COMMENT_TOKEN, |h| h.comment_token.as_str());

    let mut lines: Vec<SourceLine> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let Some(marker_column) = annotation_marker(line, comment_token) else {
            lines.push(SourceLine {
                index,
                text: line.to_string(),
                assertions: Vec::new(),
            });
            continue;
        };

        let Some(target) = lines.last_mut() else {
            return Err(FixtureError::new(index, FixtureErrorKind::NoTargetLine));
        };
        let assertions = parse_annotation(line, marker_column, index, target)?;
        target.assertions.extend(assertions);
    }

    let fixture = Fixture {
        header,
        text: text.to_string(),
        lines,
    };
    tracing::debug!(
        suite = fixture.suite_name().unwrap_or("<none>"),
        source_lines = fixture.lines.len(),
        assertions = fixture.assertion_count(),
        "parsed fixture"
    );
    Ok(fixture)
}

fn parse_header(line: &str) -> Option<FixtureHeader> {
    let line = line.trim();
    let marker = line.find(HEADER_MARKER)?;
    let comment_token = line[..marker].trim_end();
    if comment_token.is_empty() {
        return None;
    }
    let rest = &line[marker + HEADER_MARKER.len()..];
    let (scope_name, rest) = quoted(rest)?;
    let (suite, _) = quoted(rest)?;
    Some(FixtureHeader {
        comment_token: comment_token.to_string(),
        scope_name: scope_name.to_string(),
        suite: suite.to_string(),
    })
}

/// Next `"..."` in `s`, and what follows it.
fn quoted(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start().strip_prefix('"')?;
    let end = s.find('"')?;
    Some((&s[..end], &s[end + 1..]))
}

/// Character column of the first marker (`^` or `<`) if `line` is an annotation.
fn annotation_marker(line: &str, comment_token: &str) -> Option<usize> {
    let body = line.trim_start().strip_prefix(comment_token)?;
    let rest = body.trim_start();
    let is_marker = rest.starts_with('^')
        || rest
            .strip_prefix('<')
            .is_some_and(|after| after.starts_with(['~', '-']));
    if !is_marker {
        return None;
    }
    Some(line.chars().count() - rest.chars().count())
}

/// Marker shape before it is resolved against the target line.
enum Marker {
    Carets(Vec<ColumnSpan>),
    Arrow { offset: usize, width: usize },
}

fn parse_annotation(
    line: &str,
    marker_column: usize,
    index: usize,
    target: &SourceLine,
) -> Result<Vec<ScopeAssertion>, FixtureError> {
    let chars: Vec<char> = line.chars().collect();
    let (marker, scopes_start) = scan_marker(&chars, marker_column, index)?;

    let (expected, excluded) = parse_scopes(&chars[scopes_start..], index)?;
    if expected.is_empty() && excluded.is_empty() {
        return Err(FixtureError::new(index, FixtureErrorKind::MissingScopes));
    }

    let line_len = target.text.chars().count();
    let spans: Vec<(ColumnSpan, AnnotationKind)> = match marker {
        Marker::Carets(runs) => runs
            .into_iter()
            .map(|span| {
                let kind = if span.width() == 1 {
                    AnnotationKind::Caret
                } else {
                    AnnotationKind::CaretRun
                };
                (span, kind)
            })
            .collect(),
        Marker::Arrow { offset, width } => {
            let first = target
                .text
                .chars()
                .position(|c| !c.is_whitespace())
                .unwrap_or(line_len);
            let start = first + offset;
            vec![(
                ColumnSpan::new(start, start + width - 1),
                AnnotationKind::Arrow,
            )]
        }
    };

    spans
        .into_iter()
        .map(|(span, kind)| {
            if span.end >= line_len {
                return Err(FixtureError::new(
                    index,
                    FixtureErrorKind::SpanOutOfBounds {
                        target_line: target.index,
                        span,
                        line_len,
                    },
                ));
            }
            Ok(ScopeAssertion {
                source_line: target.index,
                annotation_line: index,
                span,
                kind,
                expected: expected.clone(),
                excluded: excluded.clone(),
            })
        })
        .collect()
}

/// Read the marker starting at `start`; returns it and where the scopes begin.
fn scan_marker(
    chars: &[char],
    start: usize,
    index: usize,
) -> Result<(Marker, usize), FixtureError> {
    let mut pos = start;

    if chars.get(pos) == Some(&'<') {
        pos += 1;
        let offset = count_run(chars, pos, '~');
        pos += offset;
        let width = count_run(chars, pos, '-');
        pos += width;
        if width == 0 {
            return Err(FixtureError::new(index, FixtureErrorKind::EmptyArrow));
        }
        return Ok((Marker::Arrow { offset, width }, pos));
    }

    let mut runs = Vec::new();
    loop {
        let len = count_run(chars, pos, '^');
        runs.push(ColumnSpan::new(pos, pos + len - 1));
        pos += len;

        // Another caret run may follow after whitespace.
        let gap = chars[pos..]
            .iter()
            .take_while(|c| c.is_whitespace())
            .count();
        if chars.get(pos + gap) == Some(&'^') {
            pos += gap;
        } else {
            break;
        }
    }
    Ok((Marker::Carets(runs), pos))
}

fn count_run(chars: &[char], from: usize, c: char) -> usize {
    chars
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|&&x| x == c).count())
}

fn parse_scopes(
    chars: &[char],
    index: usize,
) -> Result<(Vec<Scope>, Vec<Scope>), FixtureError> {
    let text: String = chars.iter().collect();
    let mut expected = Vec::new();
    let mut excluded = Vec::new();
    let mut excluding = false;

    for token in text.split_whitespace() {
        if token == "-" {
            excluding = true;
            continue;
        }
        let scope = Scope::new(token).map_err(|e| FixtureError::new(index, e.into()))?;
        if excluding {
            excluded.push(scope);
        } else {
            expected.push(scope);
        }
    }
    Ok((expected, excluded))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
