//! Line tokenizer.
//!
//! Each line is scanned left to right. At every position all candidate
//! patterns are tried and the earliest match wins; on a tie the candidate
//! listed first wins, with the enclosing region's `end` listed before its
//! inner patterns. Regions opened by `begin` stay on the stack across lines
//! until their `end` matches.
//!
//! Columns in the output are character columns, matching how fixtures
//! count them. Regex offsets are bytes and are converted per line.

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use cesium_fixture::{Scope, ScopeSet};

use crate::compiled::{CaptureScopes, CompiledGrammar, Rule, RuleId};

/// A run of characters sharing one scope stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// First character column.
    pub start: usize,
    /// Column after the last character.
    pub end: usize,
    /// Outermost scope first; the grammar's root scope is always first.
    pub scopes: Vec<Scope>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineTokens {
    pub tokens: Vec<Token>,
}

impl LineTokens {
    /// Token covering `column`, if any.
    pub fn token_at(&self, column: usize) -> Option<&Token> {
        let i = self.tokens.partition_point(|t| t.end <= column);
        self.tokens.get(i).filter(|t| t.start <= column)
    }
}

/// Tokens for a whole text, one entry per line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<LineTokens>,
}

impl Document {
    /// Scopes assigned at a position; empty outside the text.
    pub fn scopes_at(&self, line: usize, column: usize) -> ScopeSet {
        self.lines
            .get(line)
            .and_then(|l| l.token_at(column))
            .map(|t| t.scopes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// An open region (or the root).
struct Frame {
    rule: RuleId,
    /// Scopes up to and including the region's `name`; begin/end tokens use these.
    outer: Vec<Scope>,
    /// `outer` plus `contentName`; text inside the region uses these.
    inner: Vec<Scope>,
}

/// Which pattern produced the winning match.
#[derive(Copy, Clone)]
enum Candidate {
    End,
    Rule(RuleId),
}

impl CompiledGrammar {
    /// Tokenize a complete text.
    ///
    /// Lines are split the same way fixtures split them (`str::lines`), so
    /// line indices line up with fixture line numbers.
    pub fn tokenize(&self, text: &str) -> Document {
        let root_scopes = vec![self.scope_name().clone()];
        let mut tokenizer = Tokenizer {
            grammar: self,
            stack: vec![Frame {
                rule: self.root(),
                outer: root_scopes.clone(),
                inner: root_scopes,
            }],
            flattened: FxHashMap::default(),
        };
        let lines = text.lines().map(|line| tokenizer.line(line)).collect();
        tracing::trace!(
            grammar = %self.scope_name(),
            open_regions = tokenizer.stack.len() - 1,
            "tokenized text"
        );
        Document { lines }
    }
}

struct Tokenizer<'g> {
    grammar: &'g CompiledGrammar,
    stack: Vec<Frame>,
    /// Candidate rules per region, with groups and includes expanded.
    flattened: FxHashMap<RuleId, Vec<RuleId>>,
}

impl Tokenizer<'_> {
    fn line(&mut self, line: &str) -> LineTokens {
        let mut out = LineBuilder::new(line);
        let mut pos = 0;
        let mut zero_width_at: Option<usize> = None;

        loop {
            let Some((candidate, caps)) = self.best_match(line, pos) else {
                out.push(pos, line.len(), &self.top().inner);
                break;
            };
            let (start, end) = caps.get(0).map_or((pos, pos), |m| (m.start(), m.end()));

            if start == end {
                if zero_width_at == Some(start) {
                    // Same empty match twice: step over one character instead.
                    out.push(pos, start, &self.top().inner);
                    let Some(c) = line[start..].chars().next() else {
                        break;
                    };
                    let next = start + c.len_utf8();
                    out.push(start, next, &self.top().inner);
                    pos = next;
                    zero_width_at = None;
                    continue;
                }
                zero_width_at = Some(start);
            } else {
                zero_width_at = None;
            }

            out.push(pos, start, &self.top().inner);
            match candidate {
                Candidate::End => self.close(&caps, &mut out),
                Candidate::Rule(id) => self.apply(id, &caps, &mut out),
            }
            pos = end;
        }

        out.finish()
    }

    fn top(&self) -> &Frame {
        // The root frame is never popped.
        &self.stack[self.stack.len() - 1]
    }

    fn close(&mut self, caps: &Captures<'_>, out: &mut LineBuilder) {
        if self.stack.len() == 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let Rule::BeginEnd { end_captures, .. } = self.grammar.rule(frame.rule) {
            out.push_captures(caps, &frame.outer, end_captures);
        }
    }

    fn apply(&mut self, id: RuleId, caps: &Captures<'_>, out: &mut LineBuilder) {
        let grammar = self.grammar;
        match grammar.rule(id) {
            Rule::Match {
                scopes, captures, ..
            } => {
                let base = extend(&self.top().inner, scopes);
                out.push_captures(caps, &base, captures);
            }
            Rule::BeginEnd {
                scopes,
                content_scopes,
                begin_captures,
                ..
            } => {
                let outer = extend(&self.top().inner, scopes);
                out.push_captures(caps, &outer, begin_captures);
                let inner = extend(&outer, content_scopes);
                self.stack.push(Frame {
                    rule: id,
                    outer,
                    inner,
                });
            }
            Rule::Group { .. } => {}
        }
    }

    /// Earliest match among the current region's `end` and its patterns.
    fn best_match<'l>(&mut self, line: &'l str, pos: usize) -> Option<(Candidate, Captures<'l>)> {
        let grammar = self.grammar;
        let frame_rule = self.top().rule;
        let mut best: Option<(Candidate, Captures<'l>)> = None;

        let mut consider = |candidate: Candidate, regex: &Regex| -> bool {
            let Some(caps) = regex.captures_at(line, pos) else {
                return false;
            };
            let start = caps.get(0).map_or(usize::MAX, |m| m.start());
            let better = best
                .as_ref()
                .and_then(|(_, b)| b.get(0))
                .map_or(true, |b| start < b.start());
            if better {
                best = Some((candidate, caps));
            }
            // Nothing can start earlier than the current position.
            start == pos
        };

        if let Rule::BeginEnd { end, .. } = grammar.rule(frame_rule) {
            if consider(Candidate::End, end) {
                return best;
            }
        }

        let candidates = self.flattened_patterns(frame_rule);
        for &id in &candidates {
            let regex = match grammar.rule(id) {
                Rule::Match { regex, .. } => regex,
                Rule::BeginEnd { begin, .. } => begin,
                Rule::Group { .. } => continue,
            };
            if consider(Candidate::Rule(id), regex) {
                break;
            }
        }
        best
    }

    /// Match/begin rules reachable from a region's `patterns`, in order.
    fn flattened_patterns(&mut self, region: RuleId) -> Vec<RuleId> {
        if let Some(cached) = self.flattened.get(&region) {
            return cached.clone();
        }
        let patterns = match self.grammar.rule(region) {
            Rule::BeginEnd { patterns, .. } | Rule::Group { patterns } => patterns.as_slice(),
            Rule::Match { .. } => &[],
        };
        let mut out = Vec::new();
        let mut visited = vec![region];
        for &id in patterns {
            self.flatten_into(id, &mut out, &mut visited);
        }
        self.flattened.insert(region, out.clone());
        out
    }

    fn flatten_into(&self, id: RuleId, out: &mut Vec<RuleId>, visited: &mut Vec<RuleId>) {
        match self.grammar.rule(id) {
            Rule::Group { patterns } => {
                if visited.contains(&id) {
                    return;
                }
                visited.push(id);
                for &inner in patterns {
                    self.flatten_into(inner, out, visited);
                }
            }
            Rule::Match { .. } | Rule::BeginEnd { .. } => out.push(id),
        }
    }
}

fn extend(base: &[Scope], more: &[Scope]) -> Vec<Scope> {
    let mut scopes = Vec::with_capacity(base.len() + more.len());
    scopes.extend_from_slice(base);
    scopes.extend_from_slice(more);
    scopes
}

/// Collects tokens for one line, converting byte offsets to columns.
struct LineBuilder {
    /// Column of every byte offset that starts a character, plus the end.
    columns: Vec<usize>,
    tokens: Vec<Token>,
}

impl LineBuilder {
    fn new(line: &str) -> Self {
        let mut columns = vec![0; line.len() + 1];
        let mut count = 0;
        for (offset, _) in line.char_indices() {
            columns[offset] = count;
            count += 1;
        }
        columns[line.len()] = count;
        LineBuilder {
            columns,
            tokens: Vec::new(),
        }
    }

    fn push(&mut self, start: usize, end: usize, scopes: &[Scope]) {
        if start >= end {
            return;
        }
        self.tokens.push(Token {
            start: self.columns[start],
            end: self.columns[end],
            scopes: scopes.to_vec(),
        });
    }

    /// Push a match, splitting it where capture groups begin and end.
    fn push_captures(&mut self, caps: &Captures<'_>, base: &[Scope], captures: &[CaptureScopes]) {
        let Some(whole) = caps.get(0) else {
            return;
        };
        let groups: Vec<(usize, usize, &[Scope])> = captures
            .iter()
            .filter_map(|c| {
                let m = caps.get(c.group)?;
                (m.start() < m.end()).then_some((m.start(), m.end(), c.scopes.as_slice()))
            })
            .collect();
        if groups.is_empty() {
            self.push(whole.start(), whole.end(), base);
            return;
        }

        let mut bounds = vec![whole.start(), whole.end()];
        for &(s, e, _) in &groups {
            bounds.push(s);
            bounds.push(e);
        }
        bounds.sort_unstable();
        bounds.dedup();

        for pair in bounds.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let mut scopes = base.to_vec();
            for &(s, e, group_scopes) in &groups {
                if s <= a && b <= e {
                    scopes.extend_from_slice(group_scopes);
                }
            }
            self.push(a, b, &scopes);
        }
    }

    fn finish(self) -> LineTokens {
        LineTokens {
            tokens: self.tokens,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
