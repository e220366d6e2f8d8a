//! Highlighting code blocks with a resolved configuration.

use serde::Serialize;

use cesium_grammar::{CompiledGrammar, LineTokens};

use crate::options::PLAINTEXT;
use crate::resolve::ResolvedHighlighting;

/// A run of text with the scopes the theme layer colors by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HighlightedSpan {
    pub text: String,
    /// Outermost first; empty for plain text.
    pub scopes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HighlightedLine {
    pub spans: Vec<HighlightedSpan>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HighlightedBlock {
    /// Language actually used.
    pub lang: String,
    pub inline: bool,
    pub lines: Vec<HighlightedLine>,
}

/// Observes highlighted output as it is produced.
///
/// Visitors see every span of a line, then the line itself. They cannot
/// change the output.
pub trait HighlightVisitor {
    fn visit_span(&mut self, _line: usize, _span: &HighlightedSpan) {}

    fn visit_line(&mut self, _line: usize, _highlighted: &HighlightedLine) {}
}

/// Emits a trace event per line and span.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingVisitor;

impl HighlightVisitor for TracingVisitor {
    fn visit_span(&mut self, line: usize, span: &HighlightedSpan) {
        tracing::trace!(line, text = %span.text, scopes = ?span.scopes, "highlighted span");
    }

    fn visit_line(&mut self, line: usize, highlighted: &HighlightedLine) {
        tracing::trace!(line, spans = highlighted.spans.len(), "highlighted line");
    }
}

struct NoopVisitor;

impl HighlightVisitor for NoopVisitor {}

pub struct Highlighter<'a> {
    config: &'a ResolvedHighlighting,
}

impl<'a> Highlighter<'a> {
    pub fn new(config: &'a ResolvedHighlighting) -> Self {
        Highlighter { config }
    }

    /// Highlight `code`. Without `lang` the configured default for block or
    /// inline code is used.
    pub fn highlight(&self, code: &str, lang: Option<&str>, inline: bool) -> HighlightedBlock {
        if self.config.trace_visits {
            self.highlight_with(code, lang, inline, &mut TracingVisitor)
        } else {
            self.highlight_with(code, lang, inline, &mut NoopVisitor)
        }
    }

    pub fn highlight_with(
        &self,
        code: &str,
        lang: Option<&str>,
        inline: bool,
        visitor: &mut dyn HighlightVisitor,
    ) -> HighlightedBlock {
        let requested = lang.unwrap_or_else(|| self.config.default_lang.for_code(inline));
        let (lang, lines) = match self.config.grammar_for(requested) {
            Some(grammar) => (grammar.name().to_lowercase(), grammar_lines(grammar, code)),
            None => {
                if !requested.eq_ignore_ascii_case(PLAINTEXT) {
                    tracing::debug!(lang = requested, "no grammar for language, using plaintext");
                }
                (PLAINTEXT.to_string(), plain_lines(code))
            }
        };

        for (index, line) in lines.iter().enumerate() {
            for span in &line.spans {
                visitor.visit_span(index, span);
            }
            visitor.visit_line(index, line);
        }

        HighlightedBlock {
            lang,
            inline,
            lines,
        }
    }
}

fn plain_lines(code: &str) -> Vec<HighlightedLine> {
    code.lines()
        .map(|line| HighlightedLine {
            spans: vec![HighlightedSpan {
                text: line.to_string(),
                scopes: Vec::new(),
            }],
        })
        .collect()
}

fn grammar_lines(grammar: &CompiledGrammar, code: &str) -> Vec<HighlightedLine> {
    let document = grammar.tokenize(code);
    code.lines()
        .zip(&document.lines)
        .map(|(line, tokens)| spans_for_line(line, tokens))
        .collect()
}

fn spans_for_line(line: &str, tokens: &LineTokens) -> HighlightedLine {
    // Byte offset of every character column, plus the end of the line.
    let offsets: Vec<usize> = line
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(line.len()))
        .collect();
    let byte = |column: usize| offsets.get(column).copied().unwrap_or(line.len());

    HighlightedLine {
        spans: tokens
            .tokens
            .iter()
            .map(|token| HighlightedSpan {
                text: line[byte(token.start)..byte(token.end)].to_string(),
                scopes: token.scopes.iter().map(|s| s.as_str().to_string()).collect(),
            })
            .collect(),
    }
}
