//! Grammar compilation.
//!
//! Turns a [`RawGrammar`] into a flat rule table. Every `match`/`begin`/`end`
//! pattern is compiled once, and every `include` is resolved to a [`RuleId`],
//! so the tokenizer never looks anything up by name.
//!
//! Repository entries get their id before their body is compiled, which is
//! what lets a rule include itself (nested interpolation, `$self` inside a
//! string, ...).

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use rustc_hash::FxHashMap;

use cesium_fixture::Scope;

use crate::error::GrammarError;
use crate::raw::{RawCapture, RawGrammar, RawRule};

/// Index of a rule in a [`CompiledGrammar`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scopes pushed for one capture group.
#[derive(Clone, Debug)]
pub(crate) struct CaptureScopes {
    pub group: usize,
    pub scopes: Vec<Scope>,
}

#[derive(Clone, Debug)]
pub(crate) enum Rule {
    Match {
        regex: Regex,
        scopes: Vec<Scope>,
        captures: Vec<CaptureScopes>,
    },
    BeginEnd {
        begin: Regex,
        end: Regex,
        /// `name`: applies to begin, end and everything between.
        scopes: Vec<Scope>,
        /// `contentName`: applies between begin and end only.
        content_scopes: Vec<Scope>,
        begin_captures: Vec<CaptureScopes>,
        end_captures: Vec<CaptureScopes>,
        patterns: Vec<RuleId>,
    },
    /// A `patterns`-only entry, or the grammar root.
    Group { patterns: Vec<RuleId> },
}

/// A grammar ready for tokenization.
#[derive(Clone, Debug)]
pub struct CompiledGrammar {
    name: String,
    scope_name: Scope,
    file_types: Vec<String>,
    rules: Vec<Rule>,
    root: RuleId,
}

impl CompiledGrammar {
    pub fn compile(raw: &RawGrammar) -> Result<Self, GrammarError> {
        let scope_name = Scope::new(raw.scope_name.trim())?;
        let mut compiler = Compiler {
            raw,
            rules: Vec::new(),
            repository_ids: FxHashMap::default(),
            root: RuleId(0),
        };
        let root = compiler.reserve();
        compiler.root = root;
        let patterns = compiler.compile_list(&raw.patterns)?;
        compiler.rules[root.index()] = Rule::Group { patterns };

        tracing::debug!(
            grammar = %raw.name,
            scope = %scope_name,
            rules = compiler.rules.len(),
            "compiled grammar"
        );

        Ok(CompiledGrammar {
            name: raw.name.clone(),
            scope_name,
            file_types: raw.file_types.clone(),
            rules: compiler.rules,
            root,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        Self::compile(&RawGrammar::from_json(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, GrammarError> {
        Self::compile(&RawGrammar::load(path)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope_name(&self) -> &Scope {
        &self.scope_name
    }

    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub(crate) fn root(&self) -> RuleId {
        self.root
    }

    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }
}

struct Compiler<'g> {
    raw: &'g RawGrammar,
    rules: Vec<Rule>,
    repository_ids: FxHashMap<&'g str, RuleId>,
    root: RuleId,
}

impl<'g> Compiler<'g> {
    /// Allocate an id whose body is filled in later.
    fn reserve(&mut self) -> RuleId {
        self.push(Rule::Group {
            patterns: Vec::new(),
        })
    }

    fn push(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(u32::try_from(self.rules.len()).unwrap_or(u32::MAX));
        self.rules.push(rule);
        id
    }

    fn compile_list(&mut self, raw: &'g [RawRule]) -> Result<Vec<RuleId>, GrammarError> {
        let mut ids = Vec::with_capacity(raw.len());
        for rule in raw {
            if let Some(id) = self.compile_rule(rule)? {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// `None` when the rule is an include that resolves to nothing.
    fn compile_rule(&mut self, raw: &'g RawRule) -> Result<Option<RuleId>, GrammarError> {
        if let Some(include) = &raw.include {
            return self.resolve_include(include);
        }
        let rule = self.build(raw)?;
        Ok(Some(self.push(rule)))
    }

    fn resolve_include(&mut self, include: &'g str) -> Result<Option<RuleId>, GrammarError> {
        match include {
            "$self" | "$base" => Ok(Some(self.root)),
            _ => {
                if let Some(name) = include.strip_prefix('#') {
                    return self.repository_rule(name).map(Some);
                }
                tracing::warn!(include, "skipping include of external grammar");
                Ok(None)
            }
        }
    }

    fn repository_rule(&mut self, name: &'g str) -> Result<RuleId, GrammarError> {
        if let Some(&id) = self.repository_ids.get(name) {
            return Ok(id);
        }
        let grammar: &'g RawGrammar = self.raw;
        let Some(raw) = grammar.repository.get(name) else {
            return Err(GrammarError::UnknownInclude(format!("#{name}")));
        };

        let id = self.reserve();
        self.repository_ids.insert(name, id);
        let rule = match &raw.include {
            Some(include) => Rule::Group {
                patterns: self.resolve_include(include)?.into_iter().collect(),
            },
            None => self.build(raw)?,
        };
        self.rules[id.index()] = rule;
        Ok(id)
    }

    fn build(&mut self, raw: &'g RawRule) -> Result<Rule, GrammarError> {
        let scopes = scope_list(raw.name.as_deref())?;

        if let Some(pattern) = &raw.match_ {
            return Ok(Rule::Match {
                regex: compile_regex(pattern)?,
                scopes,
                captures: capture_list(raw.captures.as_ref())?,
            });
        }

        if let Some(begin) = &raw.begin {
            let Some(end) = &raw.end else {
                return Err(GrammarError::MissingEnd(begin.clone()));
            };
            // `captures` is shorthand for both sides.
            let begin_captures = raw.begin_captures.as_ref().or(raw.captures.as_ref());
            let end_captures = raw.end_captures.as_ref().or(raw.captures.as_ref());
            return Ok(Rule::BeginEnd {
                begin: compile_regex(begin)?,
                end: compile_regex(end)?,
                scopes,
                content_scopes: scope_list(raw.content_name.as_deref())?,
                begin_captures: capture_list(begin_captures)?,
                end_captures: capture_list(end_captures)?,
                patterns: self.compile_list(&raw.patterns)?,
            });
        }

        if !raw.patterns.is_empty() {
            return Ok(Rule::Group {
                patterns: self.compile_list(&raw.patterns)?,
            });
        }

        Err(GrammarError::EmptyRule)
    }
}

fn compile_regex(pattern: &str) -> Result<Regex, GrammarError> {
    Regex::new(pattern).map_err(|e| GrammarError::Regex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// A `name` may hold several space-separated scopes.
fn scope_list(name: Option<&str>) -> Result<Vec<Scope>, GrammarError> {
    name.map_or(Ok(Vec::new()), |name| {
        name.split_whitespace()
            .map(|s| Scope::new(s).map_err(GrammarError::from))
            .collect()
    })
}

fn capture_list(
    captures: Option<&BTreeMap<String, RawCapture>>,
) -> Result<Vec<CaptureScopes>, GrammarError> {
    let Some(captures) = captures else {
        return Ok(Vec::new());
    };
    let mut list = Vec::with_capacity(captures.len());
    for (key, capture) in captures {
        let group = key
            .parse::<usize>()
            .map_err(|_| GrammarError::InvalidCaptureIndex(key.clone()))?;
        let scopes = scope_list(capture.name.as_deref())?;
        if !scopes.is_empty() {
            list.push(CaptureScopes { group, scopes });
        }
    }
    // Keys sort as strings ("10" < "2"); scopes are pushed outermost group first.
    list.sort_by_key(|c| c.group);
    Ok(list)
}
