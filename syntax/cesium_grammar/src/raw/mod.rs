//! Serde model of a TextMate grammar document.
//!
//! Fields the tokenizer does not use (`information_for_contributors`,
//! `$schema`, ...) are ignored on load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GrammarError;

/// A grammar as written on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGrammar {
    pub name: String,
    pub scope_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<RawRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repository: BTreeMap<String, RawRule>,
}

/// One entry of `patterns` or `repository`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captures: Option<BTreeMap<String, RawCapture>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_captures: Option<BTreeMap<String, RawCapture>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_captures: Option<BTreeMap<String, RawCapture>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<RawRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCapture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RawGrammar {
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let grammar: RawGrammar = serde_json::from_str(json)?;
        if grammar.name.trim().is_empty() {
            return Err(GrammarError::EmptyField("name"));
        }
        if grammar.scope_name.trim().is_empty() {
            return Err(GrammarError::EmptyField("scopeName"));
        }
        Ok(grammar)
    }

    pub fn load(path: &Path) -> Result<Self, GrammarError> {
        let json = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
