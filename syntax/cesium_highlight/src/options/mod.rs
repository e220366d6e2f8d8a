//! The highlighting options object.
//!
//! Options are layered: built-in defaults first, then whatever the user
//! sets. User options only replace the fields they name.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cesium_grammar::RawGrammar;

use crate::error::HighlightError;

pub const DEFAULT_LIGHT_THEME: &str = "github-light";
pub const DEFAULT_DARK_THEME: &str = "github-dark";

/// The language every configuration offers, grammar or not.
pub const PLAINTEXT: &str = "plaintext";

/// Theme identifiers for light and dark mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemePair {
    pub light: String,
    pub dark: String,
}

impl Default for ThemePair {
    fn default() -> Self {
        ThemePair {
            light: DEFAULT_LIGHT_THEME.to_string(),
            dark: DEFAULT_DARK_THEME.to_string(),
        }
    }
}

/// Language used for code without an explicit language tag.
///
/// Written either as one name for all code, or as
/// `{ "block": "...", "inline": "..." }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultLang {
    Single(String),
    Split { block: String, inline: String },
}

impl DefaultLang {
    pub fn block(&self) -> &str {
        match self {
            DefaultLang::Single(lang) | DefaultLang::Split { block: lang, .. } => lang,
        }
    }

    pub fn inline(&self) -> &str {
        match self {
            DefaultLang::Single(lang) | DefaultLang::Split { inline: lang, .. } => lang,
        }
    }

    pub fn for_code(&self, inline: bool) -> &str {
        if inline {
            self.inline()
        } else {
            self.block()
        }
    }

    /// Replace every language `keep` rejects with `fallback`.
    #[must_use]
    pub(crate) fn retain_or(self, keep: impl Fn(&str) -> bool, fallback: &str) -> Self {
        let pick = |lang: String| if keep(&lang) { lang } else { fallback.to_string() };
        match self {
            DefaultLang::Single(lang) => DefaultLang::Single(pick(lang)),
            DefaultLang::Split { block, inline } => {
                let (block, inline) = (pick(block), pick(inline));
                if block == inline {
                    DefaultLang::Single(block)
                } else {
                    DefaultLang::Split { block, inline }
                }
            }
        }
    }
}

impl Default for DefaultLang {
    fn default() -> Self {
        DefaultLang::Single(PLAINTEXT.to_string())
    }
}

/// Where the Cesium grammar comes from.
///
/// In JSON: `null` for none, a string for a file path, an object for an
/// inline grammar document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrammarSource {
    #[default]
    None,
    File(PathBuf),
    Inline(Box<RawGrammar>),
}

impl GrammarSource {
    /// Resolve a relative file path against `base`.
    #[must_use]
    pub fn rebased(self, base: &Path) -> Self {
        match self {
            GrammarSource::File(path) if path.is_relative() => GrammarSource::File(base.join(path)),
            other => other,
        }
    }
}

/// The complete options object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightOptions {
    pub theme: ThemePair,
    /// Keep the theme's background color on code blocks.
    pub keep_background: bool,
    pub default_lang: DefaultLang,
    pub grammar: GrammarSource,
    /// Emit a trace event for every highlighted line and span.
    pub trace_visits: bool,
}

/// User overrides; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialHighlightOptions {
    pub theme: Option<ThemePair>,
    pub keep_background: Option<bool>,
    pub default_lang: Option<DefaultLang>,
    /// `null` is kept as `Some(GrammarSource::None)` so it can clear a base grammar.
    #[serde(deserialize_with = "present")]
    pub grammar: Option<GrammarSource>,
    pub trace_visits: Option<bool>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl HighlightOptions {
    /// Options used by the Cesium documentation site.
    pub fn cesium_site() -> Self {
        HighlightOptions {
            keep_background: true,
            default_lang: DefaultLang::Single("cesium".to_string()),
            grammar: GrammarSource::File(PathBuf::from("grammars/cesium.tmGrammar.json")),
            ..HighlightOptions::default()
        }
    }

    /// Overlay `user` on top of `self`.
    #[must_use]
    pub fn merge(self, user: PartialHighlightOptions) -> Self {
        HighlightOptions {
            theme: user.theme.unwrap_or(self.theme),
            keep_background: user.keep_background.unwrap_or(self.keep_background),
            default_lang: user.default_lang.unwrap_or(self.default_lang),
            grammar: user.grammar.unwrap_or(self.grammar),
            trace_visits: user.trace_visits.unwrap_or(self.trace_visits),
        }
    }

    /// Parse user options and merge them over `self`.
    pub fn merge_json(self, json: &str) -> Result<Self, HighlightError> {
        let user: PartialHighlightOptions = serde_json::from_str(json)?;
        Ok(self.merge(user))
    }

    /// Parse user options over the defaults.
    pub fn from_json(json: &str) -> Result<Self, HighlightError> {
        HighlightOptions::default().merge_json(json)
    }

    /// Load user options from a file and merge them over `self`.
    ///
    /// A relative grammar path in the file is taken relative to the file.
    pub fn merge_file(self, path: &Path) -> Result<Self, HighlightError> {
        let json = std::fs::read_to_string(path).map_err(|source| HighlightError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut user: PartialHighlightOptions = serde_json::from_str(&json)?;
        if let Some(dir) = path.parent() {
            user.grammar = user.grammar.map(|grammar| grammar.rebased(dir));
        }
        tracing::debug!(path = %path.display(), "loaded highlight options");
        Ok(self.merge(user))
    }

    pub fn load(path: &Path) -> Result<Self, HighlightError> {
        HighlightOptions::default().merge_file(path)
    }
}
