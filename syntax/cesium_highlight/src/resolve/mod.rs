//! Turning options into a usable configuration.
//!
//! Resolution never fails. If the grammar cannot be loaded or compiled the
//! configuration is marked degraded and code is highlighted as plain text.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use cesium_grammar::{CompiledGrammar, GrammarError};

use crate::options::{DefaultLang, GrammarSource, HighlightOptions, ThemePair, PLAINTEXT};

/// A language the configuration can highlight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    /// Language id used in code fences (`cesium`, `plaintext`).
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_name: Option<String>,
    /// Other names accepted for the language (file extensions).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl LanguageInfo {
    fn plaintext() -> Self {
        LanguageInfo {
            id: PLAINTEXT.to_string(),
            scope_name: None,
            aliases: vec!["text".to_string(), "txt".to_string()],
        }
    }

    fn for_grammar(grammar: &CompiledGrammar) -> Self {
        LanguageInfo {
            id: grammar.name().to_lowercase(),
            scope_name: Some(grammar.scope_name().as_str().to_string()),
            aliases: grammar.file_types().to_vec(),
        }
    }

    pub fn matches(&self, lang: &str) -> bool {
        self.id.eq_ignore_ascii_case(lang)
            || self.scope_name.as_deref() == Some(lang)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(lang))
    }
}

/// The configuration handed to the highlighting engine.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHighlighting {
    pub theme: ThemePair,
    pub keep_background: bool,
    pub default_lang: DefaultLang,
    /// Languages offered; `plaintext` is always first.
    pub languages: Vec<LanguageInfo>,
    pub trace_visits: bool,
    /// Why the grammar is unavailable, if it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
    #[serde(skip)]
    grammar: Option<Arc<CompiledGrammar>>,
}

impl ResolvedHighlighting {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn grammar(&self) -> Option<&CompiledGrammar> {
        self.grammar.as_deref()
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l.matches(lang))
    }

    /// The grammar to use for `lang`; `None` means plain text.
    pub(crate) fn grammar_for(&self, lang: &str) -> Option<&CompiledGrammar> {
        let grammar = self.grammar.as_deref()?;
        self.languages
            .iter()
            .skip(1)
            .any(|l| l.matches(lang))
            .then_some(grammar)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve `options`, reading a grammar file relative to `base_dir`.
pub fn resolve(options: &HighlightOptions, base_dir: &Path) -> ResolvedHighlighting {
    let mut languages = vec![LanguageInfo::plaintext()];
    let mut degraded = None;

    let grammar = match load_grammar(&options.grammar, base_dir) {
        Ok(Some(grammar)) => {
            languages.push(LanguageInfo::for_grammar(&grammar));
            Some(Arc::new(grammar))
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "grammar unavailable, highlighting as plain text");
            degraded = Some(e.to_string());
            None
        }
    };

    let default_lang = options.default_lang.clone().retain_or(
        |lang| {
            let known = languages.iter().any(|l| l.matches(lang));
            if !known {
                tracing::warn!(lang, "default language is not available, using plaintext");
            }
            known
        },
        PLAINTEXT,
    );

    ResolvedHighlighting {
        theme: options.theme.clone(),
        keep_background: options.keep_background,
        default_lang,
        languages,
        trace_visits: options.trace_visits,
        degraded,
        grammar,
    }
}

fn load_grammar(
    source: &GrammarSource,
    base_dir: &Path,
) -> Result<Option<CompiledGrammar>, GrammarError> {
    match source {
        GrammarSource::None => Ok(None),
        GrammarSource::File(path) => CompiledGrammar::load(&base_dir.join(path)).map(Some),
        GrammarSource::Inline(raw) => CompiledGrammar::compile(raw).map(Some),
    }
}
