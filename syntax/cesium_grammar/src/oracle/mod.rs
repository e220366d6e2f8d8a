//! Scope queries by position.
//!
//! The conformance checker only needs one capability from a grammar: given a
//! text and a position, which scopes apply there. [`ScopeOracle`] is that
//! capability. Closures implement it, which keeps checker tests independent
//! of any real grammar.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHasher};

use cesium_fixture::ScopeSet;

use crate::compiled::CompiledGrammar;
use crate::tokenize::Document;

/// Answers "which scopes are assigned at `line`/`column` of `text`".
///
/// Lines and columns are 0-based character positions. Implementations must
/// be deterministic: the same text and position always yield the same set.
pub trait ScopeOracle: Sync {
    fn scopes_at(&self, text: &str, line: usize, column: usize) -> ScopeSet;

    /// Called once no more queries on `text` will follow.
    fn release(&self, _text: &str) {}
}

impl<F> ScopeOracle for F
where
    F: Fn(&str, usize, usize) -> ScopeSet + Sync,
{
    fn scopes_at(&self, text: &str, line: usize, column: usize) -> ScopeSet {
        self(text, line, column)
    }
}

/// A [`ScopeOracle`] backed by a compiled grammar.
///
/// Each distinct text is tokenized once; later queries on the same text hit
/// the cache until the text is released.
pub struct GrammarOracle {
    grammar: CompiledGrammar,
    cache: Mutex<FxHashMap<u64, (Arc<str>, Arc<Document>)>>,
}

impl GrammarOracle {
    pub fn new(grammar: CompiledGrammar) -> Self {
        GrammarOracle {
            grammar,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn grammar(&self) -> &CompiledGrammar {
        &self.grammar
    }

    /// Tokens for `text`, tokenizing on first use.
    pub fn document(&self, text: &str) -> Arc<Document> {
        let key = text_hash(text);
        if let Some((cached, doc)) = self.cache.lock().get(&key) {
            if **cached == *text {
                return Arc::clone(doc);
            }
        }

        // Tokenize outside the lock so other files are not blocked.
        let doc = Arc::new(self.grammar.tokenize(text));
        self.cache
            .lock()
            .insert(key, (Arc::from(text), Arc::clone(&doc)));
        doc
    }

    /// Drop the cached tokens of `text`, if any.
    pub fn evict(&self, text: &str) {
        let key = text_hash(text);
        let mut cache = self.cache.lock();
        if cache.get(&key).is_some_and(|(cached, _)| **cached == *text) {
            cache.remove(&key);
        }
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub fn cached_texts(&self) -> usize {
        self.cache.lock().len()
    }
}

impl ScopeOracle for GrammarOracle {
    fn scopes_at(&self, text: &str, line: usize, column: usize) -> ScopeSet {
        self.document(text).scopes_at(line, column)
    }

    fn release(&self, text: &str) {
        self.evict(text);
    }
}

fn text_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}
