//! TextMate grammars for Cesium syntax tooling.
//!
//! # Architecture
//!
//! ```text
//! cesium.tmGrammar.json
//!     │
//!     ▼
//! RawGrammar::from_json() ──► RawGrammar        (serde model of the document)
//!     │
//!     ▼
//! CompiledGrammar::compile() ──► CompiledGrammar (regexes built, includes resolved)
//!     │
//!     ▼
//! CompiledGrammar::tokenize() ──► Document       (scope stack per token, per line)
//! ```
//!
//! The tokenizer implements the subset of TextMate semantics the Cesium
//! grammar uses: `match`, `begin`/`end` regions spanning lines, captures,
//! `contentName`, repository includes and `$self`. Regexes use the `regex`
//! crate, so look-around and back-references are rejected at compile time.

mod compiled;
mod error;
mod oracle;
mod raw;
mod tokenize;

pub use compiled::{CompiledGrammar, RuleId};
pub use error::GrammarError;
pub use oracle::{GrammarOracle, ScopeOracle};
pub use raw::{RawCapture, RawGrammar, RawRule};
pub use tokenize::{Document, LineTokens, Token};
