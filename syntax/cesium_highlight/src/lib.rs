//! Highlighting configuration for Cesium documentation builds.
//!
//! The documentation site hands one options object to its highlighting
//! engine. This crate builds that object:
//!
//! ```text
//! HighlightOptions (defaults + user overrides)
//!     │
//!     ▼
//! resolve() ──► ResolvedHighlighting   (grammar loaded, or degraded to plaintext)
//!     │
//!     ▼
//! Highlighter::highlight() ──► HighlightedBlock
//! ```
//!
//! A missing or broken Cesium grammar never fails the build. Resolution logs
//! a warning and offers only the built-in `plaintext` language.

mod error;
mod highlighter;
mod options;
mod resolve;

pub use error::HighlightError;
pub use highlighter::{
    HighlightVisitor, HighlightedBlock, HighlightedLine, HighlightedSpan, Highlighter,
    TracingVisitor,
};
pub use options::{
    DefaultLang, GrammarSource, HighlightOptions, PartialHighlightOptions, ThemePair,
    DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME, PLAINTEXT,
};
pub use resolve::{resolve, LanguageInfo, ResolvedHighlighting};
