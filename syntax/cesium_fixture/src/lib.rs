//! Grammar conformance fixtures for the Cesium language.
//!
//! A fixture is an ordinary Cesium source file in which some lines are
//! *annotations*: comments whose carets (or arrow) point at columns of the
//! source line above and name the scopes a TextMate grammar must assign there.
//!
//! ```text
//! // SYNTAX TEST "source.cesium" "Keyword Tests"
//! const value = 42;
//! // <- storage.modifier.cesium
//! //            ^^ constant.numeric.integer.cesium
//! ```
//!
//! This crate only parses fixtures. Running a grammar against them lives in
//! `cesium_syntax_test`; producing scopes lives in `cesium_grammar`.

mod error;
mod parse;
mod scope;

pub use error::{FixtureError, FixtureErrorKind};
pub use parse::{
    parse_fixture, AnnotationKind, ColumnSpan, Fixture, FixtureHeader, ScopeAssertion,
    SourceLine, DEFAULT_COMMENT_TOKEN,
};
pub use scope::{Scope, ScopeError, ScopeSet};
