//! Grammar conformance checking for Cesium syntax fixtures.
//!
//! This crate provides:
//! - Fixture discovery: finding annotated fixture files under a directory
//! - Matching: comparing the scopes a grammar assigns against annotations
//! - Result tracking: per-assertion outcomes, per-file and overall summaries
//! - Parallel execution: checking files concurrently with rayon
//!
//! The checker needs nothing from a grammar beyond a [`ScopeOracle`], so
//! it can be driven by the bundled tokenizer or by any other engine.

pub mod commands;
mod discovery;
mod matching;
mod report;
mod result;
mod runner;

pub use cesium_grammar::ScopeOracle;
pub use discovery::{discover_fixtures, discover_fixtures_in, FixtureFile, DEFAULT_EXTENSION};
pub use matching::{check_assertion, MatchMode};
pub use report::{render_fixture, render_summary, render_tokens};
pub use result::{AssertionOutcome, AssertionResult, CheckSummary, FileSummary, Mismatch};
pub use runner::{Checker, CheckerConfig};
