//! Fixture checking engine.
//!
//! Runs a grammar over fixtures and collects results. A failing assertion
//! never stops the run: every assertion of every file is checked.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use cesium_fixture::parse_fixture;
use cesium_grammar::ScopeOracle;

use crate::discovery::{discover_fixtures_in, FixtureFile, DEFAULT_EXTENSION};
use crate::matching::{check_assertion, MatchMode};
use crate::result::{CheckSummary, FileSummary};

/// Configuration for the checker.
#[derive(Clone, Debug)]
pub struct CheckerConfig {
    /// Only check fixtures whose path contains this string.
    pub filter: Option<String>,
    /// Report passing assertions too.
    pub verbose: bool,
    /// Check files in parallel.
    pub parallel: bool,
    pub mode: MatchMode,
    /// File extensions treated as fixtures.
    pub extensions: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            filter: None,
            verbose: false,
            parallel: true,
            mode: MatchMode::Superset,
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }
}

/// Checks fixtures against one scope oracle.
pub struct Checker<'o> {
    oracle: &'o dyn ScopeOracle,
    config: CheckerConfig,
}

impl<'o> Checker<'o> {
    /// Create a checker with default config.
    pub fn new(oracle: &'o dyn ScopeOracle) -> Self {
        Self::with_config(oracle, CheckerConfig::default())
    }

    pub fn with_config(oracle: &'o dyn ScopeOracle, config: CheckerConfig) -> Self {
        Checker { oracle, config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check every fixture at `path` (a file or a directory).
    pub fn run(&self, path: &Path) -> CheckSummary {
        let mut files = discover_fixtures_in(path, &self.config.extensions);
        if let Some(filter) = &self.config.filter {
            files.retain(|file| file.path.to_string_lossy().contains(filter.as_str()));
        }
        tracing::debug!(path = %path.display(), files = files.len(), "discovered fixtures");

        if self.config.parallel {
            self.run_parallel(&files)
        } else {
            self.run_sequential(&files)
        }
    }

    fn run_sequential(&self, files: &[FixtureFile]) -> CheckSummary {
        let start = Instant::now();
        let mut summary = CheckSummary::new();
        for file in files {
            summary.add_file(self.check_file(&file.path));
        }
        summary.duration = start.elapsed();
        summary
    }

    /// Check files on a scoped rayon pool.
    ///
    /// `build_scoped` tears the pool down before returning, so no worker
    /// threads outlive the run. Results come back in input order.
    fn run_parallel(&self, files: &[FixtureFile]) -> CheckSummary {
        let start = Instant::now();

        let file_summaries = rayon::ThreadPoolBuilder::new()
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    files
                        .par_iter()
                        .map(|file| self.check_file(&file.path))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                files
                    .iter()
                    .map(|file| self.check_file(&file.path))
                    .collect()
            });

        let mut summary = CheckSummary::new();
        for file_summary in file_summaries {
            summary.add_file(file_summary);
        }
        summary.duration = start.elapsed();
        summary
    }

    /// Read and check one fixture file.
    pub fn check_file(&self, path: &Path) -> FileSummary {
        match std::fs::read_to_string(path) {
            Ok(text) => self.check_source(path, &text),
            Err(e) => {
                let mut summary = FileSummary::new(path.to_path_buf());
                summary.add_error(format!("failed to read file: {e}"));
                summary
            }
        }
    }

    /// Check fixture `text` as if read from `path`.
    pub fn check_source(&self, path: &Path, text: &str) -> FileSummary {
        let start = Instant::now();
        let mut summary = FileSummary::new(path.to_path_buf());

        let fixture = match parse_fixture(text) {
            Ok(fixture) => fixture,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "malformed fixture");
                summary.add_error(e.to_string());
                return summary;
            }
        };
        summary.suite = fixture.suite_name().map(str::to_string);

        for assertion in fixture.assertions() {
            summary.add_result(check_assertion(
                assertion,
                self.oracle,
                &fixture.text,
                self.config.mode,
            ));
        }
        self.oracle.release(&fixture.text);

        summary.duration = start.elapsed();
        tracing::debug!(
            path = %path.display(),
            passed = summary.passed,
            failed = summary.failed,
            "checked fixture"
        );
        summary
    }
}
