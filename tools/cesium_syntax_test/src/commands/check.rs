//! The `test` command: check fixtures against a grammar and report results.

use std::path::Path;

use cesium_grammar::GrammarOracle;

use super::load_grammar;
use crate::report::render_summary;
use crate::runner::{Checker, CheckerConfig};

/// Check every fixture at `path` against the grammar at `grammar_path`.
///
/// A grammar that cannot be loaded is a hard error: nothing is checked.
pub fn run_tests(path: &Path, grammar_path: &Path, config: &CheckerConfig) -> i32 {
    if !path.exists() {
        eprintln!("Path not found: {}", path.display());
        return 1;
    }

    let grammar = match load_grammar(grammar_path) {
        Ok(grammar) => grammar,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let oracle = GrammarOracle::new(grammar);
    let checker = Checker::with_config(&oracle, config.clone());
    let summary = checker.run(path);

    print!("{}", render_summary(&summary, config.verbose));
    summary.exit_code()
}
