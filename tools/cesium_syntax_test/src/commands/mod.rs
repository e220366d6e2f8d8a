//! Command handlers for the `cesium-syntax-test` CLI.
//!
//! Each handler prints its own output and returns the process exit code;
//! `main` only parses arguments. Shared file reading lives here.

use std::path::Path;

use cesium_grammar::CompiledGrammar;

mod check;
mod debug;
mod highlight;

pub use check::run_tests;
pub use debug::{dump_tokens, parse_fixture_file};
pub use highlight::{highlight_config, highlight_file};

/// Read a file, turning I/O errors into a message fit for the terminal.
fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| {
        let path = path.display();
        match e.kind() {
            std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            std::io::ErrorKind::PermissionDenied => {
                format!("permission denied reading '{path}'")
            }
            std::io::ErrorKind::InvalidData => {
                format!("'{path}' contains invalid UTF-8 data")
            }
            _ => format!("error reading '{path}': {e}"),
        }
    })
}

/// Load and compile a grammar file.
fn load_grammar(path: &Path) -> Result<CompiledGrammar, String> {
    let grammar = CompiledGrammar::load(path)
        .map_err(|e| format!("failed to load grammar '{}': {e}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        scope = %grammar.scope_name(),
        rules = grammar.rule_count(),
        "loaded grammar"
    );
    Ok(grammar)
}
