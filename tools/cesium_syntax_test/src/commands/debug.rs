//! Debug commands: `parse` and `tokens`.

use std::path::Path;

use cesium_fixture::parse_fixture;

use super::{load_grammar, read_file};
use crate::report::{render_fixture, render_tokens};

/// Parse a fixture and print its assertions.
pub fn parse_fixture_file(path: &Path) -> i32 {
    let text = match read_file(path) {
        Ok(text) => text,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    match parse_fixture(&text) {
        Ok(fixture) => {
            print!("{}", render_fixture(&fixture));
            0
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            1
        }
    }
}

/// Tokenize a file with a grammar and print every token's scopes.
pub fn dump_tokens(path: &Path, grammar_path: &Path) -> i32 {
    let loaded = read_file(path).and_then(|text| Ok((text, load_grammar(grammar_path)?)));
    let (text, grammar) = match loaded {
        Ok(loaded) => loaded,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let document = grammar.tokenize(&text);
    print!("{}", render_tokens(&document, &text));
    0
}
