//! Highlighting commands: `highlight-config` prints the options handed to
//! the site's highlighting stage, `highlight` runs them over a file.

use std::path::Path;

use cesium_highlight::{resolve, HighlightOptions, Highlighter, ResolvedHighlighting};

use super::read_file;

/// Site defaults overlaid with `config`, resolved against the working
/// directory.
///
/// A grammar that fails to load degrades the result; it is not an error.
/// Only an unreadable or invalid options file is.
fn resolved_site(config: Option<&Path>) -> Result<ResolvedHighlighting, String> {
    let mut options = HighlightOptions::cesium_site();
    if let Some(path) = config {
        options = options.merge_file(path).map_err(|e| e.to_string())?;
    }
    let base_dir = std::env::current_dir()
        .map_err(|e| format!("cannot determine working directory: {e}"))?;
    Ok(resolve(&options, &base_dir))
}

/// Print the resolved highlighting configuration as JSON.
pub fn highlight_config(config: Option<&Path>) -> i32 {
    let resolved = match resolved_site(config) {
        Ok(resolved) => resolved,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    match resolved.to_json() {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}

/// Highlight a file and print the spans as JSON.
///
/// Without `lang` the configured default language is used.
pub fn highlight_file(path: &Path, lang: Option<&str>, inline: bool, config: Option<&Path>) -> i32 {
    let prepared = read_file(path).and_then(|code| Ok((code, resolved_site(config)?)));
    let (code, resolved) = match prepared {
        Ok(prepared) => prepared,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let block = Highlighter::new(&resolved).highlight(&code, lang, inline);
    match serde_json::to_string_pretty(&block) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    }
}
