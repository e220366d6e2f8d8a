//! Cesium syntax tooling CLI
//!
//! Grammar conformance checking and highlighting configuration.

use std::path::{Path, PathBuf};

use cesium_syntax_test::commands::{
    dump_tokens, highlight_config, highlight_file, parse_fixture_file, run_tests,
};
use cesium_syntax_test::{CheckerConfig, MatchMode};

const DEFAULT_GRAMMAR: &str = "grammars/cesium.tmGrammar.json";
const DEFAULT_FIXTURES: &str = "tests/syntax";

/// Install the stderr subscriber. `CESIUM_LOG` takes `EnvFilter` directives;
/// only warnings are shown by default.
fn init_tracing() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("CESIUM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_targets(true),
        )
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let code = match command.as_str() {
        "test" => {
            // Path is optional; flags can come before or after it
            let mut path: Option<PathBuf> = None;
            let mut grammar = PathBuf::from(DEFAULT_GRAMMAR);
            let mut config = CheckerConfig::default();
            let mut extensions = Vec::new();

            for arg in args.iter().skip(2) {
                if let Some(file) = arg.strip_prefix("--grammar=") {
                    grammar = PathBuf::from(file);
                } else if let Some(filter) = arg.strip_prefix("--filter=") {
                    config.filter = Some(filter.to_string());
                } else if let Some(ext) = arg.strip_prefix("--ext=") {
                    extensions.push(ext.trim_start_matches('.').to_string());
                } else if arg == "--verbose" || arg == "-v" {
                    config.verbose = true;
                } else if arg == "--no-parallel" {
                    config.parallel = false;
                } else if arg == "--exact" {
                    config.mode = MatchMode::Exact;
                } else if !arg.starts_with('-') && path.is_none() {
                    path = Some(PathBuf::from(arg));
                } else {
                    eprintln!("warning: ignoring unknown option '{arg}'");
                }
            }
            if !extensions.is_empty() {
                config.extensions = extensions;
            }

            let path = path.unwrap_or_else(|| {
                let fixtures = Path::new(DEFAULT_FIXTURES);
                if fixtures.is_dir() {
                    fixtures.to_path_buf()
                } else {
                    PathBuf::from(".")
                }
            });
            run_tests(&path, &grammar, &config)
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: cesium-syntax-test parse <fixture.cs>");
                std::process::exit(1);
            }
            parse_fixture_file(Path::new(&args[2]))
        }
        "tokens" => {
            let mut file: Option<&str> = None;
            let mut grammar = DEFAULT_GRAMMAR;
            for arg in args.iter().skip(2) {
                if let Some(path) = arg.strip_prefix("--grammar=") {
                    grammar = path;
                } else if !arg.starts_with('-') && file.is_none() {
                    file = Some(arg);
                }
            }

            let Some(file) = file else {
                eprintln!("error: missing file path");
                eprintln!("Usage: cesium-syntax-test tokens <file.cs> [--grammar=<file>]");
                std::process::exit(1);
            };
            dump_tokens(Path::new(file), Path::new(grammar))
        }
        "highlight-config" => {
            let config = args
                .iter()
                .skip(2)
                .find_map(|arg| arg.strip_prefix("--config="))
                .map(Path::new);
            highlight_config(config)
        }
        "highlight" => {
            let mut file: Option<&str> = None;
            let mut lang: Option<&str> = None;
            let mut config: Option<&Path> = None;
            let mut inline = false;
            for arg in args.iter().skip(2) {
                if let Some(l) = arg.strip_prefix("--lang=") {
                    lang = Some(l);
                } else if let Some(path) = arg.strip_prefix("--config=") {
                    config = Some(Path::new(path));
                } else if arg == "--inline" {
                    inline = true;
                } else if !arg.starts_with('-') && file.is_none() {
                    file = Some(arg);
                }
            }

            let Some(file) = file else {
                eprintln!("error: missing file path");
                eprintln!("Usage: cesium-syntax-test highlight <file> [--lang=<id>] [--inline] [--config=<file>]");
                std::process::exit(1);
            };
            highlight_file(Path::new(file), lang, inline, config)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-V" => {
            println!("cesium-syntax-test {}", env!("CARGO_PKG_VERSION"));
            0
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            1
        }
    };

    std::process::exit(code);
}

fn print_usage() {
    println!("Cesium syntax tooling");
    println!();
    println!("Usage: cesium-syntax-test <command> [options]");
    println!();
    println!("Commands:");
    println!("  test [path]          Check grammar fixtures (default: {DEFAULT_FIXTURES})");
    println!("  parse <fixture>      Print the assertions of a fixture");
    println!("  tokens <file>        Print the tokens and scopes of a file");
    println!("  highlight <file>     Print highlighted spans of a file as JSON");
    println!("  highlight-config     Print resolved highlighting options as JSON");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Test options:");
    println!("  --grammar=<file>    Grammar to check (default: {DEFAULT_GRAMMAR})");
    println!("  --filter=<text>     Only check fixtures whose path contains <text>");
    println!("  --ext=<ext>         Fixture extension, repeatable (default: cs)");
    println!("  --exact             Require exactly the annotated scopes");
    println!("  --no-parallel       Check files one at a time");
    println!("  -v, --verbose       List passing assertions too");
    println!();
    println!("Tokens options:");
    println!("  --grammar=<file>    Grammar to tokenize with (default: {DEFAULT_GRAMMAR})");
    println!();
    println!("Highlight options:");
    println!("  --config=<file>     JSON options merged over the site defaults");
    println!("  --lang=<id>         Language to highlight with (highlight only)");
    println!("  --inline            Use the inline default language (highlight only)");
    println!();
    println!("Logging:");
    println!("  CESIUM_LOG=<filter> tracing filter, e.g. CESIUM_LOG=cesium_grammar=debug");
}
