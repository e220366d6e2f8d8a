use std::path::PathBuf;

use super::*;
use crate::result::Mismatch;
use cesium_fixture::{parse_fixture, ColumnSpan, ScopeSet};
use cesium_grammar::{LineTokens, Token};
use pretty_assertions::assert_eq;

fn scope(name: &str) -> Scope {
    Scope::new(name).unwrap()
}

fn result(line: usize, span: ColumnSpan, outcome: AssertionOutcome) -> AssertionResult {
    AssertionResult {
        source_line: line,
        span,
        expected: vec![scope("storage.modifier.cesium")],
        excluded: vec![],
        outcome,
    }
}

fn failing_file() -> FileSummary {
    let mut file = FileSummary::new(PathBuf::from("keywords.cs"));
    file.suite = Some("Keyword Tests".to_string());
    file.add_result(result(1, ColumnSpan::new(0, 4), AssertionOutcome::Passed));
    file.add_result(result(
        17,
        ColumnSpan::new(8, 13),
        AssertionOutcome::Failed(Mismatch {
            column: 8,
            actual: [scope("source.cesium"), scope("variable.other.cesium")]
                .into_iter()
                .collect::<ScopeSet>(),
            missing: vec![scope("storage.modifier.cesium")],
            forbidden: vec![],
        }),
    ));
    file
}

#[test]
fn test_failure_block() {
    let mut summary = CheckSummary::new();
    summary.add_file(failing_file());
    let out = render_summary(&summary, false);

    assert!(out.contains("keywords.cs (Keyword Tests)"), "{out}");
    assert!(out.contains("  FAIL 18:8-13 (column 8)\n"), "{out}");
    assert!(out.contains("    expected:  storage.modifier.cesium\n"), "{out}");
    assert!(
        out.contains("    actual:    source.cesium variable.other.cesium\n"),
        "{out}"
    );
    assert!(out.contains("    missing:   storage.modifier.cesium\n"), "{out}");
    assert!(!out.contains("forbidden"), "{out}");
    assert!(!out.contains("PASS"), "{out}");
    assert!(out.contains("  1 passed, 1 failed, 0 file errors (2 assertions in 1 files)"));
    assert!(out.trim_end().ends_with("FAILED"));
}

#[test]
fn test_verbose_lists_passes() {
    let mut summary = CheckSummary::new();
    summary.add_file(failing_file());
    let out = render_summary(&summary, true);
    assert!(out.contains("  PASS 2:0-4 storage.modifier.cesium\n"), "{out}");
}

#[test]
fn test_passing_files_hidden_unless_verbose() {
    let mut file = FileSummary::new(PathBuf::from("numbers.cs"));
    file.add_result(result(0, ColumnSpan::single(0), AssertionOutcome::Passed));
    let mut summary = CheckSummary::new();
    summary.add_file(file);

    assert!(!render_summary(&summary, false).contains("numbers.cs"));
    assert!(render_summary(&summary, true).contains("numbers.cs"));
    assert!(render_summary(&summary, false).trim_end().ends_with("OK"));
}

#[test]
fn test_file_errors() {
    let mut file = FileSummary::new(PathBuf::from("simple.cs"));
    file.add_error("malformed fixture at line 34: annotation has no scopes".to_string());
    let mut summary = CheckSummary::new();
    summary.add_file(file);

    let out = render_summary(&summary, false);
    assert!(
        out.contains("  ERROR: malformed fixture at line 34: annotation has no scopes\n"),
        "{out}"
    );
    assert!(out.trim_end().ends_with("FAILED"));
}

#[test]
fn test_nothing_checked() {
    let out = render_summary(&CheckSummary::new(), false);
    assert!(out.trim_end().ends_with("NO FIXTURES FOUND"));
}

#[test]
fn test_render_fixture() {
    let fixture = parse_fixture(
        "// SYNTAX TEST \"source.cesium\" \"Keyword Tests\"\n\
         const value = 42;\n\
         // <- storage.modifier.cesium\n\
         //            ^^ constant.numeric.integer.cesium - string\n",
    )
    .unwrap();
    let out = render_fixture(&fixture);
    assert_eq!(
        out,
        "suite: Keyword Tests (source.cesium), comment token \"//\"\n\
         assertions: 2\n\
         \n   2 | const value = 42;\n\
         \x20      0-0 arrow (line 3): storage.modifier.cesium\n\
         \x20      14-15 carets (line 4): constant.numeric.integer.cesium - string\n"
    );
}

#[test]
fn test_render_tokens() {
    let root = scope("source.cesium");
    let document = Document {
        lines: vec![LineTokens {
            tokens: vec![
                Token {
                    start: 0,
                    end: 2,
                    scopes: vec![root.clone(), scope("keyword.control.cesium")],
                },
                Token {
                    start: 2,
                    end: 4,
                    scopes: vec![root],
                },
            ],
        }],
    };
    assert_eq!(
        render_tokens(&document, "if é"),
        "   1 | if é\n\
         \x20      0-2 \"if\" source.cesium keyword.control.cesium\n\
         \x20      2-4 \" é\" source.cesium\n"
    );
}

#[test]
fn test_prefix_hint() {
    let mut file = FileSummary::new(PathBuf::from("hint.cs"));
    file.add_result(AssertionResult {
        source_line: 0,
        span: ColumnSpan::new(0, 1),
        expected: vec![scope("keyword")],
        excluded: vec![],
        outcome: AssertionOutcome::Failed(Mismatch {
            column: 0,
            actual: [scope("source.cesium"), scope("keyword.control.cesium")]
                .into_iter()
                .collect(),
            missing: vec![scope("keyword")],
            forbidden: vec![],
        }),
    });
    let mut summary = CheckSummary::new();
    summary.add_file(file);

    let out = render_summary(&summary, false);
    assert!(
        out.contains("    did you mean `keyword.control.cesium` instead of `keyword`?\n"),
        "{out}"
    );
}
