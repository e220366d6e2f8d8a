use super::*;
use crate::error::GrammarError;
use pretty_assertions::assert_eq;

const GRAMMAR: &str = r##"{
    "name": "Cesium",
    "scopeName": "source.cesium",
    "patterns": [
        { "include": "#comments" },
        { "include": "#strings" },
        { "include": "#interpolated" },
        { "match": "\\b(if|return)\\b", "name": "keyword.control.cesium" },
        {
            "match": "\\b(const)\\s+([A-Z_]+)",
            "captures": {
                "1": { "name": "storage.modifier.cesium" },
                "2": { "name": "variable.other.constant.cesium" }
            }
        },
        { "match": "\\b[0-9]+\\b", "name": "constant.numeric.integer.cesium" },
        {
            "match": "\\bFileNotFound\\b",
            "name": "invalid.errorstruct.builtin.cesium variable.other.cesium"
        },
        {
            "match": "((a)b)",
            "captures": {
                "1": { "name": "meta.outer.cesium" },
                "2": { "name": "meta.inner.cesium" }
            }
        }
    ],
    "repository": {
        "comments": {
            "patterns": [
                { "match": "//.*$", "name": "comment.line.double-slash.cesium" },
                { "begin": "/\\*", "end": "\\*/", "name": "comment.block.cesium" }
            ]
        },
        "strings": {
            "begin": "\"",
            "end": "\"",
            "name": "string.quoted.double.cesium",
            "contentName": "meta.string.contents.cesium",
            "patterns": [{ "match": "\\\\.", "name": "constant.character.escape.cesium" }]
        },
        "interpolated": {
            "begin": "`",
            "end": "`",
            "name": "string.interpolated.cesium",
            "patterns": [
                {
                    "begin": "\\{",
                    "end": "\\}",
                    "name": "meta.embedded.line.cesium",
                    "patterns": [{ "include": "$self" }]
                }
            ]
        }
    }
}"##;

fn grammar() -> CompiledGrammar {
    CompiledGrammar::from_json(GRAMMAR).unwrap()
}

fn names(set: &ScopeSet) -> Vec<&str> {
    set.iter().map(Scope::as_str).collect()
}

fn has(doc: &Document, line: usize, column: usize, scope: &str) -> bool {
    doc.scopes_at(line, column)
        .iter()
        .any(|s| s.as_str() == scope)
}

#[test]
fn test_keyword_and_plain_text() {
    let doc = grammar().tokenize("if x");
    assert_eq!(
        names(&doc.scopes_at(0, 0)),
        vec!["keyword.control.cesium", "source.cesium"]
    );
    assert_eq!(names(&doc.scopes_at(0, 3)), vec!["source.cesium"]);
    assert!(doc.scopes_at(0, 4).is_empty());
    assert!(doc.scopes_at(1, 0).is_empty());
}

#[test]
fn test_captures_split_match() {
    let doc = grammar().tokenize("const PI = 3;");
    assert!(has(&doc, 0, 0, "storage.modifier.cesium"));
    assert!(has(&doc, 0, 4, "storage.modifier.cesium"));
    // The space inside the match belongs to no capture.
    assert_eq!(names(&doc.scopes_at(0, 5)), vec!["source.cesium"]);
    assert!(has(&doc, 0, 6, "variable.other.constant.cesium"));
    assert!(has(&doc, 0, 11, "constant.numeric.integer.cesium"));
}

#[test]
fn test_nested_captures_push_outer_group_first() {
    let doc = grammar().tokenize("ab");
    let token = doc.lines[0].token_at(0).unwrap();
    let scopes: Vec<_> = token.scopes.iter().map(Scope::as_str).collect();
    assert_eq!(
        scopes,
        vec!["source.cesium", "meta.outer.cesium", "meta.inner.cesium"]
    );
    assert!(!has(&doc, 0, 1, "meta.inner.cesium"));
    assert!(has(&doc, 0, 1, "meta.outer.cesium"));
}

#[test]
fn test_content_name_excludes_delimiters() {
    let doc = grammar().tokenize("x = \"a\\n\";");
    assert_eq!(
        names(&doc.scopes_at(0, 4)),
        vec!["source.cesium", "string.quoted.double.cesium"]
    );
    assert!(has(&doc, 0, 5, "meta.string.contents.cesium"));
    assert!(has(&doc, 0, 6, "constant.character.escape.cesium"));
    assert!(has(&doc, 0, 7, "constant.character.escape.cesium"));
    assert_eq!(
        names(&doc.scopes_at(0, 8)),
        vec!["source.cesium", "string.quoted.double.cesium"]
    );
    assert_eq!(names(&doc.scopes_at(0, 9)), vec!["source.cesium"]);
}

#[test]
fn test_region_spans_lines() {
    let doc = grammar().tokenize("a /* b\nc */ d");
    assert!(!has(&doc, 0, 0, "comment.block.cesium"));
    assert!(has(&doc, 0, 2, "comment.block.cesium"));
    assert!(has(&doc, 0, 5, "comment.block.cesium"));
    assert!(has(&doc, 1, 0, "comment.block.cesium"));
    assert!(has(&doc, 1, 3, "comment.block.cesium"));
    assert_eq!(names(&doc.scopes_at(1, 5)), vec!["source.cesium"]);
}

#[test]
fn test_multiple_scopes_in_one_name() {
    let doc = grammar().tokenize("FileNotFound e");
    assert_eq!(
        names(&doc.scopes_at(0, 0)),
        vec![
            "invalid.errorstruct.builtin.cesium",
            "source.cesium",
            "variable.other.cesium"
        ]
    );
}

#[test]
fn test_self_include_inside_region() {
    let doc = grammar().tokenize("`a {1} b`");
    assert!(has(&doc, 0, 0, "string.interpolated.cesium"));
    assert!(has(&doc, 0, 3, "meta.embedded.line.cesium"));
    assert!(has(&doc, 0, 4, "constant.numeric.integer.cesium"));
    assert!(has(&doc, 0, 4, "string.interpolated.cesium"));
    assert!(!has(&doc, 0, 7, "meta.embedded.line.cesium"));
    assert!(has(&doc, 0, 8, "string.interpolated.cesium"));
}

#[test]
fn test_earliest_match_wins() {
    let doc = grammar().tokenize("// if");
    assert!(has(&doc, 0, 3, "comment.line.double-slash.cesium"));
    assert!(!has(&doc, 0, 3, "keyword.control.cesium"));
}

#[test]
fn test_columns_count_characters() {
    let doc = grammar().tokenize("\"é\" if");
    assert!(has(&doc, 0, 1, "meta.string.contents.cesium"));
    assert!(has(&doc, 0, 4, "keyword.control.cesium"));
    assert!(has(&doc, 0, 5, "keyword.control.cesium"));
}

#[test]
fn test_blank_lines_keep_line_numbers() {
    let doc = grammar().tokenize("if\n\nreturn");
    assert_eq!(doc.line_count(), 3);
    assert!(doc.lines[1].tokens.is_empty());
    assert!(has(&doc, 2, 0, "keyword.control.cesium"));
}

#[test]
fn test_zero_width_match_terminates() {
    let grammar = CompiledGrammar::from_json(
        r#"{ "name": "Z", "scopeName": "source.z", "patterns": [{ "match": "\\b", "name": "meta.boundary.z" }] }"#,
    )
    .unwrap();
    let doc = grammar.tokenize("ab cd");
    for column in 0..5 {
        assert!(has(&doc, 0, column, "source.z"), "column {column}");
    }
}

#[test]
fn test_tokenize_is_deterministic() {
    let text = "if x\n/* a\nb */ const PI = 1;\n`{FileNotFound}`";
    let grammar = grammar();
    assert_eq!(grammar.tokenize(text), grammar.tokenize(text));
}

// === Compile errors ===

#[test]
fn test_unknown_include_is_an_error() {
    let err = CompiledGrammar::from_json(
        r##"{ "name": "X", "scopeName": "source.x", "patterns": [{ "include": "#nope" }] }"##,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::UnknownInclude(ref name) if name == "#nope"));
}

#[test]
fn test_look_behind_is_rejected() {
    let err = CompiledGrammar::from_json(
        r#"{ "name": "X", "scopeName": "source.x", "patterns": [{ "match": "(?<=a)b" }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::Regex { ref pattern, .. } if pattern == "(?<=a)b"));
}

#[test]
fn test_begin_without_end_is_rejected() {
    let err = CompiledGrammar::from_json(
        r#"{ "name": "X", "scopeName": "source.x", "patterns": [{ "begin": "a" }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::MissingEnd(_)));
}

#[test]
fn test_bad_capture_key_is_rejected() {
    let err = CompiledGrammar::from_json(
        r#"{ "name": "X", "scopeName": "source.x", "patterns": [{ "match": "a", "captures": { "one": { "name": "x" } } }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, GrammarError::InvalidCaptureIndex(_)));
}

#[test]
fn test_external_include_is_skipped() {
    let grammar = CompiledGrammar::from_json(
        r#"{ "name": "X", "scopeName": "source.x", "patterns": [{ "include": "source.js" }] }"#,
    )
    .unwrap();
    assert_eq!(grammar.rule_count(), 1);
    assert_eq!(
        names(&grammar.tokenize("a").scopes_at(0, 0)),
        vec!["source.x"]
    );
}

#[test]
fn test_recursive_repository_compiles_once() {
    let grammar = CompiledGrammar::from_json(
        r##"{
            "name": "X",
            "scopeName": "source.x",
            "patterns": [{ "include": "#parens" }, { "include": "#parens" }],
            "repository": {
                "parens": {
                    "begin": "\\(",
                    "end": "\\)",
                    "name": "meta.parens.x",
                    "patterns": [{ "include": "#parens" }]
                }
            }
        }"##,
    )
    .unwrap();
    // Root plus the single repository rule.
    assert_eq!(grammar.rule_count(), 2);
    let doc = grammar.tokenize("((a))");
    assert!(has(&doc, 0, 2, "meta.parens.x"));
    assert_eq!(names(&doc.scopes_at(0, 2)), vec!["meta.parens.x", "source.x"]);
    let token = doc.lines[0].token_at(2).unwrap();
    assert_eq!(token.scopes.len(), 3);
}
