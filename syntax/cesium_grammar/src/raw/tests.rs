use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_from_json_reads_textmate_field_names() {
    let grammar = RawGrammar::from_json(
        r##"{
            "$schema": "https://raw.githubusercontent.com/martinring/tmlanguage/master/tmlanguage.json",
            "name": "Cesium",
            "scopeName": "source.cesium",
            "fileTypes": ["cs"],
            "patterns": [{ "include": "#strings" }],
            "repository": {
                "strings": {
                    "name": "string.quoted.double.cesium",
                    "begin": "\"",
                    "end": "\"",
                    "beginCaptures": { "0": { "name": "punctuation.definition.string.begin.cesium" } },
                    "patterns": [{ "match": "\\\\.", "name": "constant.character.escape.cesium" }]
                }
            }
        }"##,
    )
    .unwrap();

    assert_eq!(grammar.name, "Cesium");
    assert_eq!(grammar.scope_name, "source.cesium");
    assert_eq!(grammar.file_types, vec!["cs".to_string()]);
    assert_eq!(grammar.patterns[0].include.as_deref(), Some("#strings"));

    let strings = &grammar.repository["strings"];
    assert_eq!(strings.begin.as_deref(), Some("\""));
    assert_eq!(strings.patterns[0].match_.as_deref(), Some("\\\\."));
    assert_eq!(
        strings.begin_captures.as_ref().unwrap()["0"].name.as_deref(),
        Some("punctuation.definition.string.begin.cesium")
    );
}

#[test]
fn test_missing_scope_name_is_rejected() {
    let err = RawGrammar::from_json(r#"{ "name": "Cesium" }"#).unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
}

#[test]
fn test_blank_scope_name_is_rejected() {
    let err = RawGrammar::from_json(r#"{ "name": "Cesium", "scopeName": " " }"#).unwrap_err();
    assert!(matches!(err, GrammarError::EmptyField("scopeName")));
}

#[test]
fn test_load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.tmGrammar.json");
    let err = RawGrammar::load(&path).unwrap_err();
    assert!(matches!(err, GrammarError::Io { .. }));
    assert!(err.to_string().contains("missing.tmGrammar.json"));
}

#[test]
fn test_serialize_skips_absent_fields() {
    let grammar = RawGrammar {
        name: "Cesium".into(),
        scope_name: "source.cesium".into(),
        patterns: vec![RawRule {
            match_: Some("\\bif\\b".into()),
            name: Some("keyword.control.cesium".into()),
            ..RawRule::default()
        }],
        ..RawGrammar::default()
    };
    let json = serde_json::to_string(&grammar).unwrap();
    assert_eq!(
        json,
        r#"{"name":"Cesium","scopeName":"source.cesium","patterns":[{"name":"keyword.control.cesium","match":"\\bif\\b"}]}"#
    );
}
