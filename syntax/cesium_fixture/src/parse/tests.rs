use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scopes(names: &[&str]) -> Vec<Scope> {
    names.iter().map(|n| Scope::new(n).unwrap()).collect()
}

// === Header ===

#[test]
fn test_header_parsed_from_first_non_blank_line() {
    let fixture =
        parse_fixture("\n\n// SYNTAX TEST \"source.cesium\" \"Keyword Tests\"\n").unwrap();
    assert_eq!(
        fixture.header,
        Some(FixtureHeader {
            comment_token: "//".into(),
            scope_name: "source.cesium".into(),
            suite: "Keyword Tests".into(),
        })
    );
    assert_eq!(fixture.suite_name(), Some("Keyword Tests"));
    assert_eq!(fixture.scope_name(), Some("source.cesium"));
}

#[test]
fn test_missing_header_is_not_an_error() {
    let fixture = parse_fixture("const x = 1;\n// <- storage.modifier.cesium\n").unwrap();
    assert_eq!(fixture.header, None);
    assert_eq!(fixture.assertion_count(), 1);
}

#[test]
fn test_header_sets_comment_token() {
    let text = "# SYNTAX TEST \"source.other\" \"Hash comments\"\nvalue\n# ^^^ variable.other\n";
    let fixture = parse_fixture(text).unwrap();
    let assertion = fixture.assertions().next().unwrap();
    assert_eq!(assertion.span, ColumnSpan::new(2, 4));
    assert_eq!(assertion.source_line, 1);
}

// === Annotations ===

#[test]
fn test_arrow_points_at_first_non_whitespace_column() {
    let text = "const value = 42;\n// <- storage.modifier.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    let assertions: Vec<_> = fixture.assertions().collect();
    assert_eq!(assertions.len(), 1);
    assert_eq!(assertions[0].kind, AnnotationKind::Arrow);
    assert_eq!(assertions[0].span, ColumnSpan::single(0));
    assert_eq!(assertions[0].source_line, 0);
    assert_eq!(assertions[0].annotation_line, 1);
    assert_eq!(assertions[0].expected, scopes(&["storage.modifier.cesium"]));
}

#[test]
fn test_arrow_skips_indentation_of_target() {
    let text = "    break;\n// <- keyword.control.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(
        fixture.assertions().next().unwrap().span,
        ColumnSpan::single(4)
    );
}

#[test]
fn test_arrow_with_tildes_and_dashes() {
    let text = "    return x;\n// <~~--- keyword.control.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(
        fixture.assertions().next().unwrap().span,
        ColumnSpan::new(6, 8)
    );
}

#[test]
fn test_caret_columns_are_absolute() {
    let text = "union Number = i32|f64|u64;\n//    ^^^^^^ entity.name.type.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    let assertion = fixture.assertions().next().unwrap();
    assert_eq!(assertion.kind, AnnotationKind::CaretRun);
    assert_eq!(assertion.span, ColumnSpan::new(6, 11));
    assert_eq!(
        &fixture.lines[0].text[assertion.span.start..=assertion.span.end],
        "Number"
    );
}

#[test]
fn test_caret_directly_after_comment_token() {
    let text = "const PI = 3.14;\n//^^^ storage.modifier.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(
        fixture.assertions().next().unwrap().span,
        ColumnSpan::new(2, 4)
    );
}

#[test]
fn test_single_caret_kind() {
    let text = "x = a|b;\n//   ^ keyword.operator.bitwise.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    let assertion = fixture.assertions().next().unwrap();
    assert_eq!(assertion.kind, AnnotationKind::Caret);
    assert_eq!(assertion.span, ColumnSpan::single(5));
}

#[test]
fn test_multiple_scopes_keep_declared_order() {
    let text = "FileNotFound fileErr;\n//^^^^^^^^^^ invalid.errorstruct.builtin.cesium variable.other.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(
        fixture.assertions().next().unwrap().expected,
        scopes(&["invalid.errorstruct.builtin.cesium", "variable.other.cesium"])
    );
}

#[test]
fn test_excluded_scopes_after_dash() {
    let text = "MyData result;\n//^^^^ entity.name.type.cesium - invalid.errorstruct.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    let assertion = fixture.assertions().next().unwrap();
    assert_eq!(assertion.expected, scopes(&["entity.name.type.cesium"]));
    assert_eq!(assertion.excluded, scopes(&["invalid.errorstruct.cesium"]));
}

#[test]
fn test_several_caret_runs_on_one_line() {
    let text = "a | b | c\n//^   ^ keyword.operator.bitwise.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    let spans: Vec<_> = fixture.assertions().map(|a| a.span).collect();
    assert_eq!(spans, vec![ColumnSpan::single(2), ColumnSpan::single(6)]);
}

#[test]
fn test_stacked_annotations_share_target() {
    let text = "    return false;\n\
                //  ^^^^^^ keyword.control.cesium\n\
                //         ^^^^^ constant.language.cesium\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(fixture.lines.len(), 1);
    let line = &fixture.lines[0];
    assert_eq!(line.assertions.len(), 2);
    assert!(line.assertions.iter().all(|a| a.source_line == 0));
    assert_eq!(line.assertions[0].span, ColumnSpan::new(4, 9));
    assert_eq!(line.assertions[1].span, ColumnSpan::new(11, 15));
    assert_eq!(line.assertions[1].annotation_line, 2);
}

#[test]
fn test_plain_comments_are_source_lines() {
    let text = "// Test numbers\n// <3 cesium\ni32 x = 1;\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(fixture.lines.len(), 3);
    assert_eq!(fixture.assertion_count(), 0);
}

#[test]
fn test_source_line_lookup() {
    let text = "a\n// <- variable.other.cesium\nb\n";
    let fixture = parse_fixture(text).unwrap();
    assert_eq!(fixture.source_line(2).unwrap().text, "b");
    assert!(fixture.source_line(1).is_none());
}

// === Malformed fixtures ===

#[test]
fn test_span_past_end_of_line_is_malformed() {
    // From identifiers.cs: carets overshoot the identifier.
    let text = "// SYNTAX TEST \"source.cesium\" \"Identifiers\"\nvariable_name\n// ^^^^^^^^^^^^^ variable.other.cesium\n";
    let err = parse_fixture(text).unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(
        err.kind,
        FixtureErrorKind::SpanOutOfBounds {
            target_line: 1,
            span: ColumnSpan::new(3, 15),
            line_len: 13,
        }
    );
    assert_eq!(
        err.to_string(),
        "malformed fixture at line 3: columns 3-15 are outside line 2 (13 characters)"
    );
}

#[test]
fn test_annotation_without_target_is_malformed() {
    let err = parse_fixture("// ^^ keyword.control.cesium\n").unwrap_err();
    assert_eq!(err.line, 1);
    assert_eq!(err.kind, FixtureErrorKind::NoTargetLine);
}

#[test]
fn test_annotation_without_scopes_is_malformed() {
    let err = parse_fixture("if\n// ^^\n").unwrap_err();
    assert_eq!(err.kind, FixtureErrorKind::MissingScopes);
}

#[test]
fn test_arrow_without_dash_is_malformed() {
    let err = parse_fixture("if\n// <~~ keyword.control.cesium\n").unwrap_err();
    assert_eq!(err.kind, FixtureErrorKind::EmptyArrow);
}

#[test]
fn test_arrow_on_blank_line_is_out_of_bounds() {
    let err = parse_fixture("   \n// <- keyword.control.cesium\n").unwrap_err();
    assert!(matches!(
        err.kind,
        FixtureErrorKind::SpanOutOfBounds { target_line: 0, .. }
    ));
}

#[test]
fn test_first_error_aborts_parse() {
    let text = "x\n// ^^^^ variable.other.cesium\ny\n// ^^^^ variable.other.cesium\n";
    let err = parse_fixture(text).unwrap_err();
    assert_eq!(err.line, 2);
}

// === Properties ===

proptest! {
    #[test]
    fn caret_span_maps_onto_annotated_text(
        prefix in "[a-z ]{0,20}",
        word in "[a-zA-Z_]{1,12}",
        suffix in "[a-z;]{0,10}",
    ) {
        let line = format!("{prefix}{word}{suffix}");
        let start = prefix.chars().count();
        let padding = start.saturating_sub(2);
        // Annotation needs room for the comment token before the carets.
        prop_assume!(start >= 2);
        let annotation = format!(
            "//{}{} variable.other.cesium",
            " ".repeat(padding),
            "^".repeat(word.len())
        );
        let fixture = parse_fixture(&format!("{line}\n{annotation}\n")).unwrap();
        let assertion = fixture.assertions().next().unwrap();
        let covered: String = line
            .chars()
            .skip(assertion.span.start)
            .take(assertion.span.width())
            .collect();
        prop_assert_eq!(covered, word);
    }

    #[test]
    fn parse_is_deterministic(text in "[a-z/^<\\- .\n]{0,200}") {
        let first = parse_fixture(&text);
        let second = parse_fixture(&text);
        prop_assert_eq!(first, second);
    }
}
