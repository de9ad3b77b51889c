//! Integration tests for the TOML document pipeline

use pretty_assertions::assert_eq;

use page_solver::layout::lint;
use page_solver::{run, run_with_config, Document, DocumentError, OutlineConfig, RunConfig, RunError};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_brochure_layout() {
    let source = include_str!("fixtures/brochure.toml");
    let report = run(source).expect("Should solve");

    assert!(report.is_ok(), "unexpected failures:\n{}", report);
    insta::assert_snapshot!(report.to_string(), @r###"
== brochure ==
[brochure] x=0.0 y=0.0 w=340.0 h=400.0
  [title] x=20.0 y=20.0 w=300.0 h=40.0
  [side] x=20.0 y=60.0 w=140.0 h=100.0
  [main] x=180.0 y=60.0 w=140.0 h=150.0
  [caption] x=180.0 y=360.0 w=50.0 h=20.0
Score: 8 Fails: 0
"###);
}

#[test]
fn test_brochure_is_lint_clean() {
    let mut doc = Document::from_file(fixture("brochure.toml")).expect("Should load");
    assert_eq!(doc.solver.max_passes, 16);
    doc.solve().expect("Should solve");

    let page = &doc.pages[0];
    let warnings = lint::check(&page.tree, page.root);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_evaluate_reports_unsolved_document() {
    let source = include_str!("fixtures/brochure.toml");
    let report = run_with_config(source, RunConfig::new().with_evaluate_only(true)).expect("Should evaluate");

    let score = &report.pages[0].score;
    assert!(!report.is_ok());
    assert_eq!(score.passes, 0);
    // Every element starts at the page origin with no size
    assert!(report.pages[0].outline.contains("[title] x=0.0 y=0.0 w=0.0 h=40.0"));
}

#[test]
fn test_overflow_moves_to_next_box() {
    let source = include_str!("fixtures/overflow.toml");
    let report = run_with_config(source, RunConfig::new().with_outline(OutlineConfig::new().with_precision(0)))
        .expect("Should solve");

    assert_eq!(
        report.pages[0].outline,
        "[page] x=0 y=0 w=300 h=400\n  [first] x=0 y=0 w=280 h=100\n  [second] x=0 y=150 w=280 h=200\n    [item] x=5 y=155 w=50 h=50\n"
    );
    assert!(report.pages[0].score.overflows.is_empty());
    assert!(report.is_ok());
}

#[test]
fn test_overflow_without_target_is_signalled() {
    let source = include_str!("fixtures/overflow.toml").replace("next = \"second\"", "next = \"third\"");
    let report = run(&source).expect("Should solve");

    let score = &report.pages[0].score;
    assert_eq!(score.overflows.len(), 1);
    assert_eq!(score.overflows[0].to_string(), "item overflows (next: 'third')");
    assert!(report.to_string().contains("overflow: item overflows (next: 'third')"));
}

#[test]
fn test_max_passes_override() {
    let source = r#"
[[pages]]
name = "block"
w = 100
h = 100
conditions = ["shrink2blockwidth"]

[[pages.elements]]
w = 10
h = 10
conditions = ["width(200%)"]
"#;
    let report = run_with_config(source, RunConfig::new().with_max_passes(3)).expect("Should solve");
    assert_eq!(report.pages[0].score.passes, 3);
    assert!(!report.pages[0].score.converged);
}

#[test]
fn test_unknown_condition_error_message() {
    let source = r#"
[[pages]]
name = "page"

[[pages.elements]]
name = "box"
conditions = ["fit2widht"]
"#;
    let err = run(source).unwrap_err();
    assert!(matches!(err, RunError::Document(DocumentError::UnknownCondition { .. })));
    let message = err.to_string();
    assert!(message.starts_with("unknown condition 'fit2widht' on 'box' (did you mean"));
    assert!(message.contains("'fit2width'"));
}

#[test]
fn test_missing_file() {
    let err = Document::from_file(fixture("missing.toml")).unwrap_err();
    assert!(matches!(err, DocumentError::Io(_)));
}
