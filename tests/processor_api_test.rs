//! Processor API over the sample documents

use wiremark::wiremark::error::ProcessingError;
use wiremark::wiremark::processor::{
    available_formats, process, read_previous, read_source, ProcessingSpec, ProcessingStage,
};
use wiremark::AstForest;

fn render(format: &str, path: &str) -> String {
    let spec = ProcessingSpec::from_string(format).unwrap();
    let source = read_source(path).unwrap();
    process(&source, &spec, None).unwrap()
}

#[test]
fn test_every_format_renders_every_sample() {
    for sample in ["samples/kitchen-sink.wm", "samples/login.wm", "samples/problems.wm"] {
        for format in available_formats() {
            let output = render(format, sample);
            assert!(!output.is_empty(), "{} produced nothing for {}", format, sample);
        }
    }
}

#[test]
fn test_stage_names() {
    assert_eq!(
        ProcessingSpec::from_string("cst-debug").unwrap().stage,
        ProcessingStage::Cst
    );
    assert_eq!(available_formats().len(), 8);
    assert!(available_formats().contains(&"ast-treeviz"));
}

#[test]
fn test_token_simple_starts_with_the_keyword() {
    let output = render("token-simple", "samples/login.wm");
    assert!(output.starts_with("<screen-kw:screen>"), "{}", output);
}

#[test]
fn test_ast_json_is_a_forest() {
    let forest: AstForest = serde_json::from_str(&render("ast-json", "samples/login.wm")).unwrap();
    assert_eq!(forest.nodes.len(), 3);
}

#[test]
fn test_treeviz_header() {
    let output = render("ast-treeviz", "samples/kitchen-sink.wm");
    assert!(output.starts_with("⧉ 5 declaration(s)"), "{}", output);
}

#[test]
fn test_diagnostics_of_a_clean_document() {
    let output = render("diagnostics-simple", "samples/login.wm");
    assert_eq!(output.trim_end(), "no problems");
}

#[test]
fn test_diagnostics_json_lists_problems() {
    let output = render("diagnostics-json", "samples/problems.wm");
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(5));
}

#[test]
fn test_read_previous_rejects_other_json() {
    let dir = std::env::temp_dir().join("wiremark-processor-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("not-an-ast.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(matches!(
        read_previous(&path),
        Err(ProcessingError::InvalidPrevious(_))
    ));
}
