//! Compilation pipeline
//!
//! Runs the stages in order and merges their diagnostics:
//!
//! ```text
//! source → lex → parse → build → assign_ids → CompileResult { ast, errors }
//! ```
//!
//! No stage stops the pipeline. A lexer halt (inconsistent dedent) still hands the
//! tokens produced so far to the parser, and the parser always returns a tree, so a
//! document with problems yields a best-effort AST together with every diagnostic.

use serde::{Deserialize, Serialize};

use crate::wiremark::ast::AstForest;
use crate::wiremark::building::build;
use crate::wiremark::diagnostics::{worst_severity, Diagnostic, Diagnostics, Severity, Stage};
use crate::wiremark::identity::assign_ids;
use crate::wiremark::lexing::{lex_with_options, LexOptions};
use crate::wiremark::parsing::parse;

/// Knobs for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub lex: LexOptions,
    /// Reuse ids from the previous AST when one is supplied.
    pub reuse_previous: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            lex: LexOptions::default(),
            reuse_previous: true,
        }
    }
}

/// Final AST and all diagnostics, ordered lexer → parser → builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    pub ast: AstForest,
    pub errors: Vec<Diagnostic>,
}

impl CompileResult {
    pub fn worst_severity(&self) -> Option<Severity> {
        worst_severity(&self.errors)
    }

    /// Any diagnostic of severity error or fatal.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }
}

/// Compile `source` with default options.
pub fn compile(source: &str, previous: Option<&AstForest>) -> CompileResult {
    compile_with_options(source, previous, &CompileOptions::default())
}

pub fn compile_with_options(
    source: &str,
    previous: Option<&AstForest>,
    options: &CompileOptions,
) -> CompileResult {
    let mut diagnostics = Diagnostics::new();

    let lexed = lex_with_options(source, &options.lex);
    diagnostics.extend_stage(Stage::Lexer, lexed.diagnostics);

    let parsed = parse(&lexed.tokens);
    diagnostics.extend_stage(Stage::Parser, parsed.diagnostics);

    let built = build(&parsed.cst);
    diagnostics.extend_stage(Stage::Builder, built.diagnostics);

    let previous = previous.filter(|_| options.reuse_previous);
    let ast = assign_ids(&built.ast, previous);

    CompileResult {
        ast,
        errors: diagnostics.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiremark::ast::NodeType;
    use crate::wiremark::diagnostics::codes;

    #[test]
    fn test_clean_document() {
        let result = compile("screen Home:\n  # Welcome\n", None);
        assert!(result.errors.is_empty());
        assert!(!result.has_errors());
        assert_eq!(result.worst_severity(), None);
        assert_eq!(result.ast.nodes[0].node_type, NodeType::Screen);
        assert!(result.ast.walk().all(|n| !n.id.is_empty()));
    }

    #[test]
    fn test_diagnostics_are_ordered_by_stage() {
        let source = "screen home:\n  row:\n    <Save> extra\n  # Title ^\n";
        let result = compile(source, None);
        let stages: Vec<Stage> = result.errors.iter().map(|d| d.stage).collect();
        let mut sorted = stages.clone();
        sorted.sort();
        assert_eq!(stages, sorted);
        assert!(stages.contains(&Stage::Lexer));
        assert!(stages.contains(&Stage::Parser));
        assert!(stages.contains(&Stage::Builder));
        assert_eq!(result.worst_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_lexer_halt_is_fatal_but_returns_an_ast() {
        let source = "screen Home:\n    a\n  b\n";
        let result = compile(source, None);
        assert_eq!(result.errors[0].code, codes::LEXER_INCONSISTENT_DEDENT);
        assert_eq!(result.worst_severity(), Some(Severity::Fatal));
        assert!(result.has_errors());
    }

    #[test]
    fn test_reuse_can_be_disabled() {
        let mut previous = compile("screen Home:\n  <Save>\n", None).ast;
        previous.nodes[0].children[0].id = "button_abc123".to_string();

        let reused = compile("screen Home:\n  <Save>\n", Some(&previous));
        assert_eq!(reused.ast.nodes[0].children[0].id, "button_abc123");

        let options = CompileOptions {
            reuse_previous: false,
            ..CompileOptions::default()
        };
        let fresh = compile_with_options("screen Home:\n  <Save>\n", Some(&previous), &options);
        assert_ne!(fresh.ast.nodes[0].children[0].id, "button_abc123");
    }

    #[test]
    fn test_sentences_starting_with_keywords_are_paragraphs() {
        let source = "screen Home:\n  row of buttons below\n  list all items here\n  center the logo\n";
        let result = compile(source, None);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let texts: Vec<Option<&str>> = result.ast.nodes[0]
            .children
            .iter()
            .map(|child| {
                assert_eq!(child.node_type, NodeType::Paragraph);
                child.prop_str("text")
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                Some("row of buttons below"),
                Some("list all items here"),
                Some("center the logo"),
            ]
        );
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let source = "screen Home:\n  <Ok>\n  <Ok>\n  list $Card:\n    - a | b\n";
        assert_eq!(compile(source, None), compile(source, None));
    }
}
