//! Parser
//!
//!     The parser turns the lexer's token stream into a concrete syntax tree
//!     ([cst::Program]). It is written with chumsky parser combinators over token
//!     kinds; each token's index in the stream is its span, and the full tokens are
//!     looked up from a shared slice so every CST node keeps image and position.
//!
//! Grammar
//!
//!     Program     := (Newline | Declaration)* BlockEnd* EOI
//!     Declaration := StylesBlock | Screen | Component | Modal | Drawer
//!     View        := Keyword Name? ':' Newline Block
//!     StylesBlock := 'styles' ':' Newline BlockStart CssLine+ BlockEnd
//!     Block       := BlockStart Element+ BlockEnd
//!     Element     := ordered choice, see [elements]
//!
//!     Because the lexer already folds leading whitespace into BlockStart and BlockEnd
//!     tokens and classifies line heads, every alternative is decided by its first one
//!     or two tokens. No rule backtracks further than that.
//!
//! Error Recovery
//!
//!     A syntax error never aborts the parse. See [recovery]: the offending line and
//!     any block nested under it are skipped, a diagnostic is recorded, and parsing
//!     continues. The returned tree is therefore best-effort and may contain `Error`
//!     nodes.

pub mod combinators;
pub mod cst;
pub mod declarations;
pub mod elements;
pub mod recovery;

pub use cst::{Declaration, Element, Program};
pub use recovery::rule_stack_at;

use chumsky::{prelude::*, Stream};

use crate::wiremark::diagnostics::Diagnostic;
use crate::wiremark::lexing::Token;
use combinators::Tokens;

/// CST and parser diagnostics for one token stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub cst: Program,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a token stream produced by [lex](crate::wiremark::lexing::lex).
pub fn parse(tokens: &[Token]) -> ParseOutput {
    let shared: Tokens = tokens.into();
    let n = tokens.len();
    let stream = Stream::from_iter(
        n..n + 1,
        tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.kind, i..i + 1))
            .collect::<Vec<_>>()
            .into_iter(),
    );

    let (cst, errors) = declarations::program_parser(shared).parse_recovery(stream);
    let diagnostics = recovery::to_diagnostics(tokens, errors);
    let cst = cst.unwrap_or_default();

    log::debug!(
        "parsed {} declaration(s), {} skipped region(s), {} diagnostic(s)",
        cst.declarations.len(),
        cst.error_count(),
        diagnostics.len()
    );
    ParseOutput { cst, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::cst::{StyleLine, ViewKind};
    use super::*;
    use crate::wiremark::diagnostics::{codes, Stage};
    use crate::wiremark::lexing::lex;

    fn parse_source(source: &str) -> ParseOutput {
        parse(&lex(source).tokens)
    }

    #[test]
    fn test_simple_screen() {
        let output = parse_source("screen Home:\n  # Welcome");
        assert!(output.diagnostics.is_empty());
        let views: Vec<_> = output.cst.views().collect();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].kind, ViewKind::Screen);
        assert_eq!(views[0].name.as_ref().unwrap().image, "Home");
        assert_eq!(views[0].body.elements.len(), 1);
        assert_eq!(views[0].body.elements[0].rule_name(), "heading");
    }

    #[test]
    fn test_all_declaration_kinds() {
        let source = "\
styles:
  primary-color: #3366ff
  radius: 8px
component Card:
  %body
screen Home:
  x
modal Confirm:
  y
drawer Menu:
  - Profile @Profile
";
        let output = parse_source(source);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        let names: Vec<&str> = output
            .cst
            .declarations
            .iter()
            .map(Declaration::rule_name)
            .collect();
        assert_eq!(names, vec!["styles", "component", "screen", "modal", "drawer"]);

        let styles = output.cst.styles().next().unwrap();
        let StyleLine::Property(first) = &styles.lines[0] else {
            panic!("expected a css line");
        };
        assert_eq!(first.name.image, "primary-color");
        assert_eq!(first.value.text(), "#3366ff");
    }

    #[test]
    fn test_error_recovery_keeps_following_declarations() {
        let source = "# stray heading\nscreen Home:\n  x\n";
        let output = parse_source(source);
        assert_eq!(output.diagnostics.len(), 1);
        let diag = &output.diagnostics[0];
        assert_eq!(diag.stage, Stage::Parser);
        assert_eq!(diag.code, codes::PARSER_UNEXPECTED_TOKEN);
        assert_eq!(diag.line, Some(1));
        assert!(diag.message.contains("program > declaration"));
        assert!(diag.hint.as_deref().unwrap().contains("`screen`"));
        assert_eq!(output.cst.declarations.len(), 2);
        assert_eq!(output.cst.views().count(), 1);
    }

    #[test]
    fn test_bad_element_reports_rule_stack() {
        let source = "screen Home:\n  row:\n    <Save> extra\n    <Ok>\n";
        let output = parse_source(source);
        assert_eq!(output.diagnostics.len(), 1);
        let diag = &output.diagnostics[0];
        assert_eq!(diag.line, Some(3));
        assert_eq!(diag.column, Some(12));
        assert_eq!(
            diag.message,
            "unexpected `extra` in program > screen > row > button"
        );
        assert_eq!(output.cst.error_count(), 1);
    }

    #[test]
    fn test_missing_block_is_unexpected_end() {
        let output = parse_source("screen Home:");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, codes::PARSER_UNEXPECTED_END);
        assert!(matches!(output.cst.declarations[0], Declaration::Error(_)));
    }

    #[test]
    fn test_empty_input() {
        let output = parse_source("");
        assert!(output.cst.declarations.is_empty());
        assert!(output.diagnostics.is_empty());
    }
}
