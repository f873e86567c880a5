//! Error recovery and parse diagnostics
//!
//!     When no alternative matches at a decision point, the parser does not give up.
//!     It records the failure and skips the offending line together with any block
//!     nested under it, then resumes with the next line at the same level. The skipped
//!     tokens stay in the CST as an `Error` node.
//!
//!     Skipping works on line and block structure only, which the lexer guarantees is
//!     balanced: every content line ends with a Newline and every BlockStart has a
//!     matching BlockEnd. A skip therefore always lands on a line boundary at the
//!     level where the error happened.
//!
//! Diagnostics
//!
//!     Chumsky reports what it found, what it expected and where. The "where" is turned
//!     into a readable stack of open rules (`program > screen > row > button`) by
//!     replaying the line and block structure of the tokens before the error.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::collections::BTreeSet;
use std::ops::Range;

use super::combinators::{tokens_in, ParserError, Tokens, STRUCTURAL};
use super::cst::Skipped;
use crate::wiremark::diagnostics::{codes, Diagnostic, Severity, Stage};
use crate::wiremark::lexing::{Token, TokenKind};

/// A line of non-structural tokens and its terminator, optionally followed by the
/// block nested under it, or a bare nested block.
pub(crate) fn skipped_region(
    tokens: Tokens,
) -> impl Parser<TokenKind, Skipped, Error = ParserError> + Clone {
    let nested = recursive(|nested| {
        let inner_line = none_of(STRUCTURAL)
            .repeated()
            .then(just(TokenKind::Newline))
            .ignored();
        just(TokenKind::BlockStart)
            .then(choice((inner_line, nested)).repeated())
            .then(just(TokenKind::BlockEnd))
            .ignored()
    });

    let line = none_of(STRUCTURAL)
        .repeated()
        .at_least(1)
        .then(just(TokenKind::Newline))
        .then(nested.clone().or_not())
        .ignored();

    choice((line, nested))
        .map_with_span(move |_, span: Range<usize>| Skipped::new(tokens_in(&tokens, span)))
}

/// Rule name for a line starting with `head`, given the enclosing rule.
fn line_rule(head: &Token, enclosing: &str) -> String {
    let name = match head.kind {
        TokenKind::ScreenKw => "screen",
        TokenKind::ModalKw => "modal",
        TokenKind::DrawerKw => "drawer",
        TokenKind::ComponentKw => "component",
        TokenKind::StylesKw => "styles",
        TokenKind::LayoutKw => {
            let preset = head.image.split('(').next().unwrap_or(&head.image);
            return preset.to_string();
        }
        TokenKind::NavigatorKw => "navigator",
        TokenKind::FabKw => "fab",
        TokenKind::ListKw => "list",
        TokenKind::ComponentRef => "componentInstance",
        TokenKind::ButtonVariant | TokenKind::Button => "button",
        TokenKind::Link => "link",
        TokenKind::Image => "image",
        TokenKind::HeadingMarker => "heading",
        TokenKind::QuoteMarker => "quote",
        TokenKind::NoteMarker => "note",
        TokenKind::MutedMarker => "muted",
        TokenKind::QuotedText => "quotedText",
        TokenKind::Separator => "separator",
        TokenKind::Input => "input",
        TokenKind::Radio => "radioGroup",
        TokenKind::Checkbox => "checkbox",
        TokenKind::ListDash => "listItem",
        TokenKind::Target => "identifier",
        _ if enclosing == "program" => "declaration",
        _ if enclosing == "styles" => "cssLine",
        _ => "paragraph",
    };
    name.to_string()
}

/// Stack of rules open at token `index`, outermost first.
pub fn rule_stack_at(tokens: &[Token], index: usize) -> Vec<String> {
    let mut stack = vec!["program".to_string()];
    let mut current: Option<String> = None;
    let mut at_line_head = true;

    for token in tokens.iter().take(index) {
        match token.kind {
            TokenKind::BlockStart => {
                stack.push(current.take().unwrap_or_else(|| "block".to_string()));
                at_line_head = true;
            }
            TokenKind::BlockEnd => {
                if stack.len() > 1 {
                    stack.pop();
                }
                current = None;
                at_line_head = true;
            }
            TokenKind::Newline => at_line_head = true,
            _ if at_line_head => {
                let enclosing = stack.last().map(String::as_str).unwrap_or("program");
                current = Some(line_rule(token, enclosing));
                at_line_head = false;
            }
            _ => {}
        }
    }

    if at_line_head {
        let rule = if stack.len() == 1 { "declaration" } else { "element" };
        stack.push(rule.to_string());
    } else if let Some(rule) = current {
        stack.push(rule);
    }
    stack
}

/// Readable list of what the parser would have accepted.
fn expected_hint(error: &ParserError) -> Option<String> {
    let expected: BTreeSet<Option<TokenKind>> = error.expected().cloned().collect();
    let mut descriptions: Vec<&str> = Vec::new();
    for kind in &expected {
        let description = match kind {
            Some(kind) => kind.describe(),
            None => "end of input",
        };
        if !descriptions.contains(&description) {
            descriptions.push(description);
        }
    }
    match descriptions.as_slice() {
        [] => None,
        [only] => Some(format!("expected {}", only)),
        many => Some(format!("expected one of: {}", many.join(", "))),
    }
}

/// Convert one chumsky error into a parser diagnostic.
pub(crate) fn to_diagnostic(tokens: &[Token], error: &ParserError) -> Diagnostic {
    let index = error.span().start;
    let stack = rule_stack_at(tokens, index).join(" > ");

    let (code, message) = match (error.reason(), error.found()) {
        (SimpleReason::Custom(message), _) => {
            (codes::PARSER_UNEXPECTED_TOKEN, format!("{} in {}", message, stack))
        }
        (_, None) => (
            codes::PARSER_UNEXPECTED_END,
            format!("unexpected end of input in {}", stack),
        ),
        (_, Some(kind)) => {
            let found = match kind {
                TokenKind::Newline => "end of line".to_string(),
                TokenKind::BlockStart => "indentation".to_string(),
                TokenKind::BlockEnd => "end of block".to_string(),
                _ => tokens
                    .get(index)
                    .map(|t| format!("`{}`", t.image.trim_end()))
                    .unwrap_or_else(|| kind.describe().to_string()),
            };
            (
                codes::PARSER_UNEXPECTED_TOKEN,
                format!("unexpected {} in {}", found, stack),
            )
        }
    };

    let mut diagnostic = Diagnostic::new(Stage::Parser, Severity::Error, code, message);
    if let Some(token) = tokens.get(index) {
        diagnostic = diagnostic.at(token.line, token.column);
        if token.width() > 0 && token.kind != TokenKind::Newline {
            diagnostic = diagnostic.with_length(token.width());
        }
    } else if let Some(last) = tokens.last() {
        diagnostic = diagnostic.at(last.line, last.column + last.width());
    }
    if let Some(hint) = expected_hint(error) {
        diagnostic = diagnostic.with_hint(hint);
    }
    diagnostic
}

/// Convert chumsky errors into diagnostics, in source order.
pub(crate) fn to_diagnostics(tokens: &[Token], mut errors: Vec<ParserError>) -> Vec<Diagnostic> {
    errors.sort_by_key(|e| e.span().start);
    errors.iter().map(|e| to_diagnostic(tokens, e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiremark::lexing::lex;

    #[test]
    fn test_rule_stack_inside_nested_block() {
        let tokens = lex("screen Home:\n  row:\n    <Save>\n").tokens;
        let button = tokens
            .iter()
            .position(|t| t.kind == TokenKind::Button)
            .unwrap();
        assert_eq!(
            rule_stack_at(&tokens, button).join(" > "),
            "program > screen > row > element"
        );
        assert_eq!(
            rule_stack_at(&tokens, button + 1).join(" > "),
            "program > screen > row > button"
        );
    }

    #[test]
    fn test_rule_stack_after_block_closes() {
        let tokens = lex("screen Home:\n  row:\n    x\n  y\n").tokens;
        let y = tokens.iter().position(|t| t.image == "y").unwrap();
        assert_eq!(
            rule_stack_at(&tokens, y).join(" > "),
            "program > screen > element"
        );
    }

    #[test]
    fn test_rule_stack_at_top_level() {
        let tokens = lex("# stray\n").tokens;
        assert_eq!(rule_stack_at(&tokens, 0), vec!["program", "declaration"]);
        let styles = lex("styles:\n  color red\n").tokens;
        let text = styles.iter().position(|t| t.image == "color red").unwrap();
        assert_eq!(
            rule_stack_at(&styles, text + 1).join(" > "),
            "program > styles > cssLine"
        );
    }

    #[test]
    fn test_expected_hint_is_sorted_and_deduplicated() {
        let error = ParserError::expected_input_found(
            3..4,
            vec![
                Some(TokenKind::Button),
                Some(TokenKind::Colon),
                Some(TokenKind::ButtonVariant),
            ],
            Some(TokenKind::Pipe),
        );
        assert_eq!(
            expected_hint(&error).as_deref(),
            Some("expected one of: a button, `:`")
        );
    }
}
