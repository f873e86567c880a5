//! Parser combinator helpers shared by the element and declaration parsers.
//!
//! The parser runs over token kinds, with each token's index in the stream as its
//! span. Full tokens (image and position) are looked up from the shared token
//! slice captured by every combinator.

use chumsky::prelude::*;
use std::ops::Range;
use std::sync::Arc;

use super::cst::TextLine;
use crate::wiremark::lexing::{Token, TokenKind};

/// The token stream being parsed, shared by all combinators.
pub(crate) type Tokens = Arc<[Token]>;

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenKind>;

/// Kinds that may appear inside free text.
pub(crate) const TEXT_PIECES: &[TokenKind] = &[
    TokenKind::Text,
    TokenKind::Colon,
    TokenKind::Pipe,
    TokenKind::Target,
    TokenKind::ComponentRef,
];

/// Kinds that delimit lines and blocks.
pub(crate) const STRUCTURAL: &[TokenKind] =
    &[TokenKind::BlockStart, TokenKind::BlockEnd, TokenKind::Newline];

/// Token at `span`. Spans produced by single-token parsers are always in range.
fn token_at(tokens: &[Token], span: &Range<usize>) -> Token {
    tokens
        .get(span.start)
        .cloned()
        .unwrap_or_else(|| Token::synthetic(TokenKind::Newline, 0, 0, 0))
}

/// Helper: match a specific token kind, returning the full token
pub(crate) fn tok(
    tokens: Tokens,
    kind: TokenKind,
) -> impl Parser<TokenKind, Token, Error = ParserError> + Clone {
    just(kind).map_with_span(move |_, span: Range<usize>| token_at(&tokens, &span))
}

/// Helper: match any token of the given kinds, returning the full token
pub(crate) fn tok_any(
    tokens: Tokens,
    kinds: &'static [TokenKind],
) -> impl Parser<TokenKind, Token, Error = ParserError> + Clone {
    one_of(kinds).map_with_span(move |_, span: Range<usize>| token_at(&tokens, &span))
}

/// Line terminator
pub(crate) fn newline(tokens: Tokens) -> impl Parser<TokenKind, Token, Error = ParserError> + Clone {
    tok(tokens, TokenKind::Newline)
}

/// Zero or more text pieces
pub(crate) fn text_pieces(
    tokens: Tokens,
) -> impl Parser<TokenKind, TextLine, Error = ParserError> + Clone {
    tok_any(tokens, TEXT_PIECES).repeated().map(TextLine::new)
}

/// One or more text pieces
pub(crate) fn text_line(
    tokens: Tokens,
) -> impl Parser<TokenKind, TextLine, Error = ParserError> + Clone {
    tok_any(tokens, TEXT_PIECES)
        .repeated()
        .at_least(1)
        .map(TextLine::new)
}

/// Tokens covered by `span`.
pub(crate) fn tokens_in(tokens: &[Token], span: Range<usize>) -> Vec<Token> {
    let end = span.end.min(tokens.len());
    let start = span.start.min(end);
    tokens[start..end].to_vec()
}
