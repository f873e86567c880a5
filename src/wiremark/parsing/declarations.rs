//! Top-level declarations: views, styles and the whole program.

use chumsky::prelude::*;
use chumsky::recovery::skip_parser;

use super::combinators::{newline, text_pieces, tok, ParserError, Tokens};
use super::cst::{
    Block, CssLine, Declaration, Program, StyleLine, StylesBlock, ViewDecl, ViewKind,
};
use super::elements::{block, element_parser};
use super::recovery::skipped_region;
use crate::wiremark::lexing::{Token, TokenKind};

/// `Keyword Name? ':' NEWLINE Block` for one view kind
fn view<P>(
    tokens: Tokens,
    keyword: TokenKind,
    kind: ViewKind,
    body: P,
) -> impl Parser<TokenKind, Declaration, Error = ParserError> + Clone
where
    P: Parser<TokenKind, Block, Error = ParserError> + Clone,
{
    tok(tokens.clone(), keyword)
        .then(tok(tokens.clone(), TokenKind::Text).or_not())
        .then(tok(tokens.clone(), TokenKind::Colon))
        .then(newline(tokens))
        .then(body)
        .map(move |((((keyword, name), colon), newline), body)| {
            Declaration::View(ViewDecl {
                kind,
                keyword,
                name,
                colon,
                newline,
                body,
            })
        })
}

/// `name ':' value`
fn css_line(tokens: Tokens) -> impl Parser<TokenKind, CssLine, Error = ParserError> + Clone {
    tok(tokens.clone(), TokenKind::Text)
        .then(tok(tokens.clone(), TokenKind::Colon))
        .then(text_pieces(tokens.clone()))
        .then(newline(tokens))
        .map(|(((name, colon), value), newline)| CssLine {
            name,
            colon,
            value,
            newline,
        })
}

/// `styles ':' NEWLINE BlockStart CssLine+ BlockEnd`
fn styles(tokens: Tokens) -> impl Parser<TokenKind, Declaration, Error = ParserError> + Clone {
    let line = css_line(tokens.clone())
        .map(StyleLine::Property)
        .recover_with(skip_parser(
            skipped_region(tokens.clone()).map(StyleLine::Error),
        ));

    tok(tokens.clone(), TokenKind::StylesKw)
        .then(tok(tokens.clone(), TokenKind::Colon))
        .then(newline(tokens.clone()))
        .then(tok(tokens.clone(), TokenKind::BlockStart))
        .then(line.repeated().at_least(1))
        .then(tok(tokens, TokenKind::BlockEnd))
        .map(|(((((keyword, colon), newline), start), lines), end)| {
            Declaration::Styles(StylesBlock {
                keyword,
                colon,
                newline,
                start,
                lines,
                end,
            })
        })
}

/// One top-level item: a declaration or a stray line terminator.
#[derive(Debug, Clone)]
enum TopLevel {
    Declaration(Declaration),
    Trailing(Token),
}

/// `(Newline | Declaration)* BlockEnd* EOI`
pub(crate) fn program_parser(
    tokens: Tokens,
) -> impl Parser<TokenKind, Program, Error = ParserError> + Clone {
    let body = block(tokens.clone(), element_parser(tokens.clone())).boxed();

    let declaration = choice((
        styles(tokens.clone()),
        view(tokens.clone(), TokenKind::ScreenKw, ViewKind::Screen, body.clone()),
        view(tokens.clone(), TokenKind::ComponentKw, ViewKind::Component, body.clone()),
        view(tokens.clone(), TokenKind::ModalKw, ViewKind::Modal, body.clone()),
        view(tokens.clone(), TokenKind::DrawerKw, ViewKind::Drawer, body),
    ))
    .recover_with(skip_parser(
        skipped_region(tokens.clone()).map(Declaration::Error),
    ));

    choice((
        tok(tokens.clone(), TokenKind::Newline).map(TopLevel::Trailing),
        tok(tokens, TokenKind::BlockEnd).map(TopLevel::Trailing),
        declaration.map(TopLevel::Declaration),
    ))
    .repeated()
    .then_ignore(end())
    .map(|items| {
        let mut program = Program::default();
        for item in items {
            match item {
                TopLevel::Declaration(declaration) => program.declarations.push(declaration),
                TopLevel::Trailing(token) => program.trailing.push(token),
            }
        }
        program
    })
}
