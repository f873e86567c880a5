//! Element parsers
//!
//! Elements are tried as one ordered choice. Most alternatives are decided by their
//! first token, which the lexer already classified; the few that share a leading kind
//! (an identifier line and a paragraph both start with text pieces) are decided by the
//! second token. Order matters only for those.
//!
//! Containers (layout presets) nest a block of elements, so the element parser is
//! recursive. List-like containers (`list`, `nav`, `fab`) nest a block of `- item`
//! lines instead.

use chumsky::prelude::*;
use chumsky::recovery::skip_parser;

use super::combinators::{newline, text_line, text_pieces, tok, tok_any, ParserError, Tokens};
use super::cst::{
    Block, ButtonLine, ComponentInstance, Element, FabElement, LayoutElement, LeafLine,
    ListBlock, ListElement, ListEntry, ListLine, MarkedText, NavigatorElement, ParagraphLine,
    RadioGroup,
};
use super::recovery::skipped_region;
use crate::wiremark::lexing::{Token, TokenKind};

const BUTTON_MARKERS: &[TokenKind] = &[TokenKind::ButtonVariant, TokenKind::Button];

/// A line holding exactly one significant token
fn leaf(
    tokens: Tokens,
    kind: TokenKind,
) -> impl Parser<TokenKind, LeafLine, Error = ParserError> + Clone {
    tok(tokens.clone(), kind)
        .then(newline(tokens))
        .map(|(token, newline)| LeafLine { token, newline })
}

/// A marker followed by optional free text
fn marked(
    tokens: Tokens,
    kind: TokenKind,
) -> impl Parser<TokenKind, MarkedText, Error = ParserError> + Clone {
    tok(tokens.clone(), kind)
        .then(text_pieces(tokens.clone()))
        .then(newline(tokens))
        .map(|((marker, text), newline)| MarkedText {
            marker,
            text,
            newline,
        })
}

/// `- text`
pub(crate) fn list_line(
    tokens: Tokens,
) -> impl Parser<TokenKind, ListLine, Error = ParserError> + Clone {
    tok(tokens.clone(), TokenKind::ListDash)
        .then(text_pieces(tokens.clone()))
        .then(newline(tokens))
        .map(|((dash, text), newline)| ListLine {
            dash,
            text,
            newline,
        })
}

/// An indented block of list lines. A line that is not a list item is skipped.
pub(crate) fn list_block(
    tokens: Tokens,
) -> impl Parser<TokenKind, ListBlock, Error = ParserError> + Clone {
    let entry = list_line(tokens.clone())
        .map(ListEntry::Item)
        .recover_with(skip_parser(
            skipped_region(tokens.clone()).map(ListEntry::Error),
        ));

    tok(tokens.clone(), TokenKind::BlockStart)
        .then(entry.repeated().at_least(1))
        .then(tok(tokens, TokenKind::BlockEnd))
        .map(|((start, entries), end)| ListBlock {
            start,
            entries,
            end,
        })
}

/// An indented block of elements
pub(crate) fn block<P>(
    tokens: Tokens,
    element: P,
) -> impl Parser<TokenKind, Block, Error = ParserError> + Clone
where
    P: Parser<TokenKind, Element, Error = ParserError> + Clone,
{
    tok(tokens.clone(), TokenKind::BlockStart)
        .then(element.repeated().at_least(1))
        .then(tok(tokens, TokenKind::BlockEnd))
        .map(|((start, elements), end)| Block {
            start,
            elements,
            end,
        })
}

/// `':' NEWLINE <body>` or a bare `NEWLINE`
fn optional_body<B, P>(
    tokens: Tokens,
    body: P,
) -> impl Parser<TokenKind, (Option<Token>, Token, Option<B>), Error = ParserError> + Clone
where
    B: Clone,
    P: Parser<TokenKind, B, Error = ParserError> + Clone,
{
    choice((
        tok(tokens.clone(), TokenKind::Colon)
            .then(newline(tokens.clone()))
            .then(body)
            .map(|((colon, newline), body)| (Some(colon), newline, Some(body))),
        newline(tokens).map(|newline| (None, newline, None)),
    ))
}

/// The recursive element parser, with line-level error recovery.
pub(crate) fn element_parser(
    tokens: Tokens,
) -> impl Parser<TokenKind, Element, Error = ParserError> + Clone {
    recursive(move |element| {
        let t = &tokens;

        let component_instance = tok(t.clone(), TokenKind::ComponentRef)
            .then(text_pieces(t.clone()))
            .then(newline(t.clone()))
            .map(|((reference, values), newline)| {
                Element::ComponentInstance(ComponentInstance {
                    reference,
                    values,
                    newline,
                })
            });

        let button = tok_any(t.clone(), BUTTON_MARKERS)
            .then(tok(t.clone(), TokenKind::Target).or_not())
            .then(newline(t.clone()))
            .map(|((marker, target), newline)| {
                Element::Button(ButtonLine {
                    marker,
                    target,
                    newline,
                })
            });

        let list = tok(t.clone(), TokenKind::ListKw)
            .then(tok(t.clone(), TokenKind::ComponentRef).or_not())
            .then(tok(t.clone(), TokenKind::Colon))
            .then(newline(t.clone()))
            .then(list_block(t.clone()))
            .map(|((((keyword, component), colon), newline), items)| {
                Element::List(ListElement {
                    keyword,
                    component,
                    colon,
                    newline,
                    items,
                })
            });

        let layout = tok(t.clone(), TokenKind::LayoutKw)
            .then(optional_body(t.clone(), block(t.clone(), element.clone())))
            .map(|(keyword, (colon, newline, body))| {
                Element::Layout(LayoutElement {
                    keyword,
                    colon,
                    newline,
                    body,
                })
            });

        let navigator = tok(t.clone(), TokenKind::NavigatorKw)
            .then(optional_body(t.clone(), list_block(t.clone())))
            .map(|(keyword, (colon, newline, items))| {
                Element::Navigator(NavigatorElement {
                    keyword,
                    colon,
                    newline,
                    items,
                })
            });

        let fab = tok(t.clone(), TokenKind::FabKw)
            .then(tok(t.clone(), TokenKind::Text).or_not())
            .then(optional_body(t.clone(), list_block(t.clone())))
            .map(|((keyword, icon), (colon, newline, items))| {
                Element::Fab(FabElement {
                    keyword,
                    icon,
                    colon,
                    newline,
                    items,
                })
            });

        let radio_group = marked(t.clone(), TokenKind::Radio)
            .repeated()
            .at_least(1)
            .map(|options| Element::RadioGroup(RadioGroup { options }));

        let paragraph = text_line(t.clone())
            .then(newline(t.clone()))
            .map(|(text, newline)| Element::Paragraph(ParagraphLine { text, newline }));

        let content = choice((
            choice((
                component_instance,
                button,
                leaf(t.clone(), TokenKind::Link).map(Element::Link),
                leaf(t.clone(), TokenKind::Image).map(Element::Image),
                marked(t.clone(), TokenKind::HeadingMarker).map(Element::Heading),
                marked(t.clone(), TokenKind::QuoteMarker).map(Element::Quote),
                marked(t.clone(), TokenKind::NoteMarker).map(Element::Note),
                marked(t.clone(), TokenKind::MutedMarker).map(Element::Muted),
                leaf(t.clone(), TokenKind::QuotedText).map(Element::QuotedText),
            ))
            .boxed(),
            choice((
                list,
                layout,
                navigator,
                fab,
                leaf(t.clone(), TokenKind::Separator).map(Element::Separator),
                leaf(t.clone(), TokenKind::Input).map(Element::Input),
                radio_group,
                marked(t.clone(), TokenKind::Checkbox).map(Element::Checkbox),
                list_line(t.clone()).map(Element::ListItem),
                leaf(t.clone(), TokenKind::Target).map(Element::Identifier),
                paragraph,
            ))
            .boxed(),
        ));

        content
            .recover_with(skip_parser(
                skipped_region(t.clone()).map(Element::Error),
            ))
            .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiremark::lexing::lex;
    use chumsky::Stream;

    /// Parse the lines of a block body (without the enclosing view).
    fn parse_elements(source: &str) -> (Vec<Element>, usize) {
        let lexed = lex(source);
        let tokens: Tokens = lexed.tokens.clone().into();
        let n = tokens.len();
        let stream = Stream::from_iter(
            n..n + 1,
            lexed
                .tokens
                .iter()
                .enumerate()
                .map(|(i, t)| (t.kind, i..i + 1))
                .collect::<Vec<_>>()
                .into_iter(),
        );
        let parser = element_parser(tokens).repeated().then_ignore(end());
        let (elements, errors) = parser.parse_recovery(stream);
        (elements.unwrap_or_default(), errors.len())
    }

    fn rule_names(elements: &[Element]) -> Vec<&'static str> {
        elements.iter().map(Element::rule_name).collect()
    }

    #[test]
    fn test_single_line_elements() {
        let source = "\
$Card Hello | World
<primary: Save> @Saved
<Cancel>
[Terms](Terms)
![Logo](logo.png)
# Title
> quoted
! careful
~ quiet
\"inline\"
---
[email Email]
[x] Remember me
- lone item
@Home
Plain text
";
        let (elements, errors) = parse_elements(source);
        assert_eq!(errors, 0);
        assert_eq!(
            rule_names(&elements),
            vec![
                "componentInstance",
                "button",
                "button",
                "link",
                "image",
                "heading",
                "quote",
                "note",
                "muted",
                "quotedText",
                "separator",
                "input",
                "checkbox",
                "listItem",
                "identifier",
                "paragraph"
            ]
        );
    }

    #[test]
    fn test_identifier_needs_a_line_of_its_own() {
        let (elements, _) = parse_elements("@Home and more\n");
        assert_eq!(rule_names(&elements), vec!["paragraph"]);
    }

    #[test]
    fn test_consecutive_radios_form_one_group() {
        let (elements, errors) = parse_elements("( ) Small\n(x) Large\nAfter\n");
        assert_eq!(errors, 0);
        assert_eq!(rule_names(&elements), vec!["radioGroup", "paragraph"]);
        match &elements[0] {
            Element::RadioGroup(group) => assert_eq!(group.options.len(), 2),
            other => panic!("expected a radio group, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_nests_elements() {
        let (elements, errors) = parse_elements("row(center):\n  <Save>\n  card:\n    Hi\nrow\n");
        assert_eq!(errors, 0);
        assert_eq!(rule_names(&elements), vec!["layout", "layout"]);
        let Element::Layout(row) = &elements[0] else {
            panic!("expected a layout");
        };
        let body = row.body.as_ref().unwrap();
        assert_eq!(rule_names(&body.elements), vec!["button", "layout"]);
        let Element::Layout(bare) = &elements[1] else {
            panic!("expected a layout");
        };
        assert!(bare.colon.is_none());
        assert!(bare.body.is_none());
    }

    #[test]
    fn test_list_like_containers() {
        let source = "\
list $Card:
  - First | One
  - Second | Two
nav:
  - Home @Home
fab +:
  - New @Editor
fab
";
        let (elements, errors) = parse_elements(source);
        assert_eq!(errors, 0);
        assert_eq!(rule_names(&elements), vec!["list", "navigator", "fab", "fab"]);
        let Element::List(list) = &elements[0] else {
            panic!("expected a list");
        };
        assert_eq!(list.component.as_ref().unwrap().image, "$Card");
        assert_eq!(list.items.items().count(), 2);
        let Element::Fab(fab) = &elements[2] else {
            panic!("expected a fab");
        };
        assert_eq!(fab.icon.as_ref().unwrap().image, "+");
    }

    #[test]
    fn test_bad_line_is_skipped_with_its_block() {
        let source = "<Save> trailing words\n  nested\n    deeper\nAfter\n";
        let (elements, errors) = parse_elements(source);
        assert_eq!(errors, 1);
        assert_eq!(rule_names(&elements), vec!["error", "paragraph"]);
        let Element::Error(skipped) = &elements[0] else {
            panic!("expected a skipped region");
        };
        assert!(skipped.tokens.iter().any(|t| t.image == "deeper"));
    }

    #[test]
    fn test_bad_list_line_is_skipped_inside_the_list() {
        let (elements, errors) = parse_elements("nav:\n  - Home\n  Stray\n  - Away\n");
        assert_eq!(errors, 1);
        let Element::Navigator(nav) = &elements[0] else {
            panic!("expected a navigator");
        };
        let items = nav.items.as_ref().unwrap();
        assert_eq!(items.items().count(), 2);
        assert_eq!(items.error_count(), 1);
    }
}
