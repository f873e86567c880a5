//! Ordered token table
//!
//! Token matching is first-match-wins, not longest-match. Entries are tried in
//! declaration order and the first pattern that matches at the current position
//! produces the token. Several constructs share a textual prefix, and the order
//! below is what resolves them:
//!
//! - separator (`---`) before list dash (`- `)
//! - checkbox (`[x]`) before link (`[a](b)`) before the generic bracketed input (`[...]`)
//! - image (`![a](b)`) before note (`! `)
//! - button variant (`<primary: Save>`) before the generic button (`<Save>`)
//!
//! Swapping two entries silently changes which construct an ambiguous prefix
//! resolves to; `tests::test_table_order` pins the order.
//!
//! Line-head entries are only tried for the first token of a line, so markers and
//! keywords inside running text stay text. Keyword entries additionally require the
//! whole line to have the keyword's shape (`row(center):`, `list $Card:`,
//! `screen Home:`); the `token` group marks what the keyword token covers. A line
//! that merely starts with a keyword word, like `row of buttons below`, is text.

use super::tokens::TokenKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// Where in a line a table entry may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Only as the first token of a line.
    LineHead,
    /// At any position.
    Anywhere,
}

/// Characters that end a text word. `@` additionally cannot start one.
const TEXT_WORD: &str = r"[^\s:|<>{}\[\]\\^`@][^\s:|<>{}\[\]\\^`]*";

/// Raw table, in priority order.
const TOKEN_PATTERNS: &[(TokenKind, Placement, &str)] = &[
    (TokenKind::Whitespace, Placement::Anywhere, r"[ \t]+"),
    (TokenKind::Separator, Placement::LineHead, r"-{3,}[ \t]*$"),
    (TokenKind::ListDash, Placement::LineHead, r"-[ \t]+"),
    (TokenKind::Checkbox, Placement::LineHead, r"\[[ xX]\]"),
    (TokenKind::Image, Placement::LineHead, r"!\[[^\]]*\]\([^)]*\)"),
    (TokenKind::Link, Placement::LineHead, r"\[[^\]]*\]\([^)]*\)"),
    (TokenKind::Input, Placement::LineHead, r"\[.*\]"),
    (
        TokenKind::ButtonVariant,
        Placement::LineHead,
        r"<(?:primary|secondary|danger|ghost|outline)[ \t]*:[^>]*>",
    ),
    (TokenKind::Button, Placement::LineHead, r"<[^>]*>"),
    (TokenKind::Radio, Placement::LineHead, r"\([ xX*]\)"),
    (TokenKind::HeadingMarker, Placement::LineHead, r"#{1,6}[ \t]+"),
    (TokenKind::QuoteMarker, Placement::LineHead, r">[ \t]+"),
    (TokenKind::NoteMarker, Placement::LineHead, r"![ \t]+"),
    (TokenKind::MutedMarker, Placement::LineHead, r"~[ \t]+"),
    (TokenKind::QuotedText, Placement::LineHead, r#""[^"]*""#),
    (
        TokenKind::ScreenKw,
        Placement::LineHead,
        r"(?P<token>screen\b)(?:[ \t][^:]*)?:[ \t]*$",
    ),
    (
        TokenKind::ModalKw,
        Placement::LineHead,
        r"(?P<token>modal\b)(?:[ \t][^:]*)?:[ \t]*$",
    ),
    (
        TokenKind::DrawerKw,
        Placement::LineHead,
        r"(?P<token>drawer\b)(?:[ \t][^:]*)?:[ \t]*$",
    ),
    (
        TokenKind::ComponentKw,
        Placement::LineHead,
        r"(?P<token>component\b)(?:[ \t][^:]*)?:[ \t]*$",
    ),
    (
        TokenKind::StylesKw,
        Placement::LineHead,
        r"(?P<token>styles\b)[ \t]*:[ \t]*$",
    ),
    (
        TokenKind::LayoutKw,
        Placement::LineHead,
        r"(?P<token>(?:row|column|card|grid|stack|center|header|footer|section|form)\b(?:\([^)]*\))?)[ \t]*(?::[ \t]*)?$",
    ),
    (
        TokenKind::NavigatorKw,
        Placement::LineHead,
        r"(?P<token>(?:navigator|nav)\b)[ \t]*(?::[ \t]*)?$",
    ),
    (
        TokenKind::FabKw,
        Placement::LineHead,
        r"(?P<token>fab\b)(?:[ \t]+[^\s:]+)?[ \t]*(?::[ \t]*)?$",
    ),
    (
        TokenKind::ListKw,
        Placement::LineHead,
        r"(?P<token>list\b)(?:[ \t]+\$[A-Za-z_][A-Za-z0-9_]*)?[ \t]*:[ \t]*$",
    ),
    (
        TokenKind::ComponentRef,
        Placement::Anywhere,
        r"\$[A-Za-z_][A-Za-z0-9_]*",
    ),
    (TokenKind::Target, Placement::Anywhere, r"@[A-Za-z_][A-Za-z0-9_]*"),
    (TokenKind::Colon, Placement::Anywhere, r":"),
    (TokenKind::Pipe, Placement::Anywhere, r"\|"),
];

/// One compiled table entry.
#[derive(Debug)]
pub struct TableEntry {
    pub kind: TokenKind,
    pub placement: Placement,
    pattern: Regex,
}

impl TableEntry {
    fn compile(kind: TokenKind, placement: Placement, pattern: &str) -> Self {
        let anchored = format!("^(?:{})", pattern);
        Self {
            kind,
            placement,
            pattern: Regex::new(&anchored).expect("token table pattern must compile"),
        }
    }

    /// Length in bytes of the match at the start of `rest`, if non-empty.
    ///
    /// A `token` group limits the token to that group; the rest of the match must be
    /// present but is left for the following tokens.
    pub fn match_len(&self, rest: &str) -> Option<usize> {
        self.pattern
            .captures(rest)
            .and_then(|caps| caps.name("token").or_else(|| caps.get(0)))
            .map(|m| m.end())
            .filter(|len| *len > 0)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn applies(&self, at_line_head: bool) -> bool {
        at_line_head || self.placement == Placement::Anywhere
    }
}

static TOKEN_TABLE: Lazy<Vec<TableEntry>> = Lazy::new(|| {
    let text_pattern = format!("{word}(?:[ \\t]+{word})*", word = TEXT_WORD);
    TOKEN_PATTERNS
        .iter()
        .map(|(kind, placement, pattern)| TableEntry::compile(*kind, *placement, pattern))
        .chain(std::iter::once(TableEntry::compile(
            TokenKind::Text,
            Placement::Anywhere,
            &text_pattern,
        )))
        .collect()
});

/// The compiled table, in priority order.
pub fn token_table() -> &'static [TableEntry] {
    &TOKEN_TABLE
}

/// First entry matching at the start of `rest`.
///
/// `rest` is the remainder of the current line, without the line break.
/// Returns the kind and the byte length of the match.
pub fn match_at(rest: &str, at_line_head: bool) -> Option<(TokenKind, usize)> {
    token_table()
        .iter()
        .filter(|entry| entry.applies(at_line_head))
        .find_map(|entry| entry.match_len(rest).map(|len| (entry.kind, len)))
}
