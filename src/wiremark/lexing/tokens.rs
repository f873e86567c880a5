//! Token definitions for the Wiremark lexer
//!
//! Two layers of tokens share one type:
//!
//!     Source Tokens:
//!         Produced by the ordered [token table](super::token_table). Most element
//!         markers are a single token whose image encodes several fields
//!         (an input declaration, a button, a layout with modifiers) that the
//!         builder decomposes later.
//!
//!     Synthetic Tokens:
//!         `BlockStart` and `BlockEnd` are synthesized from leading-whitespace
//!         changes and carry no source text. `Newline` closes every line that
//!         produced at least one source token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// All token kinds the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    // Structural
    BlockStart,
    BlockEnd,
    Newline,
    /// Inline blanks between tokens. Matched by the table, never emitted.
    Whitespace,

    // Line-head markers
    Separator,
    ListDash,
    Checkbox,
    Image,
    Link,
    Input,
    ButtonVariant,
    Button,
    Radio,
    HeadingMarker,
    QuoteMarker,
    NoteMarker,
    MutedMarker,
    QuotedText,

    // Keywords
    ScreenKw,
    ModalKw,
    DrawerKw,
    ComponentKw,
    StylesKw,
    LayoutKw,
    NavigatorKw,
    FabKw,
    ListKw,

    // Inline
    ComponentRef,
    Target,
    Colon,
    Pipe,
    Text,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::BlockStart => "BlockStart",
            TokenKind::BlockEnd => "BlockEnd",
            TokenKind::Newline => "Newline",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Separator => "Separator",
            TokenKind::ListDash => "ListDash",
            TokenKind::Checkbox => "Checkbox",
            TokenKind::Image => "Image",
            TokenKind::Link => "Link",
            TokenKind::Input => "Input",
            TokenKind::ButtonVariant => "ButtonVariant",
            TokenKind::Button => "Button",
            TokenKind::Radio => "Radio",
            TokenKind::HeadingMarker => "HeadingMarker",
            TokenKind::QuoteMarker => "QuoteMarker",
            TokenKind::NoteMarker => "NoteMarker",
            TokenKind::MutedMarker => "MutedMarker",
            TokenKind::QuotedText => "QuotedText",
            TokenKind::ScreenKw => "ScreenKw",
            TokenKind::ModalKw => "ModalKw",
            TokenKind::DrawerKw => "DrawerKw",
            TokenKind::ComponentKw => "ComponentKw",
            TokenKind::StylesKw => "StylesKw",
            TokenKind::LayoutKw => "LayoutKw",
            TokenKind::NavigatorKw => "NavigatorKw",
            TokenKind::FabKw => "FabKw",
            TokenKind::ListKw => "ListKw",
            TokenKind::ComponentRef => "ComponentRef",
            TokenKind::Target => "Target",
            TokenKind::Colon => "Colon",
            TokenKind::Pipe => "Pipe",
            TokenKind::Text => "Text",
        }
    }

    /// Human-readable description used in parser diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::BlockStart => "an indented block",
            TokenKind::BlockEnd => "the end of the block",
            TokenKind::Newline => "end of line",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Separator => "a separator",
            TokenKind::ListDash => "a list item",
            TokenKind::Checkbox => "a checkbox",
            TokenKind::Image => "an image",
            TokenKind::Link => "a link",
            TokenKind::Input => "an input",
            TokenKind::ButtonVariant | TokenKind::Button => "a button",
            TokenKind::Radio => "a radio option",
            TokenKind::HeadingMarker => "a heading",
            TokenKind::QuoteMarker => "a quote",
            TokenKind::NoteMarker => "a note",
            TokenKind::MutedMarker => "muted text",
            TokenKind::QuotedText => "quoted text",
            TokenKind::ScreenKw => "`screen`",
            TokenKind::ModalKw => "`modal`",
            TokenKind::DrawerKw => "`drawer`",
            TokenKind::ComponentKw => "`component`",
            TokenKind::StylesKw => "`styles`",
            TokenKind::LayoutKw => "a layout",
            TokenKind::NavigatorKw => "`nav`",
            TokenKind::FabKw => "`fab`",
            TokenKind::ListKw => "`list`",
            TokenKind::ComponentRef => "a component reference",
            TokenKind::Target => "a target",
            TokenKind::Colon => "`:`",
            TokenKind::Pipe => "`|`",
            TokenKind::Text => "text",
        }
    }

    /// Tokens synthesized by the lexer rather than matched from source text.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, TokenKind::BlockStart | TokenKind::BlockEnd)
    }

    /// Matched by the table but dropped from the stream.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// Tokens allowed inside free text (paragraphs, labels, values).
    pub fn is_text_piece(&self) -> bool {
        matches!(
            self,
            TokenKind::Text
                | TokenKind::Colon
                | TokenKind::Pipe
                | TokenKind::Target
                | TokenKind::ComponentRef
        )
    }

    /// Declaration keywords that may only appear at the top level.
    pub fn is_declaration_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::ScreenKw
                | TokenKind::ModalKw
                | TokenKind::DrawerKw
                | TokenKind::ComponentKw
                | TokenKind::StylesKw
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A matched lexical unit with its source position.
///
/// Lines and columns are 1-based; columns count characters. `offset` is the
/// byte offset of the first character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub image: String,
    #[serde(rename = "startLine")]
    pub line: usize,
    #[serde(rename = "startColumn")]
    pub column: usize,
    #[serde(rename = "startOffset")]
    pub offset: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        image: impl Into<String>,
        line: usize,
        column: usize,
        offset: usize,
    ) -> Self {
        Self {
            kind,
            image: image.into(),
            line,
            column,
            offset,
        }
    }

    /// A zero-width token at the given position.
    pub fn synthetic(kind: TokenKind, line: usize, column: usize, offset: usize) -> Self {
        Self::new(kind, String::new(), line, column, offset)
    }

    /// Byte offset one past the last byte of the image.
    pub fn end_offset(&self) -> usize {
        self.offset + self.image.len()
    }

    /// Width of the image in characters.
    pub fn width(&self) -> usize {
        self.image.chars().count()
    }
}
