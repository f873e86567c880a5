//! Concrete syntax tree
//!
//! One type per grammar rule. Every matched token is kept, positions included, so
//! the builder can point diagnostics at the exact source location. Optional parts of
//! a rule are `Option` fields: whether a child is present is answered by the type,
//! not by probing.
//!
//! Regions the parser had to skip to resynchronize are kept as `Error` variants
//! holding the skipped tokens.

use crate::wiremark::lexing::{Token, TokenKind};

/// A whole document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    /// Top-level newlines and block ends that belong to no declaration.
    pub trailing: Vec<Token>,
}

impl Program {
    pub fn views(&self) -> impl Iterator<Item = &ViewDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::View(view) => Some(view),
            _ => None,
        })
    }

    pub fn styles(&self) -> impl Iterator<Item = &StylesBlock> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Styles(styles) => Some(styles),
            _ => None,
        })
    }

    /// Number of regions skipped during error recovery, at any depth.
    pub fn error_count(&self) -> usize {
        self.declarations
            .iter()
            .map(|d| match d {
                Declaration::Error(_) => 1,
                Declaration::Styles(styles) => styles
                    .lines
                    .iter()
                    .filter(|l| matches!(l, StyleLine::Error(_)))
                    .count(),
                Declaration::View(view) => view.body.error_count(),
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Styles(StylesBlock),
    View(ViewDecl),
    Error(Skipped),
}

impl Declaration {
    pub fn rule_name(&self) -> &'static str {
        match self {
            Declaration::Styles(_) => "styles",
            Declaration::View(view) => view.kind.rule_name(),
            Declaration::Error(_) => "error",
        }
    }

    pub fn head(&self) -> Option<&Token> {
        match self {
            Declaration::Styles(styles) => Some(&styles.keyword),
            Declaration::View(view) => Some(&view.keyword),
            Declaration::Error(skipped) => skipped.head(),
        }
    }
}

/// Tokens consumed while resynchronizing after a syntax error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skipped {
    pub tokens: Vec<Token>,
}

impl Skipped {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// First token with source text.
    pub fn head(&self) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| !t.kind.is_synthetic())
            .or_else(|| self.tokens.first())
    }
}

/// The four named, block-bodied declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Screen,
    Modal,
    Drawer,
    Component,
}

impl ViewKind {
    pub fn from_keyword(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::ScreenKw => Some(ViewKind::Screen),
            TokenKind::ModalKw => Some(ViewKind::Modal),
            TokenKind::DrawerKw => Some(ViewKind::Drawer),
            TokenKind::ComponentKw => Some(ViewKind::Component),
            _ => None,
        }
    }

    pub fn rule_name(&self) -> &'static str {
        match self {
            ViewKind::Screen => "screen",
            ViewKind::Modal => "modal",
            ViewKind::Drawer => "drawer",
            ViewKind::Component => "component",
        }
    }
}

/// `Keyword Name? ':' NEWLINE Block`
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDecl {
    pub kind: ViewKind,
    pub keyword: Token,
    pub name: Option<Token>,
    pub colon: Token,
    pub newline: Token,
    pub body: Block,
}

/// An indented run of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub start: Token,
    pub elements: Vec<Element>,
    pub end: Token,
}

impl Block {
    pub fn error_count(&self) -> usize {
        self.elements.iter().map(Element::error_count).sum()
    }
}

/// `styles ':' NEWLINE BlockStart CssLine+ BlockEnd`
#[derive(Debug, Clone, PartialEq)]
pub struct StylesBlock {
    pub keyword: Token,
    pub colon: Token,
    pub newline: Token,
    pub start: Token,
    pub lines: Vec<StyleLine>,
    pub end: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleLine {
    Property(CssLine),
    Error(Skipped),
}

/// `name ':' value`
#[derive(Debug, Clone, PartialEq)]
pub struct CssLine {
    pub name: Token,
    pub colon: Token,
    pub value: TextLine,
    pub newline: Token,
}

/// A run of text pieces on one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub pieces: Vec<Token>,
}

impl TextLine {
    pub fn new(pieces: Vec<Token>) -> Self {
        Self { pieces }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn first(&self) -> Option<&Token> {
        self.pieces.first()
    }

    /// Source text of the run with its original spacing. Blanks between pieces
    /// are rendered as spaces.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut previous_end: Option<usize> = None;
        for piece in &self.pieces {
            if let Some(end) = previous_end {
                let gap = piece.offset.saturating_sub(end);
                out.extend(std::iter::repeat(' ').take(gap));
            }
            out.push_str(&piece.image);
            previous_end = Some(piece.end_offset());
        }
        out
    }
}

/// A line consisting of one significant token.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafLine {
    pub token: Token,
    pub newline: Token,
}

/// A marker followed by free text: headings, quotes, notes, checkboxes.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedText {
    pub marker: Token,
    pub text: TextLine,
    pub newline: Token,
}

/// `$Name value | value`
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
    pub reference: Token,
    pub values: TextLine,
    pub newline: Token,
}

/// `<Label>` or `<variant: Label>`, optionally followed by `@Target`.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLine {
    pub marker: Token,
    pub target: Option<Token>,
    pub newline: Token,
}

/// `list $Component? ':'` and its items.
#[derive(Debug, Clone, PartialEq)]
pub struct ListElement {
    pub keyword: Token,
    pub component: Option<Token>,
    pub colon: Token,
    pub newline: Token,
    pub items: ListBlock,
}

/// A layout preset with an optional nested block.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    pub keyword: Token,
    pub colon: Option<Token>,
    pub newline: Token,
    pub body: Option<Block>,
}

/// `nav` with optional list items.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorElement {
    pub keyword: Token,
    pub colon: Option<Token>,
    pub newline: Token,
    pub items: Option<ListBlock>,
}

/// `fab icon?` with optional list items.
#[derive(Debug, Clone, PartialEq)]
pub struct FabElement {
    pub keyword: Token,
    pub icon: Option<Token>,
    pub colon: Option<Token>,
    pub newline: Token,
    pub items: Option<ListBlock>,
}

/// An indented run of `- item` lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    pub start: Token,
    pub entries: Vec<ListEntry>,
    pub end: Token,
}

impl ListBlock {
    pub fn items(&self) -> impl Iterator<Item = &ListLine> {
        self.entries.iter().filter_map(|e| match e {
            ListEntry::Item(line) => Some(line),
            ListEntry::Error(_) => None,
        })
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, ListEntry::Error(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    Item(ListLine),
    Error(Skipped),
}

/// `- text`
#[derive(Debug, Clone, PartialEq)]
pub struct ListLine {
    pub dash: Token,
    pub text: TextLine,
    pub newline: Token,
}

/// Consecutive radio lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioGroup {
    pub options: Vec<MarkedText>,
}

/// `text ...` on a line of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLine {
    pub text: TextLine,
    pub newline: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    ComponentInstance(ComponentInstance),
    Button(ButtonLine),
    Link(LeafLine),
    Image(LeafLine),
    Heading(MarkedText),
    Quote(MarkedText),
    Note(MarkedText),
    Muted(MarkedText),
    QuotedText(LeafLine),
    List(ListElement),
    Layout(LayoutElement),
    Navigator(NavigatorElement),
    Fab(FabElement),
    Separator(LeafLine),
    Input(LeafLine),
    RadioGroup(RadioGroup),
    Checkbox(MarkedText),
    ListItem(ListLine),
    Identifier(LeafLine),
    Paragraph(ParagraphLine),
    Error(Skipped),
}

impl Element {
    pub fn rule_name(&self) -> &'static str {
        match self {
            Element::ComponentInstance(_) => "componentInstance",
            Element::Button(_) => "button",
            Element::Link(_) => "link",
            Element::Image(_) => "image",
            Element::Heading(_) => "heading",
            Element::Quote(_) => "quote",
            Element::Note(_) => "note",
            Element::Muted(_) => "muted",
            Element::QuotedText(_) => "quotedText",
            Element::List(_) => "list",
            Element::Layout(_) => "layout",
            Element::Navigator(_) => "navigator",
            Element::Fab(_) => "fab",
            Element::Separator(_) => "separator",
            Element::Input(_) => "input",
            Element::RadioGroup(_) => "radioGroup",
            Element::Checkbox(_) => "checkbox",
            Element::ListItem(_) => "listItem",
            Element::Identifier(_) => "identifier",
            Element::Paragraph(_) => "paragraph",
            Element::Error(_) => "error",
        }
    }

    /// The token that starts the element.
    pub fn head(&self) -> Option<&Token> {
        match self {
            Element::ComponentInstance(e) => Some(&e.reference),
            Element::Button(e) => Some(&e.marker),
            Element::Link(e)
            | Element::Image(e)
            | Element::QuotedText(e)
            | Element::Separator(e)
            | Element::Input(e)
            | Element::Identifier(e) => Some(&e.token),
            Element::Heading(e)
            | Element::Quote(e)
            | Element::Note(e)
            | Element::Muted(e)
            | Element::Checkbox(e) => Some(&e.marker),
            Element::List(e) => Some(&e.keyword),
            Element::Layout(e) => Some(&e.keyword),
            Element::Navigator(e) => Some(&e.keyword),
            Element::Fab(e) => Some(&e.keyword),
            Element::RadioGroup(e) => e.options.first().map(|o| &o.marker),
            Element::ListItem(e) => Some(&e.dash),
            Element::Paragraph(e) => e.text.first(),
            Element::Error(e) => e.head(),
        }
    }

    /// Skipped regions inside this element, itself included.
    pub fn error_count(&self) -> usize {
        match self {
            Element::Error(_) => 1,
            Element::Layout(layout) => layout.body.as_ref().map_or(0, Block::error_count),
            Element::List(list) => list.items.error_count(),
            Element::Navigator(nav) => nav.items.as_ref().map_or(0, ListBlock::error_count),
            Element::Fab(fab) => fab.items.as_ref().map_or(0, ListBlock::error_count),
            _ => 0,
        }
    }
}
