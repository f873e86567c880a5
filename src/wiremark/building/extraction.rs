//! Data Extraction from Tokens
//!
//! Several element markers arrive from the lexer as a single token whose image
//! encodes more than one field: `<primary: Save>` carries a variant and a label,
//! `row(center, gap-2)` a preset and its modifiers. This module decomposes those
//! images with documented patterns and returns plain data. It knows nothing about
//! AST nodes or diagnostics; validation happens in the builders.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::wiremark::parsing::cst::TextLine;
use crate::wiremark::lexing::TokenKind;

/// `<variant: Label>` where variant is one of the known button styles.
static BUTTON_VARIANT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<\s*(primary|secondary|danger|ghost|outline)\s*:\s*(.*?)\s*>$").unwrap()
});

/// `<Label>` or `<word: Label>` with an unrecognized word.
static BUTTON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<\s*(?:([A-Za-z][A-Za-z0-9_-]*)\s*:)?\s*(.*?)\s*>$").unwrap());

/// `[text](target)`
static LINK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]*)\]\(([^)]*)\)$").unwrap());

/// `![alt](src)`
static IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]*)\)$").unwrap());

/// `preset` or `preset(mod, mod)`
static LAYOUT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)(?:\(([^)]*)\))?$").unwrap());

/// Extracted fields of a button marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ButtonData {
    pub label: String,
    pub variant: Option<String>,
    /// A `word:` prefix that is not a known variant.
    pub unknown_variant: Option<String>,
}

/// Extracted fields of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LinkData {
    pub text: String,
    pub target: String,
}

/// Extracted fields of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ImageData {
    pub alt: String,
    pub src: String,
}

/// Extracted fields of a layout keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LayoutData {
    pub preset: String,
    /// Raw, unvalidated modifiers in source order.
    pub modifiers: Vec<String>,
}

pub(super) fn extract_button(kind: TokenKind, image: &str) -> ButtonData {
    if kind == TokenKind::ButtonVariant {
        if let Some(caps) = BUTTON_VARIANT_REGEX.captures(image) {
            return ButtonData {
                label: caps[2].to_string(),
                variant: Some(caps[1].to_string()),
                unknown_variant: None,
            };
        }
    }
    match BUTTON_REGEX.captures(image) {
        Some(caps) => ButtonData {
            label: caps[2].to_string(),
            variant: None,
            unknown_variant: caps.get(1).map(|m| m.as_str().to_string()),
        },
        None => ButtonData {
            label: image.trim_matches(|c| c == '<' || c == '>').trim().to_string(),
            variant: None,
            unknown_variant: None,
        },
    }
}

pub(super) fn extract_link(image: &str) -> LinkData {
    match LINK_REGEX.captures(image) {
        Some(caps) => LinkData {
            text: caps[1].trim().to_string(),
            target: caps[2].trim().to_string(),
        },
        None => LinkData {
            text: String::new(),
            target: String::new(),
        },
    }
}

pub(super) fn extract_image(image: &str) -> ImageData {
    match IMAGE_REGEX.captures(image) {
        Some(caps) => ImageData {
            alt: caps[1].trim().to_string(),
            src: caps[2].trim().to_string(),
        },
        None => ImageData {
            alt: String::new(),
            src: String::new(),
        },
    }
}

pub(super) fn extract_layout(image: &str) -> LayoutData {
    match LAYOUT_REGEX.captures(image) {
        Some(caps) => LayoutData {
            preset: caps[1].to_string(),
            modifiers: caps
                .get(2)
                .map(|m| {
                    m.as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        },
        None => LayoutData {
            preset: image.to_string(),
            modifiers: Vec::new(),
        },
    }
}

/// Heading level from its marker (`## ` is 2).
pub(super) fn heading_level(marker: &str) -> usize {
    marker.chars().take_while(|c| *c == '#').count()
}

/// Contents of a `"quoted"` line.
pub(super) fn unquote(image: &str) -> &str {
    image
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(image)
}

/// Identifier without its leading `@` or `$`.
pub(super) fn strip_sigil(image: &str) -> &str {
    image
        .strip_prefix('@')
        .or_else(|| image.strip_prefix('$'))
        .unwrap_or(image)
}

/// Pipe-separated literal values, trimmed. An empty line has no values.
pub(super) fn split_values(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split('|').map(|v| v.trim().to_string()).collect()
}

/// Split a trailing `@Target` off a text line.
pub(super) fn split_target(line: &TextLine) -> (String, Option<String>) {
    match line.pieces.split_last() {
        Some((last, rest)) if last.kind == TokenKind::Target => (
            TextLine::new(rest.to_vec()).text(),
            Some(strip_sigil(&last.image).to_string()),
        ),
        _ => (line.text(), None),
    }
}
