//! Input declaration sub-lexer
//!
//! An input line reaches the builder as one token, for example
//!
//! ```text
//! [email Email address {you@example.com} | required | maxlength=80]
//! [select Country [Norway|Sweden|Denmark] | disabled]
//! ```
//!
//! Its contents are tokenized again with a small logos lexer: braces hold the
//! placeholder, brackets hold pipe-separated options, and the first top-level pipe
//! starts the attribute section. Pipes inside braces or brackets belong to those
//! tokens and never split attributes.
//!
//! Before the first pipe, an optional lowercase input type keyword comes first and the
//! remaining words form the label. After it, each word is a flag (`required`,
//! `disabled`, `readonly`, `multiline`) or a `key=value` attribute.

use logos::Logos;
use serde_json::{Map, Value};

/// Input types recognized as the first word of a declaration.
pub const INPUT_TYPES: &[&str] = &[
    "text", "email", "password", "number", "tel", "url", "date", "time", "search", "textarea",
    "select",
];

/// Flags stored in `attributes` rather than as top-level props.
const ATTRIBUTE_FLAGS: &[&str] = &["readonly", "multiline"];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum AttrToken {
    #[regex(r"\{[^}]*\}")]
    Placeholder,

    #[regex(r"\[[^\]]*\]")]
    Options,

    #[token("|")]
    Pipe,

    #[regex(r"[^\s|{}\[\]]+")]
    Word,
}

/// Decomposed input declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputData {
    pub input_type: Option<String>,
    pub label: String,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub required: bool,
    pub disabled: bool,
    pub attributes: Map<String, Value>,
    /// Bare words after the first pipe that are not known flags.
    pub unknown_flags: Vec<String>,
    /// Text the sub-lexer could not classify (unbalanced braces or brackets).
    pub stray: Vec<String>,
}

impl InputData {
    /// Declarations with options or of type `select` become selects.
    pub fn is_select(&self) -> bool {
        self.options.is_some() || self.input_type.as_deref() == Some("select")
    }

    fn apply_attribute(&mut self, word: &str) {
        if let Some((key, value)) = word.split_once('=') {
            if !key.is_empty() {
                self.attributes
                    .insert(key.to_string(), Value::String(value.to_string()));
                return;
            }
        }
        let flag = word.to_ascii_lowercase();
        match flag.as_str() {
            "required" => self.required = true,
            "disabled" => self.disabled = true,
            f if ATTRIBUTE_FLAGS.contains(&f) => {
                self.attributes.insert(f.to_string(), Value::Bool(true));
            }
            _ => self.unknown_flags.push(word.to_string()),
        }
    }
}

/// Decompose the image of an input token, brackets included.
pub fn parse_input(image: &str) -> InputData {
    let inner = image
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(image);

    let mut data = InputData::default();
    let mut head: Vec<&str> = Vec::new();
    let mut in_attributes = false;

    for (token, span) in AttrToken::lexer(inner).spanned() {
        let slice = &inner[span];
        match token {
            Ok(AttrToken::Placeholder) => {
                data.placeholder = Some(slice[1..slice.len() - 1].trim().to_string());
            }
            Ok(AttrToken::Options) => {
                data.options = Some(
                    slice[1..slice.len() - 1]
                        .split('|')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            Ok(AttrToken::Pipe) => in_attributes = true,
            Ok(AttrToken::Word) if !in_attributes => head.push(slice),
            Ok(AttrToken::Word) => data.apply_attribute(slice),
            Err(()) => data.stray.push(slice.to_string()),
        }
    }

    let mut words = head.into_iter();
    let mut label_words: Vec<&str> = Vec::new();
    if let Some(first) = words.next() {
        if INPUT_TYPES.contains(&first) {
            data.input_type = Some(first.to_string());
        } else {
            label_words.push(first);
        }
    }
    label_words.extend(words);
    data.label = label_words.join(" ");
    data
}
