//! Token stream formats

use crate::wiremark::lexing::{Token, TokenKind};

/// Tag name of a kind: `HeadingMarker` becomes `heading-marker`.
pub fn tag_name(kind: TokenKind) -> String {
    let mut out = String::new();
    for (i, c) in kind.name().chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `<kind:image>` per token, `<kind>` for tokens without an image, one source line
/// per output line.
pub fn to_simple_str(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Newline => result.push_str("<newline>\n"),
            _ if token.image.is_empty() => {
                result.push_str(&format!("<{}>", tag_name(token.kind)));
            }
            kind => result.push_str(&format!("<{}:{}>", tag_name(kind), token.image)),
        }
    }
    result
}

pub fn to_json_str(tokens: &[Token], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(tokens)
    } else {
        serde_json::to_string(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiremark::lexing::lex;

    #[test]
    fn test_tag_names() {
        assert_eq!(tag_name(TokenKind::HeadingMarker), "heading-marker");
        assert_eq!(tag_name(TokenKind::Text), "text");
        assert_eq!(tag_name(TokenKind::BlockStart), "block-start");
    }

    #[test]
    fn test_simple_format() {
        let tokens = lex("screen Home:\n  # Hi").tokens;
        insta::assert_snapshot!(to_simple_str(&tokens), @r###"
        <screen-kw:screen><text:Home><colon::><newline>
        <block-start><heading-marker:# ><text:Hi><newline>
        <block-end>
        "###);
    }

    #[test]
    fn test_json_format() {
        let tokens = lex("modal M:").tokens;
        let json = to_json_str(&tokens, false).unwrap();
        assert!(json.starts_with(r#"[{"kind":"ModalKw","image":"modal","startLine":1"#));
    }
}
