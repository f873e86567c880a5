//! Lexer
//!
//!     The lexer turns Wiremark source text into a flat token stream. Nesting is not
//!     expressed by brackets but by leading whitespace, so besides matching source
//!     tokens the lexer synthesizes BlockStart and BlockEnd tokens whenever a line's
//!     indentation opens or closes a block. Downstream, these behave exactly like
//!     braces would in a c-style syntax, which keeps the grammar free of any notion
//!     of columns.
//!
//! Line Processing
//!
//!     Input is processed one line at a time:
//!         1. Measure the indentation run. Spaces count one column each. Tabs count
//!            `tab_width` columns when `expand_tabs` is on; otherwise they are skipped
//!            with a `lexer/tab-indentation` warning.
//!         2. Blank lines and comment lines (`//`) are dropped without touching the
//!            indentation state.
//!         3. The indentation width goes through the [indentation] state machine,
//!            which decides how many blocks open or close.
//!         4. The rest of the line is scanned with the ordered [token_table]. A
//!            character no entry matches is reported once as `lexer/invalid-token`
//!            and skipped.
//!         5. A line that produced at least one token ends with a Newline token.
//!
//!     At the end of input every block still open is closed, so the number of
//!     BlockStart and BlockEnd tokens always matches.
//!
//! Failure Policy
//!
//!     The lexer never panics and never returns an error. Problems are recorded as
//!     diagnostics next to the tokens. A dedent that lands between two open levels is
//!     the only condition that stops lexing: it is recorded as a fatal
//!     `lexer/inconsistent-dedent` diagnostic, the remaining open blocks are closed,
//!     and the tokens produced so far are returned.

pub mod indentation;
pub mod token_table;
pub mod tokens;

pub use indentation::{IndentChange, IndentationState};
pub use tokens::{Token, TokenKind};

use crate::wiremark::diagnostics::{codes, Diagnostic, Severity, Stage};

/// Lexer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOptions {
    /// Count leading tabs as `tab_width` columns instead of ignoring them.
    pub expand_tabs: bool,
    pub tab_width: usize,
}

impl Default for LexOptions {
    fn default() -> Self {
        Self {
            expand_tabs: false,
            tab_width: 4,
        }
    }
}

/// Tokens and lexer diagnostics for one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexOutput {
    /// True when lexing stopped early on an inconsistent dedent.
    pub fn halted(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Fatal)
    }

    /// Token kinds only, handy for assertions.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

/// Lex `source` with default options.
pub fn lex(source: &str) -> LexOutput {
    lex_with_options(source, &LexOptions::default())
}

/// Lex `source`.
///
/// Every call owns a fresh [IndentationState]; nothing is shared between calls.
pub fn lex_with_options(source: &str, options: &LexOptions) -> LexOutput {
    let mut lexer = LineLexer::new(options);
    let mut line_start = 0;

    for (index, raw) in source.split('\n').enumerate() {
        let has_break = line_start + raw.len() < source.len();
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if !lexer.line(index + 1, line, line_start, raw.len(), has_break) {
            break;
        }
        lexer.end = Position {
            line: index + 1,
            column: line.chars().count() + 1,
            offset: line_start + raw.len(),
        };
        line_start += raw.len() + 1;
    }

    lexer.finish()
}

#[derive(Debug, Clone, Copy, Default)]
struct Position {
    line: usize,
    column: usize,
    offset: usize,
}

/// Per-call lexer state.
struct LineLexer<'a> {
    options: &'a LexOptions,
    state: IndentationState,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    /// Where closing BlockEnds are placed when the input is exhausted.
    end: Position,
}

impl<'a> LineLexer<'a> {
    fn new(options: &'a LexOptions) -> Self {
        Self {
            options,
            state: IndentationState::new(),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            end: Position {
                line: 1,
                column: 1,
                offset: 0,
            },
        }
    }

    /// Lex one line. Returns false when lexing must stop.
    fn line(
        &mut self,
        line_no: usize,
        line: &str,
        line_start: usize,
        raw_len: usize,
        has_break: bool,
    ) -> bool {
        let (width, indent_bytes) = self.measure_indent(line_no, line);
        let content = &line[indent_bytes..];
        if content.is_empty() || content.starts_with("//") {
            log::trace!("line {}: skipped (blank or comment)", line_no);
            return true;
        }

        // Indentation is ASCII, so its byte length is also its char count.
        let at = Position {
            line: line_no,
            column: indent_bytes + 1,
            offset: line_start + indent_bytes,
        };

        match self.state.adjust(width) {
            IndentChange::Same => {}
            IndentChange::Open => self.push_synthetic(TokenKind::BlockStart, at),
            IndentChange::Close(closed) => {
                for _ in 0..closed {
                    self.push_synthetic(TokenKind::BlockEnd, at);
                }
            }
            IndentChange::Inconsistent {
                closed,
                expected,
                found,
            } => {
                for _ in 0..closed {
                    self.push_synthetic(TokenKind::BlockEnd, at);
                }
                self.diagnostics.push(
                    Diagnostic::new(
                        Stage::Lexer,
                        Severity::Fatal,
                        codes::LEXER_INCONSISTENT_DEDENT,
                        format!(
                            "indentation of {} does not match any enclosing block",
                            found
                        ),
                    )
                    .at(at.line, at.column)
                    .with_hint(format!("indent this line by {} to continue the block", expected)),
                );
                log::debug!("lexing stopped at line {}: inconsistent dedent", line_no);
                self.end = at;
                return false;
            }
        }

        let column = self.scan(line_no, content, at);

        if self.tokens.last().map_or(false, |t| t.line == line_no && !t.kind.is_synthetic()) {
            let image = if has_break { "\n" } else { "" };
            self.tokens.push(Token::new(
                TokenKind::Newline,
                image,
                line_no,
                column,
                line_start + raw_len,
            ));
        }
        log::trace!("line {}: width {}, depth {}", line_no, width, self.state.depth());
        true
    }

    /// Width in columns and length in bytes of the leading whitespace run.
    fn measure_indent(&mut self, line_no: usize, line: &str) -> (usize, usize) {
        let mut width = 0;
        let mut bytes = 0;
        let mut warned = false;
        for ch in line.chars() {
            match ch {
                ' ' => width += 1,
                '\t' if self.options.expand_tabs => width += self.options.tab_width,
                '\t' => {
                    if !warned {
                        self.diagnostics.push(
                            Diagnostic::new(
                                Stage::Lexer,
                                Severity::Warning,
                                codes::LEXER_TAB_INDENTATION,
                                "tab in indentation is ignored",
                            )
                            .at(line_no, bytes + 1)
                            .with_length(1)
                            .with_hint("indent with spaces or enable lexer.expand_tabs"),
                        );
                        warned = true;
                    }
                }
                _ => break,
            }
            bytes += 1;
        }
        (width, bytes)
    }

    /// Scan line content starting at `at`. Returns the column after the last character.
    fn scan(&mut self, line_no: usize, content: &str, at: Position) -> usize {
        let mut pos = 0;
        let mut column = at.column;
        let mut at_line_head = true;

        while pos < content.len() {
            let rest = &content[pos..];
            match token_table::match_at(rest, at_line_head) {
                Some((kind, len)) => {
                    let image = &rest[..len];
                    if !kind.is_trivia() {
                        self.tokens
                            .push(Token::new(kind, image, line_no, column, at.offset + pos));
                        at_line_head = false;
                    }
                    pos += len;
                    column += image.chars().count();
                }
                None => {
                    let Some(ch) = rest.chars().next() else {
                        break;
                    };
                    self.diagnostics.push(
                        Diagnostic::new(
                            Stage::Lexer,
                            Severity::Error,
                            codes::LEXER_INVALID_TOKEN,
                            format!("unexpected character `{}`", ch.escape_debug()),
                        )
                        .at(line_no, column)
                        .with_length(1),
                    );
                    pos += ch.len_utf8();
                    column += 1;
                }
            }
        }
        column
    }

    fn push_synthetic(&mut self, kind: TokenKind, at: Position) {
        self.tokens
            .push(Token::synthetic(kind, at.line, at.column, at.offset));
    }

    fn finish(mut self) -> LexOutput {
        let end = self.end;
        for _ in 0..self.state.close_all() {
            self.push_synthetic(TokenKind::BlockEnd, end);
        }
        log::debug!(
            "lexed {} token(s), {} diagnostic(s)",
            self.tokens.len(),
            self.diagnostics.len()
        );
        LexOutput {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    #[test]
    fn test_simple_screen() {
        let output = lex("screen Home:\n  # Welcome");
        assert!(output.diagnostics.is_empty());
        assert_eq!(
            output.kinds(),
            vec![
                ScreenKw,
                Text,
                Colon,
                Newline,
                BlockStart,
                HeadingMarker,
                Text,
                Newline,
                BlockEnd
            ]
        );
        let welcome = &output.tokens[6];
        assert_eq!(welcome.image, "Welcome");
        assert_eq!((welcome.line, welcome.column, welcome.offset), (2, 5, 17));
    }

    #[test]
    fn test_newline_images() {
        let output = lex("screen A:\n  x");
        let newlines: Vec<&str> = output
            .tokens
            .iter()
            .filter(|t| t.kind == Newline)
            .map(|t| t.image.as_str())
            .collect();
        assert_eq!(newlines, vec!["\n", ""]);
    }

    #[test]
    fn test_blank_and_comment_lines_are_ignored() {
        let source = "screen A:\n\n  // a note to self\n      \n  x\n";
        let output = lex(source);
        assert!(output.diagnostics.is_empty());
        assert_eq!(
            output.kinds(),
            vec![ScreenKw, Text, Colon, Newline, BlockStart, Text, Newline, BlockEnd]
        );
    }

    #[test]
    fn test_nested_blocks_close_at_end() {
        let output = lex("screen A:\n  row:\n    card:\n      x\n");
        let starts = output.kinds().iter().filter(|k| **k == BlockStart).count();
        let ends = output.kinds().iter().filter(|k| **k == BlockEnd).count();
        assert_eq!(starts, 3);
        assert_eq!(ends, 3);
        assert_eq!(&output.kinds()[output.tokens.len() - 3..], &[BlockEnd, BlockEnd, BlockEnd]);
    }

    #[test]
    fn test_dedent_closes_several_blocks() {
        let output = lex("screen A:\n  row:\n    x\nmodal B:\n  y\n");
        let kinds = output.kinds();
        let modal = kinds.iter().position(|k| *k == ModalKw).unwrap();
        assert_eq!(&kinds[modal - 2..modal], &[BlockEnd, BlockEnd]);
    }

    #[test]
    fn test_inconsistent_dedent_halts() {
        let output = lex("screen A:\n    row:\n        x\n      y\n  z\n");
        assert!(output.halted());
        assert_eq!(output.diagnostics.len(), 1);
        let diag = &output.diagnostics[0];
        assert_eq!(diag.code, codes::LEXER_INCONSISTENT_DEDENT);
        assert_eq!(diag.line, Some(4));
        // Nothing from line 4 onwards is lexed, and every block is closed.
        assert!(output.tokens.iter().all(|t| t.line <= 4));
        assert!(!output.tokens.iter().any(|t| t.image == "y" || t.image == "z"));
        let starts = output.kinds().iter().filter(|k| **k == BlockStart).count();
        let ends = output.kinds().iter().filter(|k| **k == BlockEnd).count();
        assert_eq!(starts, ends);
    }

    #[test]
    fn test_invalid_characters_are_reported_individually() {
        let output = lex("^^\nscreen Home:\n  x");
        assert_eq!(output.diagnostics.len(), 2);
        assert!(output
            .diagnostics
            .iter()
            .all(|d| d.code == codes::LEXER_INVALID_TOKEN && d.severity == Severity::Error));
        assert_eq!(output.diagnostics[1].column, Some(2));
        // The bad line produces no tokens, not even a newline.
        assert_eq!(output.tokens[0].kind, ScreenKw);
    }

    #[test]
    fn test_invalid_character_keeps_line_head() {
        let output = lex("`screen Home:\n  x");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.tokens[0].kind, ScreenKw);
        assert_eq!(output.tokens[0].column, 2);
    }

    #[test]
    fn test_tabs_warn_unless_expanded() {
        let source = "screen A:\n\tx\n";
        let output = lex(source);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, codes::LEXER_TAB_INDENTATION);
        assert_eq!(output.diagnostics[0].severity, Severity::Warning);
        // The tab does not indent, so `x` stays at the top level.
        assert!(!output.kinds().contains(&BlockStart));

        let expanded = lex_with_options(
            source,
            &LexOptions {
                expand_tabs: true,
                tab_width: 4,
            },
        );
        assert!(expanded.diagnostics.is_empty());
        assert!(expanded.kinds().contains(&BlockStart));
    }

    #[test]
    fn test_crlf_line_endings() {
        let unix = lex("screen A:\n  x\n");
        let windows = lex("screen A:\r\n  x\r\n");
        assert_eq!(unix.kinds(), windows.kinds());
        assert!(windows.diagnostics.is_empty());
    }

    #[test]
    fn test_independent_calls_are_identical() {
        let source = "screen A:\n  row:\n    x\n  y\n";
        assert_eq!(lex(source), lex(source));
    }

    #[test]
    fn test_empty_input() {
        let output = lex("");
        assert!(output.tokens.is_empty());
        assert!(output.diagnostics.is_empty());
    }
}
