//! Indentation state machine
//!
//!     Wiremark expresses nesting through leading whitespace. The lexer measures the
//!     width of each content line's indentation and asks an [IndentationState] how that
//!     width relates to the enclosing blocks. The state answers with an [IndentChange],
//!     which the lexer turns into synthetic BlockStart and BlockEnd tokens.
//!
//!     The state is a stack of widths with a fixed base of 0. It is created fresh for
//!     every lexer call and owned by that call alone, so two calls can never observe
//!     each other's nesting.
//!
//! Algorithm
//!
//!     For a content line of width `w` and a stack top `top`:
//!        - `w > top`: push `w`, one block opens
//!        - `w == top`: nothing changes
//!        - `w < top`: pop while the top is wider than `w`, one block closes per pop.
//!          If the new top is not exactly `w`, the dedent landed between two levels
//!          and the change is inconsistent.
//!
//!     Blank and comment lines never reach the state machine.

/// Result of comparing a line's indentation with the open blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChange {
    /// Same level as the previous content line.
    Same,
    /// One new block opened.
    Open,
    /// This many blocks closed and the line sits on an existing level.
    Close(usize),
    /// The dedent matched no open level. `closed` blocks were popped before the
    /// mismatch was found; `expected` is the level the line fell back to.
    Inconsistent {
        closed: usize,
        expected: usize,
        found: usize,
    },
}

/// Stack of open indentation widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentationState {
    levels: Vec<usize>,
}

impl Default for IndentationState {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentationState {
    pub fn new() -> Self {
        Self { levels: vec![0] }
    }

    /// Width of the innermost open block.
    pub fn current(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    /// Number of blocks open above the base level.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn is_at_base(&self) -> bool {
        self.levels.len() == 1
    }

    /// Compare a content line's width with the stack and update it.
    pub fn adjust(&mut self, width: usize) -> IndentChange {
        let top = self.current();
        if width > top {
            self.levels.push(width);
            return IndentChange::Open;
        }
        if width == top {
            return IndentChange::Same;
        }

        let mut closed = 0;
        while self.levels.len() > 1 && self.current() > width {
            self.levels.pop();
            closed += 1;
        }

        if self.current() == width {
            IndentChange::Close(closed)
        } else {
            IndentChange::Inconsistent {
                closed,
                expected: self.current(),
                found: width,
            }
        }
    }

    /// Close every open block, returning how many were closed.
    pub fn close_all(&mut self) -> usize {
        let depth = self.depth();
        self.levels.truncate(1);
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_base() {
        let state = IndentationState::new();
        assert!(state.is_at_base());
        assert_eq!(state.current(), 0);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_open_and_close() {
        let mut state = IndentationState::new();
        assert_eq!(state.adjust(0), IndentChange::Same);
        assert_eq!(state.adjust(2), IndentChange::Open);
        assert_eq!(state.adjust(2), IndentChange::Same);
        assert_eq!(state.adjust(6), IndentChange::Open);
        assert_eq!(state.depth(), 2);
        assert_eq!(state.adjust(0), IndentChange::Close(2));
        assert!(state.is_at_base());
    }

    #[test]
    fn test_partial_close() {
        let mut state = IndentationState::new();
        state.adjust(2);
        state.adjust(4);
        state.adjust(8);
        assert_eq!(state.adjust(4), IndentChange::Close(1));
        assert_eq!(state.current(), 4);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let mut state = IndentationState::new();
        state.adjust(4);
        state.adjust(8);
        assert_eq!(
            state.adjust(6),
            IndentChange::Inconsistent {
                closed: 1,
                expected: 4,
                found: 6
            }
        );
    }

    #[test]
    fn test_close_all() {
        let mut state = IndentationState::new();
        state.adjust(2);
        state.adjust(4);
        assert_eq!(state.close_all(), 2);
        assert!(state.is_at_base());
        assert_eq!(state.close_all(), 0);
    }
}
