use std::rc::Rc;

use crate::location::SourceLocation;

// ============================================================================
// Cursor
// ============================================================================

/// Character stream over source text that tracks offset, line and column.
pub struct Cursor {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    file: Rc<str>,
}

impl Cursor {
    pub fn new(input: &str, file: &str) -> Self {
        Cursor {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            file: Rc::from(file),
        }
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// The current character, or `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// The character `n` places past the current one. `lookahead(0)` is `peek()`.
    pub fn lookahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Consume one character. Returns `None` without moving when already at the end.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Greedily consume characters matching `pred` and return the consumed run.
    pub fn consume_while<F>(&mut self, mut pred: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut run = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            run.push(ch);
            self.advance();
        }
        run
    }

    /// Snapshot of the current position.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            offset: self.position,
            line: self.line,
            column: self.column,
            file: Rc::clone(&self.file),
        }
    }
}
