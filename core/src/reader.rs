use tracing::debug;

use crate::error::{CompileError, Result};
use crate::language::{Form, ListBuilder};
use crate::lexer::{Token, TokenKind};
use crate::location::SourceLocation;

// ============================================================================
// Reader
// ============================================================================

/// Deepest list nesting the reader accepts. Every later stage recurses once
/// per level, so this bounds their stack use too.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Recursive-descent reader turning tokens into cons-cell forms.
pub struct Reader<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Reader {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Location of the last token consumed, for end-of-input diagnostics.
    fn last_location(&self) -> SourceLocation {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|token| token.location.clone())
            .unwrap_or_else(|| SourceLocation::synthetic("reader"))
    }

    fn unexpected_eof(&self) -> CompileError {
        CompileError::UnexpectedEof {
            location: self.last_location(),
        }
    }

    /// Read one form: a list when at `(`, otherwise an atom.
    pub fn read_form(&mut self) -> Result<Form> {
        let token = self.peek().ok_or_else(|| self.unexpected_eof())?;

        match token.kind {
            TokenKind::RParen => Err(CompileError::syntax(&token.text, token.location.clone())),
            TokenKind::LParen => self.read_list(),
            _ => self.read_atom(),
        }
    }

    /// Read a single non-paren token as-is.
    pub fn read_atom(&mut self) -> Result<Form> {
        let token = self.next().ok_or_else(|| self.unexpected_eof())?;

        if token.kind.is_literal() || token.kind == TokenKind::Symbol {
            Ok(Form::Atom(token.clone()))
        } else {
            Err(CompileError::syntax(&token.text, token.location.clone()))
        }
    }

    /// Read a parenthesized list. `()` reads as a `nil` token.
    pub fn read_list(&mut self) -> Result<Form> {
        let open = self.next().ok_or_else(|| self.unexpected_eof())?;
        if open.kind != TokenKind::LParen {
            return Err(CompileError::syntax(&open.text, open.location.clone()));
        }

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CompileError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                location: open.location.clone(),
            });
        }

        self.depth += 1;
        let list = self.read_elements(open);
        self.depth -= 1;
        list
    }

    fn read_elements(&mut self, open: &Token) -> Result<Form> {
        let first = self.peek().ok_or_else(|| self.unexpected_eof())?;
        if first.kind == TokenKind::RParen {
            self.position += 1;
            return Ok(Form::Atom(Token::nil(first.location.clone())));
        }

        let mut list = ListBuilder::new(self.read_form()?, Some(open.location.clone()));

        loop {
            match self.peek() {
                None => return Err(self.unexpected_eof()),
                Some(token) if token.kind == TokenKind::RParen => break,
                Some(_) => list.push(self.read_form()?),
            }
        }
        self.position += 1;

        Ok(list.finish())
    }
}

/// Read every top-level form into one outer list.
///
/// An empty token sequence reads as a list holding a single `nil` placeholder.
pub fn read(tokens: &[Token]) -> Result<Form> {
    let _span = tracing::debug_span!("pipeline.read").entered();
    let mut reader = Reader::new(tokens);

    let first = if tokens.is_empty() {
        Form::Atom(Token::nil(SourceLocation::synthetic("reader")))
    } else {
        reader.read_form()?
    };

    let mut tree = ListBuilder::new(first, None);
    while !reader.is_eof() {
        tree.push(reader.read_form()?);
    }

    let tree = tree.finish();
    debug!(forms = tree.len(), "read parse tree");
    Ok(tree)
}
