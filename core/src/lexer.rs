use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::cursor::Cursor;
use crate::error::{CompileError, Result};
use crate::location::SourceLocation;

// ============================================================================
// Token Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    String,
    Boolean,
    Keyword,
    Nil,
    Symbol,
    LParen,
    RParen,
}

impl TokenKind {
    /// Kinds that stand for themselves once read.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::String
                | TokenKind::Boolean
                | TokenKind::Keyword
                | TokenKind::Nil
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Boolean => "Boolean",
            TokenKind::Keyword => "Keyword",
            TokenKind::Nil => "Nil",
            TokenKind::Symbol => "Symbol",
            TokenKind::LParen => "LParen",
            TokenKind::RParen => "RParen",
        };
        write!(f, "{name}")
    }
}

/// A located token.
///
/// For strings, `text` keeps its delimiting quotes and holds the text with
/// escapes already processed, in a form that can be embedded in a target
/// template literal as-is (backticks and backslashes re-escaped).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            text: text.into(),
            location,
        }
    }

    /// The `nil` token the reader substitutes for `()` and for empty input.
    pub fn nil(location: SourceLocation) -> Self {
        Token::new(TokenKind::Nil, "nil", location)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.kind, self.text, self.location)
    }
}

// ============================================================================
// Grammar
// ============================================================================

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").unwrap());
static BOOLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:true|false)$").unwrap());
static NIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^nil$").unwrap());

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '=' | '<' | '>' | '%' | ':' | '|' | '?' | '\\' | '/' | '*' | '_' | '$' | '!' | '+' | '-'
        )
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphabetic()
        || c.is_numeric()
        || matches!(
            c,
            ':' | '='
                | '@'
                | '~'
                | '<'
                | '>'
                | '%'
                | '&'
                | '|'
                | '?'
                | '\\'
                | '/'
                | '^'
                | '*'
                | '#'
                | '\''
                | '_'
                | '$'
                | '!'
                | '+'
                | '-'
        )
}

// ============================================================================
// Lexer
// ============================================================================

pub struct Lexer {
    cursor: Cursor,
}

impl Lexer {
    pub fn new(cursor: Cursor) -> Self {
        Lexer { cursor }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.cursor.peek() {
            if is_whitespace(ch) {
                self.cursor.consume_while(is_whitespace);
            } else if ch == ';' {
                self.cursor.consume_while(|c| c != '\n');
            } else if (ch == '-' || ch == '+')
                && self.cursor.lookahead(1).is_some_and(|c| c.is_ascii_digit())
            {
                tokens.push(self.read_number()?);
            } else if ch.is_ascii_digit() {
                tokens.push(self.read_number()?);
            } else if ch == '"' {
                tokens.push(self.read_string()?);
            } else if ch == ':' {
                tokens.push(self.read_keyword());
            } else if is_symbol_start(ch) {
                tokens.push(self.read_symbol());
            } else if ch == '(' || ch == ')' {
                let location = self.cursor.location();
                self.cursor.advance();
                let kind = if ch == '(' {
                    TokenKind::LParen
                } else {
                    TokenKind::RParen
                };
                tokens.push(Token::new(kind, ch, location));
            } else {
                return Err(CompileError::syntax(ch, self.cursor.location()));
            }
        }

        Ok(tokens)
    }

    // ========================================================================
    // Number and Symbol Parsing
    // ========================================================================

    fn read_number(&mut self) -> Result<Token> {
        let location = self.cursor.location();
        let mut text = String::new();

        if let Some(sign @ ('-' | '+')) = self.cursor.peek() {
            text.push(sign);
            self.cursor.advance();
        }
        text.push_str(&self.cursor.consume_while(|c| c.is_ascii_digit() || c == '.'));

        if !NUMBER.is_match(&text) {
            return Err(CompileError::syntax(text, location));
        }

        Ok(Token::new(TokenKind::Number, text, location))
    }

    fn read_keyword(&mut self) -> Token {
        let location = self.cursor.location();
        self.cursor.advance();
        let name = self.cursor.consume_while(is_symbol_char);
        let text: String = format!(":{name}").nfc().collect();
        Token::new(TokenKind::Keyword, text, location)
    }

    fn read_symbol(&mut self) -> Token {
        let location = self.cursor.location();
        let text: String = self.cursor.consume_while(is_symbol_char).nfc().collect();

        let kind = if BOOLEAN.is_match(&text) {
            TokenKind::Boolean
        } else if NIL.is_match(&text) {
            TokenKind::Nil
        } else {
            TokenKind::Symbol
        };

        Token::new(kind, text, location)
    }

    // ========================================================================
    // String Parsing
    // ========================================================================

    fn read_string(&mut self) -> Result<Token> {
        let location = self.cursor.location();
        self.cursor.advance();
        let mut text = String::from('"');

        loop {
            let Some(ch) = self.cursor.peek() else {
                return Err(CompileError::UnterminatedString {
                    reason: "expected double quote to close string literal; got end of input",
                    location,
                });
            };

            match ch {
                '"' => {
                    self.cursor.advance();
                    text.push('"');
                    break;
                }
                '\n' => {
                    return Err(CompileError::UnterminatedString {
                        reason: "unexpected newline in single-line string literal",
                        location,
                    });
                }
                '\\' => {
                    let escape_at = self.cursor.location();
                    self.cursor.advance();
                    let Some(code) = self.cursor.advance() else {
                        return Err(CompileError::UnterminatedString {
                            reason: "expected escape sequence; got end of input",
                            location,
                        });
                    };
                    let value = self.read_escape_sequence(code, escape_at)?;
                    push_embedded(&mut text, value);
                }
                _ => {
                    self.cursor.advance();
                    push_embedded(&mut text, ch);
                }
            }
        }

        Ok(Token::new(TokenKind::String, text, location))
    }

    /// Translate the character after a backslash into the character it denotes.
    fn read_escape_sequence(&mut self, code: char, at: SourceLocation) -> Result<char> {
        match code {
            'n' => Ok('\n'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'v' => Ok('\u{b}'),
            '0' => Ok('\0'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            'u' | 'U' => self.read_unicode_escape(code, at),
            _ => Err(CompileError::syntax(format!("\\{code}"), at)),
        }
    }

    /// Read `\u00e9` (greedy hex run) or `\u{1F600}`.
    fn read_unicode_escape(&mut self, code: char, at: SourceLocation) -> Result<char> {
        let braced = self.cursor.peek() == Some('{');
        if braced {
            self.cursor.advance();
        }

        let hex = self.cursor.consume_while(|c| c.is_ascii_hexdigit());

        if braced {
            if self.cursor.peek() != Some('}') {
                return Err(CompileError::syntax(format!("\\{code}{{{hex}"), at));
            }
            self.cursor.advance();
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| CompileError::syntax(format!("\\{code}{hex}"), at))
    }
}

/// Append a string character, escaping the ones a target template literal
/// would otherwise reinterpret. Template literals turn a raw CR into LF and
/// open a substitution at `${`.
fn push_embedded(text: &mut String, ch: char) {
    match ch {
        '`' => text.push_str("\\`"),
        '\\' => text.push_str("\\\\"),
        '\r' => text.push_str("\\r"),
        '$' => text.push_str("\\$"),
        c => text.push(c),
    }
}

/// Tokenize `input`, tagging every location with `file`.
pub fn tokenize(input: &str, file: &str) -> Result<Vec<Token>> {
    let _span = tracing::debug_span!("pipeline.lex", file).entered();
    let tokens = Lexer::new(Cursor::new(input, file)).tokenize()?;
    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
