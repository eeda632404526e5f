//! Core compiler pipeline for Conscript
//!
//! Conscript is a small Lisp that compiles to JavaScript. This crate holds
//! the front end (cursor, lexer, reader, AST builder), the AST passes, the
//! namespace used for symbol resolution and the emitter. It does no I/O and
//! keeps no process-wide state: every compile is handed its own
//! [`Namespace`]. Running the emitted script, and providing the standard
//! library it calls into, is left to the caller (see the `csc` crate).

pub mod ast;
pub mod cursor;
pub mod emitter;
pub mod error;
pub mod language;
pub mod lexer;
pub mod location;
pub mod namespace;
pub mod parser;
pub mod passes;
pub mod pipeline;
pub mod printer;
pub mod reader;
pub mod symbol;

// Re-export commonly used items for convenience
pub use ast::{Node, NodeKind};
pub use emitter::emit;
pub use error::{CompileError, ErrorKind, Result};
pub use language::{Form, ListBuilder, Pair, cons};
pub use lexer::{Token, TokenKind, tokenize};
pub use location::SourceLocation;
pub use namespace::Namespace;
pub use parser::parse;
pub use passes::{Desugar, Expand, Pass, desugar, expand};
pub use pipeline::{Pipeline, compile};
pub use printer::print_ast;
pub use reader::read;
pub use symbol::make_symbol;
