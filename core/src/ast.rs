//! Typed abstract syntax tree.
//!
//! The node set is closed: every consumer matches on [`Node`] exhaustively,
//! so adding a variant is a compile error everywhere it must be handled.

use std::fmt;

use crate::location::SourceLocation;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program {
        body: Vec<Node>,
        location: SourceLocation,
    },
    NumberLiteral {
        value: String,
        location: SourceLocation,
    },
    /// `value` is the string token text, delimiting quotes included
    StringLiteral {
        value: String,
        location: SourceLocation,
    },
    BooleanLiteral {
        value: String,
        location: SourceLocation,
    },
    /// `value` includes the leading colon
    KeywordLiteral {
        value: String,
        location: SourceLocation,
    },
    NilLiteral {
        value: String,
        location: SourceLocation,
    },
    Symbol {
        name: String,
        location: SourceLocation,
    },
    CallExpression {
        callee: Box<Node>,
        args: Vec<Node>,
        location: SourceLocation,
    },
}

impl Node {
    /// Wrap top-level forms as a program located at its first form.
    pub fn program(body: Vec<Node>) -> Self {
        let location = body
            .first()
            .map(|node| node.location().clone())
            .unwrap_or_else(SourceLocation::unknown);
        Node::Program { body, location }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Node::Program { location, .. }
            | Node::NumberLiteral { location, .. }
            | Node::StringLiteral { location, .. }
            | Node::BooleanLiteral { location, .. }
            | Node::KeywordLiteral { location, .. }
            | Node::NilLiteral { location, .. }
            | Node::Symbol { location, .. }
            | Node::CallExpression { location, .. } => location,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program { .. } => NodeKind::Program,
            Node::NumberLiteral { .. } => NodeKind::NumberLiteral,
            Node::StringLiteral { .. } => NodeKind::StringLiteral,
            Node::BooleanLiteral { .. } => NodeKind::BooleanLiteral,
            Node::KeywordLiteral { .. } => NodeKind::KeywordLiteral,
            Node::NilLiteral { .. } => NodeKind::NilLiteral,
            Node::Symbol { .. } => NodeKind::Symbol,
            Node::CallExpression { .. } => NodeKind::CallExpression,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,
    KeywordLiteral,
    NilLiteral,
    Symbol,
    CallExpression,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Program => "Program",
            NodeKind::NumberLiteral => "NumberLiteral",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::BooleanLiteral => "BooleanLiteral",
            NodeKind::KeywordLiteral => "KeywordLiteral",
            NodeKind::NilLiteral => "NilLiteral",
            NodeKind::Symbol => "Symbol",
            NodeKind::CallExpression => "CallExpression",
        };
        write!(f, "{name}")
    }
}
