use tracing::debug;

use crate::ast::Node;
use crate::error::{CompileError, Result};
use crate::language::{Form, Pair};
use crate::lexer::{Token, TokenKind};
use crate::location::SourceLocation;

// ============================================================================
// AST Builder
// ============================================================================

/// Build a program from the reader's outer list of top-level forms.
pub fn parse(tree: &Form) -> Result<Node> {
    let _span = tracing::debug_span!("pipeline.parse").entered();
    let body = tree.iter().map(|form| parse_expr(&form)).collect::<Result<Vec<_>>>()?;
    debug!(forms = body.len(), "built program");
    Ok(Node::program(body))
}

/// Pairs are calls; everything else maps one-to-one onto a literal or symbol.
pub fn parse_expr(form: &Form) -> Result<Node> {
    match form {
        Form::Pair(pair) => parse_call(pair),
        Form::Atom(token) => parse_primitive(token),
        // Only reachable from hand-built trees; the reader turns () into a nil token
        Form::Nil => Ok(Node::NilLiteral {
            value: "nil".to_string(),
            location: SourceLocation::unknown(),
        }),
    }
}

// No special forms yet: the head of every list is parsed as a callee.
fn parse_call(pair: &Pair) -> Result<Node> {
    let callee = parse_expr(&pair.head)?;
    let args = pair
        .tail()
        .iter()
        .map(|form| parse_expr(&form))
        .collect::<Result<Vec<_>>>()?;
    let location = pair
        .location
        .clone()
        .unwrap_or_else(|| callee.location().clone());

    Ok(Node::CallExpression {
        callee: Box::new(callee),
        args,
        location,
    })
}

fn parse_primitive(token: &Token) -> Result<Node> {
    let value = token.text.clone();
    let location = token.location.clone();

    match token.kind {
        TokenKind::Number => Ok(Node::NumberLiteral { value, location }),
        TokenKind::String => Ok(Node::StringLiteral { value, location }),
        TokenKind::Boolean => Ok(Node::BooleanLiteral { value, location }),
        TokenKind::Keyword => Ok(Node::KeywordLiteral { value, location }),
        TokenKind::Nil => Ok(Node::NilLiteral { value, location }),
        TokenKind::Symbol => Ok(Node::Symbol {
            name: value,
            location,
        }),
        TokenKind::LParen | TokenKind::RParen => Err(CompileError::syntax(value, location)),
    }
}
