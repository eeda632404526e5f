//! JavaScript emission.
//!
//! A recursive walk over the AST, one rule per node variant, each returning
//! a fragment of target source text. Symbols resolve through the
//! [`Namespace`] handed in by the caller.

use tracing::debug;

use crate::ast::Node;
use crate::error::Result;
use crate::namespace::Namespace;

/// The target's canonical absence value.
pub const NIL: &str = "null";

pub struct Emitter<'ns> {
    ns: &'ns Namespace,
}

impl<'ns> Emitter<'ns> {
    pub fn new(ns: &'ns Namespace) -> Self {
        Emitter { ns }
    }

    pub fn emit(&self, node: &Node) -> Result<String> {
        self.emit_in(node, self.ns)
    }

    fn emit_in(&self, node: &Node, ns: &Namespace) -> Result<String> {
        match node {
            Node::Program { body, .. } => self.emit_program(body, ns),
            Node::NumberLiteral { value, .. } => Ok(emit_number(value)),
            Node::BooleanLiteral { value, .. } => Ok(value.clone()),
            Node::StringLiteral { value, .. } => Ok(emit_string(value)),
            Node::KeywordLiteral { value, .. } => Ok(emit_keyword(value)),
            Node::NilLiteral { .. } => Ok(NIL.to_string()),
            Node::Symbol { name, location } => ns.resolve(name, location),
            Node::CallExpression { callee, args, .. } => self.emit_call(callee, args, ns),
        }
    }

    /// Callee first, then every argument left to right.
    fn emit_call(&self, callee: &Node, args: &[Node], ns: &Namespace) -> Result<String> {
        let callee = self.emit_in(callee, ns)?;
        let args = args
            .iter()
            .map(|arg| self.emit_in(arg, ns))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({callee})({})", args.join(", ")))
    }

    /// Wrap the body in an immediately invoked function whose result is the
    /// value of the last form.
    fn emit_program(&self, body: &[Node], ns: &Namespace) -> Result<String> {
        let mut code = String::from("(() => {\n");

        match body.split_last() {
            Some((last, effects)) => {
                for node in effects {
                    code.push_str(&format!("  {};\n", self.emit_in(node, ns)?));
                }
                code.push_str(&format!("  return {};\n", self.emit_in(last, ns)?));
            }
            None => code.push_str(&format!("  return {NIL};\n")),
        }

        code.push_str("})();");
        Ok(code)
    }
}

/// Source numbers are decimal. JavaScript reads `010` as octal (or rejects
/// it in strict code), so leading zeros are dropped from the integer part.
fn emit_number(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix(['-', '+']) {
        Some(rest) => (&text[..1], rest),
        None => ("", text),
    };
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() || digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    }
}

/// Swap the source quotes for a template literal. The lexer already left
/// the contents embeddable.
fn emit_string(token_text: &str) -> String {
    let inner = token_text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(token_text);
    format!("`{inner}`")
}

/// Keywords become registry symbols, so equal keywords are the same value.
fn emit_keyword(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("Symbol.for(\"{escaped}\")")
}

/// Emit `ast` against `ns`.
pub fn emit(ast: &Node, ns: &Namespace) -> Result<String> {
    let _span = tracing::debug_span!("pipeline.emit", scope = %ns.name()).entered();
    let code = Emitter::new(ns).emit(ast)?;
    debug!(bytes = code.len(), "emitted program");
    Ok(code)
}
