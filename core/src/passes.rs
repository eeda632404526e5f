//! AST-to-AST passes run between building and emission.
//!
//! `expand` and `desugar` are identity transforms today. They stay separate,
//! named stages so a macro expander or sugar-removal pass can be swapped in
//! through [`Pass`] without touching the lexer, reader or emitter.

use crate::ast::Node;
use crate::error::Result;

pub const STAGE_EXPAND: &str = "expand";
pub const STAGE_DESUGAR: &str = "desugar";

/// A transform over a whole program.
pub trait Pass {
    fn name(&self) -> &str;

    fn run(&self, program: Node) -> Result<Node>;
}

/// Macro expansion. Identity.
pub fn expand(program: Node) -> Node {
    program
}

/// Sugar removal. Identity.
pub fn desugar(program: Node) -> Node {
    program
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Expand;

impl Pass for Expand {
    fn name(&self) -> &str {
        STAGE_EXPAND
    }

    fn run(&self, program: Node) -> Result<Node> {
        Ok(expand(program))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Desugar;

impl Pass for Desugar {
    fn name(&self) -> &str {
        STAGE_DESUGAR
    }

    fn run(&self, program: Node) -> Result<Node> {
        Ok(desugar(program))
    }
}
