//! The compile pipeline.
//!
//! source → tokens → parse tree → AST → passes → emitted text. Linear and
//! all-or-nothing: the first failing stage aborts and nothing is emitted.

use tracing::debug;

use crate::ast::Node;
use crate::emitter::emit;
use crate::error::Result;
use crate::lexer::tokenize;
use crate::namespace::Namespace;
use crate::parser::parse;
use crate::passes::{Desugar, Expand, Pass};
use crate::reader::read;

/// Ordered AST passes plus the fixed front and back ends around them.
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// The standard pipeline: expand, then desugar.
    pub fn new() -> Self {
        Pipeline {
            passes: vec![Box::new(Expand), Box::new(Desugar)],
        }
    }

    /// A pipeline with no AST passes at all.
    pub fn empty() -> Self {
        Pipeline { passes: Vec::new() }
    }

    /// Register a pass after the existing ones.
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Swap the pass registered under `name`, keeping its position.
    /// Returns false if no pass has that name.
    pub fn replace(&mut self, name: &str, pass: impl Pass + 'static) -> bool {
        match self.passes.iter().position(|p| p.name() == name) {
            Some(index) => {
                self.passes[index] = Box::new(pass);
                true
            }
            None => false,
        }
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every registered pass in order.
    pub fn run_passes(&self, mut program: Node) -> Result<Node> {
        for pass in &self.passes {
            let _span = tracing::debug_span!("pipeline.pass", name = pass.name()).entered();
            program = pass.run(program)?;
        }
        Ok(program)
    }

    /// Source text to AST, before any pass runs.
    pub fn front_end(&self, source: &str, file: &str) -> Result<Node> {
        let tokens = tokenize(source, file)?;
        let tree = read(&tokens)?;
        parse(&tree)
    }

    /// Compile `source` against `ns`.
    pub fn compile(&self, source: &str, file: &str, ns: &Namespace) -> Result<String> {
        let program = self.front_end(source, file)?;
        let program = self.run_passes(program)?;
        let code = emit(&program, ns)?;
        debug!(file, passes = self.passes.len(), "compiled");
        Ok(code)
    }
}

/// Compile `source` with the standard pipeline.
pub fn compile(source: &str, file: &str, ns: &Namespace) -> Result<String> {
    Pipeline::new().compile(source, file, ns)
}
