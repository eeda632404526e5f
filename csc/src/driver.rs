//! Script compiler driver.
//!
//! Wraps the core pipeline with everything a command-line build needs:
//! reading the source, choosing what to emit, prepending the runtime
//! prelude and writing the result out.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;
use tracing::{debug, info};

use conscript::{CompileError, Pipeline, print_ast, read, tokenize};

use crate::prelude::{self, DEFAULT_RUNTIME};
use crate::stdlib::global_namespace;

/// Error type for the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What the driver writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmitMode {
    /// JavaScript, with the runtime prelude unless disabled
    #[default]
    Js,
    /// Indented dump of the AST after all passes
    Ast,
    /// One line per token
    Tokens,
    /// The parse tree in dotted-pair notation
    Tree,
}

/// Compiles Conscript source to JavaScript.
pub struct ScriptCompiler {
    pub mode: EmitMode,
    /// Prepend the bindings for library names
    pub prelude: bool,
    /// Module the prelude imports the global environment from
    pub runtime: String,
    pipeline: Pipeline,
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptCompiler {
    /// A compiler emitting JavaScript against the runtime library names.
    pub fn new() -> Self {
        ScriptCompiler {
            mode: EmitMode::Js,
            prelude: true,
            runtime: DEFAULT_RUNTIME.to_string(),
            pipeline: Pipeline::new(),
        }
    }

    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_prelude(mut self, prelude: bool) -> Self {
        self.prelude = prelude;
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Compile a source file. `-` reads standard input. Without `output`
    /// the result goes to stdout.
    pub fn compile_file(
        &self,
        input: &Path,
        file_name: Option<&str>,
        output: Option<&Path>,
    ) -> Result<(), DriverError> {
        let source = if input == Path::new("-") {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(input)?
        };

        let file = match file_name {
            Some(name) => name.to_string(),
            None if input == Path::new("-") => "stdin".to_string(),
            None => input.display().to_string(),
        };

        let code = self.compile_source(&source, &file)?;

        match output {
            Some(path) => {
                fs::write(path, &code)?;
                info!(path = %path.display(), bytes = code.len(), "wrote output");
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(code.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }

        Ok(())
    }

    /// Compile source text according to the current mode.
    pub fn compile_source(&self, source: &str, file: &str) -> Result<String, DriverError> {
        debug!(file, mode = ?self.mode, "compiling");

        let text = match self.mode {
            EmitMode::Tokens => tokenize(source, file)?
                .iter()
                .map(|token| token.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            EmitMode::Tree => read(&tokenize(source, file)?)?.to_string(),
            EmitMode::Ast => {
                let program = self.pipeline.front_end(source, file)?;
                print_ast(&self.pipeline.run_passes(program)?)
            }
            EmitMode::Js => {
                // Fresh root scope per compile so definitions never leak
                // between sources.
                let ns = global_namespace();
                let code = self.pipeline.compile(source, file, &ns)?;
                if self.prelude {
                    format!("{}{code}", prelude::generate(&ns, &self.runtime))
                } else {
                    code
                }
            }
        };

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conscript::{ErrorKind, make_symbol};

    #[test]
    fn test_js_mode_prepends_prelude() {
        let code = ScriptCompiler::new().compile_source("(+ 1 2)", "t").unwrap();
        let plus = make_symbol("+");
        assert!(code.starts_with("import { makeGlobal }"));
        assert!(code.contains(&format!("const {plus} = globalEnv.get(\"{plus}\");\n")));
        assert!(code.contains(";\n(() => {\n"));
        assert!(code.ends_with(&format!("  return ({plus})(1, 2);\n}})();")));
    }

    #[test]
    fn test_repeated_compiles_match() {
        let compiler = ScriptCompiler::new();
        let first = compiler.compile_source("(print (list 1 2))", "a").unwrap();
        let second = compiler.compile_source("(print (list 1 2))", "b").unwrap();
        assert_eq!(first, second);
        let fresh = ScriptCompiler::new().compile_source("(print (list 1 2))", "c").unwrap();
        assert_eq!(second, fresh);
    }

    #[test]
    fn test_no_prelude() {
        let code = ScriptCompiler::new()
            .with_prelude(false)
            .compile_source("1", "t")
            .unwrap();
        assert_eq!(code, "(() => {\n  return 1;\n})();");
    }

    #[test]
    fn test_custom_runtime() {
        let code = ScriptCompiler::new()
            .with_runtime("/opt/rt.js")
            .compile_source("1", "t")
            .unwrap();
        assert!(code.starts_with("import { makeGlobal } from \"/opt/rt.js\";"));
    }

    #[test]
    fn test_tokens_mode() {
        let out = ScriptCompiler::new()
            .with_mode(EmitMode::Tokens)
            .compile_source("(f 1)", "t")
            .unwrap();
        assert_eq!(
            out,
            "LParen ( @ t (1:1)\nSymbol f @ t (1:2)\nNumber 1 @ t (1:4)\nRParen ) @ t (1:5)"
        );
    }

    #[test]
    fn test_tree_mode() {
        let out = ScriptCompiler::new()
            .with_mode(EmitMode::Tree)
            .compile_source("(f 1) x", "t")
            .unwrap();
        assert_eq!(out, "((f 1) x)");
    }

    #[test]
    fn test_ast_mode_skips_resolution() {
        let out = ScriptCompiler::new()
            .with_mode(EmitMode::Ast)
            .compile_source("(no-such-fn)", "t")
            .unwrap();
        assert_eq!(out, "CallExpression\n  Func:\n    Symbol: no-such-fn\n  Args:");
    }

    #[test]
    fn test_unresolved_symbol_reported() {
        let err = ScriptCompiler::new()
            .compile_source("(undefined-fn 1)", "t")
            .unwrap_err();
        match err {
            DriverError::Compile(e) => {
                assert_eq!(e.kind(), ErrorKind::Structural);
                assert!(e.to_string().contains("undefined-fn"));
            }
            other => panic!("Expected compile error, got {other:?}"),
        }
    }
}
