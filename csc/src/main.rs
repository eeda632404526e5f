//! csc - Conscript compiler
//!
//! Compiles Conscript Lisp source files to JavaScript.
//!
//! # Usage
//!
//! ```bash
//! # Compile to a file
//! csc input.cs -o output.js
//!
//! # Read stdin, write stdout
//! echo '(print (+ 1 2))' | csc -
//!
//! # Inspect the front end
//! csc input.cs --emit tokens
//! csc input.cs --emit ast
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use csc::{EmitMode, ScriptCompiler};

#[derive(Parser)]
#[command(name = "csc")]
#[command(version)]
#[command(about = "Compile Conscript Lisp to JavaScript", long_about = None)]
struct Cli {
    /// Input file to compile, or - for stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to emit
    #[arg(long, value_enum, default_value_t = EmitMode::Js)]
    emit: EmitMode,

    /// Do not prepend the runtime bindings
    #[arg(long)]
    no_prelude: bool,

    /// Runtime module the prelude imports
    #[arg(long, value_name = "MODULE")]
    runtime: Option<String>,

    /// File name used in diagnostics
    #[arg(long, value_name = "NAME")]
    file_name: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("CONSCRIPT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut compiler = ScriptCompiler::new()
        .with_mode(cli.emit)
        .with_prelude(!cli.no_prelude);
    if let Some(runtime) = cli.runtime {
        compiler = compiler.with_runtime(runtime);
    }

    if let Err(e) =
        compiler.compile_file(&cli.input, cli.file_name.as_deref(), cli.output.as_deref())
    {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Some(out) = &cli.output {
        eprintln!("Compiled {} to {}", cli.input.display(), out.display());
    }
}
