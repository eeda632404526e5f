//! Conscript command-line compiler
//!
//! Drives the core pipeline from the command line and supplies the pieces
//! the core leaves to its caller: the names of the runtime library and the
//! prelude that binds them in emitted scripts.

pub mod driver;
pub mod prelude;
pub mod stdlib;

pub use driver::{DriverError, EmitMode, ScriptCompiler};
pub use stdlib::{CORE_NAMES, global_namespace};
