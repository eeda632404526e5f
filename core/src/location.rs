//! Source location tracking
//!
//! Every token and AST node carries the place in the source it came from.
//! Locations exist only for diagnostics; nothing in the pipeline branches on them.

use std::fmt;
use std::rc::Rc;

/// A point in a source file.
///
/// `offset` counts characters (not bytes) from the start of the input;
/// `line` and `column` are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub file: Rc<str>,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize, file: impl Into<Rc<str>>) -> Self {
        SourceLocation {
            offset,
            line,
            column,
            file: file.into(),
        }
    }

    /// Location used for synthesized forms that have no source text,
    /// such as the placeholder produced when reading empty input.
    pub fn synthetic(file: &str) -> Self {
        SourceLocation::new(0, 1, 1, file)
    }

    /// Location for nodes with no meaningful origin at all.
    pub fn unknown() -> Self {
        SourceLocation::new(0, 0, 0, "none")
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.file, self.line, self.column)
    }
}
