//! Compile error types.
//!
//! Every stage of the pipeline fails with a [`CompileError`]. The first
//! error aborts the whole compile; there is no recovery and no partial output.

use thiserror::Error;

use crate::location::SourceLocation;

/// Coarse classification of compile errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed token or form
    Syntax,
    /// Well-formed tokens that do not fit together: unterminated strings,
    /// missing close parens, bad append targets, unresolved names, lists
    /// nested too deeply
    Structural,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Syntax error: invalid syntax {text} found at {location}")]
    Syntax {
        text: String,
        location: SourceLocation,
    },

    #[error("Unterminated string literal starting at {location}: {reason}")]
    UnterminatedString {
        reason: &'static str,
        location: SourceLocation,
    },

    #[error("Unexpected end of input: expected ) after {location}")]
    UnexpectedEof { location: SourceLocation },

    #[error(
        "Cannot append {value} to an improper list or pair whose tail is not nil{}",
        at_location(.location)
    )]
    InvalidAppend {
        value: String,
        location: Option<SourceLocation>,
    },

    #[error("The name {name} has not been defined in {location}")]
    UnresolvedSymbol {
        name: String,
        location: SourceLocation,
    },

    #[error("Lists nested deeper than {limit} levels, starting at {location}")]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

fn at_location(location: &Option<SourceLocation>) -> String {
    match location {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

impl CompileError {
    /// Create a syntax error for the offending text.
    pub fn syntax(text: impl Into<String>, location: SourceLocation) -> Self {
        CompileError::Syntax {
            text: text.into(),
            location,
        }
    }

    /// Create an unresolved symbol error.
    pub fn unresolved(name: impl Into<String>, location: SourceLocation) -> Self {
        CompileError::UnresolvedSymbol {
            name: name.into(),
            location,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Syntax { .. } => ErrorKind::Syntax,
            CompileError::UnterminatedString { .. }
            | CompileError::UnexpectedEof { .. }
            | CompileError::InvalidAppend { .. }
            | CompileError::UnresolvedSymbol { .. }
            | CompileError::NestingTooDeep { .. } => ErrorKind::Structural,
        }
    }

    /// Where the error happened, if it is tied to source text.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompileError::Syntax { location, .. }
            | CompileError::UnterminatedString { location, .. }
            | CompileError::UnexpectedEof { location }
            | CompileError::UnresolvedSymbol { location, .. }
            | CompileError::NestingTooDeep { location, .. } => Some(location),
            CompileError::InvalidAppend { location, .. } => location.as_ref(),
        }
    }
}

impl From<CompileError> for String {
    fn from(err: CompileError) -> String {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
