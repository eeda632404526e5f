//! Names the runtime library provides.
//!
//! The functions themselves live in the JavaScript runtime module; the
//! compiler only needs to know which source names exist so it can resolve
//! them to the identifiers the prelude binds.

use conscript::Namespace;

pub const CORE_NAMES: &[&str] = &[
    "print", "println", "cons", "car", "cdr", "string", "number", "boolean", "symbol", "keyword",
    "+", "-", "*", "/", "%", "=", ">", ">=", "<", "<=", "not", "list", "length", "get", "list?",
    "pair?", "number?", "string?", "boolean?", "nil?", "keyword?", "equal?", "is?", "append",
];

/// Root scope with every runtime name bound.
pub fn global_namespace() -> Namespace {
    Namespace::with_globals(CORE_NAMES.iter().copied())
}
