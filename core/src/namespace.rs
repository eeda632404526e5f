//! Namespaces for compile-time name resolution
//!
//! A Namespace is a lexical scope mapping source names to the identifiers
//! they are emitted as. Scopes form a chain, with child scopes referencing
//! their parents; lookup walks from the child towards the root.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{CompileError, Result};
use crate::location::SourceLocation;
use crate::symbol::make_symbol;

// ============================================================================
// Namespace
// ============================================================================

struct ScopeState {
    bindings: FxHashMap<String, String>,
    parent: Option<Namespace>,
    name: String,
}

/// A scope in the chain.
///
/// Cheap to clone (an Rc increment); clones share the same bindings.
/// Bindings are add-only.
#[derive(Clone)]
pub struct Namespace {
    state: Rc<RefCell<ScopeState>>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new("global")
    }
}

impl Namespace {
    /// Create a new, empty root scope
    pub fn new(name: &str) -> Self {
        Namespace {
            state: Rc::new(RefCell::new(ScopeState {
                bindings: FxHashMap::default(),
                parent: None,
                name: name.to_string(),
            })),
        }
    }

    /// Create a root scope binding each name to its hashed identifier.
    pub fn with_globals<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let global = Namespace::default();
        for name in names {
            global.define(name, make_symbol(name));
        }
        global
    }

    /// Create a child scope extending this one
    pub fn extend(&self, name: &str) -> Self {
        Namespace {
            state: Rc::new(RefCell::new(ScopeState {
                bindings: FxHashMap::default(),
                parent: Some(self.clone()),
                name: name.to_string(),
            })),
        }
    }

    /// Bind a name in THIS scope
    pub fn define(&self, name: impl Into<String>, value: impl Into<String>) {
        self.state
            .borrow_mut()
            .bindings
            .insert(name.into(), value.into());
    }

    /// Look up the value bound to `name`, walking up the parent chain
    pub fn get(&self, name: &str) -> Option<String> {
        let state = self.state.borrow();

        if let Some(value) = state.bindings.get(name) {
            return Some(value.clone());
        }

        match &state.parent {
            Some(parent) => parent.get(name),
            None => None,
        }
    }

    /// The nearest scope, starting at this one, that binds `name`
    pub fn lookup(&self, name: &str) -> Option<Namespace> {
        if self.has(name) {
            return Some(self.clone());
        }

        self.parent().and_then(|parent| parent.lookup(name))
    }

    /// Resolve a symbol reference, failing with its location when unbound.
    pub fn resolve(&self, name: &str, location: &SourceLocation) -> Result<String> {
        match self.get(name) {
            Some(identifier) => {
                trace!(name, %identifier, scope = %self.name(), "resolved symbol");
                Ok(identifier)
            }
            None => Err(CompileError::unresolved(name, location.clone())),
        }
    }

    /// Is `name` bound here or in any ancestor?
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Is `name` bound in this scope itself?
    pub fn has(&self, name: &str) -> bool {
        self.state.borrow().bindings.contains_key(name)
    }

    pub fn parent(&self) -> Option<Namespace> {
        self.state.borrow().parent.clone()
    }

    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    /// This scope's own bindings, sorted by name.
    pub fn bindings(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .state
            .borrow()
            .bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Do both handles refer to the same scope?
    pub fn same_scope(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Namespace")
            .field("name", &state.name)
            .field("bindings", &state.bindings.len())
            .field("parent", &state.parent.as_ref().map(Namespace::name))
            .finish()
    }
}
