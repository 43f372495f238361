//! Scoped variable environment for the Seni interpreter.
//!
//! Scopes live in an arena and refer to their parent by [`ScopeId`]. A
//! closure keeps the id of the scope it was created in, which pins that
//! scope (and every scope before it) in the arena.

use std::collections::HashMap;

use crate::value::Value;

/// Handle to a scope in an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// A single scope level.
#[derive(Debug, Clone, Default)]
struct Scope {
    outer: Option<ScopeId>,
    bindings: HashMap<String, Value>,
}

/// Arena of scopes.
///
/// Lookup and mutation walk from the given scope outward and stop at the
/// first scope holding the name. `add` always writes to the given scope.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
    /// Scopes below this index are referenced by a closure and never released.
    pinned: usize,
}

impl Environment {
    /// Create an environment holding only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            pinned: 1,
        }
    }

    /// The outermost scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a child scope of `outer`.
    pub fn new_scope(&mut self, outer: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            outer: Some(outer),
            bindings: HashMap::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Bind `key` in exactly `scope`, shadowing any outer binding.
    pub fn add(&mut self, scope: ScopeId, key: impl Into<String>, value: Value) {
        self.scopes[scope.0].bindings.insert(key.into(), value);
    }

    /// Overwrite the nearest existing binding of `key`.
    ///
    /// With no existing binding anywhere this adds one to `scope` instead of
    /// failing, so `set!` on a fresh name behaves like `define`.
    pub fn mutate(&mut self, scope: ScopeId, key: &str, value: Value) {
        match self.find(scope, key) {
            Some(owner) => {
                self.scopes[owner.0].bindings.insert(key.to_string(), value);
            }
            None => self.add(scope, key, value),
        }
    }

    /// Look up `key`, innermost scope first.
    pub fn lookup(&self, scope: ScopeId, key: &str) -> Option<&Value> {
        let owner = self.find(scope, key)?;
        self.scopes[owner.0].bindings.get(key)
    }

    pub fn has_binding(&self, scope: ScopeId, key: &str) -> bool {
        self.find(scope, key).is_some()
    }

    /// Whether `key` is bound in `scope` itself, ignoring outer scopes.
    pub fn has_binding_in_scope(&self, scope: ScopeId, key: &str) -> bool {
        self.scopes[scope.0].bindings.contains_key(key)
    }

    fn find(&self, scope: ScopeId, key: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id.0];
            if s.bindings.contains_key(key) {
                return Some(id);
            }
            current = s.outer;
        }
        None
    }

    // ── Arena bookkeeping ──

    /// Number of live scopes.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Current arena size, to pass to [`Environment::release`] later.
    pub(crate) fn mark(&self) -> usize {
        self.scopes.len()
    }

    /// Keep `scope` alive for as long as the environment exists.
    ///
    /// Pinning is a high-water mark: every scope up to the newest captured
    /// one is kept, so the arena only grows while closures are being created.
    pub(crate) fn pin(&mut self, scope: ScopeId) {
        self.pinned = self.pinned.max(scope.0 + 1);
    }

    /// Drop scopes created since `mark`, unless a closure pinned them.
    pub(crate) fn release(&mut self, mark: usize) {
        let keep = mark.max(self.pinned);
        if self.scopes.len() > keep {
            self.scopes.truncate(keep);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
