//! The scope stack.
//!
//! A scope is one lexical block's name-to-symbol mapping; the stack's depth
//! is the current nesting level, with level 1 being the global scope.
//! Lookups search innermost-first and return the first hit, which is what
//! makes shadowing work. Binds only ever touch the innermost scope, and
//! rebinding a name there silently replaces the old entry so a function
//! definition can take over its forward prototype's binding.

use std::collections::HashMap;

use super::symbols::SymbolId;

pub struct ScopeStack {
    scopes: Vec<HashMap<String, SymbolId>>,
}

impl ScopeStack {
    /// A fresh stack already containing the global scope.
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![HashMap::new()],
        }
    }

    /// Push a fresh, empty scope.
    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
        log::trace!("entered scope level {}", self.level());
    }

    /// Pop and discard the innermost scope. The bindings go away; the
    /// symbols they named live on in the symbol table.
    pub fn exit(&mut self) {
        self.scopes.pop();
        log::trace!("descended to scope level {}", self.level());
    }

    /// Current nesting depth; 1 is the global scope.
    pub fn level(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `name` in the innermost scope, replacing any binding the same
    /// scope already holds (last-write-wins).
    pub fn bind(&mut self, name: &str, symbol: SymbolId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), symbol);
        }
    }

    /// Search every scope, innermost first.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Search only the innermost scope.
    pub fn lookup_current(&self, name: &str) -> Option<SymbolId> {
        self.scopes.last().and_then(|scope| scope.get(name).copied())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}
