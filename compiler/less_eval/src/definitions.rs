//! Per-evaluation state of mixin and ruleset definitions.
//!
//! Parsed trees are shared templates and are never mutated, so the lazily
//! bound closure and the live entry count of each definition are kept here,
//! keyed by the definition's `DefId`. Every copy of a definition shares its
//! id, and therefore its state, for the duration of one evaluation.

use rustc_hash::FxHashMap;

use less_ir::DefId;

use crate::environment::{Environment, LocalScope};

#[derive(Default)]
struct DefinitionState {
    closure: Option<Environment>,
    entries: usize,
}

#[derive(Default)]
pub struct DefinitionTable {
    states: FxHashMap<DefId, LocalScope<DefinitionState>>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        DefinitionTable::default()
    }

    fn state(&mut self, id: DefId) -> LocalScope<DefinitionState> {
        self.states.entry(id).or_default().clone()
    }

    /// Captured environment of a definition, if one has been bound.
    pub fn closure(&self, id: DefId) -> Option<Environment> {
        self.states
            .get(&id)
            .and_then(|state| state.borrow().closure.clone())
    }

    /// Bind the closure of `id` to a copy of `env` unless one is already
    /// bound. Returns whether this call bound it.
    pub fn bind_closure(&mut self, id: DefId, env: &Environment) -> bool {
        let state = self.state(id);
        let mut state = state.borrow_mut();
        if state.closure.is_some() {
            return false;
        }
        state.closure = Some(env.copy());
        true
    }

    /// Number of live (entered, not yet exited) evaluations of `id`.
    pub fn entries(&self, id: DefId) -> usize {
        self.states.get(&id).map_or(0, |state| state.borrow().entries)
    }

    /// Count an entry into `id`. The returned guard counts the exit when
    /// dropped, on success and error paths alike.
    pub fn enter(&mut self, id: DefId) -> EntryGuard {
        let state = self.state(id);
        state.borrow_mut().entries += 1;
        EntryGuard { state }
    }
}

/// Decrements a definition's entry count on drop.
#[must_use = "the entry is counted only while the guard is alive"]
pub struct EntryGuard {
    state: LocalScope<DefinitionState>,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.entries = state.entries.saturating_sub(1);
    }
}
