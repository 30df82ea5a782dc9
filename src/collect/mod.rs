//! Variable collectors
//!
//! Two sources feed the analysis: debug-declaration intrinsic calls inside
//! function bodies (locals) and metadata attachments on module globals.
//! Both produce [`Variable`]s; [`VariableSet`] merges them with first-wins
//! name deduplication.

pub mod globals;
pub mod locals;

pub use globals::collect_globals;
pub use locals::{collect_locals, DeclaredLocal};

use std::collections::HashSet;

use crate::variable::Variable;

/// Insertion-ordered variable accumulator, deduplicated by name.
///
/// The first variable inserted under a name wins; later inserts with the
/// same name are dropped. Shadowing therefore resolves in favor of whoever
/// is inserted first, which is why globals go in before locals.
#[derive(Debug, Default)]
pub struct VariableSet {
    entries: Vec<Variable>,
    seen: HashSet<String>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable unless its name is already taken.
    ///
    /// Returns whether the variable was kept.
    pub fn insert(&mut self, variable: Variable) -> bool {
        if !self.seen.insert(variable.name.clone()) {
            return false;
        }
        self.entries.push(variable);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Variable> {
        self.entries
    }
}
