//! Visibility resolver - decides which declarations a program point can see
//!
//! Resolution algorithm:
//! 1. Start at the scope attached to the program point
//! 2. Compare it against the candidate's declaring scope (index identity)
//! 3. On mismatch, step to the parent scope
//! 4. Stop when a file scope is reached without a match
//!
//! Identity comparison is intentional: two structurally equal lexical blocks
//! at different indices are different scopes, so a variable declared in one
//! is invisible in the other.

use std::collections::HashSet;

use super::graph::{ScopeGraph, ScopeRef};
use crate::{Error, Result};

/// Walks reflexive ancestor chains over a borrowed [`ScopeGraph`].
pub struct VisibilityResolver<'a> {
    scopes: &'a ScopeGraph,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(scopes: &'a ScopeGraph) -> Self {
        Self { scopes }
    }

    /// Returns whether a variable declared in `declaring` is visible at a
    /// program point whose scope is `at`.
    ///
    /// The walk is reflexive: `at == declaring` is visible without touching
    /// the graph. Otherwise the chain climbs parent links until it matches,
    /// reaches a file scope (not visible), or trips one of the guards:
    ///
    /// - [`Error::MalformedMetadata`] if a parent link points outside the graph
    /// - [`Error::UnterminatedScopeChain`] if the chain revisits a scope
    pub fn is_visible(&self, at: ScopeRef, declaring: ScopeRef) -> Result<bool> {
        let mut visited = HashSet::new();
        let mut current = at;

        loop {
            if current == declaring {
                return Ok(true);
            }
            let node = self.scopes.node(current).ok_or_else(|| {
                Error::MalformedMetadata(format!("scope {current} is not in the metadata graph"))
            })?;
            if !visited.insert(current) {
                return Err(Error::UnterminatedScopeChain { start: at });
            }
            match node.parent() {
                Some(parent) => current = parent,
                // File scopes are roots; nothing above them can match.
                None => return Ok(false),
            }
        }
    }
}
