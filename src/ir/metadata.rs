//! Debug-metadata descriptors referenced by instructions and globals

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scope::ScopeRef;

/// Index into a module's metadata arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRef(pub u32);

impl MetadataRef {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MetadataRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printed the way metadata ids appear in IR listings.
        write!(f, "!{}", self.0)
    }
}

/// A descriptor node in the metadata arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataNode {
    /// Describes one source-level local: name, type spelling, declaring
    /// scope, and the line of the declaration.
    LocalVariable {
        name: String,
        type_name: String,
        scope: ScopeRef,
        line: u32,
    },
    /// Pairs a global variable descriptor with its location expression.
    GlobalVariableExpression { name: String, type_name: String },
    /// Opaque location expression; the third operand of declaration
    /// intrinsics. Carried for shape fidelity, never inspected.
    Expression,
}

impl MetadataNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            MetadataNode::LocalVariable { .. } => "local_variable",
            MetadataNode::GlobalVariableExpression { .. } => "global_variable_expression",
            MetadataNode::Expression => "expression",
        }
    }
}

/// Line/scope pair attached to an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugLocation {
    pub line: u32,
    pub scope: ScopeRef,
}

impl DebugLocation {
    pub fn new(line: u32, scope: ScopeRef) -> Self {
        Self { line, scope }
    }
}
