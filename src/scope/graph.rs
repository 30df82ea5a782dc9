//! Scope graph - the lexical scope-chain arena
//!
//! The scope graph tracks:
//! - Scope nodes (file, subprogram, lexical block, location)
//! - Parent links forming chains that terminate at a `File` node
//! - Guarded chain walks that refuse cyclic or dangling metadata
//!
//! Nodes are owned by the module that carries the graph; everything else
//! holds `ScopeRef` indices. Identity is index equality - the "same node"
//! semantics the ancestor walk requires.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Index of a scope node within a module's scope arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeRef(pub u32);

impl ScopeRef {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Metadata-id notation, matching how IR dumps name these nodes.
        write!(f, "!{}", self.0)
    }
}

/// A node in the lexical scope chain.
///
/// Every non-terminal variant carries exactly one parent reference (named
/// `scope`, as the debug metadata does); a well-formed chain terminates at
/// `File`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeNode {
    /// Terminal file scope - the root of every chain
    File,
    /// A function scope, carrying the source-level name and declaration line
    Subprogram {
        scope: ScopeRef,
        name: String,
        decl_line: u32,
    },
    /// A block scope (`{}` nesting inside a function)
    LexicalBlock { scope: ScopeRef },
    /// An instruction location acting as a link in the chain
    Location { scope: ScopeRef },
}

impl ScopeNode {
    /// The parent reference carried by this node, `None` for the terminal `File`
    pub fn parent(&self) -> Option<ScopeRef> {
        match self {
            ScopeNode::File => None,
            ScopeNode::Subprogram { scope, .. } => Some(*scope),
            ScopeNode::LexicalBlock { scope } => Some(*scope),
            ScopeNode::Location { scope } => Some(*scope),
        }
    }

    /// Check if this is the terminal file scope
    pub fn is_file(&self) -> bool {
        matches!(self, ScopeNode::File)
    }

    /// Get the string representation of the node kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScopeNode::File => "file",
            ScopeNode::Subprogram { .. } => "subprogram",
            ScopeNode::LexicalBlock { .. } => "lexical_block",
            ScopeNode::Location { .. } => "location",
        }
    }
}

/// Arena of scope nodes owned by a module.
///
/// The analysis only ever reads the arena; mutation stops once the IR-parsing
/// collaborator has produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeGraph {
    nodes: Vec<ScopeNode>,
}

impl ScopeGraph {
    /// Create a new empty scope graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph directly from a node list (indices become refs)
    pub fn from_nodes(nodes: Vec<ScopeNode>) -> Self {
        Self { nodes }
    }

    fn push(&mut self, node: ScopeNode) -> ScopeRef {
        let id = ScopeRef(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Add a terminal file scope
    pub fn add_file(&mut self) -> ScopeRef {
        self.push(ScopeNode::File)
    }

    /// Add a subprogram scope under `scope`
    pub fn add_subprogram(
        &mut self,
        scope: ScopeRef,
        name: impl Into<String>,
        decl_line: u32,
    ) -> ScopeRef {
        self.push(ScopeNode::Subprogram {
            scope,
            name: name.into(),
            decl_line,
        })
    }

    /// Add a lexical block scope under `scope`
    pub fn add_lexical_block(&mut self, scope: ScopeRef) -> ScopeRef {
        self.push(ScopeNode::LexicalBlock { scope })
    }

    /// Add a location node under `scope`
    pub fn add_location(&mut self, scope: ScopeRef) -> ScopeRef {
        self.push(ScopeNode::Location { scope })
    }

    /// Get the node behind a reference, if it exists
    pub fn node(&self, scope: ScopeRef) -> Option<&ScopeNode> {
        self.nodes.get(scope.index())
    }

    /// Get the parent of a scope (`None` for `File` or a dangling ref)
    pub fn parent(&self, scope: ScopeRef) -> Option<ScopeRef> {
        self.node(scope).and_then(ScopeNode::parent)
    }

    /// Check whether a reference points inside the arena
    pub fn contains(&self, scope: ScopeRef) -> bool {
        scope.index() < self.nodes.len()
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes with their references
    pub fn iter(&self) -> impl Iterator<Item = (ScopeRef, &ScopeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (ScopeRef(i as u32), node))
    }

    /// Walk the chain from `from` down to the terminal file scope.
    ///
    /// Returns the full chain including `from` and the file node. A dangling
    /// reference is `MalformedMetadata`; a revisited node (cycle) is
    /// `UnterminatedScopeChain`. Callers contain both per variable/instruction
    /// pair rather than aborting the run.
    pub fn chain(&self, from: ScopeRef) -> Result<Vec<ScopeRef>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = from;

        loop {
            let node = self.node(current).ok_or_else(|| {
                Error::MalformedMetadata(format!("scope {current} is not in the metadata graph"))
            })?;

            if !visited.insert(current) {
                return Err(Error::UnterminatedScopeChain { start: from });
            }
            chain.push(current);

            match node.parent() {
                Some(parent) => current = parent,
                None => return Ok(chain),
            }
        }
    }
}
