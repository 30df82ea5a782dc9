//! Scope graph - lexical nesting recovered from debug metadata
//!
//! Debug metadata encodes each function's block structure as a tree of scope
//! nodes rooted at a file. The graph stores those nodes in an arena and the
//! resolver answers visibility queries by walking parent chains.

pub mod graph;
pub mod resolver;

pub use graph::{ScopeGraph, ScopeNode, ScopeRef};
pub use resolver::VisibilityResolver;
