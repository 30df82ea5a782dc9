//! # Faultscope - Debug-Metadata Scope Resolution
//!
//! Locates the source-level variables visible at suspected fault sites.
//!
//! Faultscope provides:
//! - A data model for compiled-program module graphs (functions, blocks,
//!   instructions, debug-metadata nodes) as handed over by an IR-parsing
//!   collaborator
//! - Lexical scope-chain resolution with reflexive-ancestor visibility
//! - Collectors for debug-declared locals and debug-described globals
//! - A fault-location analyzer mapping `file:line` targets to the ordered,
//!   deduplicated variable set visible there
//! - Instrumentation-snippet synthesis for downstream patching tools

pub mod analyzer;
pub mod collect;
pub mod config;
pub mod instrument;
pub mod ir;
pub mod loader;
pub mod location;
pub mod range;
pub mod report;
pub mod scope;
pub mod ui;
pub mod variable;

// Re-exports for convenient access
pub use analyzer::Analyzer;
pub use ir::Module;
pub use location::FaultLocation;
pub use report::{Analysis, VariableBinding};
pub use scope::{ScopeGraph, ScopeNode, ScopeRef};
pub use variable::{Variable, VariableOrigin};

/// Result type alias for Faultscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Faultscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid fault location '{0}': expected <filename>:<line>")]
    InvalidFaultLocation(String),

    #[error("Malformed debug metadata: {0}")]
    MalformedMetadata(String),

    #[error("Scope chain starting at {start} never reaches a file scope")]
    UnterminatedScopeChain { start: ScopeRef },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Module graph error: {0}")]
    ModuleGraph(#[from] serde_json::Error),
}
