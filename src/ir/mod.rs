//! Compiler-emitted module graph
//!
//! IR parsing is an external collaborator's job; this crate consumes its
//! output as a serialized module graph (see [`crate::loader`]) and treats
//! the result as read-only input.

pub mod metadata;
pub mod module;

pub use metadata::{DebugLocation, MetadataNode, MetadataRef};
pub use module::{
    BasicBlock, Function, FunctionDebugInfo, GlobalSymbol, InstKind, Instruction, Module,
    ModuleStats, Operand, DEBUG_DECLARE_INTRINSIC,
};
