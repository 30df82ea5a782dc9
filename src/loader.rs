//! Module graph loading
//!
//! IR parsing happens in an external collaborator; what arrives here is its
//! serialized module graph. Loading reads the JSON document and then checks
//! every cross-arena reference, so the analysis can index scopes and
//! metadata without re-validating at each step. Chain-termination checks
//! are deliberately not done here; those stay with the scope walks, which
//! contain them per variable/instruction pair.

use std::fs;
use std::path::Path;

use crate::ir::{Instruction, MetadataNode, Module, Operand};
use crate::scope::ScopeRef;
use crate::{Error, Result};

/// Read a module graph from disk and validate its references.
pub fn load_module(path: impl AsRef<Path>) -> Result<Module> {
    let path = path.as_ref();
    tracing::debug!("loading module graph from {}", path.display());

    let text = fs::read_to_string(path)?;
    let module: Module = serde_json::from_str(&text)?;
    validate(&module)?;

    let stats = module.stats();
    tracing::debug!(
        "loaded {}: {} functions, {} globals, {} scope nodes",
        module.source_filename,
        stats.functions,
        stats.globals,
        stats.scope_nodes
    );
    Ok(module)
}

fn validate(module: &Module) -> Result<()> {
    for (scope_ref, node) in module.scopes.iter() {
        if let Some(parent) = node.parent() {
            check_scope(module, parent, &format!("scope {scope_ref}"))?;
        }
    }

    for (index, node) in module.metadata.iter().enumerate() {
        if let MetadataNode::LocalVariable { scope, .. } = node {
            check_scope(module, *scope, &format!("metadata node !{index}"))?;
        }
    }

    for function in &module.functions {
        for block in &function.blocks {
            for inst in &block.instructions {
                check_instruction(module, &function.name, inst)?;
            }
            check_instruction(module, &function.name, &block.terminator)?;
        }
    }

    for global in &module.globals {
        for node in &global.debug_metadata {
            if module.metadata_node(*node).is_none() {
                return Err(Error::MalformedMetadata(format!(
                    "global {} references {node}, which is outside the metadata arena",
                    global.name
                )));
            }
        }
    }

    Ok(())
}

fn check_instruction(module: &Module, function: &str, inst: &Instruction) -> Result<()> {
    if let Some(location) = inst.debug_location() {
        check_scope(module, location.scope, &format!("instruction in {function}"))?;
    }
    for operand in &inst.operands {
        if let Operand::Metadata(node) = operand {
            if module.metadata_node(*node).is_none() {
                return Err(Error::MalformedMetadata(format!(
                    "instruction in {function} references {node}, which is outside the metadata arena"
                )));
            }
        }
    }
    Ok(())
}

fn check_scope(module: &Module, scope: ScopeRef, owner: &str) -> Result<()> {
    if module.scopes.contains(scope) {
        Ok(())
    } else {
        Err(Error::MalformedMetadata(format!(
            "{owner} references {scope}, which is outside the scope arena"
        )))
    }
}
