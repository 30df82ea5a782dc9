//! Declaration collector - finds debug-declaration intrinsic calls
//!
//! The compiler marks each source declaration with a call to the
//! debug-declaration intrinsic. Operand layout of those calls:
//!
//! 0. address of the variable's storage (opaque here)
//! 1. variable descriptor metadata
//! 2. location expression metadata
//!
//! Only operand 1 matters for this analysis.

use crate::ir::{Function, Instruction, MetadataNode, Module, Operand};
use crate::variable::Variable;
use crate::{Error, Result};

/// Index of the variable descriptor in a declaration intrinsic's operands.
const DESCRIPTOR_OPERAND: usize = 1;

/// A local declaration and where in the function body it appears.
///
/// `position` is the flat index of the declaring call among the body's
/// non-terminator instructions. A program point only sees declarations
/// recorded at earlier positions, which keeps declaration order intact
/// when several variables share a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredLocal {
    pub variable: Variable,
    pub position: usize,
}

/// Collect the locals declared in `function`, in body order.
///
/// Fails with [`Error::MalformedMetadata`] when a declaration intrinsic call
/// does not have the expected operand shape; the caller decides whether that
/// poisons the whole run or just this function.
pub fn collect_locals(module: &Module, function: &Function) -> Result<Vec<DeclaredLocal>> {
    let mut locals = Vec::new();

    for (position, inst) in function.instructions().enumerate() {
        if !inst.is_debug_declare() {
            continue;
        }
        let variable = local_from_declare(module, inst)?;
        tracing::trace!(
            "{}: declares {} at body position {}",
            function.name,
            variable.name,
            position
        );
        locals.push(DeclaredLocal { variable, position });
    }

    Ok(locals)
}

fn local_from_declare(module: &Module, inst: &Instruction) -> Result<Variable> {
    let operand = inst.operands.get(DESCRIPTOR_OPERAND).ok_or_else(|| {
        Error::MalformedMetadata(
            "declaration intrinsic call has no variable descriptor operand".to_string(),
        )
    })?;

    let node = match operand {
        Operand::Metadata(node) => module.metadata_node(*node).ok_or_else(|| {
            Error::MalformedMetadata(format!(
                "declaration intrinsic references {node}, which is outside the metadata arena"
            ))
        })?,
        Operand::Value(value) => {
            return Err(Error::MalformedMetadata(format!(
                "declaration intrinsic descriptor operand is the value '{value}', not metadata"
            )));
        }
    };

    match node {
        MetadataNode::LocalVariable {
            name,
            type_name,
            scope,
            line,
        } => Ok(Variable::local(
            name.clone(),
            type_name.clone(),
            *scope,
            *line,
        )),
        other => Err(Error::MalformedMetadata(format!(
            "declaration intrinsic descriptor is a {} node, expected local_variable",
            other.kind_name()
        ))),
    }
}
