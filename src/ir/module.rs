//! In-memory module graph: functions, globals, and their debug metadata

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metadata::{DebugLocation, MetadataNode, MetadataRef};
use crate::scope::{ScopeGraph, ScopeRef};

/// Symbol name of the debug-declaration intrinsic.
///
/// A call to this intrinsic marks the point where a source variable comes
/// into existence; its second operand names the variable descriptor.
pub const DEBUG_DECLARE_INTRINSIC: &str = "llvm.dbg.declare";

/// A compiled translation unit plus the arenas its debug info lives in.
///
/// The module owns everything; analyses borrow it and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Source file the unit was compiled from, as recorded by the compiler.
    pub source_filename: String,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub globals: Vec<GlobalSymbol>,
    #[serde(default)]
    pub scopes: ScopeGraph,
    #[serde(default)]
    pub metadata: Vec<MetadataNode>,
}

impl Module {
    /// Look up a metadata node by arena index.
    pub fn metadata_node(&self, node: MetadataRef) -> Option<&MetadataNode> {
        self.metadata.get(node.index())
    }

    pub fn stats(&self) -> ModuleStats {
        ModuleStats {
            functions: self.functions.len(),
            basic_blocks: self.functions.iter().map(|f| f.blocks.len()).sum(),
            instructions: self
                .functions
                .iter()
                .map(|f| f.instructions().count() + f.blocks.len())
                .sum(),
            globals: self.globals.len(),
            scope_nodes: self.scopes.len(),
            metadata_nodes: self.metadata.len(),
        }
    }
}

/// Size summary for a loaded module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleStats {
    pub functions: usize,
    pub basic_blocks: usize,
    /// Body instructions plus one terminator per block.
    pub instructions: usize,
    pub globals: usize,
    pub scope_nodes: usize,
    pub metadata_nodes: usize,
}

impl fmt::Display for ModuleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Functions: {}", self.functions)?;
        writeln!(f, "Basic blocks: {}", self.basic_blocks)?;
        writeln!(f, "Instructions: {}", self.instructions)?;
        writeln!(f, "Globals: {}", self.globals)?;
        writeln!(f, "Scope nodes: {}", self.scope_nodes)?;
        write!(f, "Metadata nodes: {}", self.metadata_nodes)
    }
}

/// A function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// IR symbol name; used for diagnostics even when debug info is absent.
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<BasicBlock>,
    /// Subprogram record; `None` for functions compiled without debug info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<FunctionDebugInfo>,
}

impl Function {
    /// Body instructions in block order, terminators excluded.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.blocks.iter().flat_map(|block| block.instructions.iter())
    }

    /// Block terminators in block order.
    pub fn terminators(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.blocks.iter().map(|block| &block.terminator)
    }
}

/// Subprogram debug record attached to a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDebugInfo {
    /// Source-level name (may differ from the IR symbol name).
    pub name: String,
    /// Line of the function's declaration.
    pub decl_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// Every well-formed block ends in exactly one terminator.
    pub terminator: Instruction,
}

/// One IR instruction with its operands and optional debug location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(flatten)]
    pub kind: InstKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_location: Option<DebugLocation>,
}

impl Instruction {
    pub fn new(kind: InstKind) -> Self {
        Self {
            kind,
            operands: Vec::new(),
            debug_location: None,
        }
    }

    pub fn with_operands(mut self, operands: Vec<Operand>) -> Self {
        self.operands = operands;
        self
    }

    /// Attach a debug location (line + scope).
    pub fn at(mut self, line: u32, scope: ScopeRef) -> Self {
        self.debug_location = Some(DebugLocation::new(line, scope));
        self
    }

    pub fn debug_location(&self) -> Option<&DebugLocation> {
        self.debug_location.as_ref()
    }

    /// Name of the called symbol, for call instructions.
    pub fn callee(&self) -> Option<&str> {
        match &self.kind {
            InstKind::Call { callee } => Some(callee),
            _ => None,
        }
    }

    /// Whether this is a call to the debug-declaration intrinsic.
    pub fn is_debug_declare(&self) -> bool {
        self.callee() == Some(DEBUG_DECLARE_INTRINSIC)
    }
}

/// Instruction opcode, collapsed to the shapes the analysis distinguishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InstKind {
    Alloca,
    Store,
    Load,
    Binary,
    Call { callee: String },
    Branch,
    Ret,
    /// Anything the analysis has no reason to tell apart.
    Other,
}

/// An instruction operand: either an opaque IR value or a metadata reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operand {
    Value(String),
    Metadata(MetadataRef),
}

/// A module-level global symbol and its metadata attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSymbol {
    pub name: String,
    #[serde(default)]
    pub debug_metadata: Vec<MetadataRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_module() -> Module {
        let mut scopes = ScopeGraph::new();
        let file = scopes.add_file();
        let func = scopes.add_subprogram(file, "f", 5);

        Module {
            source_filename: "test.c".to_string(),
            functions: vec![Function {
                name: "f".to_string(),
                blocks: vec![BasicBlock {
                    instructions: vec![
                        Instruction::new(InstKind::Alloca),
                        Instruction::new(InstKind::Call {
                            callee: DEBUG_DECLARE_INTRINSIC.to_string(),
                        })
                        .with_operands(vec![
                            Operand::Value("%x".to_string()),
                            Operand::Metadata(MetadataRef(0)),
                            Operand::Metadata(MetadataRef(1)),
                        ])
                        .at(6, func),
                    ],
                    terminator: Instruction::new(InstKind::Ret).at(9, func),
                }],
                debug_info: Some(FunctionDebugInfo {
                    name: "f".to_string(),
                    decl_line: 5,
                }),
            }],
            globals: vec![GlobalSymbol {
                name: "g".to_string(),
                debug_metadata: vec![MetadataRef(2)],
            }],
            scopes,
            metadata: vec![
                MetadataNode::LocalVariable {
                    name: "x".to_string(),
                    type_name: "int".to_string(),
                    scope: func,
                    line: 6,
                },
                MetadataNode::Expression,
                MetadataNode::GlobalVariableExpression {
                    name: "g".to_string(),
                    type_name: "int".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_instructions_exclude_terminators() {
        let module = sample_module();
        let function = &module.functions[0];

        assert_eq!(function.instructions().count(), 2);
        assert!(function
            .instructions()
            .all(|inst| !matches!(inst.kind, InstKind::Ret)));
        assert_eq!(function.terminators().count(), 1);
    }

    #[test]
    fn test_debug_declare_detection() {
        let module = sample_module();
        let function = &module.functions[0];
        let declares: Vec<_> = function
            .instructions()
            .filter(|inst| inst.is_debug_declare())
            .collect();

        assert_eq!(declares.len(), 1);
        assert_eq!(declares[0].callee(), Some(DEBUG_DECLARE_INTRINSIC));
        assert!(!Instruction::new(InstKind::Store).is_debug_declare());
    }

    #[test]
    fn test_metadata_lookup_is_bounds_checked() {
        let module = sample_module();

        assert!(matches!(
            module.metadata_node(MetadataRef(0)),
            Some(MetadataNode::LocalVariable { .. })
        ));
        assert_eq!(module.metadata_node(MetadataRef(99)), None);
    }

    #[test]
    fn test_stats_counts() {
        let module = sample_module();
        let stats = module.stats();

        assert_eq!(stats.functions, 1);
        assert_eq!(stats.basic_blocks, 1);
        assert_eq!(stats.instructions, 3);
        assert_eq!(stats.globals, 1);
        assert_eq!(stats.scope_nodes, 2);
        assert_eq!(stats.metadata_nodes, 3);

        let rendered = stats.to_string();
        assert!(rendered.contains("Functions: 1"));
        assert!(rendered.contains("Metadata nodes: 3"));
    }

    #[test]
    fn test_module_round_trips_through_json() {
        let module = sample_module();
        let json = serde_json::to_string(&module).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();

        assert_eq!(back, module);
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{
            "source_filename": "test.c",
            "scopes": [
                { "kind": "file" },
                { "kind": "subprogram", "scope": 0, "name": "f", "decl_line": 5 }
            ],
            "metadata": [
                { "kind": "local_variable", "name": "x", "type_name": "int", "scope": 1, "line": 6 },
                { "kind": "expression" }
            ],
            "functions": [
                {
                    "name": "f",
                    "blocks": [
                        {
                            "instructions": [
                                { "op": "alloca" },
                                {
                                    "op": "call",
                                    "callee": "llvm.dbg.declare",
                                    "operands": [
                                        { "value": "%x" },
                                        { "metadata": 0 },
                                        { "metadata": 1 }
                                    ],
                                    "debug_location": { "line": 6, "scope": 1 }
                                }
                            ],
                            "terminator": { "op": "ret", "debug_location": { "line": 9, "scope": 1 } }
                        }
                    ],
                    "debug_info": { "name": "f", "decl_line": 5 }
                }
            ],
            "globals": []
        }"#;

        let module: Module = serde_json::from_str(json).unwrap();
        let function = &module.functions[0];

        assert_eq!(module.source_filename, "test.c");
        assert_eq!(function.instructions().count(), 2);
        let declare = function.instructions().nth(1).unwrap();
        assert!(declare.is_debug_declare());
        assert_eq!(declare.operands.len(), 3);
        assert_eq!(
            declare.debug_location().map(|loc| (loc.line, loc.scope)),
            Some((6, ScopeRef(1)))
        );
        assert_eq!(
            function.blocks[0].terminator.kind,
            InstKind::Ret
        );
    }
}
