//! Function range locator - maps source lines to enclosing functions
//!
//! A function covers the lines between its declaration and its final
//! return. Both endpoints are exclusive: a fault on the declaration line or
//! the return line itself has no interior program point to inspect.

use serde::{Deserialize, Serialize};

use crate::ir::{InstKind, Module};

/// The line span a function body covers, endpoints exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRange {
    /// Index of the function in the module's function list.
    pub function: usize,
    /// Declaration line.
    pub start: u32,
    /// Line of the final return.
    pub end: u32,
}

impl FunctionRange {
    /// Whether `line` falls strictly between the endpoints.
    pub fn contains(&self, line: u32) -> bool {
        self.start < line && line < self.end
    }
}

/// Derives line ranges for every function the module has debug info for.
pub struct RangeLocator<'a> {
    module: &'a Module,
}

impl<'a> RangeLocator<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self { module }
    }

    /// Ranges for all functions with a known start and end, in module order.
    ///
    /// A function without a subprogram record has no start; one whose final
    /// return carries no location has no end. Either way it gets no range and
    /// matches no fault line. Absent debug info is expected input, not an
    /// error.
    pub fn locate(&self) -> Vec<FunctionRange> {
        let mut ranges = Vec::new();

        for (index, function) in self.module.functions.iter().enumerate() {
            let Some(debug_info) = &function.debug_info else {
                tracing::trace!("function {} has no debug info, no range", function.name);
                continue;
            };
            let end = function
                .terminators()
                .filter(|term| matches!(term.kind, InstKind::Ret))
                .last()
                .and_then(|term| term.debug_location())
                .map(|loc| loc.line);
            let Some(end) = end else {
                tracing::trace!(
                    "function {} has no located final return, no range",
                    function.name
                );
                continue;
            };
            ranges.push(FunctionRange {
                function: index,
                start: debug_info.decl_line,
                end,
            });
        }

        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BasicBlock, Function, FunctionDebugInfo, Instruction};
    use crate::scope::{ScopeGraph, ScopeRef};

    fn block(terminator: Instruction) -> BasicBlock {
        BasicBlock {
            instructions: Vec::new(),
            terminator,
        }
    }

    fn function(name: &str, decl_line: Option<u32>, blocks: Vec<BasicBlock>) -> Function {
        Function {
            name: name.to_string(),
            blocks,
            debug_info: decl_line.map(|decl_line| FunctionDebugInfo {
                name: name.to_string(),
                decl_line,
            }),
        }
    }

    fn sample_module(functions: Vec<Function>) -> Module {
        let mut scopes = ScopeGraph::new();
        scopes.add_file();

        Module {
            source_filename: "test.c".to_string(),
            functions,
            globals: Vec::new(),
            scopes,
            metadata: Vec::new(),
        }
    }

    #[test]
    fn test_contains_is_strict_on_both_ends() {
        let range = FunctionRange {
            function: 0,
            start: 5,
            end: 9,
        };

        assert!(!range.contains(5));
        assert!(range.contains(6));
        assert!(range.contains(8));
        assert!(!range.contains(9));
        assert!(!range.contains(12));
    }

    #[test]
    fn test_adjacent_endpoints_leave_no_interior() {
        let range = FunctionRange {
            function: 0,
            start: 5,
            end: 6,
        };

        assert!(!range.contains(5));
        assert!(!range.contains(6));
    }

    #[test]
    fn test_locate_uses_decl_line_and_final_return() {
        let scope = ScopeRef(0);
        let module = sample_module(vec![function(
            "main",
            Some(3),
            vec![
                block(Instruction::new(InstKind::Branch).at(6, scope)),
                block(Instruction::new(InstKind::Ret).at(11, scope)),
            ],
        )]);

        let ranges = RangeLocator::new(&module).locate();
        assert_eq!(
            ranges,
            vec![FunctionRange {
                function: 0,
                start: 3,
                end: 11,
            }]
        );
    }

    #[test]
    fn test_locate_takes_last_return_in_body_order() {
        let scope = ScopeRef(0);
        let module = sample_module(vec![function(
            "early_exit",
            Some(1),
            vec![
                block(Instruction::new(InstKind::Ret).at(4, scope)),
                block(Instruction::new(InstKind::Ret).at(8, scope)),
            ],
        )]);

        let ranges = RangeLocator::new(&module).locate();
        assert_eq!(ranges[0].end, 8);
    }

    #[test]
    fn test_locate_skips_function_without_debug_info() {
        let scope = ScopeRef(0);
        let module = sample_module(vec![
            function(
                "stripped",
                None,
                vec![block(Instruction::new(InstKind::Ret).at(4, scope))],
            ),
            function(
                "kept",
                Some(6),
                vec![block(Instruction::new(InstKind::Ret).at(9, scope))],
            ),
        ]);

        let ranges = RangeLocator::new(&module).locate();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].function, 1);
    }

    #[test]
    fn test_locate_skips_function_whose_final_return_is_unlocated() {
        let scope = ScopeRef(0);
        let module = sample_module(vec![function(
            "partial",
            Some(1),
            vec![
                block(Instruction::new(InstKind::Ret).at(8, scope)),
                // The final return decides the end line; the located early
                // return must not stand in for it.
                block(Instruction::new(InstKind::Ret)),
            ],
        )]);

        assert!(RangeLocator::new(&module).locate().is_empty());
    }

    #[test]
    fn test_locate_skips_function_without_located_return() {
        let scope = ScopeRef(0);
        let module = sample_module(vec![
            // Terminator is a return but carries no location.
            function("bare_ret", Some(2), vec![block(Instruction::new(InstKind::Ret))]),
            // Terminator has a location but never returns.
            function(
                "spins",
                Some(5),
                vec![block(Instruction::new(InstKind::Branch).at(7, scope))],
            ),
        ]);

        assert!(RangeLocator::new(&module).locate().is_empty());
    }
}
