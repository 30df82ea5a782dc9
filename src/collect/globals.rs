//! Global collector - reads global-variable-expression attachments
//!
//! A global symbol's first metadata attachment pairs its variable descriptor
//! with a location expression. Globals without that attachment (compiled
//! without debug info, or synthetic) are skipped, not errors.

use crate::ir::{MetadataNode, Module};
use crate::variable::Variable;

/// Collect every global the module has a variable descriptor for, in
/// declaration order.
pub fn collect_globals(module: &Module) -> Vec<Variable> {
    let mut globals = Vec::new();

    for symbol in &module.globals {
        let Some(first) = symbol.debug_metadata.first() else {
            tracing::trace!("global {} has no metadata attachments, skipping", symbol.name);
            continue;
        };
        match module.metadata_node(*first) {
            Some(MetadataNode::GlobalVariableExpression { name, type_name }) => {
                globals.push(Variable::global(name.clone(), type_name.clone()));
            }
            _ => {
                tracing::trace!(
                    "global {} first attachment is not a variable expression, skipping",
                    symbol.name
                );
            }
        }
    }

    globals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{GlobalSymbol, MetadataRef};
    use crate::scope::ScopeGraph;

    fn sample_module(globals: Vec<GlobalSymbol>, metadata: Vec<MetadataNode>) -> Module {
        Module {
            source_filename: "test.c".to_string(),
            functions: Vec::new(),
            globals,
            scopes: ScopeGraph::new(),
            metadata,
        }
    }

    fn expression_node(name: &str, type_name: &str) -> MetadataNode {
        MetadataNode::GlobalVariableExpression {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    #[test]
    fn test_collects_described_globals_in_order() {
        let module = sample_module(
            vec![
                GlobalSymbol {
                    name: "g_limit".to_string(),
                    debug_metadata: vec![MetadataRef(0)],
                },
                GlobalSymbol {
                    name: "g_count".to_string(),
                    debug_metadata: vec![MetadataRef(1)],
                },
            ],
            vec![
                expression_node("limit", "long"),
                expression_node("count", "int"),
            ],
        );

        let globals = collect_globals(&module);
        assert_eq!(globals.len(), 2);
        assert_eq!(globals[0].name, "limit");
        assert_eq!(globals[0].type_name, "long");
        assert!(globals[0].is_global());
        assert_eq!(globals[1].name, "count");
    }

    #[test]
    fn test_skips_global_without_attachments() {
        let module = sample_module(
            vec![GlobalSymbol {
                name: "g_bare".to_string(),
                debug_metadata: Vec::new(),
            }],
            Vec::new(),
        );

        assert!(collect_globals(&module).is_empty());
    }

    #[test]
    fn test_skips_global_with_wrong_first_attachment() {
        let module = sample_module(
            vec![GlobalSymbol {
                name: "g_odd".to_string(),
                debug_metadata: vec![MetadataRef(0), MetadataRef(1)],
            }],
            vec![MetadataNode::Expression, expression_node("odd", "int")],
        );

        // Only the first attachment counts.
        assert!(collect_globals(&module).is_empty());
    }

    #[test]
    fn test_skips_global_with_dangling_attachment() {
        let module = sample_module(
            vec![GlobalSymbol {
                name: "g_dangling".to_string(),
                debug_metadata: vec![MetadataRef(9)],
            }],
            Vec::new(),
        );

        assert!(collect_globals(&module).is_empty());
    }
}
