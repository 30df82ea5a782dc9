//! Analysis pipeline - answers "which variables are visible here?"
//!
//! One pass over a read-only module:
//!
//! 1. Seed an accumulator per fault location in the module's source file,
//!    globals first.
//! 2. Locate function line ranges and match fault lines against them.
//! 3. Per matching function, collect its declared locals, then walk the body:
//!    every instruction whose debug line equals the fault line resolves the
//!    locals declared before it against its scope.
//!
//! Problems inside one function are contained as warnings; the run always
//! produces results for the well-formed parts of the input.

use std::collections::{BTreeMap, BTreeSet};

use crate::collect::{collect_globals, collect_locals, DeclaredLocal, VariableSet};
use crate::ir::{Function, Module};
use crate::location::FaultLocation;
use crate::range::RangeLocator;
use crate::report::{Analysis, AnalysisWarning, VariableBinding};
use crate::scope::VisibilityResolver;

/// Borrow of a module plus the per-run scratch the pipeline needs.
pub struct Analyzer<'a> {
    module: &'a Module,
}

impl<'a> Analyzer<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self { module }
    }

    /// Run the full pipeline for a set of fault locations.
    ///
    /// Locations naming a file other than the module's source file get no
    /// result entry at all. Every other location gets one, even if nothing
    /// but globals (or nothing at all) is visible there.
    pub fn run(&self, faults: &BTreeSet<FaultLocation>) -> Analysis {
        let mut warnings = Vec::new();

        let globals = collect_globals(self.module);
        tracing::debug!(
            "analyzing {} fault locations against {} ({} globals)",
            faults.len(),
            self.module.source_filename,
            globals.len()
        );

        let mut pending: BTreeMap<FaultLocation, VariableSet> = BTreeMap::new();
        for fault in faults {
            if !fault.is_in_file(&self.module.source_filename) {
                tracing::debug!(
                    "{} names a file other than {}, no result entry",
                    fault,
                    self.module.source_filename
                );
                continue;
            }
            let mut set = VariableSet::new();
            for global in &globals {
                set.insert(global.clone());
            }
            pending.insert(fault.clone(), set);
        }

        if !pending.is_empty() {
            let resolver = VisibilityResolver::new(&self.module.scopes);

            for range in RangeLocator::new(self.module).locate() {
                let hits: Vec<FaultLocation> = pending
                    .keys()
                    .filter(|fault| range.contains(fault.line))
                    .cloned()
                    .collect();
                if hits.is_empty() {
                    continue;
                }

                let function = &self.module.functions[range.function];
                let locals = match collect_locals(self.module, function) {
                    Ok(locals) => locals,
                    Err(err) => {
                        tracing::warn!("skipping function {}: {}", function.name, err);
                        warnings.push(
                            AnalysisWarning::new(err.to_string()).in_function(&function.name),
                        );
                        continue;
                    }
                };

                for fault in &hits {
                    if let Some(set) = pending.get_mut(fault) {
                        scan_function(function, &locals, fault, &resolver, set, &mut warnings);
                    }
                }
            }
        }

        Analysis {
            results: pending
                .into_iter()
                .map(|(fault, set)| {
                    let bindings = set.into_vec().iter().map(VariableBinding::from).collect();
                    (fault, bindings)
                })
                .collect(),
            warnings,
        }
    }
}

/// Match `fault` against one function body and append the visible locals.
fn scan_function(
    function: &Function,
    locals: &[DeclaredLocal],
    fault: &FaultLocation,
    resolver: &VisibilityResolver<'_>,
    set: &mut VariableSet,
    warnings: &mut Vec<AnalysisWarning>,
) {
    for (position, inst) in function.instructions().enumerate() {
        let Some(location) = inst.debug_location() else {
            continue;
        };
        if location.line != fault.line {
            continue;
        }

        // Only declarations recorded before this instruction are candidates:
        // a variable does not exist at program points above its declaration.
        for declared in locals.iter().filter(|local| local.position < position) {
            let Some(declaring) = declared.variable.declaring_scope else {
                continue;
            };
            match resolver.is_visible(location.scope, declaring) {
                Ok(true) => {
                    set.insert(declared.variable.clone());
                }
                Ok(false) => {}
                Err(err) => {
                    // Bad chains poison one variable/instruction pair, not
                    // the run; the variable just stays invisible here.
                    tracing::warn!(
                        "cannot resolve {} in {}: {}",
                        declared.variable.name,
                        function.name,
                        err
                    );
                    warnings.push(
                        AnalysisWarning::new(format!(
                            "cannot resolve visibility of '{}': {}",
                            declared.variable.name, err
                        ))
                        .in_function(&function.name)
                        .at(fault.clone()),
                    );
                }
            }
        }
    }
}
