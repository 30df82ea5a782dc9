//! Analysis reports - what the pipeline hands back to callers
//!
//! Results keep a deterministic shape: the map is ordered by fault location
//! and each binding list is ordered (globals first, then locals in the order
//! their declarations matched). Running the same analysis twice yields the
//! same report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::FaultLocation;
use crate::variable::{Variable, VariableOrigin};

/// One variable visible at a fault location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub name: String,
    pub type_name: String,
    pub origin: VariableOrigin,
}

impl From<&Variable> for VariableBinding {
    fn from(variable: &Variable) -> Self {
        Self {
            name: variable.name.clone(),
            type_name: variable.type_name.clone(),
            origin: variable.origin(),
        }
    }
}

impl fmt::Display for VariableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.type_name, self.name, self.origin)
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Visible variables per requested fault location. Locations outside the
    /// module's source file never get an entry.
    pub results: BTreeMap<FaultLocation, Vec<VariableBinding>>,
    /// Contained problems; each names what was skipped and why.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl Analysis {
    pub fn bindings_at(&self, location: &FaultLocation) -> Option<&[VariableBinding]> {
        self.results.get(location).map(Vec::as_slice)
    }

    pub fn stats(&self) -> AnalysisStats {
        let bindings = self.results.values().map(Vec::len).sum();
        let globals = self
            .results
            .values()
            .flatten()
            .filter(|binding| binding.origin == VariableOrigin::Global)
            .count();
        AnalysisStats {
            locations: self.results.len(),
            bindings,
            globals,
            locals: bindings - globals,
            warnings: self.warnings.len(),
        }
    }
}

/// A contained problem. The run continued; this records what was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    /// Function being scanned when the problem surfaced, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Fault location being answered when the problem surfaced, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<FaultLocation>,
    pub message: String,
}

impl AnalysisWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            function: None,
            location: None,
            message: message.into(),
        }
    }

    pub fn in_function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }

    pub fn at(mut self, location: FaultLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.location, &self.function) {
            (Some(location), Some(function)) => {
                write!(f, "{location} ({function}): {}", self.message)
            }
            (Some(location), None) => write!(f, "{location}: {}", self.message),
            (None, Some(function)) => write!(f, "{function}: {}", self.message),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

/// Counts for the end-of-run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub locations: usize,
    pub bindings: usize,
    pub globals: usize,
    pub locals: usize,
    pub warnings: usize,
}

impl fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Locations answered: {}", self.locations)?;
        writeln!(f, "Visible variables: {}", self.bindings)?;
        writeln!(f, "  globals: {}", self.globals)?;
        writeln!(f, "  locals: {}", self.locals)?;
        write!(f, "Warnings: {}", self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeRef;

    fn sample_analysis() -> Analysis {
        let mut analysis = Analysis::default();
        analysis.results.insert(
            FaultLocation::new("test.c", 14),
            vec![
                VariableBinding::from(&Variable::global("limit", "long")),
                VariableBinding::from(&Variable::local("x", "int", ScopeRef(1), 6)),
            ],
        );
        analysis.results.insert(
            FaultLocation::new("test.c", 27),
            vec![VariableBinding::from(&Variable::global("limit", "long"))],
        );
        analysis
            .warnings
            .push(AnalysisWarning::new("scope chain never reached a file scope").in_function("g"));
        analysis
    }

    #[test]
    fn test_binding_from_variable_keeps_origin() {
        let binding = VariableBinding::from(&Variable::local("x", "int", ScopeRef(1), 6));
        assert_eq!(binding.origin, VariableOrigin::Local);
        assert_eq!(binding.to_string(), "int x [local]");

        let binding = VariableBinding::from(&Variable::global("limit", "long"));
        assert_eq!(binding.origin, VariableOrigin::Global);
    }

    #[test]
    fn test_stats_split_by_origin() {
        let stats = sample_analysis().stats();

        assert_eq!(stats.locations, 2);
        assert_eq!(stats.bindings, 3);
        assert_eq!(stats.globals, 2);
        assert_eq!(stats.locals, 1);
        assert_eq!(stats.warnings, 1);

        let rendered = stats.to_string();
        assert!(rendered.contains("Locations answered: 2"));
        assert!(rendered.contains("Warnings: 1"));
    }

    #[test]
    fn test_warning_display_includes_context() {
        let warning = AnalysisWarning::new("skipped").in_function("main");
        assert_eq!(warning.to_string(), "main: skipped");

        let warning = AnalysisWarning::new("skipped").at(FaultLocation::new("a.c", 3));
        assert_eq!(warning.to_string(), "a.c:3: skipped");

        let warning = AnalysisWarning::new("skipped")
            .in_function("main")
            .at(FaultLocation::new("a.c", 3));
        assert_eq!(warning.to_string(), "a.c:3 (main): skipped");
    }

    #[test]
    fn test_results_serialize_with_location_keys() {
        let analysis = sample_analysis();
        let json = serde_json::to_value(&analysis).unwrap();

        let bindings = &json["results"]["test.c:14"];
        assert_eq!(bindings[0]["name"], "limit");
        assert_eq!(bindings[0]["origin"], "global");
        assert_eq!(bindings[1]["name"], "x");
        assert_eq!(bindings[1]["origin"], "local");
    }

    #[test]
    fn test_bindings_at_lookup() {
        let analysis = sample_analysis();

        assert_eq!(
            analysis
                .bindings_at(&FaultLocation::new("test.c", 27))
                .map(<[VariableBinding]>::len),
            Some(1)
        );
        assert!(analysis.bindings_at(&FaultLocation::new("test.c", 99)).is_none());
    }
}
