//! Source-level variables recovered from debug metadata

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scope::ScopeRef;

/// A variable the compiler recorded debug metadata for.
///
/// Locals carry the scope they were declared in; globals have no declaring
/// scope because they are visible everywhere in their translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Source-level name
    pub name: String,
    /// Source-level type spelling, e.g. `"int"` or `"char *"`
    pub type_name: String,
    /// Scope the declaration belongs to (locals only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_scope: Option<ScopeRef>,
    /// Line the declaration appears on (locals only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl_line: Option<u32>,
}

impl Variable {
    /// A local variable declared in `scope` at `decl_line`.
    pub fn local(
        name: impl Into<String>,
        type_name: impl Into<String>,
        scope: ScopeRef,
        decl_line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            declaring_scope: Some(scope),
            decl_line: Some(decl_line),
        }
    }

    /// A module-level global.
    pub fn global(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            declaring_scope: None,
            decl_line: None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.declaring_scope.is_none()
    }

    pub fn origin(&self) -> VariableOrigin {
        if self.is_global() {
            VariableOrigin::Global
        } else {
            VariableOrigin::Local
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// Where a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableOrigin {
    Global,
    Local,
}

impl VariableOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableOrigin::Global => "global",
            VariableOrigin::Local => "local",
        }
    }
}

impl fmt::Display for VariableOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_carries_scope_and_line() {
        let var = Variable::local("count", "int", ScopeRef(3), 12);

        assert!(!var.is_global());
        assert_eq!(var.origin(), VariableOrigin::Local);
        assert_eq!(var.declaring_scope, Some(ScopeRef(3)));
        assert_eq!(var.decl_line, Some(12));
    }

    #[test]
    fn test_global_has_no_scope() {
        let var = Variable::global("limit", "long");

        assert!(var.is_global());
        assert_eq!(var.origin(), VariableOrigin::Global);
        assert_eq!(var.declaring_scope, None);
        assert_eq!(var.decl_line, None);
    }

    #[test]
    fn test_display_reads_like_a_declaration() {
        let var = Variable::local("buf", "char *", ScopeRef(0), 4);
        assert_eq!(var.to_string(), "char * buf");
    }

    #[test]
    fn test_origin_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&VariableOrigin::Global).unwrap(),
            "\"global\""
        );
        assert_eq!(
            serde_json::to_string(&VariableOrigin::Local).unwrap(),
            "\"local\""
        );
    }

    #[test]
    fn test_global_serde_omits_empty_fields() {
        let json = serde_json::to_string(&Variable::global("limit", "long")).unwrap();
        assert_eq!(json, r#"{"name":"limit","type_name":"long"}"#);

        let back: Variable = serde_json::from_str(&json).unwrap();
        assert!(back.is_global());
    }
}
