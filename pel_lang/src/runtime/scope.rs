//! Name bindings supplied by the host

use std::collections::HashMap;

use crate::config::compile_time::runtime::MAX_SCOPE_BINDINGS;
use crate::runtime::error::EvalError;
use crate::types::LValue;

/// Flat name-to-value bindings for one evaluation
///
/// Names resolve here or nowhere; there is no nesting and no mutation
/// from inside an expression.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, LValue>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any existing binding for it
    pub fn define(&mut self, name: impl Into<String>, value: LValue) -> Result<(), EvalError> {
        let name = name.into();
        if !self.bindings.contains_key(&name) && self.bindings.len() >= MAX_SCOPE_BINDINGS {
            return Err(EvalError::TooManyBindings {
                count: self.bindings.len(),
            });
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&LValue> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut scope = Scope::new();
        scope.define("limit", LValue::Number(10.0)).unwrap();
        assert_eq!(scope.lookup("limit"), Some(&LValue::Number(10.0)));
        assert_eq!(scope.lookup("missing"), None);
        assert!(scope.contains("limit"));
    }

    #[test]
    fn test_redefinition_replaces() {
        let mut scope = Scope::new();
        scope.define("x", LValue::Number(1.0)).unwrap();
        scope.define("x", LValue::Number(2.0)).unwrap();
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.lookup("x"), Some(&LValue::Number(2.0)));
    }

    #[test]
    fn test_binding_cap() {
        let mut scope = Scope::new();
        for i in 0..MAX_SCOPE_BINDINGS {
            scope.define(format!("v{}", i), LValue::Null).unwrap();
        }
        let err = scope.define("overflow", LValue::Null).unwrap_err();
        assert_matches::assert_matches!(err, EvalError::TooManyBindings { .. });

        // Rebinding an existing name never counts against the cap
        scope.define("v0", LValue::Bool(true)).unwrap();
    }
}
