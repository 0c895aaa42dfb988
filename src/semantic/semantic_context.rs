//variable and function tables shared by every reduction of one parse,
//there is no scoping: every binding lands in the same flat table

use crate::ast::{Parameter, TypeName};
use crate::semantic::semantic_error::{FatalError, SemanticError};
use crate::semantic::semantic_value::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Parameter>,
    pub return_type: Option<TypeName>,
    pub line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    // `None` marks a name that is bound but whose value could not be computed
    variables: HashMap<String, Option<Value>>,
    functions: HashMap<String, FunctionSignature>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, value: Option<Value>) {
        trace!(name, value = ?value, "bind");
        self.variables.insert(name.to_string(), value);
    }

    pub fn lookup(&self, name: &str) -> Result<Option<Value>, SemanticError> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| SemanticError::UndefinedVariable(name.to_string()))
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.variables.get(name).and_then(Option::as_ref)
    }

    pub fn register_function(&mut self, name: &str, signature: FunctionSignature) {
        if self.functions.contains_key(name) {
            debug!(name, line = signature.line, "function redefined");
        } else {
            debug!(name, line = signature.line, arity = signature.params.len(), "function registered");
        }
        self.functions.insert(name.to_string(), signature);
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    // a call's value is only known by its declared return type
    pub fn resolve_call(&self, name: &str, arg_count: usize, line: usize) -> Result<Option<Value>, FatalError> {
        let signature = self.functions.get(name).ok_or_else(|| FatalError::UndefinedFunction {
            name: name.to_string(),
            line,
        })?;
        if signature.params.len() != arg_count {
            return Err(FatalError::ArityMismatch {
                name: name.to_string(),
                expected: signature.params.len(),
                found: arg_count,
                line,
            });
        }
        Ok(signature.return_type.clone().map(Value::Opaque))
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(params: &[(&str, TypeName)], return_type: Option<TypeName>) -> FunctionSignature {
        FunctionSignature {
            params: params
                .iter()
                .map(|(name, ty)| Parameter {
                    name: name.to_string(),
                    ty: ty.clone(),
                })
                .collect(),
            return_type,
            line: 1,
        }
    }

    #[test]
    fn lookup_distinguishes_unbound_from_placeholder() {
        let mut ctx = Context::new();
        ctx.bind("x", Some(Value::Integer(7)));
        ctx.bind("broken", None);
        assert_eq!(ctx.lookup("x"), Ok(Some(Value::Integer(7))));
        assert_eq!(ctx.lookup("broken"), Ok(None));
        assert_eq!(
            ctx.lookup("y"),
            Err(SemanticError::UndefinedVariable("y".into()))
        );
    }

    #[test]
    fn rebinding_overwrites() {
        let mut ctx = Context::new();
        ctx.bind("x", Some(Value::Integer(1)));
        ctx.bind("x", Some(Value::Boolean(true)));
        assert_eq!(ctx.value("x"), Some(&Value::Boolean(true)));
        assert_eq!(ctx.variable_count(), 1);
    }

    #[test]
    fn resolve_call_checks_name_and_arity() {
        let mut ctx = Context::new();
        ctx.register_function(
            "add",
            signature(&[("a", TypeName::Int), ("b", TypeName::Int)], Some(TypeName::Int)),
        );
        ctx.register_function("log", signature(&[], None));

        assert_eq!(ctx.resolve_call("add", 2, 3), Ok(Some(Value::Opaque(TypeName::Int))));
        assert_eq!(ctx.resolve_call("log", 0, 3), Ok(None));
        assert_eq!(
            ctx.resolve_call("add", 1, 3),
            Err(FatalError::ArityMismatch {
                name: "add".into(),
                expected: 2,
                found: 1,
                line: 3,
            })
        );
        assert_eq!(
            ctx.resolve_call("sub", 0, 4),
            Err(FatalError::UndefinedFunction {
                name: "sub".into(),
                line: 4,
            })
        );
    }
}
