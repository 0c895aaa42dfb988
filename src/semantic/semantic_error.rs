//semantic errors,
//the collected ones are turned into diagnostics by the parser and evaluation goes on,
//the fatal ones stop the whole parse

use crate::ast::Operator;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("Invalid operands for {op}: {left} and {right}")]
    InvalidOperands {
        op: Operator,
        left: String,
        right: String,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Integer overflow in '{0}'")]
    Overflow(Operator),
    #[error("Invalid expression inside parentheses")]
    InvalidGrouping,
    #[error("Condition of '{construct}' must be boolean, found {found}")]
    NonBooleanCondition {
        construct: &'static str,
        found: String,
    },
}

/// Errors that abort a parse immediately instead of being collected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalError {
    #[error("Function '{name}' is not defined (line {line})")]
    UndefinedFunction { name: String, line: usize },
    #[error("Function '{name}' expects {expected} arguments, but {found} were provided (line {line})")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("Fatal parsing error at line {line}: {message}")]
    Internal { line: usize, message: String },
}

impl FatalError {
    pub fn line(&self) -> usize {
        match self {
            FatalError::UndefinedFunction { line, .. }
            | FatalError::ArityMismatch { line, .. }
            | FatalError::Internal { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            SemanticError::UndefinedVariable("y".into()).to_string(),
            "Undefined variable 'y'"
        );
        assert_eq!(
            SemanticError::InvalidOperands {
                op: Operator::Plus,
                left: "boolean".into(),
                right: "int".into(),
            }
            .to_string(),
            "Invalid operands for +: boolean and int"
        );
        assert_eq!(
            FatalError::ArityMismatch {
                name: "add".into(),
                expected: 2,
                found: 1,
                line: 1,
            }
            .to_string(),
            "Function 'add' expects 2 arguments, but 1 were provided (line 1)"
        );
    }

    #[test]
    fn fatal_errors_carry_their_line() {
        let error = FatalError::Internal {
            line: 4,
            message: "nesting exceeds 2 levels".into(),
        };
        assert_eq!(error.line(), 4);
        assert_eq!(error.to_string(), "Fatal parsing error at line 4: nesting exceeds 2 levels");
    }
}
