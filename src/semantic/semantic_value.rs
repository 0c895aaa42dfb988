//runtime values produced by expressions

use crate::ast::TypeName;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A value whose type is known but whose content is only decided at run
    /// time, such as a parameter or the result of a call.
    Opaque(TypeName),
}

impl Value {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::Float(_) | Value::Opaque(TypeName::Int | TypeName::Float)
        )
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_) | Value::Opaque(TypeName::Boolean))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Integer(n) => *n == 0,
            Value::Float(x) => *x == 0.0,
            _ => false,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Opaque(TypeName::Float))
    }

    pub fn kind_name(&self) -> &str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Opaque(ty) => ty.name(),
        }
    }
}

pub fn kind_of(value: Option<&Value>) -> String {
    value.map_or("none", Value::kind_name).to_string()
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Opaque(ty) => write!(f, "<{ty}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_kinds() {
        assert!(Value::Integer(1).is_numeric());
        assert!(Value::Float(1.5).is_numeric());
        assert!(Value::Opaque(TypeName::Int).is_numeric());
        assert!(!Value::Boolean(true).is_numeric());
        assert!(!Value::Opaque(TypeName::Char).is_numeric());
        assert!(!Value::Opaque(TypeName::Named("Point".into())).is_numeric());
    }

    #[test]
    fn kind_names() {
        assert_eq!(kind_of(None), "none");
        assert_eq!(kind_of(Some(&Value::Boolean(false))), "boolean");
        assert_eq!(kind_of(Some(&Value::Opaque(TypeName::Named("Point".into())))), "Point");
    }

    #[test]
    fn display() {
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Opaque(TypeName::Int).to_string(), "<int>");
    }
}
