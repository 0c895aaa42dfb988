//evaluation rules applied when an expression is reduced,
//checks operand kinds, zero divisors and integer overflow

use crate::ast::{Operator, TypeName};
use crate::semantic::semantic_error::SemanticError;
use crate::semantic::semantic_value::{Value, kind_of};

/// Computes `left op right`.
///
/// `==` and `!=` accept any two present values, every other operator wants
/// two numeric ones. Absent operands always fail the kind check.
pub fn eval_binary(op: Operator, left: Option<&Value>, right: Option<&Value>) -> Result<Value, SemanticError> {
    let (l, r) = match (left, right) {
        (Some(l), Some(r)) if op.is_equality() || (l.is_numeric() && r.is_numeric()) => (l, r),
        _ => {
            return Err(SemanticError::InvalidOperands {
                op,
                left: kind_of(left),
                right: kind_of(right),
            });
        }
    };

    if r.is_zero() {
        match op {
            Operator::Divide => return Err(SemanticError::DivisionByZero),
            Operator::Modulo => return Err(SemanticError::ModuloByZero),
            _ => {}
        }
    }

    if op.is_equality() {
        return Ok(eval_equality(op, l, r));
    }

    match (l, r) {
        (Value::Opaque(_), _) | (_, Value::Opaque(_)) => Ok(opaque_result(op, l, r)),
        (Value::Integer(a), Value::Integer(b)) => eval_integer(op, *a, *b),
        _ => {
            let (a, b) = (as_float(l), as_float(r));
            Ok(eval_float(op, a, b))
        }
    }
}

fn eval_equality(op: Operator, l: &Value, r: &Value) -> Value {
    let equal = match (l, r) {
        (Value::Opaque(_), _) | (_, Value::Opaque(_)) => return Value::Opaque(TypeName::Boolean),
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (a, b) if a.is_numeric() && b.is_numeric() => as_float(a) == as_float(b),
        _ => false,
    };
    Value::Boolean(if op == Operator::Equal { equal } else { !equal })
}

fn eval_integer(op: Operator, a: i64, b: i64) -> Result<Value, SemanticError> {
    let result = match op {
        Operator::Plus => a.checked_add(b),
        Operator::Minus => a.checked_sub(b),
        Operator::Multiply => a.checked_mul(b),
        // `/` is true division, exact or not
        Operator::Divide => return Ok(Value::Float(a as f64 / b as f64)),
        Operator::Modulo => floored_rem(a, b),
        Operator::Less => return Ok(Value::Boolean(a < b)),
        Operator::LessEqual => return Ok(Value::Boolean(a <= b)),
        Operator::Greater => return Ok(Value::Boolean(a > b)),
        Operator::GreaterEqual => return Ok(Value::Boolean(a >= b)),
        Operator::Equal => return Ok(Value::Boolean(a == b)),
        Operator::NotEqual => return Ok(Value::Boolean(a != b)),
    };
    result.map(Value::Integer).ok_or(SemanticError::Overflow(op))
}

fn eval_float(op: Operator, a: f64, b: f64) -> Value {
    match op {
        Operator::Plus => Value::Float(a + b),
        Operator::Minus => Value::Float(a - b),
        Operator::Multiply => Value::Float(a * b),
        Operator::Divide => Value::Float(a / b),
        Operator::Modulo => {
            let r = a % b;
            Value::Float(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r })
        }
        Operator::Less => Value::Boolean(a < b),
        Operator::LessEqual => Value::Boolean(a <= b),
        Operator::Greater => Value::Boolean(a > b),
        Operator::GreaterEqual => Value::Boolean(a >= b),
        Operator::Equal => Value::Boolean(a == b),
        Operator::NotEqual => Value::Boolean(a != b),
    }
}

// remainder taking the sign of the divisor
fn floored_rem(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

// type of the result when at least one side is only known by its type
fn opaque_result(op: Operator, l: &Value, r: &Value) -> Value {
    if op.is_comparison() {
        Value::Opaque(TypeName::Boolean)
    } else if op == Operator::Divide || l.is_float() || r.is_float() {
        Value::Opaque(TypeName::Float)
    } else {
        Value::Opaque(TypeName::Int)
    }
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Integer(n) => *n as f64,
        Value::Float(x) => *x,
        _ => f64::NAN,
    }
}

pub fn eval_grouping(inner: Option<&Value>) -> Result<Value, SemanticError> {
    inner.cloned().ok_or(SemanticError::InvalidGrouping)
}

pub fn check_condition(construct: &'static str, value: Option<&Value>) -> Result<(), SemanticError> {
    match value {
        Some(v) if v.is_boolean() => Ok(()),
        _ => Err(SemanticError::NonBooleanCondition {
            construct,
            found: kind_of(value),
        }),
    }
}
