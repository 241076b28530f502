use crate::compiler::parser::node::{BinOpKind, UnaryOpKind};

use super::value::Value;

/// Why an operator could not be applied. The caller attaches the span.
#[derive(Debug, Clone, PartialEq)]
pub enum OpFault {
    DivisionByZero,
    TypeMismatch(String),
}

fn mismatch(left: &Value, right: &Value) -> OpFault {
    OpFault::TypeMismatch(format!("{} and {}", left.kind(), right.kind()))
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(value) => Some(*value as f64),
        Value::Float(value) => Some(*value),
        _ => None,
    }
}

pub fn binary(op: BinOpKind, left: &Value, right: &Value) -> Result<Value, OpFault> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => int_binary(op, *l, *r).ok_or_else(|| mismatch(left, right))?,
        (Value::Bool(l), Value::Bool(r)) => bool_binary(op, *l, *r).ok_or_else(|| mismatch(left, right)),
        _ => match (as_f64(left), as_f64(right)) {
            (Some(l), Some(r)) => float_binary(op, l, r).ok_or_else(|| mismatch(left, right)),
            _ => Err(mismatch(left, right)),
        },
    }
}

fn int_binary(op: BinOpKind, l: i64, r: i64) -> Option<Result<Value, OpFault>> {
    let value = match op {
        BinOpKind::Add => Value::Int(l.wrapping_add(r)),
        BinOpKind::Sub => Value::Int(l.wrapping_sub(r)),
        BinOpKind::Mul => Value::Int(l.wrapping_mul(r)),
        BinOpKind::Div | BinOpKind::Mod if r == 0 => return Some(Err(OpFault::DivisionByZero)),
        BinOpKind::Div => Value::Int(l.wrapping_div(r)),
        BinOpKind::Mod => Value::Int(l.wrapping_rem(r)),
        BinOpKind::Eq => Value::Bool(l == r),
        BinOpKind::NotEq => Value::Bool(l != r),
        BinOpKind::LessThan => Value::Bool(l < r),
        BinOpKind::LessThanOrEq => Value::Bool(l <= r),
        BinOpKind::GreaterThan => Value::Bool(l > r),
        BinOpKind::GreaterThanOrEq => Value::Bool(l >= r),
        BinOpKind::BitwiseAnd => Value::Int(l & r),
        BinOpKind::BitwiseOr => Value::Int(l | r),
        BinOpKind::BitwiseXor => Value::Int(l ^ r),
        BinOpKind::ShiftLeft => Value::Int(l.wrapping_shl(r as u32)),
        BinOpKind::ShiftRight => Value::Int(l.wrapping_shr(r as u32)),
        BinOpKind::LogicalAnd | BinOpKind::LogicalOr => return None,
    };
    Some(Ok(value))
}

fn float_binary(op: BinOpKind, l: f64, r: f64) -> Option<Value> {
    Some(match op {
        BinOpKind::Add => Value::Float(l + r),
        BinOpKind::Sub => Value::Float(l - r),
        BinOpKind::Mul => Value::Float(l * r),
        BinOpKind::Div => Value::Float(l / r),
        BinOpKind::Mod => Value::Float(l % r),
        BinOpKind::Eq => Value::Bool(l == r),
        BinOpKind::NotEq => Value::Bool(l != r),
        BinOpKind::LessThan => Value::Bool(l < r),
        BinOpKind::LessThanOrEq => Value::Bool(l <= r),
        BinOpKind::GreaterThan => Value::Bool(l > r),
        BinOpKind::GreaterThanOrEq => Value::Bool(l >= r),
        _ => return None,
    })
}

fn bool_binary(op: BinOpKind, l: bool, r: bool) -> Option<Value> {
    Some(Value::Bool(match op {
        BinOpKind::Eq => l == r,
        BinOpKind::NotEq => l != r,
        BinOpKind::LogicalAnd | BinOpKind::BitwiseAnd => l & r,
        BinOpKind::LogicalOr | BinOpKind::BitwiseOr => l | r,
        BinOpKind::BitwiseXor => l ^ r,
        _ => return None,
    }))
}

pub fn unary(op: UnaryOpKind, operand: &Value) -> Result<Value, OpFault> {
    match (op, operand) {
        (UnaryOpKind::Neg, Value::Int(value)) => Ok(Value::Int(value.wrapping_neg())),
        (UnaryOpKind::Neg, Value::Float(value)) => Ok(Value::Float(-value)),
        (UnaryOpKind::Not, Value::Bool(value)) => Ok(Value::Bool(!value)),
        (UnaryOpKind::Not, Value::Int(value)) => Ok(Value::Int(!value)),
        _ => Err(OpFault::TypeMismatch(operand.kind().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(binary(BinOpKind::Add, &Value::Int(2), &Value::Int(3)), Ok(Value::Int(5)));
        assert_eq!(binary(BinOpKind::Mod, &Value::Int(7), &Value::Int(4)), Ok(Value::Int(3)));
        assert_eq!(binary(BinOpKind::ShiftLeft, &Value::Int(1), &Value::Int(4)), Ok(Value::Int(16)));
        assert_eq!(binary(BinOpKind::Div, &Value::Int(1), &Value::Int(0)), Err(OpFault::DivisionByZero));
    }

    #[test]
    fn test_mixed_numbers_promote_to_float() {
        assert_eq!(binary(BinOpKind::Mul, &Value::Int(2), &Value::Float(1.5)), Ok(Value::Float(3.0)));
        assert_eq!(binary(BinOpKind::LessThan, &Value::Float(0.5), &Value::Int(1)), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(
            binary(BinOpKind::Add, &Value::Bool(true), &Value::Int(1)),
            Err(OpFault::TypeMismatch(_))
        ));
        assert!(matches!(
            binary(BinOpKind::LogicalAnd, &Value::Int(1), &Value::Int(1)),
            Err(OpFault::TypeMismatch(_))
        ));
        assert!(matches!(unary(UnaryOpKind::Neg, &Value::Bool(true)), Err(OpFault::TypeMismatch(_))));
    }
}
