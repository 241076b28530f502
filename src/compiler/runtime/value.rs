use std::{
    fmt::{self, Display},
    str::FromStr,
};

use generational_arena::Index;

use super::error::RuntimeError;

/// A concrete value. Symbolic values evaluate to these as well.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Tuple(Vec<Value>),
    /// A deferred body, evaluated against the activation that created it.
    Thunk(Index),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Tuple(_) => "tuple",
            Value::Thunk(_) => "deferred body",
        }
    }

    pub fn unit() -> Self {
        Value::Tuple(Vec::new())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Thunk(_) => write!(f, "<deferred>"),
        }
    }
}

impl FromStr for Value {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if let Ok(value) = s.parse::<i64>() {
            return Ok(Value::Int(value));
        }
        s.parse::<f64>().map(Value::Float).map_err(|_| RuntimeError::InvalidArgument { value: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        assert_eq!("42".parse::<Value>(), Ok(Value::Int(42)));
        assert_eq!("-3".parse::<Value>(), Ok(Value::Int(-3)));
        assert_eq!("2.5".parse::<Value>(), Ok(Value::Float(2.5)));
        assert_eq!("true".parse::<Value>(), Ok(Value::Bool(true)));
        assert!(matches!("x".parse::<Value>(), Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(Value::Tuple(vec![Value::Int(1), Value::Float(2.0)]).to_string(), "(1, 2.0)");
        assert_eq!(Value::unit().to_string(), "()");
    }
}
