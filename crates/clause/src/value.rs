// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Bind value model
//!
//! [`Value`] is the scalar shape handed to the driver. There is no
//! byte-array variant: the runtime-generic driver encodes booleans, integers,
//! floats and strings, and byte columns are coerced to text on the scan side.
//!
//! [`Var`] is what flows through [`Builder::add_vars`](crate::Builder):
//! besides plain values it carries named arguments, identifier references,
//! raw SQL fragments, and ordered sequences.

use serde::{Deserialize, Serialize};

use crate::expression::Expr;
use crate::{Column, Table};

/// A driver-level bind value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether the value is integer zero. Zero-valued integer fields of
    /// record types are treated as unset when building INSERT rows.
    pub fn is_zero_int(&self) -> bool {
        matches!(self, Value::Int(0))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl std::convert::From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(v as i64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl std::convert::From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl std::convert::From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl std::convert::From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl std::convert::From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl std::convert::From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T> std::convert::From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A variable written through the builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Var {
    /// Positional scalar; the dialect renders its placeholder.
    Value(Value),
    /// Named argument, written as `@name`.
    Named { name: String, value: Value },
    /// Quoted column reference; consumes no bind.
    Column(Column),
    /// Quoted table reference; consumes no bind.
    Table(Table),
    /// Raw SQL fragment written verbatim, its vars appended to the binds.
    Raw(Expr),
    /// Ordered sequence; renders `(?, …)`, or `(NULL)` when empty.
    List(Vec<Var>),
}

impl Var {
    pub fn list_of<T: Into<Value>>(values: Vec<T>) -> Var {
        Var::List(values.into_iter().map(|v| Var::Value(v.into())).collect())
    }
}

impl std::convert::From<Value> for Var {
    fn from(v: Value) -> Self {
        Var::Value(v)
    }
}

impl std::convert::From<Column> for Var {
    fn from(v: Column) -> Self {
        Var::Column(v)
    }
}

impl std::convert::From<Table> for Var {
    fn from(v: Table) -> Self {
        Var::Table(v)
    }
}

impl std::convert::From<Expr> for Var {
    fn from(v: Expr) -> Self {
        Var::Raw(v)
    }
}

impl std::convert::From<Vec<Value>> for Var {
    fn from(v: Vec<Value>) -> Self {
        Var::List(v.into_iter().map(Var::Value).collect())
    }
}

macro_rules! var_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl std::convert::From<$ty> for Var {
                fn from(v: $ty) -> Self {
                    Var::Value(v.into())
                }
            }
        )*
    };
}

var_from_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_int_detection() {
        assert!(Value::from(0).is_zero_int());
        assert!(!Value::from(1).is_zero_int());
        assert!(!Value::from("0").is_zero_int());
        assert!(!Value::Null.is_zero_int());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn test_list_conversion() {
        let var = Var::list_of(vec![1, 2]);
        assert_eq!(
            var,
            Var::List(vec![Var::Value(Value::Int(1)), Var::Value(Value::Int(2))])
        );
    }
}
