//! Dynamic values held in attribute stores

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Value {
    /// No value
    #[default]
    Null,
    /// Flag value (body-part status, character conditions)
    Bool(bool),
    /// Whole-number value (damage reduction, skill ranks)
    Int(i64),
    /// Fractional value (cell values, deadlines)
    Float(f64),
    /// Free text, only ever seen as bad input to a cell or table
    Text(String),
}

impl Value {
    /// Check if this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as a bool, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as an integer, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of this value
    ///
    /// Bools count as 0/1 so flag tables and numeric tables share the
    /// same default comparison. Text and null are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Check if this value can be stored in a cell or table
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Get as text, if this is `Text`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Check if this value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Compare two values numerically, falling back to structural equality
    pub fn same_as(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::Bool(true).as_number(), Some(1.0));
        assert_eq!(Value::Int(3).as_number(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_number(), Some(2.5));
        assert!(!Value::from("three").is_numeric());
        assert!(!Value::Null.is_numeric());
    }

    #[test]
    fn test_same_as_crosses_numeric_types() {
        assert!(Value::Int(0).same_as(&Value::Bool(false)));
        assert!(Value::Float(3.0).same_as(&Value::Int(3)));
        assert!(!Value::Int(1).same_as(&Value::Int(2)));
        assert!(Value::from("a").same_as(&Value::from("a")));
    }

    #[test]
    fn test_value_ron_roundtrip() {
        for value in [Value::Int(3), Value::Bool(true), Value::from("thick")] {
            let text = ron::to_string(&value).unwrap();
            let back: Value = ron::from_str(&text).unwrap();
            assert_eq!(back, value);
        }
    }
}
