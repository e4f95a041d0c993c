//! Typed parameter values.
//!
//! A store holds loosely-typed values; `FromParameterValue` is the narrow
//! conversion the resolver uses to pull a Rust type back out.

use std::fmt;

/// The type of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ParameterType {
    NotSet,
    Bool,
    Integer,
    Double,
    String,
}

/// A typed parameter value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParameterValue {
    #[default]
    NotSet,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(std::string::String),
}

impl ParameterValue {
    /// Returns the parameter type of this value.
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::NotSet => ParameterType::NotSet,
            Self::Bool(_) => ParameterType::Bool,
            Self::Integer(_) => ParameterType::Integer,
            Self::Double(_) => ParameterType::Double,
            Self::String(_) => ParameterType::String,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSet => write!(f, "<not set>"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<std::string::String> for ParameterValue {
    fn from(v: std::string::String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Conversion from a stored value into a concrete Rust type.
///
/// Returns `None` when the stored type cannot represent `Self`.
pub trait FromParameterValue: Sized {
    fn from_parameter_value(value: &ParameterValue) -> Option<Self>;
}

impl FromParameterValue for bool {
    fn from_parameter_value(value: &ParameterValue) -> Option<Self> {
        match value {
            ParameterValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromParameterValue for i64 {
    fn from_parameter_value(value: &ParameterValue) -> Option<Self> {
        match value {
            ParameterValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

/// Integers widen to doubles, the same way the ROS parameter server does.
impl FromParameterValue for f64 {
    fn from_parameter_value(value: &ParameterValue) -> Option<Self> {
        match value {
            ParameterValue::Double(v) => Some(*v),
            ParameterValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromParameterValue for std::string::String {
    fn from_parameter_value(value: &ParameterValue) -> Option<Self> {
        match value {
            ParameterValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}
