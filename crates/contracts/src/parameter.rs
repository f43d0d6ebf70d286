//! Sensor parameter values and lookup results

use serde::{Deserialize, Serialize};

/// Value read back from a sensor parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Float(f64),
    Integer(i64),
}

impl ParameterValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            ParameterValue::Float(v) => v,
            ParameterValue::Integer(v) => v as f64,
        }
    }
}

/// Outcome of a parameter lookup.
///
/// An unknown parameter name is an expected answer, not a failure, and is
/// kept apart from any legitimate value (including zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ParameterLookup<T> {
    Found(T),
    NotFound,
}

impl<T> ParameterLookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, ParameterLookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            ParameterLookup::Found(v) => Some(v),
            ParameterLookup::NotFound => None,
        }
    }
}
