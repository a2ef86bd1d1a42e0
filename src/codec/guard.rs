//! Leaf checks shared by the size and write passes.
//!
//! [`check`] is the optional validation guard: strict kind and bounds checks
//! against the declared primitive. The `coerce_*` helpers are what every
//! encode does regardless; they accept any value that can be converted
//! (an integer for a boolean, a float for an integer, ...) and reject only
//! values that cannot be written at all.

use crate::config::StringEncoding;
use crate::error::EncodeError;
use crate::types::PrimitiveType;
use crate::value::Value;

/// A rejected leaf, before the field path is attached.
#[derive(Debug)]
pub(crate) enum Violation {
    Kind,
    Range { bounds: String },
    Text { reason: String },
}

impl Violation {
    pub(crate) fn into_error(
        self,
        field: String,
        ty: PrimitiveType,
        value: &Value,
        encoding: StringEncoding,
    ) -> EncodeError {
        match self {
            Violation::Kind => EncodeError::TypeMismatch {
                field,
                value: value.to_string(),
                expected: ty.name().to_string(),
                actual: value.type_name().to_string(),
            },
            Violation::Range { bounds } => EncodeError::OutOfRange {
                field,
                value: value.to_string(),
                type_name: ty.name(),
                bounds,
            },
            Violation::Text { reason } => EncodeError::InvalidText {
                field,
                encoding: encoding.name(),
                reason,
            },
        }
    }
}

/// Strict check of `value` against the domain of `ty`.
pub(crate) fn check(ty: PrimitiveType, value: &Value) -> Result<(), Violation> {
    if let Some((min, max)) = ty.int_bounds() {
        let in_range = match value {
            Value::Integer(v) => *v >= min && *v <= max,
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                // 2^63 is the first float past i64::MAX; the bound must be exclusive.
                *f >= min as f64 && *f < max as f64 + 1.0
            }
            _ => return Err(Violation::Kind),
        };
        if !in_range {
            return Err(Violation::Range {
                bounds: format!("[{}, {}]", min, max),
            });
        }
        return Ok(());
    }

    match (ty, value) {
        (PrimitiveType::Boolean, Value::Boolean(_)) => Ok(()),
        (PrimitiveType::Float32, Value::Float(f)) if f.is_finite() && (*f as f32).is_infinite() => {
            Err(Violation::Range {
                bounds: format!("[{:e}, {:e}]", f32::MIN, f32::MAX),
            })
        }
        (PrimitiveType::Float32 | PrimitiveType::Float64, Value::Float(_) | Value::Integer(_)) => {
            Ok(())
        }
        (PrimitiveType::Str, Value::Str(_)) => Ok(()),
        (PrimitiveType::Buffer, Value::Bytes(_)) => Ok(()),
        _ => Err(Violation::Kind),
    }
}

pub(crate) fn coerce_int(value: &Value) -> Result<i64, Violation> {
    match value {
        Value::Integer(v) => Ok(*v),
        Value::Float(f) => Ok(*f as i64),
        Value::Boolean(b) => Ok(*b as i64),
        _ => Err(Violation::Kind),
    }
}

pub(crate) fn coerce_float(value: &Value) -> Result<f64, Violation> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(v) => Ok(*v as f64),
        _ => Err(Violation::Kind),
    }
}

pub(crate) fn coerce_bool(value: &Value) -> Result<bool, Violation> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(v) => Ok(*v != 0),
        Value::Float(f) => Ok(*f != 0.0),
        _ => Err(Violation::Kind),
    }
}

pub(crate) fn coerce_str(value: &Value) -> Result<&str, Violation> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(Violation::Kind),
    }
}

pub(crate) fn coerce_bytes(value: &Value) -> Result<&[u8], Violation> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(Violation::Kind),
    }
}
