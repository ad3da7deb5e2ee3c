//! Literal primitive values
//!
//! [`Value`] is what a raw member configuration holds and what the
//! unique-value generators emit.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

use crate::types::BaseTypeKind;

/// Largest mantissa a [`Decimal`] can carry (96 bits)
pub const DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;
/// Largest supported decimal scale
pub const DECIMAL_MAX_SCALE: u8 = 28;

/// Fixed-point decimal: `(-1)^negative * mantissa / 10^scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    mantissa: u128,
    scale: u8,
    negative: bool,
}

/// Decimal construction failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalError {
    #[error("mantissa {0} exceeds 96 bits")]
    MantissaOverflow(u128),
    #[error("scale {0} exceeds the maximum of 28")]
    ScaleOverflow(u8),
}

impl Decimal {
    pub fn try_new(mantissa: u128, scale: u8, negative: bool) -> Result<Self, DecimalError> {
        if mantissa > DECIMAL_MAX_MANTISSA {
            return Err(DecimalError::MantissaOverflow(mantissa));
        }
        if scale > DECIMAL_MAX_SCALE {
            return Err(DecimalError::ScaleOverflow(scale));
        }
        Ok(Self {
            mantissa,
            scale,
            negative,
        })
    }

    /// Whole number with scale zero
    pub fn from_i64(value: i64) -> Self {
        Self {
            mantissa: u128::from(value.unsigned_abs()),
            scale: 0,
            negative: value < 0,
        }
    }

    pub fn mantissa(&self) -> u128 {
        self.mantissa
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let scale = usize::from(self.scale);
        let sign = if self.negative && self.mantissa != 0 { "-" } else { "" };
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{fraction}")
    }
}

/// A literal value of a base type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    String(String),
    /// Variant name of an enum type
    Enum { type_name: String, variant: String },
    Bytes(Vec<u8>),
}

impl Value {
    /// Kind of base type this literal belongs to
    pub fn kind(&self) -> BaseTypeKind {
        match self {
            Value::Bool(_) => BaseTypeKind::Bool,
            Value::Char(_) => BaseTypeKind::Char,
            Value::I8(_) => BaseTypeKind::I8,
            Value::U8(_) => BaseTypeKind::U8,
            Value::I16(_) => BaseTypeKind::I16,
            Value::U16(_) => BaseTypeKind::U16,
            Value::I32(_) => BaseTypeKind::I32,
            Value::U32(_) => BaseTypeKind::U32,
            Value::I64(_) => BaseTypeKind::I64,
            Value::U64(_) => BaseTypeKind::U64,
            Value::F32(_) => BaseTypeKind::F32,
            Value::F64(_) => BaseTypeKind::F64,
            Value::Decimal(_) => BaseTypeKind::Decimal,
            Value::String(_) => BaseTypeKind::String,
            Value::Enum { .. } => BaseTypeKind::Enum,
            Value::Bytes(_) => BaseTypeKind::Bytes,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        Some(match self {
            Value::I8(v) => i128::from(*v),
            Value::U8(v) => i128::from(*v),
            Value::I16(v) => i128::from(*v),
            Value::U16(v) => i128::from(*v),
            Value::I32(v) => i128::from(*v),
            Value::U32(v) => i128::from(*v),
            Value::I64(v) => i128::from(*v),
            Value::U64(v) => i128::from(*v),
            _ => return None,
        })
    }

    /// Convert this literal to `kind` when no information is lost
    ///
    /// Integer literals narrow or widen into any integer kind that holds them
    /// and widen into floats and decimals; everything else must already be
    /// of the requested kind. Persisted configuration stores integers as
    /// `i64`, so this is how they reach their member's declared width.
    pub fn coerce_to(&self, kind: BaseTypeKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        if let Some(v) = self.as_i128() {
            return match kind {
                BaseTypeKind::I8 => i8::try_from(v).ok().map(Value::I8),
                BaseTypeKind::U8 => u8::try_from(v).ok().map(Value::U8),
                BaseTypeKind::I16 => i16::try_from(v).ok().map(Value::I16),
                BaseTypeKind::U16 => u16::try_from(v).ok().map(Value::U16),
                BaseTypeKind::I32 => i32::try_from(v).ok().map(Value::I32),
                BaseTypeKind::U32 => u32::try_from(v).ok().map(Value::U32),
                BaseTypeKind::I64 => i64::try_from(v).ok().map(Value::I64),
                BaseTypeKind::U64 => u64::try_from(v).ok().map(Value::U64),
                BaseTypeKind::F64 => Some(v as f64)
                    .filter(|f| *f as i128 == v)
                    .map(Value::F64),
                BaseTypeKind::F32 => Some(v as f32)
                    .filter(|f| *f as i128 == v)
                    .map(Value::F32),
                BaseTypeKind::Decimal => i64::try_from(v)
                    .ok()
                    .map(|v| Value::Decimal(Decimal::from_i64(v))),
                _ => None,
            };
        }
        match (self, kind) {
            (Value::F32(v), BaseTypeKind::F64) => Some(Value::F64(f64::from(*v))),
            (Value::F64(v), BaseTypeKind::F32) if (*v as f32) as f64 == *v => {
                Some(Value::F32(*v as f32))
            }
            (Value::String(s), BaseTypeKind::Char) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
            Value::I8(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Enum { type_name, variant } => write!(f, "{type_name}::{variant}"),
            Value::Bytes(v) => write!(f, "{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_display() {
        let d = Decimal::try_new(12345, 3, true).expect("in range");
        assert_eq!(d.to_string(), "-12.345");
        let small = Decimal::try_new(5, 3, false).expect("in range");
        assert_eq!(small.to_string(), "0.005");
        assert_eq!(Decimal::from_i64(-42).to_string(), "-42");
    }

    #[test]
    fn test_decimal_overflow() {
        assert_eq!(
            Decimal::try_new(DECIMAL_MAX_MANTISSA + 1, 0, false),
            Err(DecimalError::MantissaOverflow(DECIMAL_MAX_MANTISSA + 1))
        );
        assert_eq!(
            Decimal::try_new(1, 29, false),
            Err(DecimalError::ScaleOverflow(29))
        );
    }

    #[test]
    fn test_coerce_integer_literals() {
        assert_eq!(Value::I64(200).coerce_to(BaseTypeKind::U8), Some(Value::U8(200)));
        assert_eq!(Value::I64(300).coerce_to(BaseTypeKind::U8), None);
        assert_eq!(Value::I64(-1).coerce_to(BaseTypeKind::U32), None);
        assert_eq!(Value::I64(3).coerce_to(BaseTypeKind::F64), Some(Value::F64(3.0)));
        assert_eq!(Value::I64(3).coerce_to(BaseTypeKind::String), None);
    }

    #[test]
    fn test_coerce_to_float_rejects_lost_precision() {
        let exact = (1i64 << 53) + 2;
        assert_eq!(
            Value::I64(exact).coerce_to(BaseTypeKind::F64),
            Some(Value::F64(exact as f64))
        );
        assert_eq!(Value::I64((1i64 << 53) + 1).coerce_to(BaseTypeKind::F64), None);
        assert_eq!(Value::I64((1i64 << 24) + 1).coerce_to(BaseTypeKind::F32), None);
        assert_eq!(
            Value::I64(1 << 24).coerce_to(BaseTypeKind::F32),
            Some(Value::F32(16_777_216.0))
        );
    }

    #[test]
    fn test_coerce_string_to_char() {
        assert_eq!(
            Value::String("x".into()).coerce_to(BaseTypeKind::Char),
            Some(Value::Char('x'))
        );
        assert_eq!(Value::String("xy".into()).coerce_to(BaseTypeKind::Char), None);
    }

    #[test]
    fn test_value_serde_tagging() {
        let json = serde_json::to_string(&Value::I32(7)).expect("serializes");
        assert_eq!(json, r#"{"kind":"i32","value":7}"#);
        let back: Value = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, Value::I32(7));
    }
}
