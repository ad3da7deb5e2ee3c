//! One generator per base type, owned by a fixture engine

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use fixtura_core::config::UniqueConfig;
use fixtura_core::{BaseTypeKind, Error, Result, TypeDescription, Value};
use tracing::trace;

use crate::{
    BoolCreator, BytesCreator, CharCreator, DecimalCreator, EnumCreator, F32Creator, F64Creator,
    I16Creator, I32Creator, I64Creator, I8Creator, StringCreator, U16Creator, U32Creator,
    U64Creator, U8Creator, UniqueCreator,
};

/// Generator state for every base type
///
/// Values drawn through one context are distinct per base type. Enum
/// cursors are kept per enum type name and live as long as the context.
#[derive(Debug, Clone)]
pub struct UniqueValueContext {
    bool: BoolCreator,
    char: CharCreator,
    i8: I8Creator,
    u8: U8Creator,
    i16: I16Creator,
    u16: U16Creator,
    i32: I32Creator,
    u32: U32Creator,
    i64: I64Creator,
    u64: U64Creator,
    f32: F32Creator,
    f64: F64Creator,
    decimal: DecimalCreator,
    string: StringCreator,
    bytes: BytesCreator,
    enums: HashMap<String, EnumCreator>,
}

impl UniqueValueContext {
    pub fn new(config: &UniqueConfig) -> Self {
        Self {
            bool: BoolCreator,
            char: CharCreator::new(),
            i8: I8Creator::new(),
            u8: U8Creator::new(),
            i16: I16Creator::new(),
            u16: U16Creator::new(),
            i32: I32Creator::new(),
            u32: U32Creator::new(),
            i64: I64Creator::new(),
            u64: U64Creator::new(),
            f32: F32Creator::new(),
            f64: F64Creator::new(),
            decimal: DecimalCreator::new(config.decimal_scale, config.decimal_max_retries),
            string: StringCreator,
            bytes: BytesCreator::new(config.byte_array_length),
            enums: HashMap::new(),
        }
    }

    /// Next unique value for the base type `description`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `description` is not a base type or is an
    /// enum without variants.
    pub fn next_value(&mut self, description: &TypeDescription) -> Result<Value> {
        let kind = description.base_type_kind().ok_or_else(|| {
            Error::invalid_input(format!(
                "{} is not a base type and has no unique values",
                description.name
            ))
        })?;

        let value = if kind == BaseTypeKind::Enum {
            let creator = match self.enums.entry(description.name.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(EnumCreator::new(description)?),
            };
            Value::Enum {
                type_name: creator.type_name().to_string(),
                variant: creator.next_value(),
            }
        } else {
            self.next_for_kind(kind)?
        };

        trace!(type_name = %description.name, %value, "generated unique value");
        Ok(value)
    }

    /// Next unique value for a builtin kind
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for [`BaseTypeKind::Enum`], whose values depend
    /// on the enum's description.
    pub fn next_for_kind(&mut self, kind: BaseTypeKind) -> Result<Value> {
        Ok(match kind {
            BaseTypeKind::Bool => Value::Bool(self.bool.next_value()),
            BaseTypeKind::Char => Value::Char(self.char.next_value()),
            BaseTypeKind::I8 => Value::I8(self.i8.next_value()),
            BaseTypeKind::U8 => Value::U8(self.u8.next_value()),
            BaseTypeKind::I16 => Value::I16(self.i16.next_value()),
            BaseTypeKind::U16 => Value::U16(self.u16.next_value()),
            BaseTypeKind::I32 => Value::I32(self.i32.next_value()),
            BaseTypeKind::U32 => Value::U32(self.u32.next_value()),
            BaseTypeKind::I64 => Value::I64(self.i64.next_value()),
            BaseTypeKind::U64 => Value::U64(self.u64.next_value()),
            BaseTypeKind::F32 => Value::F32(self.f32.next_value()),
            BaseTypeKind::F64 => Value::F64(self.f64.next_value()),
            BaseTypeKind::Decimal => Value::Decimal(self.decimal.next_value()),
            BaseTypeKind::String => Value::String(self.string.next_value()),
            BaseTypeKind::Bytes => Value::Bytes(self.bytes.next_value()),
            BaseTypeKind::Enum => {
                return Err(Error::invalid_input(
                    "enum values require the enum's type description",
                ))
            }
        })
    }
}

impl Default for UniqueValueContext {
    fn default() -> Self {
        Self::new(&UniqueConfig::default())
    }
}
