//! Enum variant generator

use fixtura_core::{Error, Result, TypeDescription};

use crate::UniqueCreator;

/// Cycles through the declared variants of one enum type, wrapping around
///
/// The cursor belongs to this creator. Independent creators for the same
/// enum start from the first variant each.
#[derive(Debug, Clone)]
pub struct EnumCreator {
    type_name: String,
    variants: Vec<String>,
    cursor: usize,
}

impl EnumCreator {
    /// Creator for the enum `description`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the enum declares no variants.
    pub fn new(description: &TypeDescription) -> Result<Self> {
        if description.enum_variants.is_empty() {
            return Err(Error::invalid_input(format!(
                "enum {} declares no variants",
                description.name
            )));
        }
        Ok(Self {
            type_name: description.name.clone(),
            variants: description.enum_variants.clone(),
            cursor: 0,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl UniqueCreator<String> for EnumCreator {
    fn next_value(&mut self) -> String {
        let variant = self.variants[self.cursor % self.variants.len()].clone();
        self.cursor = (self.cursor + 1) % self.variants.len();
        variant
    }
}
