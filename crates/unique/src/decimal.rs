//! Decimal generator

use fixtura_core::value::Decimal;
use tracing::warn;

use crate::integers::I32Creator;
use crate::UniqueCreator;

/// Decimal generator driven by the 32-bit integer sequence
///
/// Each value takes the raw 32 bits of the next integer as its mantissa
/// with a fixed scale, and the sign alternates between calls. A value that
/// cannot be represented is logged and replaced by the next integer, at
/// most `max_retries` times; after that the integer itself is emitted with
/// scale zero.
#[derive(Debug, Clone)]
pub struct DecimalCreator {
    integers: I32Creator,
    scale: u8,
    max_retries: usize,
    negative: bool,
}

impl DecimalCreator {
    pub fn new(scale: u8, max_retries: usize) -> Self {
        Self {
            integers: I32Creator::new(),
            scale,
            max_retries,
            negative: false,
        }
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

impl Default for DecimalCreator {
    fn default() -> Self {
        Self::new(
            fixtura_core::config::DEFAULT_DECIMAL_SCALE,
            fixtura_core::config::UniqueConfig::default().decimal_max_retries,
        )
    }
}

impl UniqueCreator<Decimal> for DecimalCreator {
    fn next_value(&mut self) -> Decimal {
        let negative = self.negative;
        self.negative = !self.negative;

        let mut attempt = 0;
        loop {
            let bits = self.integers.next_value() as u32;
            match Decimal::try_new(u128::from(bits), self.scale, negative) {
                Ok(decimal) => return decimal,
                Err(e) if attempt < self.max_retries => {
                    warn!(attempt, error = %e, "decimal overflow, retrying with the next integer");
                    attempt += 1;
                }
                Err(e) => {
                    warn!(error = %e, "decimal retries exhausted, falling back to scale 0");
                    let magnitude = i64::from(bits);
                    return Decimal::from_i64(if negative { -magnitude } else { magnitude });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sign_alternates_and_scale_is_fixed() {
        let mut creator = DecimalCreator::default();
        let first = creator.next_value();
        let second = creator.next_value();
        assert!(!first.is_negative());
        assert!(second.is_negative());
        assert_eq!(first.scale(), 3);
        assert_eq!(first.to_string(), "0.001");
        assert_eq!(second.to_string(), "-0.256");
    }

    #[test]
    fn test_values_are_distinct() {
        let mut creator = DecimalCreator::default();
        let values: HashSet<Decimal> = (0..50_000).map(|_| creator.next_value()).collect();
        assert_eq!(values.len(), 50_000);
    }

    #[test]
    fn test_unrepresentable_scale_falls_back_after_retries() {
        let mut creator = DecimalCreator::new(40, 2);
        let first = creator.next_value();
        assert_eq!(first.scale(), 0);
        // three integers were consumed by the initial try and two retries
        assert_eq!(first.mantissa(), 257);
        let second = creator.next_value();
        assert!(second.is_negative());
        assert_ne!(first.mantissa(), second.mantissa());
    }
}
