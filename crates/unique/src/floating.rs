//! IEEE-754 generators
//!
//! Both generators walk a [`BitSequence`] of the float's width and reinterpret
//! the word as a float. Words whose exponent is all ones (infinities and
//! NaNs) and negative zero are skipped, so every emitted value compares
//! unequal to every earlier one.

use crate::bit_sequence::BitSequence;
use crate::UniqueCreator;

const F32_EXPONENT_MASK: u32 = 0x7F80_0000;
const F32_SIGN_MASK: u32 = 0x8000_0000;
const F64_EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const F64_SIGN_MASK: u64 = 0x8000_0000_0000_0000;

fn is_skipped_f32(bits: u32) -> bool {
    bits & F32_EXPONENT_MASK == F32_EXPONENT_MASK || bits == F32_SIGN_MASK
}

fn is_skipped_f64(bits: u64) -> bool {
    bits & F64_EXPONENT_MASK == F64_EXPONENT_MASK || bits == F64_SIGN_MASK
}

/// `f32` generator
#[derive(Debug, Clone)]
pub struct F32Creator {
    sequence: BitSequence,
}

impl F32Creator {
    pub fn new() -> Self {
        Self {
            sequence: BitSequence::new(32, 4),
        }
    }
}

impl Default for F32Creator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueCreator<f32> for F32Creator {
    fn next_value(&mut self) -> f32 {
        loop {
            let bits = self.sequence.next_bits() as u32;
            if !is_skipped_f32(bits) {
                return f32::from_bits(bits);
            }
        }
    }
}

/// `f64` generator
#[derive(Debug, Clone)]
pub struct F64Creator {
    sequence: BitSequence,
}

impl F64Creator {
    pub fn new() -> Self {
        Self {
            sequence: BitSequence::new(64, 8),
        }
    }
}

impl Default for F64Creator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueCreator<f64> for F64Creator {
    fn next_value(&mut self) -> f64 {
        loop {
            let bits = self.sequence.next_bits();
            if !is_skipped_f64(bits) {
                return f64::from_bits(bits);
            }
        }
    }
}
