//! Generators for `bool`, `char`, `string` and byte arrays

use uuid::Uuid;

use crate::bit_sequence::BitSequence;
use crate::UniqueCreator;

const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

/// Always `true`; a two-valued domain has no useful notion of unique
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCreator;

impl UniqueCreator<bool> for BoolCreator {
    fn next_value(&mut self) -> bool {
        true
    }
}

/// `char` generator over the basic multilingual plane, surrogates excluded
#[derive(Debug, Clone)]
pub struct CharCreator {
    sequence: BitSequence,
}

impl CharCreator {
    pub fn new() -> Self {
        Self {
            sequence: BitSequence::new(16, 4),
        }
    }
}

impl Default for CharCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueCreator<char> for CharCreator {
    fn next_value(&mut self) -> char {
        loop {
            let code = self.sequence.next_bits() as u32;
            if SURROGATES.contains(&code) {
                continue;
            }
            if let Some(c) = char::from_u32(code) {
                return c;
            }
        }
    }
}

/// Random UUID strings
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCreator;

impl UniqueCreator<String> for StringCreator {
    fn next_value(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Byte arrays of a fixed length filled from a bit sequence
///
/// Arrays shorter than eight bytes count over exactly their own width, so
/// every non-zero array appears once before the first repeat. Longer arrays
/// repeat the little-endian bytes of one 64-bit word.
#[derive(Debug, Clone)]
pub struct BytesCreator {
    sequence: BitSequence,
    length: usize,
}

impl BytesCreator {
    /// Arrays of `length` bytes; the counter spans at most the first eight
    /// bytes, one partition per byte, and longer arrays repeat it
    pub fn new(length: usize) -> Self {
        let counted = length.clamp(1, 8) as u32;
        Self {
            sequence: BitSequence::new(8 * counted, counted),
            length,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl UniqueCreator<Vec<u8>> for BytesCreator {
    fn next_value(&mut self) -> Vec<u8> {
        let word = self.sequence.next_bits().to_le_bytes();
        word.iter().copied().cycle().take(self.length).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_bool_is_constant() {
        let mut creator = BoolCreator;
        assert!(creator.next_value());
        assert!(creator.next_value());
    }

    #[test]
    fn test_chars_skip_surrogates() {
        let mut creator = CharCreator::new();
        let chars: HashSet<char> = (0..60_000).map(|_| creator.next_value()).collect();
        assert_eq!(chars.len(), 60_000);
        assert!(chars.iter().all(|c| !SURROGATES.contains(&u32::from(*c))));
    }

    #[test]
    fn test_strings_are_uuids() {
        let mut creator = StringCreator;
        let first = creator.next_value();
        let second = creator.next_value();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_bytes_have_configured_length() {
        let mut creator = BytesCreator::new(10);
        let first = creator.next_value();
        assert_eq!(first, vec![1, 0, 0, 0, 0, 0, 0, 0, 1, 0]);
        let second = creator.next_value();
        assert_eq!(second.len(), 10);
        assert_ne!(first, second);
    }

    #[test]
    fn test_short_byte_arrays_use_their_whole_value_space() {
        for length in 1..=2usize {
            let mut creator = BytesCreator::new(length);
            let draws = (1usize << (8 * length)) - 1;
            let values: HashSet<Vec<u8>> = (0..draws).map(|_| creator.next_value()).collect();
            assert_eq!(values.len(), draws);
            assert!(values.iter().all(|bytes| bytes.len() == length));
        }

        let mut creator = BytesCreator::new(3);
        let values: HashSet<Vec<u8>> = (0..100_000).map(|_| creator.next_value()).collect();
        assert_eq!(values.len(), 100_000);
    }
}
