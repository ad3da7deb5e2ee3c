//! Integer generators of every width

use crate::bit_sequence::BitSequence;
use crate::UniqueCreator;

macro_rules! integer_creator {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $width:expr, $partitions:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            sequence: BitSequence,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    sequence: BitSequence::new($width, $partitions),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl UniqueCreator<$ty> for $name {
            fn next_value(&mut self) -> $ty {
                // the sequence never sets bits above the type's width
                self.sequence.next_bits() as $ty
            }
        }
    };
}

integer_creator!(
    /// `i8` generator: 255 distinct values, then zero
    I8Creator, i8, 8, 2
);
integer_creator!(
    /// `u8` generator: 255 distinct values, then zero
    U8Creator, u8, 8, 2
);
integer_creator!(I16Creator, i16, 16, 4);
integer_creator!(U16Creator, u16, 16, 4);
integer_creator!(I32Creator, i32, 32, 4);
integer_creator!(U32Creator, u32, 32, 4);
integer_creator!(I64Creator, i64, 64, 8);
integer_creator!(U64Creator, u64, 64, 8);
