//! Partitioned bit counter behind the integer and floating point generators

/// A counter whose bits are dealt round-robin across equal partitions of
/// the output word
///
/// Bit `i` of the internal counter lands in partition `i % partitions`, at
/// offset `i / partitions` inside it. Consecutive outputs therefore touch
/// the low end of every partition in turn, which interleaves small and large
/// magnitudes instead of counting up from zero:
///
/// ```
/// use fixtura_unique::BitSequence;
///
/// let mut sequence = BitSequence::new(16, 4);
/// let first: Vec<u64> = (0..4).map(|_| sequence.next_bits()).collect();
/// assert_eq!(first, vec![0x0001, 0x0010, 0x0011, 0x0100]);
/// ```
///
/// The mapping is a bijection on `width` bits, so a sequence yields
/// `2^width - 1` distinct non-zero words before it wraps around to zero.
/// Zero is the reserved edge value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSequence {
    width: u32,
    partitions: u32,
    counter: u64,
}

impl BitSequence {
    /// A sequence over `width` bits split into `partitions` partitions
    ///
    /// `width` is clamped to 1..=64 and `partitions` to a divisor of it.
    pub fn new(width: u32, partitions: u32) -> Self {
        let width = width.clamp(1, 64);
        let partitions = (1..=partitions.clamp(1, width))
            .rev()
            .find(|p| width % p == 0)
            .unwrap_or(1);
        Self {
            width,
            partitions,
            counter: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn partitions(&self) -> u32 {
        self.partitions
    }

    fn mask(&self) -> u64 {
        if self.width == 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Next word; only the low `width` bits are ever set
    pub fn next_bits(&mut self) -> u64 {
        let counter = self.counter;
        self.counter = counter.wrapping_add(1) & self.mask();
        self.spread(counter)
    }

    fn spread(&self, counter: u64) -> u64 {
        let partition_width = self.width / self.partitions;
        let mut remaining = counter;
        let mut bit = 0u32;
        let mut word = 0u64;
        while remaining != 0 {
            if remaining & 1 == 1 {
                let target = (bit % self.partitions) * partition_width + bit / self.partitions;
                word |= 1u64 << target;
            }
            remaining >>= 1;
            bit += 1;
        }
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_values_interleave_partitions() {
        let mut sequence = BitSequence::new(32, 4);
        let values: Vec<u64> = (0..5).map(|_| sequence.next_bits()).collect();
        assert_eq!(values, vec![1, 1 << 8, (1 << 8) | 1, 1 << 16, (1 << 16) | 1]);
    }

    #[test]
    fn test_full_cycle_is_a_permutation() {
        let mut sequence = BitSequence::new(8, 2);
        let values: HashSet<u64> = (0..255).map(|_| sequence.next_bits()).collect();
        assert_eq!(values.len(), 255);
        assert!(!values.contains(&0));
        assert!(values.iter().all(|v| *v <= 0xFF));
        assert_eq!(sequence.next_bits(), 0);
        assert_eq!(sequence.next_bits(), 1);
    }

    #[test]
    fn test_partitions_are_normalized() {
        let sequence = BitSequence::new(8, 3);
        assert_eq!(sequence.partitions(), 2);
        let sequence = BitSequence::new(128, 0);
        assert_eq!(sequence.width(), 64);
        assert_eq!(sequence.partitions(), 1);
    }

    #[test]
    fn test_full_width_sequence_does_not_overflow() {
        let mut sequence = BitSequence::new(64, 8);
        sequence.counter = u64::MAX;
        assert_eq!(sequence.next_bits(), u64::MAX);
        assert_eq!(sequence.next_bits(), 0);
    }
}
