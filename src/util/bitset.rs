//! Fixed-size bitset over local document numbers.

use bit_vec::BitVec;

use crate::lexical::index::DocId;

/// A bitset with one bit per local document number of a segment.
///
/// The size is fixed at construction time; reads past the end return
/// `false`, writes past the end are a programming error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBitSet {
    bits: BitVec,
}

impl FixedBitSet {
    /// Create an all-zero bitset able to hold `max_doc` documents.
    pub fn with_max_doc(max_doc: u32) -> Self {
        FixedBitSet {
            bits: BitVec::from_elem(max_doc as usize, false),
        }
    }

    /// Set the bit for `doc`. Setting an already set bit is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `doc` is outside the bitset.
    pub fn set(&mut self, doc: DocId) {
        assert!(
            (doc as usize) < self.bits.len(),
            "doc {doc} out of bounds for bitset of {} bits",
            self.bits.len()
        );
        self.bits.set(doc as usize, true);
    }

    /// Whether the bit for `doc` is set.
    pub fn get(&self, doc: DocId) -> bool {
        self.bits.get(doc as usize).unwrap_or(false)
    }

    /// Number of bits (the `max_doc` this bitset was sized for).
    pub fn len(&self) -> u32 {
        self.bits.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().filter(|bit| *bit).count() as u32
    }

    /// Iterate over the set doc numbers in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| *bit)
            .map(|(doc, _)| doc as DocId)
    }

    /// Approximate heap usage in bytes.
    pub fn memory_usage(&self) -> usize {
        self.bits.capacity().div_ceil(8)
    }
}
