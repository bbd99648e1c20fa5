use crate::lexical::index::segment::SegmentId;
use crate::util::bitset::FixedBitSet;

#[derive(Debug, Clone)]
struct ParentSlot {
    generation: u64,
    bits: FixedBitSet,
}

/// Matching parent documents, one bitset per segment.
///
/// Slots are indexed by segment ordinal; a slot only answers for the
/// segment generation it was filled for. A missing slot means the segment
/// was never collected, never "collected with no match".
#[derive(Debug, Clone, Default)]
pub struct ParentDocs {
    slots: Vec<Option<ParentSlot>>,
}

impl ParentDocs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bitset for `segment`, allocating an empty one of `max_doc` bits
    /// if the segment has not been seen yet.
    pub(crate) fn get_or_insert(&mut self, segment: SegmentId, max_doc: u32) -> &mut FixedBitSet {
        let ord = segment.ord as usize;
        if self.slots.len() <= ord {
            self.slots.resize(ord + 1, None);
        }

        let slot = &mut self.slots[ord];
        let stale = slot
            .as_ref()
            .is_some_and(|s| s.generation != segment.generation);
        if stale {
            log::debug!("replacing parent bitset of reused ordinal for {segment}");
            *slot = None;
        }

        &mut slot
            .get_or_insert_with(|| ParentSlot {
                generation: segment.generation,
                bits: FixedBitSet::with_max_doc(max_doc),
            })
            .bits
    }

    /// Mutable access to an already allocated bitset.
    pub(crate) fn get_mut(&mut self, segment: SegmentId) -> Option<&mut FixedBitSet> {
        self.slots
            .get_mut(segment.ord as usize)
            .and_then(Option::as_mut)
            .filter(|slot| slot.generation == segment.generation)
            .map(|slot| &mut slot.bits)
    }

    /// The bitset collected for `segment`.
    pub fn get(&self, segment: SegmentId) -> Option<&FixedBitSet> {
        self.slots
            .get(segment.ord as usize)
            .and_then(Option::as_ref)
            .filter(|slot| slot.generation == segment.generation)
            .map(|slot| &slot.bits)
    }

    pub fn contains(&self, segment: SegmentId) -> bool {
        self.get(segment).is_some()
    }

    /// Number of collected segments.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collected segments and their bitsets, in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &FixedBitSet)> {
        self.slots.iter().enumerate().filter_map(|(ord, slot)| {
            slot.as_ref()
                .map(|slot| (SegmentId::new(ord as u32, slot.generation), &slot.bits))
        })
    }

    /// Total number of matching parents over all segments.
    pub fn count_ones(&self) -> u64 {
        self.iter().map(|(_, bits)| bits.count_ones() as u64).sum()
    }

    /// Approximate heap usage in bytes.
    pub fn memory_usage(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<ParentSlot>>()
            + self
                .iter()
                .map(|(_, bits)| bits.memory_usage())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_allocation() {
        let mut docs = ParentDocs::new();
        let seg = SegmentId::new(2, 1);
        assert!(!docs.contains(seg));

        docs.get_or_insert(seg, 10).set(4);
        assert!(docs.contains(seg));
        assert_eq!(docs.len(), 1);
        assert!(docs.get(seg).unwrap().get(4));

        // second sight reuses the bitset
        docs.get_or_insert(seg, 10).set(5);
        assert_eq!(docs.get(seg).unwrap().count_ones(), 2);

        // lower ordinals stay uncollected
        assert!(!docs.contains(SegmentId::new(0, 1)));
    }

    #[test]
    fn test_generation_check() {
        let mut docs = ParentDocs::new();
        docs.get_or_insert(SegmentId::new(0, 1), 4).set(1);

        assert!(docs.get(SegmentId::new(0, 2)).is_none());
        assert!(docs.get_mut(SegmentId::new(0, 2)).is_none());

        // a new generation at the same ordinal replaces the stale slot
        docs.get_or_insert(SegmentId::new(0, 2), 6);
        assert!(docs.get(SegmentId::new(0, 1)).is_none());
        assert_eq!(docs.get(SegmentId::new(0, 2)).unwrap().count_ones(), 0);
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_iter_and_counts() {
        let mut docs = ParentDocs::new();
        docs.get_or_insert(SegmentId::new(1, 3), 4).set(0);
        docs.get_or_insert(SegmentId::new(0, 1), 4).set(2);
        docs.get_or_insert(SegmentId::new(0, 1), 4).set(3);

        let ids: Vec<SegmentId> = docs.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![SegmentId::new(0, 1), SegmentId::new(1, 3)]);
        assert_eq!(docs.count_ones(), 3);
        assert!(docs.memory_usage() > 0);
    }
}
