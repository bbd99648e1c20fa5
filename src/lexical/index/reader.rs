//! Point-in-time view over the segments of an index.

use std::sync::Arc;

use crate::lexical::index::segment::{SegmentId, SegmentReader};

/// A snapshot of the segments visible to one search.
///
/// Segments are listed in ordinal order. The snapshot never changes, even if
/// the index commits new segments afterwards; deletions made after the
/// snapshot was taken are still visible through the segment tombstones.
#[derive(Debug, Clone, Default)]
pub struct IndexReader {
    segments: Vec<Arc<dyn SegmentReader>>,
    generation: u64,
}

impl IndexReader {
    /// Create a reader over the given segments.
    pub fn new(segments: Vec<Arc<dyn SegmentReader>>, generation: u64) -> Self {
        IndexReader {
            segments,
            generation,
        }
    }

    /// The segments of this snapshot.
    pub fn segment_readers(&self) -> &[Arc<dyn SegmentReader>] {
        &self.segments
    }

    /// Look a segment up by identity.
    pub fn segment(&self, id: SegmentId) -> Option<&Arc<dyn SegmentReader>> {
        self.segments
            .get(id.ord as usize)
            .filter(|segment| segment.segment_id() == id)
    }

    /// Identity keys of all segments in this snapshot.
    pub fn segment_ids(&self) -> Vec<SegmentId> {
        self.segments.iter().map(|s| s.segment_id()).collect()
    }

    /// Commit generation this snapshot was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sum of `max_doc` over all segments.
    pub fn max_doc(&self) -> u64 {
        self.segments.iter().map(|s| s.max_doc() as u64).sum()
    }

    /// Number of live documents over all segments.
    pub fn num_docs(&self) -> u64 {
        self.segments.iter().map(|s| s.num_docs() as u64).sum()
    }
}
