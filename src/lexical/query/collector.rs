//! Collectors receive the documents a query matches, segment by segment.

use crate::error::Result;
use crate::lexical::index::DocId;
use crate::lexical::index::segment::{SegmentId, SegmentReader};

/// Callback driven by the searcher while executing a query.
///
/// For each segment the searcher first calls [`Collector::set_segment`] and
/// then [`Collector::collect`] once per live matching document:
///
/// - `.set_segment(segment_0)`
/// - `.collect(doc0_of_segment_0)`
/// - `.collect(...)`
/// - `.set_segment(segment_1)`
/// - `...`
///
/// Segments are not guaranteed to be visited in any specific order.
pub trait Collector {
    /// Called before any document of `segment` is offered.
    fn set_segment(&mut self, segment: &dyn SegmentReader) -> Result<()>;

    /// Called for each matching document of the current segment.
    fn collect(&mut self, doc: DocId) -> Result<()>;

    /// Whether documents may be delivered out of increasing order.
    fn accepts_docs_out_of_order(&self) -> bool {
        false
    }
}

/// Collector that records every `(segment, doc)` pair it sees.
#[derive(Debug, Default)]
pub struct DocIdCollector {
    current: Option<SegmentId>,
    hits: Vec<(SegmentId, DocId)>,
}

impl DocIdCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected hits in the order they were delivered.
    pub fn hits(&self) -> &[(SegmentId, DocId)] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn into_hits(self) -> Vec<(SegmentId, DocId)> {
        self.hits
    }
}

impl Collector for DocIdCollector {
    fn set_segment(&mut self, segment: &dyn SegmentReader) -> Result<()> {
        self.current = Some(segment.segment_id());
        Ok(())
    }

    fn collect(&mut self, doc: DocId) -> Result<()> {
        let segment = self
            .current
            .expect("collect called before set_segment");
        self.hits.push((segment, doc));
        Ok(())
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        true
    }
}
