use crate::error::Result;
use crate::lexical::index::DocId;
use crate::lexical::index::segment::{SegmentId, SegmentReader};
use crate::lexical::join::parent_docs::ParentDocs;
use crate::lexical::query::collector::Collector;

/// Collects the documents matching a parent query into per-segment bitsets.
///
/// Every segment the searcher announces gets a bitset, even when nothing in
/// it matches, so that [`ParentDocs`] can tell "no match" from "never seen".
#[derive(Debug, Default)]
pub struct ParentCollector {
    parent_docs: ParentDocs,
    current: Option<SegmentId>,
}

impl ParentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table collected so far.
    pub fn parent_docs(&self) -> &ParentDocs {
        &self.parent_docs
    }

    /// Finish collection and hand the table over.
    pub fn into_parent_docs(self) -> ParentDocs {
        log::debug!(
            "parent collection finished: {} parent(s) in {} segment(s)",
            self.parent_docs.count_ones(),
            self.parent_docs.len()
        );
        self.parent_docs
    }
}

impl Collector for ParentCollector {
    fn set_segment(&mut self, segment: &dyn SegmentReader) -> Result<()> {
        let segment_id = segment.segment_id();
        let max_doc = segment.max_doc();
        log::trace!("collecting parents of {segment_id} (max_doc {max_doc})");
        self.parent_docs.get_or_insert(segment_id, max_doc);
        self.current = Some(segment_id);
        Ok(())
    }

    fn collect(&mut self, doc: DocId) -> Result<()> {
        let segment_id = self
            .current
            .expect("ParentCollector::collect called before set_segment");
        match self.parent_docs.get_mut(segment_id) {
            Some(bits) => bits.set(doc),
            None => panic!("no parent bitset allocated for current segment {segment_id}"),
        }
        Ok(())
    }

    fn accepts_docs_out_of_order(&self) -> bool {
        true
    }
}
