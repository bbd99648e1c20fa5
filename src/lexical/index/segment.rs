//! Immutable in-memory segments and the reader interface over them.

use std::fmt;

use ahash::AHashMap;

use crate::data::Document;
use crate::lexical::index::DocId;
use crate::lexical::index::deletion::DeletionBitmap;

/// Identity of one segment for the lifetime of an index.
///
/// `ord` is the dense position assigned when the segment was opened and
/// indexes per-segment tables; `generation` is the commit generation that
/// produced the segment and guards against a reused ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId {
    pub ord: u32,
    pub generation: u64,
}

impl SegmentId {
    pub fn new(ord: u32, generation: u64) -> Self {
        SegmentId { ord, generation }
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg{:04}@{}", self.ord, self.generation)
    }
}

/// Read access to one segment.
///
/// Local document numbers run from `0` to `max_doc() - 1`; deleted documents
/// keep their number until the segment goes away.
pub trait SegmentReader: Send + Sync + fmt::Debug {
    /// Identity key of this segment.
    fn segment_id(&self) -> SegmentId;

    /// One past the largest local document number.
    fn max_doc(&self) -> u32;

    /// Whether the document has been tombstoned.
    fn is_deleted(&self, doc: DocId) -> bool;

    /// Number of live documents.
    fn num_docs(&self) -> u32;

    /// Sorted postings for `term` in `field`.
    fn postings(&self, field: &str, term: &str) -> &[DocId];

    /// Sorted list of documents of the given type.
    fn type_postings(&self, doc_type: &str) -> &[DocId];

    /// Stored document for `doc`.
    fn document(&self, doc: DocId) -> Option<&Document>;
}

/// A flushed, immutable set of documents with their inverted postings.
#[derive(Debug)]
pub struct Segment {
    id: SegmentId,
    docs: Vec<Document>,
    /// field -> term -> postings
    postings: AHashMap<String, AHashMap<String, Vec<DocId>>>,
    /// type -> postings
    types: AHashMap<String, Vec<DocId>>,
    deletions: DeletionBitmap,
}

impl Segment {
    /// Build a segment from documents; local numbers follow input order.
    pub fn new(id: SegmentId, docs: Vec<Document>) -> Self {
        let mut postings: AHashMap<String, AHashMap<String, Vec<DocId>>> = AHashMap::new();
        let mut types: AHashMap<String, Vec<DocId>> = AHashMap::new();

        for (doc_id, doc) in docs.iter().enumerate() {
            let doc_id = doc_id as DocId;
            types.entry(doc.doc_type.clone()).or_default().push(doc_id);

            for (field, value) in &doc.fields {
                let field_postings = postings.entry(field.clone()).or_default();
                for term in value.index_terms() {
                    let list = field_postings.entry(term).or_default();
                    // a term repeated within one document is posted once
                    if list.last() != Some(&doc_id) {
                        list.push(doc_id);
                    }
                }
            }
        }

        let deletions = DeletionBitmap::new(id, docs.len() as u32);
        Segment {
            id,
            docs,
            postings,
            types,
            deletions,
        }
    }

    /// Tombstones of this segment.
    pub fn deletions(&self) -> &DeletionBitmap {
        &self.deletions
    }

    /// Live documents of `doc_type` with the given external id.
    pub fn find_live(&self, doc_type: &str, external_id: &str) -> Vec<DocId> {
        self.type_postings(doc_type)
            .iter()
            .copied()
            .filter(|&doc| {
                !self.deletions.is_deleted(doc)
                    && self.docs[doc as usize].id.as_deref() == Some(external_id)
            })
            .collect()
    }
}

impl SegmentReader for Segment {
    fn segment_id(&self) -> SegmentId {
        self.id
    }

    fn max_doc(&self) -> u32 {
        self.docs.len() as u32
    }

    fn is_deleted(&self, doc: DocId) -> bool {
        self.deletions.is_deleted(doc)
    }

    fn num_docs(&self) -> u32 {
        self.deletions.live_count() as u32
    }

    fn postings(&self, field: &str, term: &str) -> &[DocId] {
        self.postings
            .get(field)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn type_postings(&self, doc_type: &str) -> &[DocId] {
        self.types
            .get(doc_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn document(&self, doc: DocId) -> Option<&Document> {
        self.docs.get(doc as usize)
    }
}
