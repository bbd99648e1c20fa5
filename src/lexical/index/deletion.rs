//! Tombstone tracking for segments.
//!
//! Segments are immutable once flushed; deleting a document only marks its
//! local number as deleted so that readers skip it.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashSet;
use parking_lot::RwLock;

use crate::error::{IrisError, Result};
use crate::lexical::index::DocId;
use crate::lexical::index::segment::SegmentId;

/// A set-based deletion tracker for a segment.
#[derive(Debug)]
pub struct DeletionBitmap {
    /// Segment this bitmap belongs to.
    segment_id: SegmentId,

    /// Set of deleted local document numbers.
    deleted_docs: RwLock<AHashSet<DocId>>,

    /// Total number of documents in the segment.
    total_docs: u32,

    /// Number of deleted documents.
    deleted_count: AtomicU64,

    /// Bumped on every effective deletion.
    version: AtomicU64,
}

impl DeletionBitmap {
    /// Create an empty deletion bitmap for a segment holding `total_docs` docs.
    pub fn new(segment_id: SegmentId, total_docs: u32) -> Self {
        DeletionBitmap {
            segment_id,
            deleted_docs: RwLock::new(AHashSet::new()),
            total_docs,
            deleted_count: AtomicU64::new(0),
            version: AtomicU64::new(1),
        }
    }

    /// Mark a document as deleted.
    ///
    /// Returns `true` if the document was live before this call.
    pub fn delete_document(&self, doc_id: DocId) -> Result<bool> {
        if doc_id >= self.total_docs {
            return Err(IrisError::index(format!(
                "Document {doc_id} is out of range [0, {}) for segment {}",
                self.total_docs, self.segment_id
            )));
        }

        let newly_deleted = self.deleted_docs.write().insert(doc_id);
        if newly_deleted {
            self.deleted_count.fetch_add(1, Ordering::SeqCst);
            self.version.fetch_add(1, Ordering::SeqCst);
        }

        Ok(newly_deleted)
    }

    /// Check if a document is deleted.
    pub fn is_deleted(&self, doc_id: DocId) -> bool {
        self.deleted_docs.read().contains(&doc_id)
    }

    /// Get deletion ratio (0.0 to 1.0).
    pub fn deletion_ratio(&self) -> f64 {
        if self.total_docs == 0 {
            0.0
        } else {
            self.deleted_count() as f64 / self.total_docs as f64
        }
    }

    pub fn deleted_count(&self) -> u64 {
        self.deleted_count.load(Ordering::SeqCst)
    }

    /// Get number of live (non-deleted) documents.
    pub fn live_count(&self) -> u64 {
        self.total_docs as u64 - self.deleted_count()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Get all deleted document numbers in increasing order.
    pub fn deleted_docs(&self) -> Vec<DocId> {
        let mut docs: Vec<DocId> = self.deleted_docs.read().iter().copied().collect();
        docs.sort_unstable();
        docs
    }

    /// Get memory usage of this bitmap in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.deleted_docs.read().capacity() * std::mem::size_of::<DocId>()
    }
}
