//! In-memory lexical index with buffered writes.
//!
//! This module provides the `LexicalStore` implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::data::Document;
use crate::error::{IrisError, Result};
use crate::lexical::index::id_cache::IdCache;
use crate::lexical::index::reader::IndexReader;
use crate::lexical::index::schema::IndexSchema;
use crate::lexical::index::segment::{Segment, SegmentId, SegmentReader};
use crate::lexical::search::searcher::Searcher;

/// Counters describing the state of a [`LexicalStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexStats {
    /// Number of committed segments.
    pub segment_count: usize,
    /// Committed documents, deleted ones included.
    pub doc_count: u64,
    /// Committed documents that are not deleted.
    pub live_docs: u64,
    /// Documents buffered since the last commit.
    pub pending_docs: usize,
    /// Generation of the last commit.
    pub generation: u64,
    /// Estimated bytes held by the id cache.
    pub id_cache_bytes: usize,
}

/// A segmented index of typed documents.
///
/// Documents are buffered by [`add_document`](Self::add_document) and become
/// searchable on [`commit`](Self::commit), which turns the whole buffer into
/// one immutable segment. Parents and the children added with them in the
/// same commit therefore share a segment.
///
/// # Usage Example
///
/// ```rust
/// use std::sync::Arc;
/// use iris_join::{Document, IndexSchema, LexicalStore, TypeQuery};
///
/// let schema = IndexSchema::builder()
///     .add_type("blog")
///     .add_child_type("comment", "blog")
///     .build()
///     .unwrap();
/// let store = LexicalStore::new(schema).unwrap();
///
/// store.add_document(Document::new_with_id("blog", "b1")).unwrap();
/// store
///     .add_document(Document::new_with_id("comment", "c1").set_parent("b1"))
///     .unwrap();
/// store.commit().unwrap();
///
/// let searcher = store.searcher();
/// assert_eq!(searcher.count(&TypeQuery::new("comment")).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct LexicalStore {
    schema: Arc<IndexSchema>,
    segments: RwLock<Vec<Arc<Segment>>>,
    pending: Mutex<Vec<Document>>,
    generation: AtomicU64,
    id_cache: Arc<IdCache>,
}

impl LexicalStore {
    /// Create an empty store for `schema`.
    pub fn new(schema: IndexSchema) -> Result<Self> {
        schema.validate()?;
        let schema = Arc::new(schema);
        Ok(LexicalStore {
            id_cache: Arc::new(IdCache::new(schema.clone())),
            schema,
            segments: RwLock::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            generation: AtomicU64::new(0),
        })
    }

    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// The identifier cache shared by searches over this store.
    pub fn id_cache(&self) -> Arc<IdCache> {
        self.id_cache.clone()
    }

    /// Buffer a document until the next commit.
    pub fn add_document(&self, doc: Document) -> Result<()> {
        let Some(mapping) = self.schema.types.get(&doc.doc_type) else {
            return Err(IrisError::invalid_argument(format!(
                "no mapping found for type [{}]",
                doc.doc_type
            )));
        };
        let Some(id) = doc.id.as_deref() else {
            return Err(IrisError::invalid_argument(format!(
                "document of type [{}] has no id",
                doc.doc_type
            )));
        };

        match (&mapping.parent, &doc.parent) {
            (Some(parent_type), None) => {
                return Err(IrisError::invalid_argument(format!(
                    "[{}/{id}] is a child of [{parent_type}] and requires a parent id",
                    doc.doc_type
                )));
            }
            (None, Some(_)) => {
                return Err(IrisError::invalid_argument(format!(
                    "[{}/{id}] has a parent id but type [{}] declares no parent",
                    doc.doc_type, doc.doc_type
                )));
            }
            _ => {}
        }

        self.pending.lock().push(doc);
        Ok(())
    }

    /// Flush buffered documents into a new segment.
    ///
    /// Returns the new segment's id, or `None` if nothing was buffered.
    pub fn commit(&self) -> Result<Option<SegmentId>> {
        let docs = std::mem::take(&mut *self.pending.lock());
        if docs.is_empty() {
            log::trace!("commit with no pending documents");
            return Ok(None);
        }

        let mut segments = self.segments.write();
        let ord = u32::try_from(segments.len())
            .map_err(|_| IrisError::index("too many segments"))?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let segment_id = SegmentId::new(ord, generation);

        let doc_count = docs.len();
        segments.push(Arc::new(Segment::new(segment_id, docs)));
        log::debug!("committed {doc_count} document(s) as {segment_id}");
        Ok(Some(segment_id))
    }

    /// Delete every document of `doc_type` with external id `id`.
    ///
    /// Committed documents are tombstoned; buffered ones are dropped.
    /// Returns the number of documents removed.
    pub fn delete_document(&self, doc_type: &str, id: &str) -> Result<u64> {
        let mut deleted = 0;
        for segment in self.segments.read().iter() {
            for doc in segment.find_live(doc_type, id) {
                if segment.deletions().delete_document(doc)? {
                    deleted += 1;
                }
            }
        }

        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|doc| !(doc.doc_type == doc_type && doc.id.as_deref() == Some(id)));
        deleted += (before - pending.len()) as u64;

        log::debug!("deleted {deleted} document(s) for [{doc_type}/{id}]");
        Ok(deleted)
    }

    /// Snapshot the committed segments.
    pub fn reader(&self) -> IndexReader {
        let segments: Vec<Arc<dyn SegmentReader>> = self
            .segments
            .read()
            .iter()
            .map(|segment| segment.clone() as Arc<dyn SegmentReader>)
            .collect();
        let reader = IndexReader::new(segments, self.generation.load(Ordering::SeqCst));
        self.id_cache.refresh(&reader);
        reader
    }

    /// A searcher over a fresh snapshot.
    pub fn searcher(&self) -> Searcher {
        Searcher::new(self.reader())
    }

    pub fn stats(&self) -> IndexStats {
        let segments = self.segments.read();
        IndexStats {
            segment_count: segments.len(),
            doc_count: segments.iter().map(|s| s.max_doc() as u64).sum(),
            live_docs: segments.iter().map(|s| s.num_docs() as u64).sum(),
            pending_docs: self.pending.lock().len(),
            generation: self.generation.load(Ordering::SeqCst),
            id_cache_bytes: self.id_cache.memory_usage(),
        }
    }
}
