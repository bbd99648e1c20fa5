//! Per-segment identifier cache for parent/child resolution.
//!
//! For every segment and every type that has children, the cache keeps
//! two lookups:
//!
//! - child local doc -> external id of its parent
//! - external id -> local docs of the documents of that type
//!
//! Entries are computed the first time a segment is seen and kept until the
//! segment leaves the index (see [`IdCache::refresh`]). Tombstones keep
//! changing after that, so they are checked at lookup time.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::lexical::index::DocId;
use crate::lexical::index::reader::IndexReader;
use crate::lexical::index::schema::IndexSchema;
use crate::lexical::index::segment::{SegmentId, SegmentReader};

/// Id lookups of one parent type within one segment.
#[derive(Debug, Default)]
pub struct IdTypeCache {
    /// Indexed by local doc; set for docs whose parent is of this type.
    parent_ids: Vec<Option<Arc<str>>>,
    /// External id of docs of this type -> local docs, ascending.
    id_to_docs: AHashMap<Arc<str>, Vec<DocId>>,
}

impl IdTypeCache {
    /// External id of the parent of `doc`, if `doc` is a child of this type.
    pub fn parent_id_by_doc(&self, doc: DocId) -> Option<&str> {
        self.parent_ids
            .get(doc as usize)
            .and_then(|id| id.as_deref())
    }

    /// Every local doc of this type with external id `id`, deleted or not.
    pub fn docs_by_id(&self, id: &str) -> &[DocId] {
        self.id_to_docs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The latest live doc of this type with external id `id`.
    pub fn doc_by_id(&self, id: &str, segment: &dyn SegmentReader) -> Option<DocId> {
        self.docs_by_id(id)
            .iter()
            .rev()
            .copied()
            .find(|&doc| !segment.is_deleted(doc))
    }

    /// Number of distinct ids of this type in the segment.
    pub fn len(&self) -> usize {
        self.id_to_docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_docs.is_empty()
    }

    fn memory_usage(&self) -> usize {
        let entries: usize = self
            .id_to_docs
            .iter()
            .map(|(id, docs)| id.len() + docs.capacity() * std::mem::size_of::<DocId>())
            .sum();
        self.parent_ids.capacity() * std::mem::size_of::<Option<Arc<str>>>()
            + self.id_to_docs.capacity()
                * (std::mem::size_of::<Arc<str>>() + std::mem::size_of::<Vec<DocId>>())
            + entries
    }
}

/// All id lookups of one segment, keyed by parent type.
#[derive(Debug)]
pub struct IdReaderCache {
    segment_id: SegmentId,
    types: AHashMap<String, Arc<IdTypeCache>>,
}

impl IdReaderCache {
    /// Scan a segment and build the lookups for every parent type of `schema`.
    pub fn build(segment: &dyn SegmentReader, schema: &IndexSchema) -> Self {
        let max_doc = segment.max_doc();
        let mut types: AHashMap<String, IdTypeCache> = AHashMap::new();
        for parent_type in schema.types.keys() {
            if !schema.child_types_of(parent_type).is_empty() {
                types.insert(
                    parent_type.clone(),
                    IdTypeCache {
                        parent_ids: vec![None; max_doc as usize],
                        id_to_docs: AHashMap::new(),
                    },
                );
            }
        }

        // parent ids repeat across children; share one allocation per id
        let mut interned: AHashMap<String, Arc<str>> = AHashMap::new();
        let mut intern = |id: &str| -> Arc<str> {
            interned
                .entry(id.to_string())
                .or_insert_with(|| Arc::from(id))
                .clone()
        };

        for doc in 0..max_doc {
            let Some(document) = segment.document(doc) else {
                continue;
            };

            if let Some(type_cache) = types.get_mut(&document.doc_type)
                && let Some(id) = document.id.as_deref()
            {
                type_cache.id_to_docs.entry(intern(id)).or_default().push(doc);
            }

            if let (Some(parent_type), Some(parent_id)) = (
                schema.parent_type_of(&document.doc_type),
                document.parent.as_deref(),
            ) && let Some(type_cache) = types.get_mut(parent_type)
            {
                type_cache.parent_ids[doc as usize] = Some(intern(parent_id));
            }
        }

        IdReaderCache {
            segment_id: segment.segment_id(),
            types: types
                .into_iter()
                .map(|(name, cache)| (name, Arc::new(cache)))
                .collect(),
        }
    }

    pub fn segment_id(&self) -> SegmentId {
        self.segment_id
    }

    /// Lookups for `parent_type`, if it is a parent type of the schema.
    pub fn type_cache(&self, parent_type: &str) -> Option<Arc<IdTypeCache>> {
        self.types.get(parent_type).cloned()
    }

    pub fn memory_usage(&self) -> usize {
        self.types.values().map(|cache| cache.memory_usage()).sum()
    }
}

/// Identifier cache shared by all searches over one index.
#[derive(Debug)]
pub struct IdCache {
    schema: Arc<IndexSchema>,
    readers: RwLock<AHashMap<SegmentId, Arc<IdReaderCache>>>,
}

impl IdCache {
    pub fn new(schema: Arc<IndexSchema>) -> Self {
        IdCache {
            schema,
            readers: RwLock::new(AHashMap::new()),
        }
    }

    /// Cached lookups for `segment`, building them on first access.
    pub fn reader(&self, segment: &dyn SegmentReader) -> Arc<IdReaderCache> {
        let segment_id = segment.segment_id();
        if let Some(cache) = self.readers.read().get(&segment_id) {
            return cache.clone();
        }

        let mut readers = self.readers.write();
        readers
            .entry(segment_id)
            .or_insert_with(|| {
                log::trace!("loading id cache for segment {segment_id}");
                Arc::new(IdReaderCache::build(segment, &self.schema))
            })
            .clone()
    }

    /// Drop entries of segments that are no longer part of `reader`.
    pub fn refresh(&self, reader: &IndexReader) {
        let live = reader.segment_ids();
        let mut readers = self.readers.write();
        let before = readers.len();
        readers.retain(|segment_id, _| live.contains(segment_id));
        if readers.len() != before {
            log::debug!(
                "id cache dropped {} stale segment(s)",
                before - readers.len()
            );
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.readers.write().clear();
    }

    /// Number of cached segments.
    pub fn len(&self) -> usize {
        self.readers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.read().is_empty()
    }

    /// Estimated bytes retained by the cache.
    pub fn memory_usage(&self) -> usize {
        self.readers
            .read()
            .values()
            .map(|cache| cache.memory_usage())
            .sum()
    }
}
