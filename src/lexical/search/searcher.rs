//! Searcher implementation for executing queries against an index reader.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Result;
use crate::lexical::index::DocId;
use crate::lexical::index::reader::IndexReader;
use crate::lexical::index::segment::{SegmentId, SegmentReader};
use crate::lexical::query::Query;
use crate::lexical::query::collector::Collector;
use crate::lexical::search::filter::{DocPredicate, Filterable};

/// A document returned by a filtered search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Segment holding the document.
    pub segment: SegmentId,
    /// Local document number.
    pub doc: DocId,
    /// External identifier.
    pub id: Option<String>,
    /// Document type.
    pub doc_type: String,
}

/// A searcher that executes queries against an index reader.
#[derive(Debug, Clone)]
pub struct Searcher {
    /// The snapshot to search.
    reader: IndexReader,
}

impl Searcher {
    /// Create a new searcher over the given snapshot.
    pub fn new(reader: IndexReader) -> Self {
        Searcher { reader }
    }

    /// Get the index reader.
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Run `query` over every segment, pushing live matches into `collector`.
    pub fn search<C: Collector + ?Sized>(&self, query: &dyn Query, collector: &mut C) -> Result<()> {
        for segment in self.reader.segment_readers() {
            collector.set_segment(segment.as_ref())?;

            let mut matcher = query.matcher(segment.as_ref())?;
            while !matcher.is_exhausted() {
                let doc = matcher.doc_id();
                if !segment.is_deleted(doc) {
                    collector.collect(doc)?;
                }
                if !matcher.next()? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Count the live documents matching `query`.
    pub fn count(&self, query: &dyn Query) -> Result<u64> {
        let mut total = 0;
        for segment in self.reader.segment_readers() {
            let mut matcher = query.matcher(segment.as_ref())?;
            while !matcher.is_exhausted() {
                if !segment.is_deleted(matcher.doc_id()) {
                    total += 1;
                }
                if !matcher.next()? {
                    break;
                }
            }
        }
        Ok(total)
    }

    /// Run `query` and keep the live matches accepted by `filter`.
    ///
    /// With `parallel` set, segments are evaluated concurrently; hits are
    /// returned in segment order, then document order, either way.
    pub fn search_filtered<F: Filterable>(
        &self,
        query: &dyn Query,
        filter: &F,
        parallel: bool,
    ) -> Result<Vec<SearchHit>> {
        let segments = self.reader.segment_readers();
        let per_segment: Vec<Vec<SearchHit>> = if parallel {
            segments
                .par_iter()
                .map(|segment| Self::filter_segment(segment, query, filter))
                .collect::<Result<_>>()?
        } else {
            segments
                .iter()
                .map(|segment| Self::filter_segment(segment, query, filter))
                .collect::<Result<_>>()?
        };
        Ok(per_segment.into_iter().flatten().collect())
    }

    fn filter_segment<F: Filterable>(
        segment: &Arc<dyn SegmentReader>,
        query: &dyn Query,
        filter: &F,
    ) -> Result<Vec<SearchHit>> {
        let segment = segment.as_ref();
        let doc_set = filter.predicate_for_segment(segment);
        let mut matcher = query.matcher(segment)?;
        let mut hits = Vec::new();

        while !matcher.is_exhausted() {
            let doc = matcher.doc_id();
            if !segment.is_deleted(doc) && doc_set.get(doc) {
                let stored = segment.document(doc);
                hits.push(SearchHit {
                    segment: segment.segment_id(),
                    doc,
                    id: stored.and_then(|d| d.id.clone()),
                    doc_type: stored.map(|d| d.doc_type.clone()).unwrap_or_default(),
                });
            }
            if !matcher.next()? {
                break;
            }
        }

        log::trace!(
            "filtered {} hit(s) in {}",
            hits.len(),
            segment.segment_id()
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Document;
    use crate::lexical::index::segment::Segment;
    use crate::lexical::query::collector::DocIdCollector;
    use crate::lexical::query::term::{AllQuery, TypeQuery};

    struct EvenDocs;

    struct EvenDocSet;

    impl DocPredicate for EvenDocSet {
        fn get(&self, doc: DocId) -> bool {
            doc % 2 == 0
        }

        fn is_cacheable(&self) -> bool {
            true
        }

        fn size_in_bytes(&self) -> usize {
            0
        }
    }

    impl Filterable for EvenDocs {
        type DocSet<'a> = EvenDocSet;

        fn predicate_for_segment<'a>(&'a self, _segment: &'a dyn SegmentReader) -> EvenDocSet {
            EvenDocSet
        }
    }

    fn searcher() -> Searcher {
        let first = Segment::new(
            SegmentId::new(0, 1),
            vec![
                Document::new_with_id("parent", "p1"),
                Document::new_with_id("child", "c1").set_parent("p1"),
                Document::new_with_id("child", "c2").set_parent("p1"),
            ],
        );
        let second = Segment::new(
            SegmentId::new(1, 2),
            vec![
                Document::new_with_id("child", "c3").set_parent("p2"),
                Document::new_with_id("parent", "p2"),
            ],
        );
        first.deletions().delete_document(2).unwrap();
        let segments: Vec<Arc<dyn SegmentReader>> = vec![Arc::new(first), Arc::new(second)];
        Searcher::new(IndexReader::new(segments, 2))
    }

    #[test]
    fn test_search_skips_deleted_docs() {
        let searcher = searcher();
        let mut collector = DocIdCollector::new();
        searcher
            .search(&TypeQuery::new("child"), &mut collector)
            .unwrap();

        assert_eq!(
            collector.hits(),
            &[(SegmentId::new(0, 1), 1), (SegmentId::new(1, 2), 0)]
        );
        assert_eq!(searcher.count(&AllQuery::new()).unwrap(), 4);
    }

    #[test]
    fn test_search_filtered_sequential_and_parallel_agree() {
        let searcher = searcher();
        let sequential = searcher
            .search_filtered(&AllQuery::new(), &EvenDocs, false)
            .unwrap();
        let parallel = searcher
            .search_filtered(&AllQuery::new(), &EvenDocs, true)
            .unwrap();

        let ids: Vec<_> = sequential.iter().filter_map(|h| h.id.as_deref()).collect();
        assert_eq!(ids, vec!["p1", "c3"]);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[1].doc_type, "child");
    }
}
