//! Per-segment document filters.

use crate::lexical::index::DocId;
use crate::lexical::index::segment::SegmentReader;

/// Random-access membership test over the local documents of one segment.
pub trait DocPredicate {
    /// Whether `doc` is accepted.
    fn get(&self, doc: DocId) -> bool;

    /// Whether the result may be cached across searches by an outer layer.
    fn is_cacheable(&self) -> bool;

    /// Memory retained by this doc set, for cache accounting.
    fn size_in_bytes(&self) -> usize;
}

/// A filter that can produce a [`DocPredicate`] for any segment.
///
/// Implementations must be safe to evaluate for several segments at once.
pub trait Filterable: Sync {
    type DocSet<'a>: DocPredicate
    where
        Self: 'a;

    /// Build the predicate for `segment`.
    fn predicate_for_segment<'a>(&'a self, segment: &'a dyn SegmentReader) -> Self::DocSet<'a>;
}
