//! # Iris Join
//!
//! Parent/child join filtering for a segmented inverted index.
//!
//! ## Features
//!
//! - Typed documents with declared parent/child relationships
//! - Immutable segments with tombstone deletions
//! - Term, type, match-all and boolean queries, plus a JSON query DSL
//! - A two-phase `has_parent` filter backed by a per-segment id cache
//! - Parallel per-segment filtering
// Core modules
mod data;
mod error;
pub mod lexical;
mod util;

// Re-exports for the public API
pub use data::{DataValue, Document};
pub use error::{IrisError, Result};
pub use lexical::query::parser::{FilterDsl, HasParentDsl, QueryDsl};
pub use lexical::{
    AllQuery, BooleanClause, BooleanQuery, ChildDocSet, Collectable, CollectionState, Collector,
    DocId, DocIdCollector, DocPredicate, Filterable, HasParentFilter, IdCache, IndexReader,
    IndexSchema, IndexSchemaBuilder, IndexStats, LexicalStore, Occur, ParentCollector, ParentDocs,
    Query, SearchHit, Searcher, SegmentId, SegmentReader, TermQuery, TypeMapping, TypeQuery,
    run_collector_phase,
};
pub use util::bitset::FixedBitSet;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
