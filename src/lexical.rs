//! Lexical search over a segmented inverted index, including the
//! parent/child join filter.
//!
//! # Module Structure
//!
//! - `index`: Segments, tombstones, schema, readers and the id cache
//! - `query`: Queries, matchers, collectors and the JSON query DSL
//! - `search`: Query execution and collector phases
//! - `join`: The has-parent filter and its parent collector
//! - `store`: In-memory index with commit and delete

pub mod index;
pub mod join;
pub mod query;
pub mod search;
pub mod store;

// Re-exports
pub use index::DocId;
pub use index::id_cache::{IdCache, IdReaderCache, IdTypeCache};
pub use index::reader::IndexReader;
pub use index::schema::{IndexSchema, IndexSchemaBuilder, TypeMapping};
pub use index::segment::{Segment, SegmentId, SegmentReader};
pub use join::{ChildDocSet, CollectionState, HasParentFilter, ParentCollector, ParentDocs};
pub use query::boolean::{BooleanClause, BooleanQuery, Occur};
pub use query::collector::{Collector, DocIdCollector};
pub use query::term::{AllQuery, TermQuery, TypeQuery};
pub use query::{Matcher, Query};
pub use search::filter::{DocPredicate, Filterable};
pub use search::scope::{Collectable, run_collector_phase};
pub use search::searcher::{SearchHit, Searcher};
pub use store::{IndexStats, LexicalStore};
