//! Segmented index structures: segments, tombstones, schema and id cache.

pub mod deletion;
pub mod id_cache;
pub mod reader;
pub mod schema;
pub mod segment;

/// Local document number, valid only within one segment.
pub type DocId = u32;
