//! Query types and the per-segment matching they produce.

pub mod boolean;
pub mod collector;
pub mod matcher;
pub mod parser;
pub mod term;

use std::any::Any;
use std::fmt::Debug;

use crate::error::Result;
use crate::lexical::index::segment::SegmentReader;

pub use matcher::Matcher;

/// A query that can be executed against one segment at a time.
pub trait Query: Send + Sync + Debug {
    /// Create a matcher enumerating the documents of `segment` that match.
    ///
    /// Matchers do not look at tombstones; skipping deleted documents is
    /// the caller's job.
    fn matcher(&self, segment: &dyn SegmentReader) -> Result<Box<dyn Matcher>>;

    /// Clone this query into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Human-readable description, used in logs.
    fn description(&self) -> String;

    /// Document types this query explicitly restricts to.
    fn referenced_types(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
