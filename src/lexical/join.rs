//! Parent/child join filtering.
//!
//! A [`HasParentFilter`] selects child documents whose parent matches a
//! sub-query. It works in two phases:
//!
//! 1. the sub-query runs once over every segment and a [`ParentCollector`]
//!    records the matching parents in one bitset per segment;
//! 2. for each segment, a [`ChildDocSet`] resolves a child's parent through
//!    the id cache and tests the parent's bit.
//!
//! Parents and children must live in the same segment.

mod collector;
mod has_parent;
mod parent_docs;

pub use collector::ParentCollector;
pub use has_parent::{ChildDocSet, CollectionState, HasParentFilter};
pub use parent_docs::ParentDocs;
