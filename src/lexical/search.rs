//! Query execution: the searcher, per-segment filters and collector phases.

pub mod filter;
pub mod scope;
pub mod searcher;
