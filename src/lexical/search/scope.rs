//! Collector phases that must run before the main query.
//!
//! Some filters need a full pass of their own query over the index before
//! they can answer per-document questions. Such filters implement
//! [`Collectable`]; the enclosing search calls [`run_collector_phase`] for
//! each of them before filtering starts.

use crate::error::Result;
use crate::lexical::query::Query;
use crate::lexical::query::collector::Collector;
use crate::lexical::search::searcher::Searcher;

/// A participant in the collector phase.
pub trait Collectable {
    type Collector: Collector;

    /// Name of the scope this phase is registered under.
    fn scope(&self) -> &str;

    /// The query whose matches are collected.
    fn query(&self) -> &dyn Query;

    /// Whether collection still has to run before filtering.
    fn needs_collection(&self) -> bool;

    /// Start collection and return the collector to hand to the searcher.
    fn collector_callback(&mut self) -> Self::Collector;

    /// Take back the collector once every segment has been visited.
    fn finish_collection(&mut self, collector: Self::Collector);

    /// Drop collected state so that the next execution collects again.
    fn clear(&mut self);
}

/// Run the collection pass of `phase` if it still needs one.
///
/// Returns `true` if collection ran. If the search fails halfway the error
/// is returned and `phase` keeps reporting that it needs collection.
pub fn run_collector_phase<C: Collectable>(searcher: &Searcher, phase: &mut C) -> Result<bool> {
    if !phase.needs_collection() {
        log::trace!("scope [{}] already collected", phase.scope());
        return Ok(false);
    }

    log::debug!(
        "running collector phase for scope [{}]: {}",
        phase.scope(),
        phase.query().description()
    );
    let mut collector = phase.collector_callback();
    searcher.search(phase.query(), &mut collector)?;
    phase.finish_collection(collector);
    Ok(true)
}
