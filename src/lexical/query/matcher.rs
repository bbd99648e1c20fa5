//! Matchers walk the documents of one segment that satisfy a query.

use crate::error::Result;
use crate::lexical::index::DocId;

/// Sentinel returned by [`Matcher::doc_id`] once the matcher is exhausted.
pub const NO_MORE_DOCS: DocId = DocId::MAX;

/// Iterates matching local document numbers in increasing order.
pub trait Matcher: Send {
    /// Current document, or [`NO_MORE_DOCS`].
    fn doc_id(&self) -> DocId;

    /// Advance to the next document. Returns `false` once exhausted.
    fn next(&mut self) -> Result<bool>;

    /// Whether no documents remain.
    fn is_exhausted(&self) -> bool;

    /// Upper bound on the number of documents this matcher yields.
    fn cost(&self) -> u64;
}

/// Drain a matcher into a sorted vector of document numbers.
pub fn collect_docs(matcher: &mut dyn Matcher) -> Result<Vec<DocId>> {
    let mut docs = Vec::with_capacity(matcher.cost() as usize);
    while !matcher.is_exhausted() {
        docs.push(matcher.doc_id());
        if !matcher.next()? {
            break;
        }
    }
    Ok(docs)
}

/// Matcher over a precomputed, sorted postings list.
#[derive(Debug, Clone)]
pub struct PostingsMatcher {
    docs: Vec<DocId>,
    position: usize,
}

impl PostingsMatcher {
    pub fn new(docs: Vec<DocId>) -> Self {
        debug_assert!(docs.windows(2).all(|w| w[0] < w[1]));
        PostingsMatcher { docs, position: 0 }
    }
}

impl Matcher for PostingsMatcher {
    fn doc_id(&self) -> DocId {
        self.docs.get(self.position).copied().unwrap_or(NO_MORE_DOCS)
    }

    fn next(&mut self) -> Result<bool> {
        if self.position < self.docs.len() {
            self.position += 1;
        }
        Ok(!self.is_exhausted())
    }

    fn is_exhausted(&self) -> bool {
        self.position >= self.docs.len()
    }

    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }
}

/// Matcher that matches nothing.
#[derive(Debug, Clone, Default)]
pub struct EmptyMatcher;

impl EmptyMatcher {
    pub fn new() -> Self {
        EmptyMatcher
    }
}

impl Matcher for EmptyMatcher {
    fn doc_id(&self) -> DocId {
        NO_MORE_DOCS
    }

    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn is_exhausted(&self) -> bool {
        true
    }

    fn cost(&self) -> u64 {
        0
    }
}

/// Matcher over every document number of a segment.
#[derive(Debug, Clone)]
pub struct AllMatcher {
    current: DocId,
    max_doc: DocId,
}

impl AllMatcher {
    pub fn new(max_doc: DocId) -> Self {
        AllMatcher {
            current: 0,
            max_doc,
        }
    }
}

impl Matcher for AllMatcher {
    fn doc_id(&self) -> DocId {
        if self.is_exhausted() {
            NO_MORE_DOCS
        } else {
            self.current
        }
    }

    fn next(&mut self) -> Result<bool> {
        if self.current < self.max_doc {
            self.current += 1;
        }
        Ok(!self.is_exhausted())
    }

    fn is_exhausted(&self) -> bool {
        self.current >= self.max_doc
    }

    fn cost(&self) -> u64 {
        self.max_doc as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postings_matcher() {
        let mut matcher = PostingsMatcher::new(vec![1, 4, 7]);
        assert_eq!(matcher.doc_id(), 1);
        assert!(matcher.next().unwrap());
        assert_eq!(matcher.doc_id(), 4);
        assert!(matcher.next().unwrap());
        assert!(!matcher.next().unwrap());
        assert!(matcher.is_exhausted());
        assert_eq!(matcher.doc_id(), NO_MORE_DOCS);
    }

    #[test]
    fn test_all_and_empty_matchers() {
        assert_eq!(
            collect_docs(&mut AllMatcher::new(3)).unwrap(),
            vec![0, 1, 2]
        );
        assert!(collect_docs(&mut AllMatcher::new(0)).unwrap().is_empty());
        assert!(collect_docs(&mut EmptyMatcher::new()).unwrap().is_empty());
    }
}
