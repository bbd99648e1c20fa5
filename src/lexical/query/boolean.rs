//! Boolean query implementation for combining multiple queries.

use std::any::Any;

use ahash::AHashMap;

use crate::error::Result;
use crate::lexical::index::DocId;
use crate::lexical::index::segment::SegmentReader;
use crate::lexical::query::Query;
use crate::lexical::query::matcher::{EmptyMatcher, Matcher, PostingsMatcher, collect_docs};

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
    /// The clause must match; kept apart from `Must` for filter-only clauses.
    Filter,
}

/// A clause in a boolean query.
#[derive(Debug)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Box<dyn Query>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl Clone for BooleanClause {
    fn clone(&self) -> Self {
        BooleanClause {
            query: self.query.clone_box(),
            occur: self.occur,
        }
    }
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(query: Box<dyn Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }

    /// Create a MUST clause.
    pub fn must(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::Must)
    }

    /// Create a SHOULD clause.
    pub fn should(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::Should)
    }

    /// Create a MUST_NOT clause.
    pub fn must_not(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::MustNot)
    }

    /// Create a FILTER clause.
    pub fn filter(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::Filter)
    }
}

/// A boolean query that combines multiple queries with boolean logic.
#[derive(Debug, Clone, Default)]
pub struct BooleanQuery {
    /// The clauses in this boolean query.
    clauses: Vec<BooleanClause>,
    /// Minimum number of should clauses that must match.
    minimum_should_match: usize,
}

impl BooleanQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            minimum_should_match: 0,
        }
    }

    /// Add a clause to this boolean query.
    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Add a MUST clause.
    pub fn add_must(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::must(query));
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::should(query));
    }

    /// Add a MUST_NOT clause.
    pub fn add_must_not(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::must_not(query));
    }

    /// Add a FILTER clause.
    pub fn add_filter(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::filter(query));
    }

    /// Set the minimum number of should clauses that must match.
    pub fn with_minimum_should_match(mut self, minimum: usize) -> Self {
        self.minimum_should_match = minimum;
        self
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Get the minimum should match value.
    pub fn minimum_should_match(&self) -> usize {
        self.minimum_should_match
    }

    /// Check if this query is empty.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Get clauses by occurrence type.
    pub fn clauses_by_occur(&self, occur: Occur) -> Vec<&BooleanClause> {
        self.clauses.iter().filter(|c| c.occur == occur).collect()
    }

    fn clause_docs(clause: &BooleanClause, segment: &dyn SegmentReader) -> Result<Vec<DocId>> {
        let mut matcher = clause.query.matcher(segment)?;
        collect_docs(matcher.as_mut())
    }

    /// Evaluate the clauses against one segment into a sorted doc list.
    fn matching_docs(&self, segment: &dyn SegmentReader) -> Result<Vec<DocId>> {
        let mut required: Option<Vec<DocId>> = None;
        for clause in self
            .clauses
            .iter()
            .filter(|c| matches!(c.occur, Occur::Must | Occur::Filter))
        {
            let docs = Self::clause_docs(clause, segment)?;
            let next = match required {
                None => docs,
                Some(current) => intersect(&current, &docs),
            };
            if next.is_empty() {
                return Ok(Vec::new());
            }
            required = Some(next);
        }

        let should_clauses = self.clauses_by_occur(Occur::Should);
        // without required clauses at least one should clause has to match
        let min_should = if required.is_none() {
            self.minimum_should_match.max(1)
        } else {
            self.minimum_should_match
        };

        let mut docs = if !should_clauses.is_empty() && min_should > 0 {
            let mut counts: AHashMap<DocId, usize> = AHashMap::new();
            for clause in &should_clauses {
                for doc in Self::clause_docs(clause, segment)? {
                    *counts.entry(doc).or_default() += 1;
                }
            }
            let mut should: Vec<DocId> = counts
                .into_iter()
                .filter(|&(_, count)| count >= min_should)
                .map(|(doc, _)| doc)
                .collect();
            should.sort_unstable();
            match required {
                Some(required) => intersect(&required, &should),
                None => should,
            }
        } else {
            match required {
                Some(required) => required,
                // only MUST_NOT clauses: start from every document
                None if should_clauses.is_empty() => (0..segment.max_doc()).collect(),
                None => Vec::new(),
            }
        };

        for clause in self.clauses_by_occur(Occur::MustNot) {
            if docs.is_empty() {
                break;
            }
            let excluded = Self::clause_docs(clause, segment)?;
            docs = difference(&docs, &excluded);
        }

        Ok(docs)
    }
}

impl Query for BooleanQuery {
    fn matcher(&self, segment: &dyn SegmentReader) -> Result<Box<dyn Matcher>> {
        if self.clauses.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }

        let docs = self.matching_docs(segment)?;
        if docs.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }
        Ok(Box::new(PostingsMatcher::new(docs)))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn description(&self) -> String {
        let clauses: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| {
                let prefix = match clause.occur {
                    Occur::Must => "+",
                    Occur::Filter => "#",
                    Occur::Should => "",
                    Occur::MustNot => "-",
                };
                format!("{prefix}{}", clause.query.description())
            })
            .collect();
        format!("({})", clauses.join(" "))
    }

    fn referenced_types(&self) -> Vec<&str> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.query.referenced_types())
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn intersect(left: &[DocId], right: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

fn difference(left: &[DocId], right: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(left.len());
    let mut j = 0;
    for &doc in left {
        while j < right.len() && right[j] < doc {
            j += 1;
        }
        if j >= right.len() || right[j] != doc {
            result.push(doc);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Document;
    use crate::lexical::index::segment::{Segment, SegmentId};
    use crate::lexical::query::term::{TermQuery, TypeQuery};

    fn segment() -> Segment {
        Segment::new(
            SegmentId::new(0, 1),
            vec![
                Document::new_with_id("parent", "p1").add_field("color", "red"),
                Document::new_with_id("parent", "p2").add_field("color", "blue"),
                Document::new_with_id("child", "c1")
                    .set_parent("p1")
                    .add_field("color", "red"),
                Document::new_with_id("child", "c2")
                    .set_parent("p2")
                    .add_field("color", "red green"),
            ],
        )
    }

    fn docs(query: &BooleanQuery) -> Vec<DocId> {
        let segment = segment();
        collect_docs(query.matcher(&segment).unwrap().as_mut()).unwrap()
    }

    #[test]
    fn test_must_and_filter() {
        let mut query = BooleanQuery::new();
        query.add_must(Box::new(TermQuery::new("color", "red")));
        query.add_filter(Box::new(TypeQuery::new("child")));
        assert_eq!(docs(&query), vec![2, 3]);
        assert_eq!(query.description(), "(+color:red #_type:child)");
        assert_eq!(query.referenced_types(), vec!["child"]);
    }

    #[test]
    fn test_should_with_minimum() {
        let mut query = BooleanQuery::new();
        query.add_should(Box::new(TermQuery::new("color", "red")));
        query.add_should(Box::new(TermQuery::new("color", "green")));
        assert_eq!(docs(&query), vec![0, 2, 3]);

        let query = query.with_minimum_should_match(2);
        assert_eq!(docs(&query), vec![3]);
    }

    #[test]
    fn test_must_not() {
        let mut query = BooleanQuery::new();
        query.add_must(Box::new(TermQuery::new("color", "red")));
        query.add_must_not(Box::new(TypeQuery::new("parent")));
        assert_eq!(docs(&query), vec![2, 3]);

        let mut only_not = BooleanQuery::new();
        only_not.add_must_not(Box::new(TermQuery::new("color", "red")));
        assert_eq!(docs(&only_not), vec![1]);
    }

    #[test]
    fn test_empty_and_disjoint() {
        assert!(docs(&BooleanQuery::new()).is_empty());

        let mut query = BooleanQuery::new();
        query.add_must(Box::new(TermQuery::new("color", "blue")));
        query.add_must(Box::new(TypeQuery::new("child")));
        assert!(docs(&query).is_empty());
    }

    #[test]
    fn test_set_operations() {
        assert_eq!(intersect(&[1, 3, 5, 7], &[3, 4, 7]), vec![3, 7]);
        assert_eq!(difference(&[1, 3, 5, 7], &[3, 4, 7]), vec![1, 5]);
        assert!(intersect(&[], &[1]).is_empty());
    }
}
