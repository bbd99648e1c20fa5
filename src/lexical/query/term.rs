//! Leaf queries: exact terms, document types and match-all.

use std::any::Any;

use crate::data::DataValue;
use crate::error::Result;
use crate::lexical::index::segment::SegmentReader;
use crate::lexical::query::Query;
use crate::lexical::query::matcher::{AllMatcher, EmptyMatcher, Matcher, PostingsMatcher};

/// Matches documents whose `field` contains exactly `term`.
#[derive(Debug, Clone)]
pub struct TermQuery {
    field: String,
    term: String,
}

impl TermQuery {
    /// Create a term query. The term is matched as written; text fields
    /// also carry a lowercased form of every token.
    pub fn new(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        let value = value.into();
        TermQuery {
            field: field.into(),
            term: value.as_term().unwrap_or_default(),
        }
    }

    /// Create a term query from an already normalized term.
    pub fn from_term(field: impl Into<String>, term: impl Into<String>) -> Self {
        TermQuery {
            field: field.into(),
            term: term.into(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl Query for TermQuery {
    fn matcher(&self, segment: &dyn SegmentReader) -> Result<Box<dyn Matcher>> {
        let postings = segment.postings(&self.field, &self.term);
        if postings.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }
        Ok(Box::new(PostingsMatcher::new(postings.to_vec())))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn description(&self) -> String {
        format!("{}:{}", self.field, self.term)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches every document of one type.
#[derive(Debug, Clone)]
pub struct TypeQuery {
    doc_type: String,
}

impl TypeQuery {
    pub fn new(doc_type: impl Into<String>) -> Self {
        TypeQuery {
            doc_type: doc_type.into(),
        }
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

impl Query for TypeQuery {
    fn matcher(&self, segment: &dyn SegmentReader) -> Result<Box<dyn Matcher>> {
        let postings = segment.type_postings(&self.doc_type);
        if postings.is_empty() {
            return Ok(Box::new(EmptyMatcher::new()));
        }
        Ok(Box::new(PostingsMatcher::new(postings.to_vec())))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn description(&self) -> String {
        format!("_type:{}", self.doc_type)
    }

    fn referenced_types(&self) -> Vec<&str> {
        vec![self.doc_type.as_str()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Matches every document.
#[derive(Debug, Clone, Default)]
pub struct AllQuery;

impl AllQuery {
    pub fn new() -> Self {
        AllQuery
    }
}

impl Query for AllQuery {
    fn matcher(&self, segment: &dyn SegmentReader) -> Result<Box<dyn Matcher>> {
        Ok(Box::new(AllMatcher::new(segment.max_doc())))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn description(&self) -> String {
        "*:*".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
