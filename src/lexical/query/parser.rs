//! JSON query DSL.
//!
//! Queries and the has-parent filter can be described as JSON documents:
//!
//! ```json
//! {"term": {"p_field": "p_value1"}}
//! {"match_all": {}}
//! {"type": "parent"}
//! {"bool": {"must": [...], "filter": [...], "should": [...], "must_not": [...],
//!           "minimum_should_match": 1}}
//! {"has_parent": {"parent_type": "parent", "query": {...}, "_scope": "my_scope"}}
//! ```
//!
//! Term values are matched verbatim: strings as keywords, numbers and
//! booleans by their canonical text.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::data::DataValue;
use crate::error::{IrisError, Result};
use crate::lexical::query::Query;
use crate::lexical::query::boolean::BooleanQuery;
use crate::lexical::query::term::{AllQuery, TermQuery, TypeQuery};

/// A query in its JSON form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDsl {
    Term(BTreeMap<String, serde_json::Value>),
    MatchAll(MatchAllDsl),
    Type(String),
    Bool(BoolDsl),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchAllDsl {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BoolDsl {
    pub must: Vec<QueryDsl>,
    pub filter: Vec<QueryDsl>,
    pub should: Vec<QueryDsl>,
    pub must_not: Vec<QueryDsl>,
    pub minimum_should_match: usize,
}

/// The body of a `has_parent` filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HasParentDsl {
    #[serde(default, alias = "type")]
    pub parent_type: Option<String>,
    #[serde(default)]
    pub query: Option<QueryDsl>,
    #[serde(default, rename = "_scope")]
    pub scope: Option<String>,
}

/// A filter in its JSON form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDsl {
    HasParent(HasParentDsl),
}

impl QueryDsl {
    /// Parse a query from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the executable query.
    pub fn build(&self) -> Result<Box<dyn Query>> {
        match self {
            QueryDsl::Term(terms) => {
                if terms.len() != 1 {
                    return Err(IrisError::invalid_argument(format!(
                        "[term] query expects exactly one field, got {}",
                        terms.len()
                    )));
                }
                let (field, value) = terms
                    .iter()
                    .next()
                    .ok_or_else(|| IrisError::internal("term map unexpectedly empty"))?;
                let term = json_term(field, value)?;
                Ok(Box::new(TermQuery::from_term(field.clone(), term)))
            }
            QueryDsl::MatchAll(_) => Ok(Box::new(AllQuery::new())),
            QueryDsl::Type(doc_type) => Ok(Box::new(TypeQuery::new(doc_type.clone()))),
            QueryDsl::Bool(bool_dsl) => {
                let mut query = BooleanQuery::new();
                for clause in &bool_dsl.must {
                    query.add_must(clause.build()?);
                }
                for clause in &bool_dsl.filter {
                    query.add_filter(clause.build()?);
                }
                for clause in &bool_dsl.should {
                    query.add_should(clause.build()?);
                }
                for clause in &bool_dsl.must_not {
                    query.add_must_not(clause.build()?);
                }
                Ok(Box::new(
                    query.with_minimum_should_match(bool_dsl.minimum_should_match),
                ))
            }
        }
    }
}

impl FilterDsl {
    /// Parse a filter from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn json_term(field: &str, value: &serde_json::Value) -> Result<String> {
    let value = match value {
        serde_json::Value::String(s) => DataValue::String(s.clone()),
        serde_json::Value::Bool(b) => DataValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => DataValue::Int64(i),
            None => DataValue::Float64(n.as_f64().unwrap_or(f64::NAN)),
        },
        other => {
            return Err(IrisError::invalid_argument(format!(
                "[term] query on [{field}] does not support value {other}"
            )));
        }
    };
    value
        .as_term()
        .ok_or_else(|| IrisError::invalid_argument(format!("[term] query on [{field}] has no term")))
}
