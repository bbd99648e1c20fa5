use std::sync::Arc;

use crate::error::{IrisError, Result};
use crate::lexical::index::DocId;
use crate::lexical::index::id_cache::{IdCache, IdTypeCache};
use crate::lexical::index::schema::IndexSchema;
use crate::lexical::index::segment::SegmentReader;
use crate::lexical::join::collector::ParentCollector;
use crate::lexical::join::parent_docs::ParentDocs;
use crate::lexical::query::Query;
use crate::lexical::query::boolean::BooleanQuery;
use crate::lexical::query::parser::FilterDsl;
use crate::lexical::query::term::TypeQuery;
use crate::lexical::search::filter::{DocPredicate, Filterable};
use crate::lexical::search::scope::Collectable;
use crate::util::bitset::FixedBitSet;

/// Progress of the parent collection phase.
#[derive(Debug, Default)]
pub enum CollectionState {
    /// Nothing collected yet.
    #[default]
    Uncollected,
    /// A collector has been handed out and not returned.
    Collecting,
    /// Parent matches are available for filtering.
    Collected(ParentDocs),
}

impl CollectionState {
    pub fn is_collected(&self) -> bool {
        matches!(self, CollectionState::Collected(_))
    }
}

/// Filter selecting child documents whose parent matches a query.
#[derive(Debug)]
pub struct HasParentFilter {
    parent_query: BooleanQuery,
    parent_type: String,
    scope: String,
    id_cache: Arc<IdCache>,
    state: CollectionState,
}

impl HasParentFilter {
    /// Create a filter for children of `parent_type` whose parent matches
    /// `parent_query`.
    ///
    /// Fails with [`IrisError::InvalidConfig`] if `parent_type` is not
    /// declared, if no type declares it as parent, or if the query restricts
    /// to a type the schema does not know.
    pub fn new(
        parent_query: Box<dyn Query>,
        parent_type: impl Into<String>,
        scope: impl Into<String>,
        schema: &IndexSchema,
        id_cache: Arc<IdCache>,
    ) -> Result<Self> {
        let parent_type = parent_type.into();
        let scope = scope.into();

        if !schema.has_type(&parent_type) {
            return Err(IrisError::invalid_config(format!(
                "[has_parent] no mapping found for type [{parent_type}]"
            )));
        }
        if schema.child_types_of(&parent_type).is_empty() {
            return Err(IrisError::invalid_config(format!(
                "[has_parent] no child type declares [{parent_type}] as parent"
            )));
        }
        if let Some(unknown) = parent_query
            .referenced_types()
            .into_iter()
            .find(|t| !schema.has_type(t))
        {
            return Err(IrisError::invalid_config(format!(
                "[has_parent] query references unknown type [{unknown}]"
            )));
        }

        // only documents of the parent type may be marked as parents
        let mut wrapped = BooleanQuery::new();
        wrapped.add_must(parent_query);
        wrapped.add_filter(Box::new(TypeQuery::new(parent_type.clone())));

        log::debug!(
            "created has_parent filter for [{parent_type}] in scope [{scope}]: {}",
            wrapped.description()
        );

        Ok(HasParentFilter {
            parent_query: wrapped,
            parent_type,
            scope,
            id_cache,
            state: CollectionState::Uncollected,
        })
    }

    /// Build a filter from its JSON form, e.g.
    /// `{"has_parent": {"parent_type": "blog", "query": {...}, "_scope": "s"}}`.
    ///
    /// The scope defaults to the parent type.
    pub fn from_json(json: &str, schema: &IndexSchema, id_cache: Arc<IdCache>) -> Result<Self> {
        let FilterDsl::HasParent(body) = FilterDsl::from_json(json)?;

        let parent_type = body.parent_type.ok_or_else(|| {
            IrisError::invalid_argument("[has_parent] filter requires [parent_type] field")
        })?;
        let query = body
            .query
            .ok_or_else(|| IrisError::invalid_argument("[has_parent] filter requires [query] field"))?
            .build()?;
        let scope = body.scope.unwrap_or_else(|| parent_type.clone());

        Self::new(query, parent_type, scope, schema, id_cache)
    }

    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    /// The collected parents, once collection has finished.
    pub fn parent_docs(&self) -> Option<&ParentDocs> {
        match &self.state {
            CollectionState::Collected(docs) => Some(docs),
            _ => None,
        }
    }
}

impl Collectable for HasParentFilter {
    type Collector = ParentCollector;

    fn scope(&self) -> &str {
        &self.scope
    }

    fn query(&self) -> &dyn Query {
        &self.parent_query
    }

    fn needs_collection(&self) -> bool {
        !self.state.is_collected()
    }

    fn collector_callback(&mut self) -> ParentCollector {
        match self.state {
            CollectionState::Collected(_) => {
                log::debug!("scope [{}] restarts parent collection", self.scope)
            }
            CollectionState::Collecting => {
                log::debug!("scope [{}] abandons unfinished collection", self.scope)
            }
            CollectionState::Uncollected => {}
        }
        self.state = CollectionState::Collecting;
        ParentCollector::new()
    }

    fn finish_collection(&mut self, collector: ParentCollector) {
        assert!(
            matches!(self.state, CollectionState::Collecting),
            "finish_collection called for scope [{}] without an active collection",
            self.scope
        );
        self.state = CollectionState::Collected(collector.into_parent_docs());
    }

    fn clear(&mut self) {
        log::trace!("clearing scope [{}]", self.scope);
        self.state = CollectionState::Uncollected;
    }
}

impl Filterable for HasParentFilter {
    type DocSet<'a> = ChildDocSet<'a>;

    /// # Panics
    ///
    /// If collection has not finished, or if `segment` was not part of the
    /// snapshot parents were collected from.
    fn predicate_for_segment<'a>(&'a self, segment: &'a dyn SegmentReader) -> ChildDocSet<'a> {
        let CollectionState::Collected(parent_docs) = &self.state else {
            panic!(
                "has_parent filter in scope [{}] used before parent collection finished",
                self.scope
            );
        };
        let segment_id = segment.segment_id();
        let Some(parent_bits) = parent_docs.get(segment_id) else {
            panic!(
                "no parents collected for segment {segment_id} in scope [{}]",
                self.scope
            );
        };

        ChildDocSet {
            segment,
            type_cache: self.id_cache.reader(segment).type_cache(&self.parent_type),
            parent_bits,
        }
    }
}

/// Children of matching parents within one segment.
#[derive(Debug)]
pub struct ChildDocSet<'a> {
    segment: &'a dyn SegmentReader,
    type_cache: Option<Arc<IdTypeCache>>,
    parent_bits: &'a FixedBitSet,
}

impl ChildDocSet<'_> {
    /// Live children of matching parents, in doc order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        (0..self.segment.max_doc()).filter(move |&doc| !self.segment.is_deleted(doc) && self.get(doc))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

impl DocPredicate for ChildDocSet<'_> {
    fn get(&self, doc: DocId) -> bool {
        let Some(type_cache) = &self.type_cache else {
            return false;
        };
        let Some(parent_id) = type_cache.parent_id_by_doc(doc) else {
            return false;
        };
        // deleted parents are skipped by the lookup
        let Some(parent_doc) = type_cache.doc_by_id(parent_id, self.segment) else {
            return false;
        };
        self.parent_bits.get(parent_doc)
    }

    fn is_cacheable(&self) -> bool {
        false
    }

    fn size_in_bytes(&self) -> usize {
        0
    }
}
