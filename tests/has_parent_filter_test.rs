use iris_join::{
    Collectable, Document, HasParentFilter, IndexSchema, LexicalStore, Query,
    TermQuery, TypeQuery, run_collector_phase,
};

fn parent_child_store() -> iris_join::Result<LexicalStore> {
    let schema = IndexSchema::builder()
        .add_type("parent")
        .add_child_type("child", "parent")
        .build()?;
    LexicalStore::new(schema)
}

fn has_parent(
    store: &LexicalStore,
    field: &str,
    value: &str,
) -> iris_join::Result<HasParentFilter> {
    HasParentFilter::new(
        Box::new(TermQuery::new(field, value)),
        "parent",
        "parent",
        store.schema(),
        store.id_cache(),
    )
}

/// Collect parents, then return the sorted ids of `query` hits passing the filter.
fn run(
    store: &LexicalStore,
    filter: &mut HasParentFilter,
    query: &dyn Query,
) -> iris_join::Result<Vec<String>> {
    let searcher = store.searcher();
    run_collector_phase(&searcher, filter)?;
    let mut ids: Vec<String> = searcher
        .search_filtered(query, &*filter, false)?
        .into_iter()
        .filter_map(|hit| hit.id)
        .collect();
    ids.sort();
    Ok(ids)
}

fn index_blog_like(store: &LexicalStore) -> iris_join::Result<()> {
    store.add_document(Document::new_with_id("parent", "p1").add_keyword("p_field", "p_value1"))?;
    store.add_document(Document::new_with_id("child", "c1").set_parent("p1"))?;
    store.add_document(Document::new_with_id("child", "c2").set_parent("p1"))?;
    store.add_document(Document::new_with_id("parent", "p2").add_keyword("p_field", "p_value2"))?;
    store.add_document(Document::new_with_id("child", "c3").set_parent("p2"))?;
    store.commit()?;
    Ok(())
}

#[test]
fn test_children_of_matching_parent() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    index_blog_like(&store)?;

    let mut filter = has_parent(&store, "p_field", "p_value1")?;
    let ids = run(&store, &mut filter, &TypeQuery::new("child"))?;
    assert_eq!(ids, vec!["c1", "c2"]);

    let mut filter = has_parent(&store, "p_field", "p_value2")?;
    let ids = run(&store, &mut filter, &TypeQuery::new("child"))?;
    assert_eq!(ids, vec!["c3"]);
    Ok(())
}

#[test]
fn test_no_matching_parent() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    index_blog_like(&store)?;

    let mut filter = has_parent(&store, "p_field", "p_value3")?;
    let ids = run(&store, &mut filter, &TypeQuery::new("child"))?;
    assert!(ids.is_empty());

    let parent_docs = filter.parent_docs().expect("collected");
    assert_eq!(parent_docs.len(), 1);
    assert_eq!(parent_docs.count_ones(), 0);
    Ok(())
}

#[test]
fn test_parent_and_child_conditions_combine() -> iris_join::Result<()> {
    let store = parent_child_store()?;

    store.add_document(Document::new_with_id("parent", "c1").add_keyword("sId", "s1"))?;
    store.add_document(Document::new_with_id("parent", "c2").add_keyword("sId", "s2"))?;
    store.add_document(Document::new_with_id("parent", "c4").add_keyword("sId", "s1"))?;
    store.add_document(Document::new_with_id("child", "cr1").set_parent("c1").add_integer("num", 330))?;
    store.add_document(Document::new_with_id("child", "cr2").set_parent("c1").add_integer("num", 331))?;
    store.add_document(Document::new_with_id("child", "cr3").set_parent("c4").add_integer("num", 331))?;
    store.add_document(Document::new_with_id("child", "cr4").set_parent("c4").add_integer("num", 330))?;
    store.add_document(Document::new_with_id("child", "cr5").set_parent("c2").add_integer("num", 330))?;
    store.commit()?;

    let mut filter = has_parent(&store, "sId", "s1")?;
    let ids = run(&store, &mut filter, &TermQuery::new("num", 330))?;
    assert_eq!(ids, vec!["cr1", "cr4"]);
    Ok(())
}

#[test]
fn test_deleted_documents_are_excluded() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    index_blog_like(&store)?;

    let mut filter = has_parent(&store, "p_field", "p_value1")?;
    store.delete_document("child", "c2")?;
    assert_eq!(run(&store, &mut filter, &TypeQuery::new("child"))?, vec!["c1"]);

    // parent deleted after collection: its bit is still set but the
    // tombstone wins
    store.delete_document("parent", "p1")?;
    let searcher = store.searcher();
    let hits = searcher.search_filtered(&TypeQuery::new("child"), &filter, false)?;
    assert!(hits.is_empty());

    filter.clear();
    assert!(run(&store, &mut filter, &TypeQuery::new("child"))?.is_empty());
    Ok(())
}

#[test]
fn test_parent_must_share_segment() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    index_blog_like(&store)?;

    // c4 points at p1, but lands in a later segment than p1
    store.add_document(Document::new_with_id("child", "c4").set_parent("p1"))?;
    store.commit()?;

    let mut filter = has_parent(&store, "p_field", "p_value1")?;
    let ids = run(&store, &mut filter, &TypeQuery::new("child"))?;
    assert_eq!(ids, vec!["c1", "c2"]);

    // every segment gets a bitset, matching or not
    assert_eq!(filter.parent_docs().expect("collected").len(), 2);
    Ok(())
}

#[test]
fn test_parent_id_colliding_across_segments() -> iris_join::Result<()> {
    let store = parent_child_store()?;

    store.add_document(Document::new_with_id("parent", "p1").add_keyword("k", "yes"))?;
    store.add_document(Document::new_with_id("child", "a").set_parent("p1"))?;
    store.commit()?;

    // same parent id, other segment, parent does not match
    store.add_document(Document::new_with_id("parent", "p1").add_keyword("k", "no"))?;
    store.add_document(Document::new_with_id("child", "b").set_parent("p1"))?;
    store.commit()?;

    let mut filter = has_parent(&store, "k", "yes")?;
    assert_eq!(run(&store, &mut filter, &TypeQuery::new("child"))?, vec!["a"]);

    let mut filter = has_parent(&store, "k", "no")?;
    assert_eq!(run(&store, &mut filter, &TypeQuery::new("child"))?, vec!["b"]);
    Ok(())
}

#[test]
fn test_clear_picks_up_new_segments() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    index_blog_like(&store)?;

    let mut filter = has_parent(&store, "p_field", "p_value1")?;
    assert_eq!(run(&store, &mut filter, &TypeQuery::new("child"))?, vec!["c1", "c2"]);

    store.add_document(Document::new_with_id("parent", "p3").add_keyword("p_field", "p_value1"))?;
    store.add_document(Document::new_with_id("child", "c5").set_parent("p3"))?;
    store.commit()?;

    filter.clear();
    assert!(filter.needs_collection());
    let ids = run(&store, &mut filter, &TypeQuery::new("child"))?;
    assert_eq!(ids, vec!["c1", "c2", "c5"]);
    Ok(())
}

#[test]
fn test_parallel_filtering_matches_sequential() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    for batch in 0..6 {
        for p in 0..4 {
            let value = if p % 2 == 0 { "even" } else { "odd" };
            let parent_id = format!("p{batch}_{p}");
            store.add_document(
                Document::new_with_id("parent", parent_id.clone()).add_keyword("kind", value),
            )?;
            for c in 0..3 {
                store.add_document(
                    Document::new_with_id("child", format!("c{batch}_{p}_{c}"))
                        .set_parent(parent_id.clone()),
                )?;
            }
        }
        store.commit()?;
    }

    let mut filter = has_parent(&store, "kind", "even")?;
    let searcher = store.searcher();
    run_collector_phase(&searcher, &mut filter)?;

    let query = TypeQuery::new("child");
    let sequential = searcher.search_filtered(&query, &filter, false)?;
    let parallel = searcher.search_filtered(&query, &filter, true)?;
    assert_eq!(sequential.len(), 6 * 2 * 3);
    assert_eq!(sequential, parallel);
    Ok(())
}

#[test]
fn test_filter_from_json() -> iris_join::Result<()> {
    let store = parent_child_store()?;
    index_blog_like(&store)?;

    let mut filter = HasParentFilter::from_json(
        r#"{
            "has_parent": {
                "parent_type": "parent",
                "query": {"bool": {"should": [
                    {"term": {"p_field": "p_value1"}},
                    {"term": {"p_field": "p_value2"}}
                ]}},
                "_scope": "my_scope"
            }
        }"#,
        store.schema(),
        store.id_cache(),
    )?;
    assert_eq!(filter.scope(), "my_scope");

    let ids = run(&store, &mut filter, &TypeQuery::new("child"))?;
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
    Ok(())
}
