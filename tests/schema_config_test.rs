use iris_join::{HasParentFilter, IndexSchema, IrisError, LexicalStore, QueryDsl};

#[test]
fn test_schema_from_json() -> iris_join::Result<()> {
    let schema = IndexSchema::from_json(
        r#"{"types": {
            "blog": {},
            "comment": {"_parent": "blog"},
            "tag": {}
        }}"#,
    )?;

    assert!(schema.has_type("tag"));
    assert_eq!(schema.parent_type_of("comment"), Some("blog"));
    assert_eq!(schema.child_types_of("blog"), vec!["comment"]);
    assert!(schema.child_types_of("tag").is_empty());

    let store = LexicalStore::new(schema)?;
    let query = QueryDsl::from_json(r#"{"match_all": {}}"#)?.build()?;
    HasParentFilter::new(query, "blog", "blog", store.schema(), store.id_cache())?;
    Ok(())
}

#[test]
fn test_invalid_schema_is_rejected() {
    let err = IndexSchema::from_json(r#"{"types": {"comment": {"_parent": "blog"}}}"#).unwrap_err();
    assert!(matches!(err, IrisError::InvalidConfig(_)));

    let err = IndexSchema::from_json(r#"{"types": {"node": {"_parent": "node"}}}"#).unwrap_err();
    assert!(matches!(err, IrisError::InvalidConfig(_)));

    let err = IndexSchema::from_json(r#"{"types": "#).unwrap_err();
    assert!(matches!(err, IrisError::Json(_)));
}

#[test]
fn test_filter_on_type_without_children_is_rejected() -> iris_join::Result<()> {
    let schema = IndexSchema::builder()
        .add_type("blog")
        .add_child_type("comment", "blog")
        .build()?;
    let store = LexicalStore::new(schema)?;

    let query = QueryDsl::from_json(r#"{"match_all": {}}"#)?.build()?;
    let err = HasParentFilter::new(query, "comment", "s", store.schema(), store.id_cache())
        .unwrap_err();
    assert!(matches!(err, IrisError::InvalidConfig(_)));
    Ok(())
}
