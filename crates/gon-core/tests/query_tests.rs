use gon_core::query::{self, Combinator, Predicate};
use gon_core::{parse, GonError, Object, Value};

const INVENTORY: &str = r#"
inventory {
    db1[Cache] -enabled size=10;
    db2[Cache] size=20;
    db10[Store] -enabled;
    web[Service] port=80 { host: "example.org"; }
    [Cache] size=5;
}
"#;

fn inventory() -> Object {
    parse(INVENTORY).unwrap()
}

fn names(objects: &[&Object]) -> Vec<Option<String>> {
    objects
        .iter()
        .map(|o| o.name().map(str::to_string))
        .collect()
}

fn some(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|n| Some(n.to_string())).collect()
}

/// Each new clause excludes the children it matches.
fn and_not<'a>() -> Combinator<'a> {
    Box::new(|lhs: Predicate<'a>, rhs: Predicate<'a>| -> Predicate<'a> {
        Box::new(move |obj: &Object| lhs(obj) && !rhs(obj))
    })
}

// ============================================================================
// Unfiltered
// ============================================================================

#[test]
fn no_clauses_accepts_everything() {
    let root = inventory();
    let query = root.query().unwrap();
    assert_eq!(query.all().len(), 5);
    assert_eq!(query.first().and_then(Object::name), Some("db1"));
}

#[test]
fn nested_lookup() {
    let root = inventory();
    let nested = root.as_nested().unwrap();
    assert_eq!(nested.len(), 5);
    assert_eq!(
        nested.get("web").and_then(|o| o.attribute("port")),
        Some(&Value::Int(80))
    );
    assert!(nested.get("missing").is_none());
}

// ============================================================================
// AND (default)
// ============================================================================

#[test]
fn with_class_keeps_document_order() {
    let root = inventory();
    let caches = root.query().unwrap().with_class("Cache").all();
    assert_eq!(
        names(&caches),
        vec![Some("db1".to_string()), Some("db2".to_string()), None]
    );
}

#[test]
fn clauses_combine_with_and() {
    let root = inventory();
    let query = root
        .query()
        .unwrap()
        .with_class("Cache")
        .with_attribute("enabled");
    assert_eq!(names(&query.all()), some(&["db1"]));
}

#[test]
fn match_key_matches_whole_name() {
    let root = inventory();
    let single = root.query().unwrap().match_key("db[0-9]").unwrap();
    assert_eq!(names(&single.all()), some(&["db1", "db2"]));

    let many = root.query().unwrap().match_key("db[0-9]+").unwrap();
    assert_eq!(names(&many.all()), some(&["db1", "db2", "db10"]));
}

#[test]
fn match_key_skips_anonymous_children() {
    let root = inventory();
    let query = root.query().unwrap().match_key(".*").unwrap();
    assert_eq!(query.all().len(), 4);
}

#[test]
fn match_key_rejects_invalid_pattern() {
    let root = inventory();
    assert!(matches!(
        root.query().unwrap().match_key("db("),
        Err(GonError::InvalidPattern(_))
    ));
}

#[test]
fn with_attribute_value() {
    let root = inventory();
    let query = root
        .query()
        .unwrap()
        .with_attribute_value("size", Value::Int(20));
    assert_eq!(names(&query.all()), some(&["db2"]));
}

#[test]
fn with_attribute_matching_sees_values() {
    let root = inventory();
    let query = root.query().unwrap().with_attribute_matching("size", |v| {
        v.and_then(Value::as_int).is_some_and(|n| n >= 10)
    });
    assert_eq!(names(&query.all()), some(&["db1", "db2"]));
}

#[test]
fn with_attribute_matching_sees_absence() {
    let root = inventory();
    let query = root
        .query()
        .unwrap()
        .with_attribute_matching("size", |v| v.is_none());
    assert_eq!(names(&query.all()), some(&["db10", "web"]));
}

#[test]
fn custom_clause() {
    let root = inventory();
    let query = root.query().unwrap().with(|o| o.name().is_none());
    let matches = query.all();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].attribute("size"), Some(&Value::Int(5)));
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn or_folds_from_accept_all() {
    let root = inventory();
    let query = root
        .as_nested()
        .unwrap()
        .query_with(query::or())
        .with_class("Service")
        .with_attribute("enabled");
    assert_eq!(query.all().len(), 5);
    assert_eq!(query.at_position(4).and_then(Object::name), None);
    assert!(query.at_position(4).is_some());
}

#[test]
fn explicit_and_matches_default() {
    let root = inventory();
    let nested = root.as_nested().unwrap();
    let explicit = nested
        .query_with(query::and())
        .with_class("Cache")
        .with_attribute("size")
        .all();
    let default = nested.query().with_class("Cache").with_attribute("size").all();
    assert_eq!(names(&explicit), names(&default));
}

#[test]
fn custom_combinator() {
    let root = inventory();
    let query = root
        .as_nested()
        .unwrap()
        .query_with(and_not())
        .with_class("Cache")
        .with_attribute("enabled");
    assert_eq!(names(&query.all()), some(&["web"]));
}

// ============================================================================
// Terminal operations
// ============================================================================

#[test]
fn by_key_respects_filter() {
    let root = inventory();
    let stores = root.query().unwrap().with_class("Store");
    assert!(stores.by_key("db1").is_none());
    assert_eq!(stores.by_key("db10").and_then(Object::name), Some("db10"));
    assert!(stores.by_key("missing").is_none());
}

#[test]
fn first_match() {
    let root = inventory();
    let query = root.query().unwrap().with_attribute("port");
    assert_eq!(query.first().and_then(Object::name), Some("web"));

    let none = root.query().unwrap().with_class("Nothing");
    assert!(none.first().is_none());
    assert!(none.all().is_empty());
}

#[test]
fn at_position_respects_filter() {
    let root = inventory();
    let caches = root.query().unwrap().with_class("Cache");
    assert_eq!(caches.at_position(1).and_then(Object::name), Some("db2"));
    assert!(caches.at_position(2).is_none());
    assert!(caches.at_position(99).is_none());
}

#[test]
fn nested_results_can_be_queried_again() {
    let root = inventory();
    let web = root.query().unwrap().by_key("web").unwrap();
    let host = web.query().unwrap().by_key("host").unwrap();
    assert_eq!(host.value(), Some(&Value::from("example.org")));
}

#[test]
fn attribute_lines_are_queryable() {
    let doc = parse("doc{ root{ count=3; child; } }").unwrap();
    let root = doc
        .query()
        .unwrap()
        .with_attribute_value("count", Value::Int(3))
        .first()
        .unwrap();
    assert_eq!(root.name(), Some("root"));

    let child = root.query().unwrap().by_key("child").unwrap();
    assert_eq!(child.name(), Some("child"));
    assert!(root.query().unwrap().by_key("count").is_none());
}

#[test]
fn query_on_leaf_is_none() {
    let root = inventory();
    let db1 = root.as_nested().unwrap().get("db1").unwrap();
    assert!(db1.query().is_none());
}
