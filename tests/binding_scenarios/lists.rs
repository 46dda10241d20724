//! List Conversions and Type Enforcement

use crate::common::*;

#[test]
fn typed_list_round_trip() {
    let list = ints(&[1, 2, 3]);
    let text = jsonbind::serialize(&list).unwrap();
    assert_eq!(text, "[1,2,3]");

    let back: TypedList<i64> = jsonbind::deserialize_as("[1,2,3]").unwrap();
    assert_eq!(back, list);
}

#[test]
fn typed_list_rejects_wrong_element() {
    let mut list = ints(&[1, 2, 3]);
    let err = list.push("a".to_string()).unwrap_err();
    assert!(err.is_schema_violation());
    assert_eq!(list.len(), 3);
}

#[test]
fn float_list_coerces_ints() {
    let mut list = TypedList::<f64>::new();
    list.push(1i64).unwrap();
    list.push(2.5f64).unwrap();
    assert_eq!(list.into_vec(), vec![1.0, 2.5]);
}

#[test]
fn null_elements_need_allow_empty() {
    let engine = engine();
    assert!(engine.deserialize_as::<TypedList<i64>>("[1,null]").is_err());

    let mut list = TypedList::<i64>::new().allow_empty(true);
    list.push(()).unwrap();
    list.push(4i64).unwrap();
    assert_eq!(engine.serialize(&list).unwrap(), "[null,4]");
}

#[test]
fn untyped_list_decodes_each_element_by_shape() {
    let value = jsonbind::deserialize(r#"[1,2.0,"s",true,null,[],{}]"#, None).unwrap();
    let list = value.downcast_ref::<List>().unwrap();
    let kinds: Vec<String> = list.iter().map(|v| v.type_key().name()).collect();
    assert_eq!(kinds, vec!["i64", "f64", "String", "bool", "()", "List", "Dict"]);
}

#[test]
fn list_helpers() {
    let list = ints(&[1, 2, 3, 4]);
    let evens = list.filter(|v| v.downcast_ref::<i64>().map_or(false, |i| i % 2 == 0));
    assert_eq!(jsonbind::serialize(&evens).unwrap(), "[2,4]");

    let groups = list.split_by(|v| v.downcast_ref::<i64>().map_or(false, |i| *i > 2));
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].1.len(), 2);

    let missing = list.find_first(|v| v.is::<String>(), NotFoundBehavior::Absent).unwrap();
    assert!(missing.is_none());
    assert!(list.find_first(|v| v.is::<String>(), NotFoundBehavior::Error).is_err());
}

#[test]
fn tuples_and_sets_travel_as_arrays() {
    let engine = engine();
    let pair = (Point { x: 1, y: 1 }, "p".to_string());
    let text = engine.serialize(&pair).unwrap();
    assert_eq!(text, r#"[{"x":1,"y":1},"p"]"#);
    assert_eq!(engine.deserialize_as::<(Point, String)>(&text).unwrap(), pair);

    let set: std::collections::BTreeSet<String> =
        engine.deserialize_as(r#"["b","a","b"]"#).unwrap();
    assert_eq!(engine.serialize(&set).unwrap(), r#"["a","b"]"#);
}
