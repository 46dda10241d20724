//! Record Conversions

use crate::common::*;

// ============================================================================
// Generic record binding
// ============================================================================

#[test]
fn record_round_trip() {
    let text = jsonbind::serialize(&Point { x: 1, y: 2 }).unwrap();
    assert_eq!(text, r#"{"x":1,"y":2}"#);

    let point: Point = jsonbind::deserialize_as(r#"{"x":1,"y":2}"#).unwrap();
    assert_eq!(point, Point { x: 1, y: 2 });
}

#[test]
fn record_decode_accepts_any_key_order_and_whitespace() {
    let point: Point = jsonbind::deserialize_as("{ \"y\" : 2 ,\n \"x\" : 1 }").unwrap();
    assert_eq!(point, Point { x: 1, y: 2 });
}

#[test]
fn nested_records_and_typed_lists() {
    let engine = engine();
    let shape = Shape2 {
        name: "tri".into(),
        vertices: TypedList::from_items([
            Point { x: 0, y: 0 },
            Point { x: 1, y: 0 },
            Point { x: 0, y: 1 },
        ])
        .unwrap(),
        closed: true,
    };
    let text = engine.serialize(&shape).unwrap();
    assert_eq!(
        text,
        r#"{"name":"tri","vertices":[{"x":0,"y":0},{"x":1,"y":0},{"x":0,"y":1}],"closed":true}"#
    );
    assert_eq!(engine.deserialize_as::<Shape2>(&text).unwrap(), shape);
}

#[test]
fn wide_objects_decode_in_order() {
    let engine = engine();
    let count = 40_000;
    let body: Vec<String> = (0..count).map(|i| format!("\"k{i}\":{i}")).collect();
    let text = format!("{{{}}}", body.join(","));

    let start = std::time::Instant::now();
    let value = engine.deserialize(&text, None).unwrap();
    let elapsed = start.elapsed();

    let dict = value.downcast_ref::<Dict>().unwrap();
    assert_eq!(dict.len(), count);
    assert_eq!(dict.get_as::<i64>("k39999"), Some(&39_999));
    assert_eq!(dict.keys().nth(20_000), Some("k20000"));
    assert_eq!(engine.serialize(dict).unwrap(), text);
    assert!(elapsed.as_secs() < 10, "decoding took {elapsed:?}");
}

#[test]
fn decode_is_all_or_nothing() {
    let engine = engine();
    let err = engine
        .deserialize_as::<Shape2>(r#"{"name":"x","vertices":[{"x":0,"y":0},{"x":"bad"}]}"#)
        .unwrap_err();
    assert!(matches!(err, BindError::ShapeMismatch { .. }));
}

#[test]
fn strict_engine_rejects_unknown_keys() {
    let engine = Engine::builder()
        .unmatched_keys(UnmatchedKeys::Reject)
        .build()
        .unwrap();
    let err = engine.deserialize_as::<Point>(r#"{"x":1,"w":0}"#).unwrap_err();
    assert!(err.is_schema_violation());

    let lenient = engine_with_attach();
    assert_eq!(
        lenient.deserialize_as::<Point>(r#"{"x":1,"w":0}"#).unwrap(),
        Point { x: 1, y: 0 }
    );
}

fn engine_with_attach() -> Engine {
    Engine::builder()
        .unmatched_keys(UnmatchedKeys::Attach)
        .build()
        .unwrap()
}

// ============================================================================
// Dynamic objects
// ============================================================================

#[test]
fn object_keeps_arbitrary_members() {
    let engine = engine();
    engine.set_default(Shape::Map, Object::type_info()).unwrap();

    let value = engine.deserialize(r#"{"a":1,"g":{"x":2.5,"y":"s"}}"#, None).unwrap();
    let object = value.downcast_ref::<Object>().unwrap();
    assert_eq!(object.get_as::<f64>("g.x"), Some(&2.5));
    assert_eq!(object.columns(), vec!["a", "g.x", "g.y"]);
    assert_eq!(object.numeric_values(), vec![1.0, 2.5]);
}

#[test]
fn object_converts_to_record() {
    let object = Object::new().with("x", 3i64).with("y", 4i64).with("note", "n".to_string());
    let point: Point = object.convert_to().unwrap();
    assert_eq!(point, Point { x: 3, y: 4 });
}

// ============================================================================
// Frozen class schema
// ============================================================================

#[test]
fn class_binding_overrides_generic_record_binding() {
    let engine = engine();
    engine.register(ClassBinding::new::<Point>(&engine).unwrap());

    assert_eq!(engine.serialize(&Point { x: 5, y: 6 }).unwrap(), r#"{"x":5,"y":6}"#);
    let err = engine.deserialize_as::<Point>(r#"{"x":1,"w":0}"#).unwrap_err();
    assert!(err.is_schema_violation());

    // Descendants resolve to the class binding and get its schema.
    let p3: Point3 = engine.deserialize_as(r#"{"x":1,"y":2}"#).unwrap();
    assert_eq!(p3, Point3 { x: 1, y: 2, z: 0 });
    assert!(engine.deserialize_as::<Point3>(r#"{"z":3}"#).is_err());
    assert_eq!(
        engine.serialize(&Point3 { x: 1, y: 2, z: 3 }).unwrap(),
        r#"{"x":1,"y":2}"#
    );
}
