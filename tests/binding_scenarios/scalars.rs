//! Scalar Conversions

use crate::common::*;

// ============================================================================
// Default mapping
// ============================================================================

#[test]
fn int_round_trip() {
    assert_eq!(jsonbind::serialize(&42i64).unwrap(), "42");
    let value = jsonbind::deserialize("42", None).unwrap();
    assert_eq!(value.downcast_ref::<i64>(), Some(&42));
}

#[test]
fn each_shape_has_a_default_type() {
    let engine = engine();
    let cases: [(&str, TypeInfo); 7] = [
        ("null", <()>::type_info()),
        ("true", bool::type_info()),
        ("1", i64::type_info()),
        ("1.5", f64::type_info()),
        ("\"s\"", String::type_info()),
        ("[]", List::type_info()),
        ("{}", Dict::type_info()),
    ];
    for (text, expected) in cases {
        let value = engine.deserialize(text, None).unwrap();
        assert_eq!(value.runtime_type(), expected, "default type of {text}");
    }
}

#[test]
fn float_target_accepts_integer_text() {
    let value: f64 = jsonbind::deserialize_as("3").unwrap();
    assert_eq!(value, 3.0);
}

#[test]
fn whole_floats_keep_their_fraction() {
    assert_eq!(jsonbind::serialize(&2.0f64).unwrap(), "2.0");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn malformed_text_is_reported() {
    for text in ["", "{", "[1,]", "01", "nul", "\"unterminated"] {
        let err = jsonbind::deserialize(text, None).unwrap_err();
        assert!(err.is_malformed(), "{text:?} gave {err:?}");
    }
}

#[test]
fn non_finite_floats_are_invalid() {
    let err = jsonbind::serialize(&f64::INFINITY).unwrap_err();
    assert!(matches!(err, BindError::InvalidValue { .. }));
}

#[test]
fn shape_mismatch_names_both_shapes() {
    let err = jsonbind::deserialize_as::<bool>("1").unwrap_err();
    assert_eq!(
        err,
        BindError::ShapeMismatch {
            type_name: "bool".into(),
            expected: Shape::Bool,
            actual: Shape::Int,
        }
    );
}
