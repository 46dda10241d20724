//! Enumeration Bindings

use crate::common::*;

#[test]
fn enums_travel_by_name_by_default() {
    assert_eq!(jsonbind::serialize(&Color::Green).unwrap(), r#""Green""#);
    let color: Color = jsonbind::deserialize_as(r#""Red""#).unwrap();
    assert_eq!(color, Color::Red);
}

#[test]
fn by_value_binding_replaces_by_name() {
    let engine = engine();
    engine.register(EnumValueBinding::<Color>::new().unwrap());
    assert_eq!(engine.serialize(&Color::Green).unwrap(), r#""g""#);
    assert_eq!(engine.deserialize_as::<Color>(r#""r""#).unwrap(), Color::Red);
    assert!(engine.deserialize_as::<Color>(r#""Red""#).is_err());
}

#[test]
fn mixed_shapes_are_ambiguous() {
    let err = EnumValueBinding::<Flag>::new().err().unwrap();
    assert!(matches!(err, BindError::AmbiguousEnumValue { .. }));
}

#[test]
fn enum_members_inside_records() {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Pixel {
        at: Point,
        color: Option2,
    }

    bind_enum! {
        enum Option2 {
            A => 0,
            B => 1,
        }
    }

    impl Default for Option2 {
        fn default() -> Self {
            Option2::A
        }
    }

    bind_record!(Pixel { at: Point, color: Option2 });

    let engine = engine();
    let pixel = Pixel { at: Point { x: 1, y: 2 }, color: Option2::B };
    let text = engine.serialize(&pixel).unwrap();
    assert_eq!(text, r#"{"at":{"x":1,"y":2},"color":"B"}"#);
    assert_eq!(engine.deserialize_as::<Pixel>(&text).unwrap(), pixel);
}
