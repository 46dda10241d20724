//! Registry Resolution and Overrides

use crate::common::*;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Celsius(f64);

impl DomainType for Celsius {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Reading(f64);

impl DomainType for Reading {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>().extends(&Celsius::type_info())
    }
}

/// A descendant that converts to and from its parent
#[derive(Debug, Clone, PartialEq)]
struct Thermometer {
    celsius: Celsius,
}

impl DomainType for Thermometer {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>().extends_via::<Thermometer, Celsius>(
            |p| p.celsius.clone(),
            |celsius| Thermometer { celsius },
        )
    }
}

fn celsius_as_float(c: &Celsius) -> Result<Value> {
    Ok(Value::Float(c.0))
}

fn celsius_as_text(c: &Celsius) -> Result<Value> {
    Ok(Value::String(format!("{}C", c.0)))
}

fn float_as_celsius(v: &Value) -> Result<Celsius> {
    v.as_float()
        .map(Celsius)
        .ok_or_else(|| BindError::invalid("Celsius", "expected a number"))
}

fn text_as_celsius(v: &Value) -> Result<Celsius> {
    v.as_str()
        .and_then(|s| s.trim_end_matches('C').parse().ok())
        .map(Celsius)
        .ok_or_else(|| BindError::invalid("Celsius", "expected <n>C"))
}

fn reading_as_float(r: &Reading) -> Result<Value> {
    Ok(Value::Float(r.0))
}

fn float_as_reading(v: &Value) -> Result<Reading> {
    v.as_float()
        .map(Reading)
        .ok_or_else(|| BindError::invalid("Reading", "expected a number"))
}

#[test]
fn unbound_types_are_reported() {
    let engine = engine();
    assert!(!engine.is_bound_type::<Celsius>());
    assert!(matches!(
        engine.serialize(&Celsius(1.0)),
        Err(BindError::NotSerializable { .. })
    ));
    assert!(matches!(
        engine.deserialize("1.0", Some(&Celsius::type_info())),
        Err(BindError::NotDeserializable { .. })
    ));
}

#[test]
fn custom_binding_round_trip() {
    let engine = engine();
    engine.register(FnBinding::new(Shape::Float, celsius_as_float, float_as_celsius));
    assert_eq!(engine.serialize(&Celsius(21.5)).unwrap(), "21.5");
    assert_eq!(engine.deserialize_as::<Celsius>("21.5").unwrap(), Celsius(21.5));
}

#[test]
fn override_replaces_previous_binding() {
    let engine = engine();
    engine.register(FnBinding::new(Shape::Float, celsius_as_float, float_as_celsius));
    let before = engine.registry().len();
    engine.register(FnBinding::new(Shape::String, celsius_as_text, text_as_celsius));

    assert_eq!(engine.registry().len(), before);
    assert_eq!(engine.serialize(&Celsius(3.0)).unwrap(), r#""3C""#);
    assert_eq!(engine.deserialize_as::<Celsius>(r#""3C""#).unwrap(), Celsius(3.0));
    assert!(engine.deserialize_as::<Celsius>("3.0").is_err());
}

#[test]
fn descendant_resolves_to_ancestor_until_ancestor_changes() {
    let engine = engine();
    engine.register(FnBinding::new(Shape::Float, celsius_as_float, float_as_celsius));

    let binding = engine.resolve(&Reading::type_info()).unwrap();
    assert_eq!(binding.domain_type(), TypeKey::of::<Celsius>());

    engine.register(FnBinding::new(Shape::String, celsius_as_text, text_as_celsius));
    let binding = engine.resolve(&Reading::type_info()).unwrap();
    assert_eq!(binding.shape(), Shape::String);

    engine.register(FnBinding::new(Shape::Float, reading_as_float, float_as_reading));
    let binding = engine.resolve(&Reading::type_info()).unwrap();
    assert_eq!(binding.domain_type(), TypeKey::of::<Reading>());
    assert_eq!(engine.serialize(&Reading(1.5)).unwrap(), "1.5");
}

#[test]
fn descendant_without_conversion_is_not_built_as_ancestor() {
    let engine = engine();
    engine.register(FnBinding::new(Shape::Float, celsius_as_float, float_as_celsius));

    let err = engine
        .deserialize("1.0", Some(&Reading::type_info()))
        .unwrap_err();
    assert!(err.is_schema_violation());
    assert!(engine.deserialize_as::<Reading>("1.0").is_err());
    assert!(engine.serialize(&Reading(1.0)).unwrap_err().is_schema_violation());
}

#[test]
fn converted_descendant_inherits_ancestor_encoding() {
    let engine = engine();
    engine.register(FnBinding::new(Shape::Float, celsius_as_float, float_as_celsius));
    assert!(!engine.registry().bound_domain_types().contains(&TypeKey::of::<Thermometer>()));

    let thermometer = Thermometer { celsius: Celsius(36.6) };
    assert_eq!(engine.serialize(&thermometer).unwrap(), "36.6");

    let decoded = engine.deserialize("36.6", Some(&Thermometer::type_info())).unwrap();
    assert_eq!(decoded.type_key(), TypeKey::of::<Thermometer>());
    assert_eq!(engine.deserialize_as::<Thermometer>("36.6").unwrap(), thermometer);

    engine.register(FnBinding::new(Shape::String, celsius_as_text, text_as_celsius));
    assert_eq!(engine.serialize(&thermometer).unwrap(), r#""36.6C""#);
    assert_eq!(engine.deserialize_as::<Thermometer>(r#""36.6C""#).unwrap(), thermometer);
}

#[test]
fn converted_descendant_of_a_scalar() {
    #[derive(Debug, Clone, PartialEq)]
    struct Port(i64);

    impl DomainType for Port {
        fn type_info() -> TypeInfo {
            TypeInfo::opaque::<Self>().extends_via::<Port, i64>(|p| p.0, Port)
        }
    }

    let engine = engine();
    assert_eq!(engine.serialize(&Port(8080)).unwrap(), "8080");
    assert_eq!(engine.deserialize_as::<Port>("8080").unwrap(), Port(8080));
}

#[test]
fn shared_binding_registration() {
    let engine = engine();
    let binding: Arc<dyn Binding> =
        Arc::new(FnBinding::new(Shape::Float, celsius_as_float, float_as_celsius));
    engine.register_arc(Arc::clone(&binding));
    assert!(engine.is_bound(&Reading::type_info()));
    assert!(engine.registry().bound_domain_types().contains(&TypeKey::of::<Celsius>()));
}

#[test]
fn process_wide_registration() {
    #[derive(Debug, Clone, PartialEq)]
    struct Kelvin(f64);

    impl DomainType for Kelvin {
        fn type_info() -> TypeInfo {
            TypeInfo::opaque::<Self>()
        }
    }

    fn encode(k: &Kelvin) -> Result<Value> {
        Ok(Value::Float(k.0))
    }

    fn decode(v: &Value) -> Result<Kelvin> {
        v.as_float()
            .map(Kelvin)
            .ok_or_else(|| BindError::invalid("Kelvin", "expected a number"))
    }

    assert!(!jsonbind::is_bound::<Kelvin>());
    jsonbind::register_binding(FnBinding::new(Shape::Float, encode, decode));
    assert!(jsonbind::is_bound::<Kelvin>());
    assert_eq!(jsonbind::serialize(&Kelvin(273.15)).unwrap(), "273.15");
    assert!(jsonbind::global().is_bound_type::<Kelvin>());
}
