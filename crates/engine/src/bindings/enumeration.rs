//! Enumeration bindings
//!
//! By name, a member travels as its identifier. By value, it travels as
//! its primitive value, which requires every member's value to share one
//! shape and to be distinct.

use super::{expect_type, wrong_kind};
use crate::binding::Binding;
use crate::engine::Engine;
use jsonbind_core::{
    AnyEnum, BindError, Bindable, DomainValue, EnumMember, Enumeration, Result, Shape, TypeInfo,
    TypeKey, TypeKind, Value,
};
use std::marker::PhantomData;

/// Binding for every enumeration, by member name
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumNameBinding;

impl Binding for EnumNameBinding {
    fn shape(&self) -> Shape {
        Shape::String
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<AnyEnum>()
    }

    fn encode(&self, value: &dyn Bindable, _engine: &Engine) -> Result<Value> {
        let runtime = value.runtime_type();
        let name = match runtime.kind() {
            TypeKind::Enumeration(hooks) => (hooks.name_of)(value),
            _ => None,
        }
        .ok_or_else(|| wrong_kind("Enumeration", &runtime))?;
        Ok(Value::from(name))
    }

    fn decode(&self, value: &Value, target: &TypeInfo, _engine: &Engine) -> Result<DomainValue> {
        let TypeKind::Enumeration(hooks) = target.kind() else {
            return Err(wrong_kind("Enumeration", target));
        };
        let name = value.as_str().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::String,
            actual: value.shape(),
        })?;
        (hooks.members)()
            .into_iter()
            .find(|m| m.name == name)
            .map(|m| m.instance)
            .ok_or_else(|| BindError::invalid(target.name(), format!("no member named {name:?}")))
    }
}

/// Binding for one enumeration, by member value
pub struct EnumValueBinding<E> {
    shape: Shape,
    members: Vec<EnumMember>,
    _enum: PhantomData<fn() -> E>,
}

impl<E: Enumeration> EnumValueBinding<E> {
    /// Build the binding for `E`
    ///
    /// Fails with `AmbiguousEnumValue` when member values span more than
    /// one shape or two members share a value.
    pub fn new() -> Result<Self> {
        let type_name = TypeKey::of::<E>().name();
        let members: Vec<EnumMember> = E::members()
            .into_iter()
            .map(|m| EnumMember {
                name: m.name(),
                value: m.value(),
                instance: Box::new(m),
            })
            .collect();

        let first = members.first().ok_or_else(|| BindError::AmbiguousEnumValue {
            type_name: type_name.clone(),
            reason: "no members".to_string(),
        })?;
        let shape = first.value.shape();
        if let Some(other) = members.iter().find(|m| m.value.shape() != shape) {
            return Err(BindError::AmbiguousEnumValue {
                type_name,
                reason: format!(
                    "{} is {} but {} is {}",
                    first.name,
                    shape,
                    other.name,
                    other.value.shape()
                ),
            });
        }
        for (i, a) in members.iter().enumerate() {
            if let Some(b) = members[i + 1..].iter().find(|b| b.value == a.value) {
                return Err(BindError::AmbiguousEnumValue {
                    type_name,
                    reason: format!("{} and {} share a value", a.name, b.name),
                });
            }
        }

        Ok(EnumValueBinding {
            shape,
            members,
            _enum: PhantomData,
        })
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(f), Value::Int(i)) | (Value::Int(i), Value::Float(f)) => *f == *i as f64,
        _ => a == b,
    }
}

impl<E: Enumeration> Binding for EnumValueBinding<E> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<E>()
    }

    fn encode(&self, value: &dyn Bindable, _engine: &Engine) -> Result<Value> {
        Ok(expect_type::<E>(value, &TypeKey::of::<E>().name())?.value())
    }

    fn decode(&self, value: &Value, target: &TypeInfo, _engine: &Engine) -> Result<DomainValue> {
        self.members
            .iter()
            .find(|m| same_value(&m.value, value))
            .map(|m| m.instance.clone())
            .ok_or_else(|| BindError::invalid(target.name(), format!("no member with value {value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbind_core::bind_enum;

    bind_enum! {
        enum Level {
            Low => 1,
            High => 2,
        }
    }

    bind_enum! {
        enum Ratio {
            Half => 0.5,
            Whole => 1.0,
        }
    }

    bind_enum! {
        enum Mixed {
            Number => 1,
            Word => "one",
        }
    }

    bind_enum! {
        enum Twins {
            First => "x",
            Second => "x",
        }
    }

    #[test]
    fn test_by_name_is_the_default() {
        let engine = Engine::new();
        assert_eq!(engine.serialize(&Level::High).unwrap(), r#""High""#);
        assert_eq!(engine.deserialize_as::<Level>(r#""Low""#).unwrap(), Level::Low);

        let err = engine.deserialize_as::<Level>(r#""Medium""#).unwrap_err();
        assert!(matches!(err, BindError::InvalidValue { .. }));
    }

    #[test]
    fn test_by_value_overrides_by_name() {
        let engine = Engine::new();
        engine.register(EnumValueBinding::<Level>::new().unwrap());
        assert_eq!(engine.serialize(&Level::High).unwrap(), "2");
        assert_eq!(engine.deserialize_as::<Level>("1").unwrap(), Level::Low);
        assert!(engine.deserialize_as::<Level>("3").is_err());
    }

    #[test]
    fn test_float_values_accept_ints() {
        let engine = Engine::new();
        engine.register(EnumValueBinding::<Ratio>::new().unwrap());
        assert_eq!(engine.deserialize_as::<Ratio>("1").unwrap(), Ratio::Whole);
        assert_eq!(engine.serialize(&Ratio::Half).unwrap(), "0.5");
    }

    #[test]
    fn test_mixed_shapes_are_ambiguous() {
        let err = EnumValueBinding::<Mixed>::new().err().unwrap();
        assert!(matches!(err, BindError::AmbiguousEnumValue { .. }));
    }

    #[test]
    fn test_duplicate_values_are_ambiguous() {
        let err = EnumValueBinding::<Twins>::new().err().unwrap();
        assert!(matches!(err, BindError::AmbiguousEnumValue { .. }));
    }
}
