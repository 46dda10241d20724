//! List binding
//!
//! Registered for `List`; every `TypedList<T>` resolves to it through its
//! ancestor chain. The element type and null policy come from the list
//! hooks of the value being encoded or the type being decoded.

use super::wrong_kind;
use crate::binding::{encode_checked, Binding};
use crate::engine::Engine;
use jsonbind_core::{
    BindError, Bindable, DomainValue, List, Result, Shape, TypeInfo, TypeKey, TypeKind, Value,
};

/// Binding for checked lists
#[derive(Debug, Clone, Copy, Default)]
pub struct ListBinding;

impl Binding for ListBinding {
    fn shape(&self) -> Shape {
        Shape::Array
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<List>()
    }

    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
        let runtime = value.runtime_type();
        let list = match runtime.kind() {
            TypeKind::List(hooks) => (hooks.view)(value),
            _ => None,
        }
        .ok_or_else(|| wrong_kind("List", &runtime))?;

        let mut items = Vec::with_capacity(list.len());
        match list.element_type() {
            Some(element) => {
                // One resolution for the whole list.
                let binding = engine.resolve(element).map_err(|_| BindError::NotSerializable {
                    type_name: element.name(),
                })?;
                for item in list.iter() {
                    if item.is::<()>() {
                        items.push(Value::Null);
                    } else {
                        items.push(encode_checked(binding.as_ref(), item, engine)?);
                    }
                }
            }
            None => {
                for item in list.iter() {
                    items.push(engine.encode(item)?);
                }
            }
        }
        Ok(Value::Array(items))
    }

    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue> {
        let TypeKind::List(hooks) = target.kind() else {
            return Err(wrong_kind("List", target));
        };
        let Value::Array(values) = value else {
            return Err(BindError::ShapeMismatch {
                type_name: target.name(),
                expected: Shape::Array,
                actual: value.shape(),
            });
        };

        let element = (hooks.element)();
        let mut list = match &element {
            Some(element) => List::of(element.clone()).allow_empty(hooks.allow_empty),
            None => List::new().allow_empty(true),
        };
        for item in values {
            let decoded = match &element {
                // The list decides whether null is admitted.
                Some(element) if item.is_null() && element.key() != TypeKey::of::<()>() => {
                    Box::new(()) as DomainValue
                }
                Some(element) => engine.decode(item, element)?,
                None => engine.decode_default(item)?,
            };
            list.push_boxed(decoded)?;
        }
        Ok((hooks.build)(list))
    }
}
