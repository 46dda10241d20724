//! Tuple binding
//!
//! Tuples travel as arrays of exactly their arity. Each position decodes
//! against its declared element type.

use super::wrong_kind;
use crate::binding::Binding;
use crate::engine::Engine;
use jsonbind_core::{
    AnyTuple, BindError, Bindable, DomainValue, Result, Shape, TypeInfo, TypeKey, TypeKind, Value,
};

/// Binding for every tuple type
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleBinding;

impl Binding for TupleBinding {
    fn shape(&self) -> Shape {
        Shape::Array
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<AnyTuple>()
    }

    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
        let runtime = value.runtime_type();
        let items = match runtime.kind() {
            TypeKind::Tuple(hooks) => (hooks.items)(value),
            _ => None,
        }
        .ok_or_else(|| wrong_kind("Tuple", &runtime))?;

        items
            .into_iter()
            .map(|item| engine.encode(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue> {
        let TypeKind::Tuple(hooks) = target.kind() else {
            return Err(wrong_kind("Tuple", target));
        };
        let values = value.as_array().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::Array,
            actual: value.shape(),
        })?;

        let types = (hooks.elements)();
        if types.len() != values.len() {
            return Err(BindError::schema(
                target.name(),
                format!("expected {} elements, got {}", types.len(), values.len()),
            ));
        }
        let elements = values
            .iter()
            .zip(&types)
            .map(|(item, element)| engine.decode(item, element))
            .collect::<Result<Vec<_>>>()?;
        (hooks.build)(elements)
    }
}
