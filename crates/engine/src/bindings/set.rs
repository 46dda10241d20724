//! Set binding
//!
//! Sets travel as arrays. Element order on the wire follows the set's
//! iteration order; duplicates in the input collapse.

use super::wrong_kind;
use crate::binding::Binding;
use crate::engine::Engine;
use jsonbind_core::{
    AnySet, BindError, Bindable, DomainValue, Result, Shape, TypeInfo, TypeKey, TypeKind, Value,
};

/// Binding for every set type
#[derive(Debug, Clone, Copy, Default)]
pub struct SetBinding;

impl Binding for SetBinding {
    fn shape(&self) -> Shape {
        Shape::Array
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<AnySet>()
    }

    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
        let runtime = value.runtime_type();
        let items = match runtime.kind() {
            TypeKind::Set(hooks) => (hooks.items)(value),
            _ => None,
        }
        .ok_or_else(|| wrong_kind("Set", &runtime))?;

        items
            .into_iter()
            .map(|item| engine.encode(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue> {
        let TypeKind::Set(hooks) = target.kind() else {
            return Err(wrong_kind("Set", target));
        };
        let values = value.as_array().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::Array,
            actual: value.shape(),
        })?;

        let element = (hooks.element)();
        let elements = values
            .iter()
            .map(|item| engine.decode(item, &element))
            .collect::<Result<Vec<_>>>()?;
        (hooks.build)(elements)
    }
}
