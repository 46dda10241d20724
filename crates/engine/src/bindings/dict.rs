//! Dict binding
//!
//! Keys travel unchanged. Values encode by their runtime type and decode
//! through the default mapping.

use super::expect_type;
use crate::binding::Binding;
use crate::engine::Engine;
use jsonbind_core::{
    BindError, Bindable, Dict, DomainValue, Result, Shape, TypeInfo, TypeKey, Value, ValueMap,
};

/// Binding for [`Dict`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DictBinding;

impl Binding for DictBinding {
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<Dict>()
    }

    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
        let dict = expect_type::<Dict>(value, "Dict")?;
        let mut map = ValueMap::with_capacity(dict.len());
        for (key, item) in dict.iter() {
            map.insert(key, engine.encode(item)?);
        }
        Ok(Value::Map(map))
    }

    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue> {
        let map = value.as_map().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::Map,
            actual: value.shape(),
        })?;
        let mut dict = Dict::new();
        for (key, item) in map.iter() {
            dict.insert_boxed(key, engine.decode_default(item)?);
        }
        Ok(Box::new(dict))
    }
}
