//! Byte buffer binding
//!
//! `Vec<u8>` travels as a standard base64 string with padding.

use super::{build_target, expect_type};
use crate::binding::Binding;
use crate::engine::Engine;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use jsonbind_core::{BindError, Bindable, DomainValue, Result, Shape, TypeInfo, TypeKey, Value};

/// Binding for `Vec<u8>`
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesBinding;

impl Binding for BytesBinding {
    fn shape(&self) -> Shape {
        Shape::String
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<Vec<u8>>()
    }

    fn encode(&self, value: &dyn Bindable, _engine: &Engine) -> Result<Value> {
        let bytes = expect_type::<Vec<u8>>(value, "Vec<u8>")?;
        Ok(Value::String(STANDARD.encode(bytes.as_slice())))
    }

    fn decode(&self, value: &Value, target: &TypeInfo, _engine: &Engine) -> Result<DomainValue> {
        let text = value.as_str().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::String,
            actual: value.shape(),
        })?;
        let bytes = STANDARD
            .decode(text)
            .map_err(|e| BindError::invalid("Vec<u8>", e.to_string()))?;
        build_target(bytes, target)
    }
}
