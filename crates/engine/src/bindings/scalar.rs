//! Scalar bindings
//!
//! One generic binding covers the five scalar domain types. Each scalar
//! knows its shape and its conversion to and from a primitive value.

use super::{build_target, expect_type};
use crate::binding::Binding;
use crate::engine::Engine;
use jsonbind_core::{
    BindError, Bindable, DomainType, DomainValue, Result, Shape, TypeInfo, TypeKey, Value,
};
use std::marker::PhantomData;

/// A domain type that maps directly onto one primitive shape
pub trait Scalar: DomainType {
    /// Shape of the primitive value
    const SHAPE: Shape;

    /// Convert into a primitive value
    fn to_value(&self) -> Value;

    /// Convert from a primitive value of a conforming shape
    fn from_value(value: &Value) -> Option<Self>;
}

impl Scalar for () {
    const SHAPE: Shape = Shape::Null;

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.is_null().then_some(())
    }
}

impl Scalar for bool {
    const SHAPE: Shape = Shape::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl Scalar for i64 {
    const SHAPE: Shape = Shape::Int;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl Scalar for f64 {
    const SHAPE: Shape = Shape::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    // Ints widen.
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl Scalar for String {
    const SHAPE: Shape = Shape::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Binding for a [`Scalar`]
pub struct ScalarBinding<T> {
    _scalar: PhantomData<fn() -> T>,
}

impl<T: Scalar> ScalarBinding<T> {
    /// Create the binding
    pub fn new() -> Self {
        ScalarBinding {
            _scalar: PhantomData,
        }
    }
}

impl<T: Scalar> Default for ScalarBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Binding for ScalarBinding<T> {
    fn shape(&self) -> Shape {
        T::SHAPE
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn encode(&self, value: &dyn Bindable, _engine: &Engine) -> Result<Value> {
        Ok(expect_type::<T>(value, &TypeKey::of::<T>().name())?.to_value())
    }

    fn decode(&self, value: &Value, target: &TypeInfo, _engine: &Engine) -> Result<DomainValue> {
        let decoded = T::from_value(value).ok_or_else(|| BindError::ShapeMismatch {
            type_name: TypeKey::of::<T>().name(),
            expected: T::SHAPE,
            actual: value.shape(),
        })?;
        build_target(decoded, target)
    }
}
