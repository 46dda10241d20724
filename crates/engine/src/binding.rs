//! Binding protocol
//!
//! A binding pairs one domain type with one primitive [`Shape`] and knows
//! how to convert in both directions. Bindings are immutable once built and
//! shared between threads behind an `Arc`.
//!
//! Composite bindings recurse through the [`Engine`] for every member or
//! element, so a binding never needs to know how its children are encoded.
//!
//! ## Checked Dispatch
//!
//! The engine never calls [`Binding::encode`] or [`Binding::decode`]
//! directly. It goes through [`encode_checked`] and [`decode_checked`],
//! which enforce the contract on both sides of the call:
//!
//! | When | Check | Error |
//! |------|-------|-------|
//! | before encode | value is an instance of the domain type | `SchemaViolation` |
//! | after encode | produced shape equals the declared shape | `ShapeMismatch` |
//! | before decode | incoming shape conforms to the declared shape | `ShapeMismatch` |
//! | before decode | requested type descends from the domain type | `SchemaViolation` |
//! | after decode | output is an instance of the requested type | `SchemaViolation` |

use crate::bindings::{build_target, expect_type};
use crate::engine::Engine;
use jsonbind_core::{BindError, Bindable, DomainType, DomainValue, Result, Shape, TypeInfo, TypeKey, Value};
use std::fmt;

/// Conversion strategy between a domain type and a primitive shape
pub trait Binding: Send + Sync + 'static {
    /// Shape produced by `encode` and accepted by `decode`
    fn shape(&self) -> Shape;

    /// The domain type this binding is registered for
    fn domain_type(&self) -> TypeKey;

    /// Convert a domain value into a primitive value
    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value>;

    /// Convert a primitive value into an instance of `target`
    ///
    /// `target` is the domain type or one of its descendants.
    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue>;

    /// Name used in log output
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("domain_type", &self.domain_type())
            .field("shape", &self.shape())
            .finish()
    }
}

/// Encode through `binding`, enforcing the protocol on both sides
pub fn encode_checked(binding: &dyn Binding, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
    let domain = binding.domain_type();
    let runtime = value.runtime_type();
    if !runtime.is_a(domain) {
        return Err(BindError::schema(
            domain.name(),
            format!("cannot encode a {}", runtime.key()),
        ));
    }
    let encoded = binding.encode(value, engine)?;
    if encoded.shape() != binding.shape() {
        return Err(BindError::ShapeMismatch {
            type_name: domain.name(),
            expected: binding.shape(),
            actual: encoded.shape(),
        });
    }
    Ok(encoded)
}

/// Decode through `binding`, enforcing the protocol on both sides
pub fn decode_checked(
    binding: &dyn Binding,
    value: &Value,
    target: &TypeInfo,
    engine: &Engine,
) -> Result<DomainValue> {
    let domain = binding.domain_type();
    if !value.shape().conforms_to(binding.shape()) {
        return Err(BindError::ShapeMismatch {
            type_name: target.name(),
            expected: binding.shape(),
            actual: value.shape(),
        });
    }
    if !target.is_a(domain) {
        return Err(BindError::schema(
            domain.name(),
            format!("cannot decode into unrelated type {}", target.key()),
        ));
    }
    let decoded = binding.decode(value, target, engine)?;
    if !decoded.runtime_type().is_a(target.key()) {
        return Err(BindError::schema(
            target.name(),
            format!("decode produced a {}", decoded.type_key()),
        ));
    }
    Ok(decoded)
}

/// Binding built from a pair of plain functions
///
/// The extension point for user types that are neither records nor
/// enumerations. Descendants declared with `TypeInfo::extends_via` are
/// converted to and from `T` around the two functions.
///
///
/// ```
/// use jsonbind_core::{DomainType, Result, Shape, TypeInfo, Value, BindError};
/// use jsonbind_engine::{Engine, FnBinding};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Celsius(f64);
///
/// impl DomainType for Celsius {
///     fn type_info() -> TypeInfo {
///         TypeInfo::opaque::<Self>()
///     }
/// }
///
/// fn encode(c: &Celsius) -> Result<Value> {
///     Ok(Value::Float(c.0))
/// }
///
/// fn decode(v: &Value) -> Result<Celsius> {
///     v.as_float()
///         .map(Celsius)
///         .ok_or_else(|| BindError::invalid("Celsius", "not a number"))
/// }
///
/// let engine = Engine::new();
/// engine.register(FnBinding::new(Shape::Float, encode, decode));
/// assert_eq!(engine.serialize(&Celsius(21.5)).unwrap(), "21.5");
/// ```
pub struct FnBinding<T> {
    shape: Shape,
    encode: fn(&T) -> Result<Value>,
    decode: fn(&Value) -> Result<T>,
}

impl<T: DomainType> FnBinding<T> {
    /// Create a binding for `T`
    pub fn new(shape: Shape, encode: fn(&T) -> Result<Value>, decode: fn(&Value) -> Result<T>) -> Self {
        FnBinding { shape, encode, decode }
    }
}

impl<T: DomainType> Binding for FnBinding<T> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn encode(&self, value: &dyn Bindable, _engine: &Engine) -> Result<Value> {
        let value = expect_type::<T>(value, &TypeKey::of::<T>().name())?;
        (self.encode)(&value)
    }

    fn decode(&self, value: &Value, target: &TypeInfo, _engine: &Engine) -> Result<DomainValue> {
        build_target((self.decode)(value)?, target)
    }
}
