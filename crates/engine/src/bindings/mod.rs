//! Standard bindings
//!
//! | Binding | Domain type | Shape |
//! |---------|-------------|-------|
//! | [`ScalarBinding`] | `()`, `bool`, `i64`, `f64`, `String` | matching scalar |
//! | [`ListBinding`] | `List` and every `TypedList<T>` | Array |
//! | [`DictBinding`] | `Dict` | Map |
//! | [`ObjectBinding`] | every record (`AnyRecord`) | Map |
//! | [`ClassBinding`] | one record type, schema frozen | Map |
//! | [`TupleBinding`] | every tuple (`AnyTuple`) | Array |
//! | [`SetBinding`] | every set (`AnySet`) | Array |
//! | [`EnumNameBinding`] | every enumeration (`AnyEnum`) | String |
//! | [`EnumValueBinding`] | one enumeration | the members' shape |
//! | [`BytesBinding`] | `Vec<u8>` | String (base64) |
//! | [`DateTimeBinding`] | `NaiveDateTime` | String |
//!
//! `ClassBinding` and `EnumValueBinding` are never installed by default;
//! register them per type to override the generic binding.

mod bytes;
mod class;
mod datetime;
mod dict;
mod enumeration;
mod list;
mod object;
mod scalar;
mod set;
mod tuple;

pub use bytes::BytesBinding;
pub use class::ClassBinding;
pub use datetime::{DateTimeBinding, DateTimeFormat};
pub use dict::DictBinding;
pub use enumeration::{EnumNameBinding, EnumValueBinding};
pub use list::ListBinding;
pub use object::ObjectBinding;
pub use scalar::{Scalar, ScalarBinding};
pub use set::SetBinding;
pub use tuple::TupleBinding;

use jsonbind_core::{downcast, BindError, Bindable, DomainType, DomainValue, TypeInfo, TypeKey};
use std::borrow::Cow;

/// View `value` as the binding's domain type
///
/// Descendants declared with `extends_via` are converted up to `T`.
pub(crate) fn expect_type<'a, T: DomainType>(
    value: &'a dyn Bindable,
    binding: &str,
) -> Result<Cow<'a, T>, BindError> {
    if let Some(exact) = value.downcast_ref::<T>() {
        return Ok(Cow::Borrowed(exact));
    }
    value
        .runtime_type()
        .upcast(value, TypeKey::of::<T>())
        .and_then(|up| downcast::<T>(up).ok())
        .map(Cow::Owned)
        .ok_or_else(|| BindError::schema(binding, format!("cannot encode a {}", value.type_key())))
}

/// Turn a decoded `T` into an instance of `target`
///
/// `target` is `T` or a descendant built through its `extends_via`
/// conversion.
pub(crate) fn build_target<T: DomainType>(
    decoded: T,
    target: &TypeInfo,
) -> Result<DomainValue, BindError> {
    let from = TypeKey::of::<T>();
    if target.key() == from {
        return Ok(Box::new(decoded));
    }
    target.build_from(Box::new(decoded), from).ok_or_else(|| {
        BindError::schema(
            from.name(),
            format!("cannot build a {} from a {}", target.key(), from),
        )
    })
}

/// Error for a target type whose kind the binding cannot build
pub(crate) fn wrong_kind(binding: &str, target: &TypeInfo) -> BindError {
    BindError::schema(
        binding,
        format!("{} is a {} type", target.key(), target.kind().label()),
    )
}
