//! Enumerations
//!
//! An enumeration is a closed set of named members, each carrying a
//! primitive value. It can be bound by member name or by member value;
//! the engine provides both bindings.

use crate::types::{Bindable, DomainType, DomainValue};
use crate::value::Value;

/// A closed set of named members with primitive values
pub trait Enumeration: DomainType {
    /// Every member, in declaration order
    fn members() -> Vec<Self>;

    /// Member name
    fn name(&self) -> &'static str;

    /// Member value
    fn value(&self) -> Value;
}

/// A member seen through type erasure
#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Member name
    pub name: &'static str,
    /// Member value
    pub value: Value,
    /// The member itself
    pub instance: DomainValue,
}

/// Enumeration hooks stored in a [`TypeInfo`](crate::TypeInfo)
#[derive(Clone, Copy)]
pub struct EnumHooks {
    /// Every member, in declaration order
    pub members: fn() -> Vec<EnumMember>,
    /// Name of a member, `None` when the value is not this type
    pub name_of: fn(&dyn Bindable) -> Option<&'static str>,
}

impl EnumHooks {
    /// Hooks for an enumeration type
    pub fn of<T: Enumeration>() -> Self {
        EnumHooks {
            members: erased_members::<T>,
            name_of: name_of::<T>,
        }
    }
}

fn erased_members<T: Enumeration>() -> Vec<EnumMember> {
    T::members()
        .into_iter()
        .map(|m| EnumMember {
            name: m.name(),
            value: m.value(),
            instance: Box::new(m),
        })
        .collect()
}

fn name_of<T: Enumeration>(value: &dyn Bindable) -> Option<&'static str> {
    value.downcast_ref::<T>().map(T::name)
}

/// Declare a unit enum and implement [`Enumeration`] for it
///
/// The enum derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and
/// `Hash`; do not derive those again.
///
/// ```
/// use jsonbind_core::bind_enum;
///
/// bind_enum! {
///     pub enum Color {
///         Red => 1,
///         Green => 2,
///     }
/// }
/// ```
#[macro_export]
macro_rules! bind_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::DomainType for $name {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::enumeration::<Self>()
            }
        }

        impl $crate::Enumeration for $name {
            fn members() -> ::std::vec::Vec<Self> {
                ::std::vec![$($name::$variant),+]
            }

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => ::std::stringify!($variant)),+
                }
            }

            fn value(&self) -> $crate::Value {
                match self {
                    $($name::$variant => $crate::Value::from($value)),+
                }
            }
        }
    };
}
