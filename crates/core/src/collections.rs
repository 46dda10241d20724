//! Tuples and sets
//!
//! Tuples of arity 1 through 6 whose elements are all domain types are
//! domain types descending from [`AnyTuple`]. `BTreeSet<T>` and
//! `HashSet<T>` descend from [`AnySet`]. Both travel as JSON arrays.

use crate::error::{BindError, Result};
use crate::types::{
    downcast, AnySet, AnyTuple, Bindable, DomainType, DomainValue, TypeInfo, TypeKey, TypeKind,
};
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// Fixed-arity sequence of domain values
pub trait TupleElements: DomainType {
    /// Declared element types, in position order
    fn element_types() -> Vec<TypeInfo>;

    /// Borrow elements in position order
    fn elements(&self) -> Vec<&dyn Bindable>;

    /// Build from exactly `element_types().len()` values
    fn from_elements(elements: Vec<DomainValue>) -> Result<Self>;
}

/// Tuple hooks stored in a [`TypeInfo`]
#[derive(Clone, Copy)]
pub struct TupleHooks {
    /// Declared element types
    pub elements: fn() -> Vec<TypeInfo>,
    /// Elements of an instance, `None` when the value is not this type
    pub items: fn(&dyn Bindable) -> Option<Vec<&dyn Bindable>>,
    /// Build an instance from decoded elements
    pub build: fn(Vec<DomainValue>) -> Result<DomainValue>,
}

impl TupleHooks {
    /// Hooks for a tuple type
    pub fn of<T: TupleElements>() -> Self {
        TupleHooks {
            elements: T::element_types,
            items: tuple_items::<T>,
            build: build_tuple::<T>,
        }
    }
}

fn tuple_items<T: TupleElements>(value: &dyn Bindable) -> Option<Vec<&dyn Bindable>> {
    value.downcast_ref::<T>().map(T::elements)
}

fn build_tuple<T: TupleElements>(elements: Vec<DomainValue>) -> Result<DomainValue> {
    T::from_elements(elements).map(|t| Box::new(t) as DomainValue)
}

fn next_element<T: DomainType>(
    iter: &mut impl Iterator<Item = DomainValue>,
    tuple: &str,
) -> Result<T> {
    let value = iter
        .next()
        .ok_or_else(|| BindError::schema(tuple, "too few elements"))?;
    downcast::<T>(value)
}

macro_rules! tuple_domain_types {
    ($(($($name:ident . $idx:tt),+))+) => {
        $(
            impl<$($name: DomainType),+> TupleElements for ($($name,)+) {
                fn element_types() -> Vec<TypeInfo> {
                    vec![$($name::type_info()),+]
                }

                fn elements(&self) -> Vec<&dyn Bindable> {
                    vec![$(&self.$idx as &dyn Bindable),+]
                }

                fn from_elements(elements: Vec<DomainValue>) -> Result<Self> {
                    let tuple = TypeKey::of::<Self>().name();
                    let expected = [$(stringify!($idx)),+].len();
                    if elements.len() != expected {
                        return Err(BindError::schema(
                            tuple,
                            format!("expected {expected} elements, got {}", elements.len()),
                        ));
                    }
                    let mut iter = elements.into_iter();
                    Ok(($(next_element::<$name>(&mut iter, &tuple)?,)+))
                }
            }

            impl<$($name: DomainType),+> DomainType for ($($name,)+) {
                fn type_info() -> TypeInfo {
                    TypeInfo::new(TypeKey::of::<Self>(), TypeKind::Tuple(TupleHooks::of::<Self>()))
                        .with_ancestor(TypeKey::of::<AnyTuple>())
                }
            }
        )+
    };
}

tuple_domain_types! {
    (A.0)
    (A.0, B.1)
    (A.0, B.1, C.2)
    (A.0, B.1, C.2, D.3)
    (A.0, B.1, C.2, D.3, E.4)
    (A.0, B.1, C.2, D.3, E.4, F.5)
}

/// Set hooks stored in a [`TypeInfo`]
#[derive(Clone, Copy)]
pub struct SetHooks {
    /// Declared element type
    pub element: fn() -> TypeInfo,
    /// Elements of an instance, `None` when the value is not this type
    pub items: fn(&dyn Bindable) -> Option<Vec<&dyn Bindable>>,
    /// Build an instance from decoded elements; duplicates collapse
    pub build: fn(Vec<DomainValue>) -> Result<DomainValue>,
}

fn set_element<T: DomainType>() -> TypeInfo {
    T::type_info()
}

fn btree_items<T: DomainType + Ord>(value: &dyn Bindable) -> Option<Vec<&dyn Bindable>> {
    value
        .downcast_ref::<BTreeSet<T>>()
        .map(|set| set.iter().map(|v| v as &dyn Bindable).collect())
}

fn build_btree<T: DomainType + Ord>(elements: Vec<DomainValue>) -> Result<DomainValue> {
    let set = elements
        .into_iter()
        .map(downcast::<T>)
        .collect::<Result<BTreeSet<T>>>()?;
    Ok(Box::new(set))
}

fn hash_items<T: DomainType + Eq + Hash>(value: &dyn Bindable) -> Option<Vec<&dyn Bindable>> {
    value
        .downcast_ref::<HashSet<T>>()
        .map(|set| set.iter().map(|v| v as &dyn Bindable).collect())
}

fn build_hash<T: DomainType + Eq + Hash>(elements: Vec<DomainValue>) -> Result<DomainValue> {
    let set = elements
        .into_iter()
        .map(downcast::<T>)
        .collect::<Result<HashSet<T>>>()?;
    Ok(Box::new(set))
}

impl<T: DomainType + Ord> DomainType for BTreeSet<T> {
    fn type_info() -> TypeInfo {
        let hooks = SetHooks {
            element: set_element::<T>,
            items: btree_items::<T>,
            build: build_btree::<T>,
        };
        TypeInfo::new(TypeKey::of::<Self>(), TypeKind::Set(hooks))
            .with_ancestor(TypeKey::of::<AnySet>())
    }
}

impl<T: DomainType + Eq + Hash> DomainType for HashSet<T> {
    fn type_info() -> TypeInfo {
        let hooks = SetHooks {
            element: set_element::<T>,
            items: hash_items::<T>,
            build: build_hash::<T>,
        };
        TypeInfo::new(TypeKey::of::<Self>(), TypeKind::Set(hooks))
            .with_ancestor(TypeKey::of::<AnySet>())
    }
}
