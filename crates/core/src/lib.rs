//! Core types for jsonbind
//!
//! This crate defines both sides of a binding:
//!
//! - the primitive side: [`Shape`] and the [`Value`] tree every JSON text
//!   parses into
//! - the domain side: [`DomainType`] descriptors, the type-erased
//!   [`Bindable`] view, and the built-in composite types ([`List`],
//!   [`TypedList`], [`Dict`], [`Object`], tuples, sets and enumerations)
//!
//! Bindings that convert between the two live in `jsonbind-engine`.
//!
//! ## Declaring Domain Types
//!
//! ```
//! use jsonbind_core::{bind_enum, bind_record, Record};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! bind_record!(Point { x: i64, y: i64 });
//!
//! bind_enum! {
//!     pub enum Axis {
//!         X => "x",
//!         Y => "y",
//!     }
//! }
//!
//! assert_eq!(Point::fields().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collections;
pub mod dict;
pub mod enumeration;
pub mod error;
pub mod list;
pub mod map;
pub mod record;
pub mod shape;
pub mod types;
pub mod value;

pub use collections::{SetHooks, TupleElements, TupleHooks};
pub use dict::Dict;
pub use enumeration::{EnumHooks, EnumMember, Enumeration};
pub use error::{BindError, Result};
pub use list::{List, ListHooks, NotFoundBehavior, SearchType, SortOrder, TypedList};
pub use map::OrderedMap;
pub use record::{is_reserved, Field, Members, Object, Record, RecordHooks, RESERVED_PREFIX};
pub use shape::Shape;
pub use types::{
    downcast, AnyEnum, AnyRecord, AnySet, AnyTuple, Bindable, DomainType, DomainValue, TypeInfo,
    TypeKey, TypeKind,
};
pub use value::{Value, ValueMap};
