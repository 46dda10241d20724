//! # jsonbind
//!
//! Extensible binding between native Rust values and JSON text.
//!
//! A *binding* pairs a domain type with one JSON shape and converts in
//! both directions. Bindings live in a registry; a type without its own
//! binding uses the binding of its nearest declared ancestor, so one
//! generic binding covers every record, tuple, set and enumeration.
//!
//! ## Quick Start
//!
//! ```
//! use jsonbind::prelude::*;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! bind_record!(Point { x: i64, y: i64 });
//!
//! let text = jsonbind::serialize(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(text, r#"{"x":1,"y":2}"#);
//!
//! let point: Point = jsonbind::deserialize_as(&text).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! ## Crates
//!
//! - [`jsonbind_core`]: values, shapes, type descriptors, domain types
//! - [`jsonbind_wire`]: JSON text parsing and rendering
//! - [`jsonbind_engine`]: bindings, registry and engine
//!
//! ## Entry Points
//!
//! - free functions ([`serialize`], [`deserialize`], [`register_binding`],
//!   ...) use the process-wide engine returned by [`global`]
//! - [`Engine`] and [`EngineBuilder`] give isolated engines

#![warn(missing_docs)]

mod global;

pub mod prelude;

pub use global::{
    deserialize, deserialize_as, global, is_bound, register_binding, serialize, set_default,
};

pub use jsonbind_core::{
    bind_enum, bind_record, downcast, is_reserved, AnyEnum, AnyRecord, AnySet, AnyTuple,
    BindError, Bindable, Dict, DomainType, DomainValue, EnumMember, Enumeration, Field, List,
    Members, NotFoundBehavior, Object, Record, Result, SearchType, Shape, SortOrder,
    TupleElements, TypeInfo, TypeKey, TypeKind, TypedList, Value, ValueMap,
};
pub use jsonbind_engine::{
    bindings, Binding, BytesBinding, ClassBinding, DateTimeBinding, DateTimeFormat, DictBinding,
    EnumNameBinding, EnumValueBinding, Engine, EngineBuilder, FnBinding, ListBinding,
    ObjectBinding, Registry, ScalarBinding, SetBinding, TupleBinding, UnmatchedKeys,
};
pub use jsonbind_wire::{parse, render};
