//! Binding registry and serialization engine for jsonbind
//!
//! This crate turns domain values into JSON text and back:
//!
//! - [`Binding`]: one conversion strategy between a domain type and a
//!   primitive shape
//! - [`Registry`]: the bindings in force, resolved along each type's
//!   ancestor chain with a memo cache
//! - [`Engine`]: the registry plus the default mapping used when no target
//!   type is given
//! - [`bindings`]: the standard bindings
//!
//! ## Example
//!
//! ```
//! use jsonbind_core::{bind_record, TypedList};
//! use jsonbind_engine::Engine;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! bind_record!(Point { x: i64, y: i64 });
//!
//! let engine = Engine::new();
//! let text = engine.serialize(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(text, r#"{"x":1,"y":2}"#);
//!
//! let point: Point = engine.deserialize_as(&text).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//!
//! let ints: TypedList<i64> = engine.deserialize_as("[1,2,3]").unwrap();
//! assert_eq!(ints.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod bindings;
pub mod config;
pub mod engine;
pub mod registry;

pub use binding::{decode_checked, encode_checked, Binding, FnBinding};
pub use bindings::{
    BytesBinding, ClassBinding, DateTimeBinding, DateTimeFormat, DictBinding, EnumNameBinding,
    EnumValueBinding, ListBinding, ObjectBinding, Scalar, ScalarBinding, SetBinding,
    TupleBinding,
};
pub use config::{EngineBuilder, UnmatchedKeys};
pub use engine::Engine;
pub use registry::Registry;
