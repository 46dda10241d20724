//! Convenient imports for jsonbind.
//!
//! ```
//! use jsonbind::prelude::*;
//!
//! let list: TypedList<i64> = jsonbind::deserialize_as("[1,2,3]").unwrap();
//! assert_eq!(list.len(), 3);
//! ```

// Declaration macros
pub use jsonbind_core::{bind_enum, bind_record};

// Domain side
pub use jsonbind_core::{
    Bindable, Dict, DomainType, DomainValue, Enumeration, List, Object, Record, TypeInfo,
    TypedList,
};

// Primitive side
pub use jsonbind_core::{Shape, Value};

// Error handling
pub use jsonbind_core::{BindError, Result};

// Engine
pub use jsonbind_engine::{Binding, ClassBinding, Engine, EngineBuilder, FnBinding, UnmatchedKeys};
