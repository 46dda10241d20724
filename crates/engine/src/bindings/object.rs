//! Generic record binding
//!
//! Registered for [`AnyRecord`], so every record type resolves to it
//! unless a more specific binding is registered.
//!
//! ## Encode
//!
//! Members are written in declaration order. Reserved members (leading
//! underscore) are skipped.
//!
//! ## Decode
//!
//! Starting from an empty [`Members`] store:
//!
//! 1. Keys the record declares decode against the declared member type.
//! 2. Other keys, and every reserved key, follow [`UnmatchedKeys`]:
//!    `Reject` fails, `Attach` decodes through the default mapping and
//!    stores the value as an extra. Open records attach regardless.
//! 3. The record is built; members absent from the input keep their
//!    default. Extras the record did not consume are dropped with a
//!    warning.

use super::wrong_kind;
use crate::binding::Binding;
use crate::config::UnmatchedKeys;
use crate::engine::Engine;
use jsonbind_core::{
    is_reserved, AnyRecord, BindError, Bindable, DomainValue, Members, Result, Shape, TypeInfo,
    TypeKey, TypeKind, Value, ValueMap,
};
use tracing::warn;

/// Binding for every record type
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectBinding {
    unmatched_keys: UnmatchedKeys,
}

impl ObjectBinding {
    /// Create the binding with the given policy for undeclared keys
    pub fn new(unmatched_keys: UnmatchedKeys) -> Self {
        ObjectBinding { unmatched_keys }
    }

    /// Policy for undeclared keys
    pub fn unmatched_keys(&self) -> UnmatchedKeys {
        self.unmatched_keys
    }
}

impl Binding for ObjectBinding {
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<AnyRecord>()
    }

    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
        let runtime = value.runtime_type();
        let members = match runtime.kind() {
            TypeKind::Record(hooks) => (hooks.members)(value),
            _ => None,
        }
        .ok_or_else(|| wrong_kind("Object", &runtime))?;

        let mut map = ValueMap::with_capacity(members.len());
        for (name, member) in members {
            if is_reserved(name) {
                continue;
            }
            map.insert(name, engine.encode(member)?);
        }
        Ok(Value::Map(map))
    }

    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue> {
        let TypeKind::Record(hooks) = target.kind() else {
            return Err(wrong_kind("Object", target));
        };
        let map = value.as_map().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::Map,
            actual: value.shape(),
        })?;

        let type_name = target.name();
        let fields = (hooks.fields)();
        let mut members = Members::new(type_name.clone());
        let mut dropped = Vec::new();
        for (key, item) in map.iter() {
            let declared = fields
                .iter()
                .find(|f| f.name() == key && !is_reserved(key));
            match declared {
                Some(field) => members.insert(key, engine.decode(item, field.type_info())?),
                None if hooks.open => members.insert_extra(key, engine.decode_default(item)?),
                // A closed record cannot hold it, so it is never decoded
                None if self.unmatched_keys == UnmatchedKeys::Attach => dropped.push(key.to_string()),
                None => {
                    return Err(BindError::schema(
                        type_name,
                        format!("unexpected key {key:?}"),
                    ))
                }
            }
        }

        let record = (hooks.build)(&mut members)?;
        dropped.extend(members.extra_names());
        if !dropped.is_empty() {
            warn!(
                record = %type_name,
                keys = ?dropped,
                "Dropped keys the record does not declare"
            );
        }
        Ok(record)
    }
}
