//! Record types
//!
//! A record is a host type with named members. Its schema is the member
//! names and declared types of its default instance. Decoding is two-phase:
//! a binding first decodes each member into a [`Members`] store, then
//! [`Record::from_members`] builds the value. Members absent from the input
//! keep their default.
//!
//! Member names starting with [`RESERVED_PREFIX`] are private and never
//! cross the wire.
//!
//! Use [`bind_record!`](crate::bind_record) to implement [`Record`] for a
//! plain struct. [`Object`] is the dynamic record that accepts any key.

use crate::dict::Dict;
use crate::error::{BindError, Result};
use crate::map::OrderedMap;
use crate::types::{downcast, Bindable, DomainType, DomainValue, TypeInfo, TypeKey};

/// Prefix of member names that are skipped on encode
pub const RESERVED_PREFIX: &str = "_";

/// Check if a member name is reserved
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// A declared record member
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    type_info: TypeInfo,
}

impl Field {
    /// Declare a member
    pub fn new(name: &'static str, type_info: TypeInfo) -> Self {
        Field { name, type_info }
    }

    /// Member name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

/// A host type with named, typed members
pub trait Record: DomainType + Default {
    /// Declared members, in encode order
    fn fields() -> Vec<Field>;

    /// Current member values, in encode order
    fn members(&self) -> Vec<(&str, &dyn Bindable)>;

    /// Build a value from decoded members
    ///
    /// Members not present in the store keep their default value. Members
    /// left in the store afterwards were not consumed.
    fn from_members(members: &mut Members) -> Result<Self>;
}

/// Record hooks stored in a [`TypeInfo`]
#[derive(Clone, Copy)]
pub struct RecordHooks {
    /// Declared members
    pub fields: fn() -> Vec<Field>,
    /// Member values of an instance, `None` when the value is not this type
    pub members: fn(&dyn Bindable) -> Option<Vec<(&str, &dyn Bindable)>>,
    /// Build an instance from decoded members
    pub build: fn(&mut Members) -> Result<DomainValue>,
    /// Whether undeclared keys are kept on the built value
    pub open: bool,
}

impl RecordHooks {
    /// Hooks for a record type
    pub fn of<T: Record>() -> Self {
        RecordHooks {
            fields: T::fields,
            members: members_of::<T>,
            build: build_record::<T>,
            open: TypeKey::of::<T>() == TypeKey::of::<Object>(),
        }
    }
}

fn members_of<T: Record>(value: &dyn Bindable) -> Option<Vec<(&str, &dyn Bindable)>> {
    value.downcast_ref::<T>().map(T::members)
}

fn build_record<T: Record>(members: &mut Members) -> Result<DomainValue> {
    T::from_members(members).map(|v| Box::new(v) as DomainValue)
}

/// Decoded members waiting to be assembled into a record
#[derive(Debug)]
pub struct Members {
    type_name: String,
    values: OrderedMap<DomainValue>,
    extras: OrderedMap<DomainValue>,
}

impl Members {
    /// Create an empty store for `type_name`
    pub fn new(type_name: impl Into<String>) -> Self {
        Members {
            type_name: type_name.into(),
            values: OrderedMap::new(),
            extras: OrderedMap::new(),
        }
    }

    /// Name of the record being built
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Store a declared member
    pub fn insert(&mut self, name: impl Into<String>, value: DomainValue) {
        self.values.insert(name, value);
    }

    /// Store a key the record does not declare
    pub fn insert_extra(&mut self, name: impl Into<String>, value: DomainValue) {
        self.extras.insert(name, value);
    }

    /// Check if a declared member was decoded
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Take a decoded member as `T`
    ///
    /// Returns `Ok(None)` when the member was absent from the input.
    pub fn take<T: DomainType>(&mut self, name: &str) -> Result<Option<T>> {
        match self.values.remove(name) {
            Some(value) => downcast::<T>(value).map(Some).map_err(|_| {
                BindError::schema(
                    self.type_name.clone(),
                    format!("member {name} is not a {}", TypeKey::of::<T>()),
                )
            }),
            None => Ok(None),
        }
    }

    /// Take a decoded member, falling back to `default` when absent
    pub fn take_or<T: DomainType>(&mut self, name: &str, default: T) -> Result<T> {
        Ok(self.take(name)?.unwrap_or(default))
    }

    /// Take every declared member still in the store
    pub fn take_values(&mut self) -> OrderedMap<DomainValue> {
        std::mem::take(&mut self.values)
    }

    /// Take the undeclared keys
    pub fn take_extras(&mut self) -> OrderedMap<DomainValue> {
        std::mem::take(&mut self.extras)
    }

    /// Check if undeclared keys remain
    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }

    /// Names of undeclared keys still in the store
    pub fn extra_names(&self) -> Vec<String> {
        self.extras.keys().map(str::to_string).collect()
    }
}

/// Implement [`Record`] and [`DomainType`] for a struct
///
/// Each listed field must implement [`DomainType`] and the struct must
/// implement `Default`, `Clone`, `PartialEq` and `Debug`. Unlisted fields
/// are neither encoded nor decoded and keep their default on decode.
///
/// ```
/// use jsonbind_core::bind_record;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// bind_record!(Point { x: i64, y: i64 });
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Point3 {
///     x: i64,
///     y: i64,
///     z: i64,
/// }
///
/// bind_record!(Point3: Point { x: i64, y: i64, z: i64 });
/// ```
#[macro_export]
macro_rules! bind_record {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::bind_record!(@record $ty, $crate::TypeInfo::record::<$ty>(), { $($field : $fty),* });
    };
    ($ty:ident : $parent:ty { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::bind_record!(
            @record $ty,
            $crate::TypeInfo::record::<$ty>()
                .extends(&<$parent as $crate::DomainType>::type_info()),
            { $($field : $fty),* }
        );
    };
    (@record $ty:ident, $info:expr, { $($field:ident : $fty:ty),* }) => {
        impl $crate::DomainType for $ty {
            fn type_info() -> $crate::TypeInfo {
                $info
            }
        }

        impl $crate::Record for $ty {
            fn fields() -> ::std::vec::Vec<$crate::Field> {
                ::std::vec![
                    $($crate::Field::new(
                        ::std::stringify!($field),
                        <$fty as $crate::DomainType>::type_info(),
                    )),*
                ]
            }

            fn members(&self) -> ::std::vec::Vec<(&str, &dyn $crate::Bindable)> {
                ::std::vec![
                    $((::std::stringify!($field), &self.$field as &dyn $crate::Bindable)),*
                ]
            }

            #[allow(clippy::needless_update, unused_variables, unused_mut)]
            fn from_members(members: &mut $crate::Members) -> $crate::Result<Self> {
                let base = <Self as ::std::default::Default>::default();
                ::std::result::Result::Ok(Self {
                    $($field: members.take_or::<$fty>(::std::stringify!($field), base.$field)?,)*
                    ..base
                })
            }
        }
    };
}

/// Dynamic record holding any set of named members
///
/// Keys beyond any declared schema are kept on decode, so an `Object`
/// round-trips arbitrary JSON objects. Nested objects can be addressed with
/// dotted paths (`"g.x"`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: OrderedMap<DomainValue>,
}

impl Object {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Object::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Bindable) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a top-level member
    pub fn insert(&mut self, name: impl Into<String>, value: impl Bindable) {
        self.entries.insert(name, Box::new(value) as DomainValue);
    }

    /// Set a top-level member from an erased value
    pub fn insert_boxed(&mut self, name: impl Into<String>, value: DomainValue) {
        self.entries.insert(name, value);
    }

    /// Remove a top-level member
    pub fn remove(&mut self, name: &str) -> Option<DomainValue> {
        self.entries.remove(name)
    }

    /// Check if a top-level member is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of top-level members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no members
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate top-level members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Bindable)> {
        self.entries.iter().map(|(k, v)| (k, v.as_ref()))
    }

    /// Look up a member by dotted path
    ///
    /// Intermediate segments must name an [`Object`] or a [`Dict`].
    pub fn get(&self, path: &str) -> Option<&dyn Bindable> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current: &dyn Bindable = self.entries.get(first)?.as_ref();
        for segment in segments {
            current = child(current, segment)?;
        }
        Some(current)
    }

    /// Look up a member by dotted path as a concrete type
    pub fn get_as<T: DomainType>(&self, path: &str) -> Option<&T> {
        self.get(path)?.downcast_ref::<T>()
    }

    /// Set a member by dotted path, creating intermediate objects
    ///
    /// Fails when an intermediate segment names a value that is neither an
    /// [`Object`] nor a [`Dict`].
    pub fn set(&mut self, path: &str, value: impl Bindable) -> Result<()> {
        self.set_boxed(path, Box::new(value))
    }

    /// Set a member by dotted path from an erased value
    pub fn set_boxed(&mut self, path: &str, value: DomainValue) -> Result<()> {
        match path.split_once('.') {
            None => {
                self.entries.insert(path, value);
                Ok(())
            }
            Some((head, rest)) => {
                if !self.entries.contains_key(head) {
                    self.entries.insert(head, Box::new(Object::new()) as DomainValue);
                }
                let slot = self
                    .entries
                    .get_mut(head)
                    .ok_or_else(|| BindError::schema("Object", format!("no member {head}")))?;
                let any = slot.as_mut() as &mut dyn Bindable;
                set_child(any, head, rest, value)
            }
        }
    }

    /// All leaf values, flattened depth-first in member order
    pub fn values(&self) -> Vec<&dyn Bindable> {
        let mut out = Vec::new();
        for (_, value) in self.entries.iter() {
            flatten_values(value.as_ref(), &mut out);
        }
        out
    }

    /// Dotted paths of all leaf values, parallel to [`Object::values`]
    pub fn columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (name, value) in self.entries.iter() {
            flatten_columns(name.to_string(), value.as_ref(), &mut out);
        }
        out
    }

    /// Leaf values that are numbers, as `f64`
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values().into_iter().filter_map(as_number).collect()
    }

    /// Dotted paths of numeric leaf values
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns()
            .into_iter()
            .zip(self.values())
            .filter(|(_, v)| as_number(*v).is_some())
            .map(|(c, _)| c)
            .collect()
    }

    /// Assign leaf values in [`Object::columns`] order
    ///
    /// Fails without modifying anything when the count differs.
    pub fn set_values(&mut self, values: Vec<DomainValue>) -> Result<()> {
        let columns = self.columns();
        if columns.len() != values.len() {
            return Err(BindError::schema(
                "Object",
                format!("expected {} values, got {}", columns.len(), values.len()),
            ));
        }
        for (column, value) in columns.iter().zip(values) {
            self.set_boxed(column, value)?;
        }
        Ok(())
    }

    /// Build a record from the top-level members with matching names
    ///
    /// Members the record does not declare are offered as extras and
    /// dropped when the record does not keep them.
    pub fn convert_to<T: Record>(&self) -> Result<T> {
        let declared: Vec<&'static str> = T::fields().iter().map(Field::name).collect();
        let mut members = Members::new(TypeKey::of::<T>().name());
        for (name, value) in self.entries.iter() {
            if declared.iter().any(|d| *d == name) {
                members.insert(name, value.clone());
            } else {
                members.insert_extra(name, value.clone());
            }
        }
        T::from_members(&mut members)
    }
}

fn child<'a>(parent: &'a dyn Bindable, name: &str) -> Option<&'a dyn Bindable> {
    if let Some(object) = parent.downcast_ref::<Object>() {
        object.entries.get(name).map(|v| v.as_ref())
    } else if let Some(dict) = parent.downcast_ref::<Dict>() {
        dict.get(name)
    } else {
        None
    }
}

fn set_child(
    parent: &mut dyn Bindable,
    head: &str,
    rest: &str,
    value: DomainValue,
) -> Result<()> {
    let any = parent.as_any_mut();
    if let Some(object) = any.downcast_mut::<Object>() {
        object.set_boxed(rest, value)
    } else if let Some(dict) = any.downcast_mut::<Dict>() {
        dict.set_path(rest, value)
    } else {
        Err(BindError::schema(
            "Object",
            format!("member {head} cannot hold nested members"),
        ))
    }
}

fn flatten_values<'a>(value: &'a dyn Bindable, out: &mut Vec<&'a dyn Bindable>) {
    if let Some(object) = value.downcast_ref::<Object>() {
        for (_, v) in object.entries.iter() {
            flatten_values(v.as_ref(), out);
        }
    } else {
        out.push(value);
    }
}

fn flatten_columns(prefix: String, value: &dyn Bindable, out: &mut Vec<String>) {
    if let Some(object) = value.downcast_ref::<Object>() {
        for (name, v) in object.entries.iter() {
            flatten_columns(format!("{prefix}.{name}"), v.as_ref(), out);
        }
    } else {
        out.push(prefix);
    }
}

fn as_number(value: &dyn Bindable) -> Option<f64> {
    if let Some(i) = value.downcast_ref::<i64>() {
        Some(*i as f64)
    } else {
        value.downcast_ref::<f64>().copied()
    }
}

impl DomainType for Object {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>()
    }
}

impl Record for Object {
    fn fields() -> Vec<Field> {
        Vec::new()
    }

    fn members(&self) -> Vec<(&str, &dyn Bindable)> {
        self.iter().collect()
    }

    fn from_members(members: &mut Members) -> Result<Self> {
        let mut object = Object::new();
        for (name, value) in members.take_values() {
            object.entries.insert(name, value);
        }
        for (name, value) in members.take_extras() {
            object.entries.insert(name, value);
        }
        Ok(object)
    }
}
