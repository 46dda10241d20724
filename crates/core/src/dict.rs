//! Heterogeneous string-keyed dictionary
//!
//! `Dict` is the default domain type for JSON objects decoded without a
//! target. Values are arbitrary domain values; order is insertion order.

use crate::error::{BindError, Result};
use crate::map::OrderedMap;
use crate::record::Object;
use crate::types::{Bindable, DomainType, DomainValue, TypeInfo};

/// String-keyed map of domain values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
    entries: OrderedMap<DomainValue>,
}

impl Dict {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Dict::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Bindable) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one for that key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Bindable) -> Option<DomainValue> {
        self.entries.insert(key, Box::new(value))
    }

    /// Insert an erased value
    pub fn insert_boxed(&mut self, key: impl Into<String>, value: DomainValue) -> Option<DomainValue> {
        self.entries.insert(key, value)
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&dyn Bindable> {
        self.entries.get(key).map(|v| v.as_ref())
    }

    /// Get a value as a concrete type
    pub fn get_as<T: DomainType>(&self, key: &str) -> Option<&T> {
        self.get(key)?.downcast_ref::<T>()
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<DomainValue> {
        self.entries.remove(key)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Bindable)> {
        self.entries.iter().map(|(k, v)| (k, v.as_ref()))
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys()
    }

    pub(crate) fn set_path(&mut self, path: &str, value: DomainValue) -> Result<()> {
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
                    .ok_or_else(|| BindError::schema("Dict", format!("no entry {head}")))?;
                let any = slot.as_mut().as_any_mut();
                if let Some(object) = any.downcast_mut::<Object>() {
                    object.set_boxed(rest, value)
                } else if let Some(dict) = any.downcast_mut::<Dict>() {
                    dict.set_path(rest, value)
                } else {
                    Err(BindError::schema(
                        "Dict",
                        format!("entry {head} cannot hold nested entries"),
                    ))
                }
            }
        }
    }
}

impl FromIterator<(String, DomainValue)> for Dict {
    fn from_iter<I: IntoIterator<Item = (String, DomainValue)>>(iter: I) -> Self {
        Dict {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dict {
    type Item = (String, DomainValue);
    type IntoIter = indexmap::map::IntoIter<String, DomainValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl DomainType for Dict {
    fn type_info() -> TypeInfo {
        TypeInfo::opaque::<Self>()
    }
}
