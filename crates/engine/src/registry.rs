//! Binding registry with ancestor resolution
//!
//! The registry owns an ordered list of bindings, at most one per exact
//! domain type, and a memo cache from requested type to resolved binding.
//!
//! ## Snapshot Model
//!
//! The list and its cache live together in an immutable [`Table`] behind
//! an `Arc`. `register` builds a new table and swaps it in under the write
//! lock, so replacing a binding and invalidating the cache is one atomic
//! step. `resolve` clones the current `Arc` and populates that table's
//! cache; a resolution racing with `register` can only fill a cache that
//! is already unreachable.
//!
//! ## Resolution Order
//!
//! For a requested type `T` the chain `T, ancestors(T)...` is walked
//! most-derived first. The first chain entry with an exact binding wins.
//! The result is cached under `T`, not under the ancestor that matched.

use crate::binding::Binding;
use jsonbind_core::{BindError, Result, TypeInfo, TypeKey};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// One immutable generation of the registry
struct Table {
    bindings: Vec<Arc<dyn Binding>>,
    cache: RwLock<FxHashMap<TypeKey, Arc<dyn Binding>>>,
}

impl Table {
    fn new(bindings: Vec<Arc<dyn Binding>>) -> Self {
        Table {
            bindings,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    fn exact(&self, key: TypeKey) -> Option<&Arc<dyn Binding>> {
        self.bindings.iter().find(|b| b.domain_type() == key)
    }
}

/// Process-wide table of bindings
pub struct Registry {
    table: RwLock<Arc<Table>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Registry {
            table: RwLock::new(Arc::new(Table::new(Vec::new()))),
        }
    }

    fn snapshot(&self) -> Arc<Table> {
        Arc::clone(&self.table.read())
    }

    /// Register a binding, replacing any binding for the same exact type
    ///
    /// Clears the resolution cache.
    pub fn register(&self, binding: Arc<dyn Binding>) {
        let key = binding.domain_type();
        let mut guard = self.table.write();

        let mut bindings: Vec<Arc<dyn Binding>> = guard
            .bindings
            .iter()
            .filter(|b| b.domain_type() != key)
            .cloned()
            .collect();
        let replaced = bindings.len() != guard.bindings.len();
        bindings.push(Arc::clone(&binding));
        *guard = Arc::new(Table::new(bindings));

        if replaced {
            debug!(domain_type = %key, binding = binding.name(), "Replaced binding");
        } else {
            debug!(domain_type = %key, binding = binding.name(), "Registered binding");
        }
    }

    /// Resolve the binding for a type, walking its ancestor chain
    pub fn resolve(&self, info: &TypeInfo) -> Result<Arc<dyn Binding>> {
        let table = self.snapshot();
        let key = info.key();

        if let Some(binding) = table.cache.read().get(&key) {
            return Ok(Arc::clone(binding));
        }

        trace!(domain_type = %key, "Resolution cache miss");
        for ancestor in info.chain() {
            if let Some(binding) = table.exact(ancestor) {
                if ancestor != key {
                    trace!(domain_type = %key, via = %ancestor, "Resolved through ancestor");
                }
                table.cache.write().insert(key, Arc::clone(binding));
                return Ok(Arc::clone(binding));
            }
        }

        Err(BindError::UnboundType {
            type_name: key.name(),
        })
    }

    /// Check if `resolve` would succeed
    pub fn is_bound(&self, info: &TypeInfo) -> bool {
        self.resolve(info).is_ok()
    }

    /// Types with an exact registered binding
    pub fn bound_domain_types(&self) -> FxHashSet<TypeKey> {
        self.snapshot()
            .bindings
            .iter()
            .map(|b| b.domain_type())
            .collect()
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.snapshot().bindings.len()
    }

    /// Check if no binding is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of memoized resolutions in the current generation
    pub fn cached_len(&self) -> usize {
        self.snapshot().cache.read().len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.snapshot();
        let cached = table.cache.read().len();
        f.debug_struct("Registry")
            .field("bindings", &table.bindings.len())
            .field("cached", &cached)
            .finish()
    }
}
