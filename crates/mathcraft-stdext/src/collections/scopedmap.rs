//! Associative containers with nested scopes and local/global insertion.
//!
//! This module provides [ScopedMap], a map in which a stack of scopes sits
//! on top of a base table.
//! A new scope is opened with [begin_scope](ScopedMap::begin_scope) and
//! closed with [end_scope](ScopedMap::end_scope).
//! Lookups see the value from the innermost scope that has one,
//! falling back to the base table.
//! When a scope ends, every value written in it disappears and the values it
//! shadowed become visible again.
//!
//! Insertions carry a [Scope] argument.
//! A [local](Scope::Local) insertion writes the innermost scope only.
//! A [global](Scope::Global) insertion walks the entire chain of scopes down
//! to the base table and overwrites the key everywhere, so the value
//! survives the end of every currently open scope.
//!
//! # Examples
//!
//! ```
//! # use mathcraft_stdext::collections::scopedmap::{ScopedMap, Scope};
//! let mut colors = ScopedMap::default();
//! colors.insert("mint", "ginger", Scope::Local);
//! assert_eq!(colors.get(&"mint"), Some(&"ginger"));
//!
//! // A value written inside a scope shadows the outer value and is
//! // discarded when the scope ends.
//! colors.begin_scope();
//! colors.insert("mint", "gray", Scope::Local);
//! assert_eq!(colors.get(&"mint"), Some(&"gray"));
//! assert_eq!(colors.end_scope(), Ok(()));
//! assert_eq!(colors.get(&"mint"), Some(&"ginger"));
//! ```
//!
//! A global insertion inside a scope persists after the scope ends:
//!
//! ```
//! # use mathcraft_stdext::collections::scopedmap::{ScopedMap, Scope};
//! let mut colors = ScopedMap::default();
//! colors.insert("paganini", "black", Scope::Local);
//! colors.begin_scope();
//! colors.insert("paganini", "gray", Scope::Global);
//! assert_eq!(colors.end_scope(), Ok(()));
//! assert_eq!(colors.get(&"paganini"), Some(&"gray"));
//! ```
//!
//! Ending the base table is an error:
//!
//! ```
//! # use mathcraft_stdext::collections::scopedmap::{ScopedMap, NoScopeToEndError};
//! let mut map = ScopedMap::<&str, usize>::default();
//! assert_eq!(map.end_scope(), Err(NoScopeToEndError{}));
//! ```

use std::collections::HashMap;
use std::hash::Hash;

/// A map with nested scopes and local/global insertion semantics.
///
/// See the module documentation for more information.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound(
        serialize = "K: Eq + Hash + serde::Serialize, V: serde::Serialize",
        deserialize = "K: Eq + Hash + serde::Deserialize<'de>, V: serde::Deserialize<'de>"
    ))
)]
pub struct ScopedMap<K, V> {
    base: HashMap<K, V>,
    layers: Vec<HashMap<K, V>>,
}

/// Determines which scope an insertion writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// The value is visible until the current scope ends.
    Local,
    /// The value overwrites the key in every open scope and in the base
    /// table, and so persists beyond the end of every current scope.
    Global,
}

/// Error returned if there is no scope to end when [ScopedMap::end_scope] is invoked.
#[derive(Debug, PartialEq, Eq)]
pub struct NoScopeToEndError;

impl<K: Eq + Hash + Clone, V> ScopedMap<K, V> {
    /// Inserts the key, value pair in the provided scope.
    pub fn insert(&mut self, key: K, val: V, scope: Scope) {
        match scope {
            Scope::Local => match self.layers.last_mut() {
                Some(layer) => {
                    layer.insert(key, val);
                }
                None => {
                    self.base.insert(key, val);
                }
            },
            Scope::Global => {
                for layer in &mut self.layers {
                    layer.remove(&key);
                }
                self.base.insert(key, val);
            }
        }
    }

    /// Retrieves the value at the provided key, from the innermost scope
    /// that contains one.
    pub fn get(&self, key: &K) -> Option<&V> {
        for layer in self.layers.iter().rev() {
            if let Some(val) = layer.get(key) {
                return Some(val);
            }
        }
        self.base.get(key)
    }

    /// Returns true if the key is visible in some scope.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the key from every scope.
    pub fn remove_all(&mut self, key: &K) {
        for layer in &mut self.layers {
            layer.remove(key);
        }
        self.base.remove(key);
    }

    /// Begins a new scope.
    pub fn begin_scope(&mut self) {
        // `HashMap::new()` does not allocate, so pushing a scope eagerly is
        // cheap even if nothing is ever written in it.
        self.layers.push(HashMap::new());
    }

    /// Attempts to end the current scope.
    /// Returns an error if only the base table remains.
    pub fn end_scope(&mut self) -> Result<(), NoScopeToEndError> {
        match self.layers.pop() {
            None => Err(NoScopeToEndError {}),
            Some(_) => Ok(()),
        }
    }

    /// Returns the number of open scopes, excluding the base table.
    pub fn num_scopes(&self) -> usize {
        self.layers.len()
    }

    /// Replaces the base table and discards every open scope.
    ///
    /// Used when re-bootstrapping a format, which wipes existing tables.
    pub fn reset(&mut self, base: HashMap<K, V>) {
        self.base = base;
        self.layers.clear();
    }

    /// Iterates over the base table only.
    ///
    /// Values shadowed by open scopes are returned as-is; this iterator is
    /// intended for snapshotting a map that has no open scopes.
    pub fn base_iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.base.iter()
    }
}

impl<K, V> Default for ScopedMap<K, V> {
    fn default() -> Self {
        Self {
            base: Default::default(),
            layers: Default::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for ScopedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            base: iter.into_iter().collect(),
            layers: Default::default(),
        }
    }
}
