//! String interning.
//!
//! A string interner stores each distinct string once and hands out small
//! integer keys for it.
//! Interned strings are cheap to copy and compare, which matters for
//! control sequence names that are compared on every lookup.
//! The cost is that an interned string is never deallocated.
//!
//! ```
//! # use mathcraft_stdext::collections::interner::Interner;
//! let mut interner: Interner = Default::default();
//! let hello_1 = interner.get_or_intern("hello");
//! let world_1 = interner.get_or_intern("world");
//! let hello_2 = interner.get_or_intern("hello");
//! assert_eq!(hello_1, hello_2);
//! assert_ne!(hello_1, world_1);
//!
//! assert_eq!(interner.resolve(hello_1), Some("hello"));
//! assert_eq!(interner.resolve(world_1), Some("world"));
//! ```
//!
//! All interned strings are appended to one shared [String] buffer, and a
//! vector records where each string ends in the buffer.
//! The key of a string is its position in that vector.
//! Deduplication uses a map from string hashes to the keys carrying that
//! hash; on a hash collision the candidate keys are resolved and compared
//! by value.

use std::collections::HashMap;
use std::hash;
use std::hash::BuildHasher;
use std::num;

/// Types implementing this trait can be used as keys in the [Interner].
pub trait Key: Copy {
    /// Try to create a key from the provided index.
    /// The first index passed to this method is 0, the second 1, and so on.
    fn try_from_usize(index: usize) -> Option<Self>;
    /// Convert the key back into its index.
    fn into_usize(self) -> usize;
}

impl Key for num::NonZeroU32 {
    fn try_from_usize(index: usize) -> Option<Self> {
        let index: u32 = index.try_into().ok()?;
        num::NonZeroU32::new(index + 1)
    }

    fn into_usize(self) -> usize {
        (self.get() - 1) as usize
    }
}

/// String interner.
///
/// See the module documentation for information about this data structure.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Interner<K = num::NonZeroU32> {
    buffer: String,
    ends: Vec<usize>,
    // The deduplication map is rebuilt on deserialization because the hash
    // builder of the deserialized interner is in general different.
    #[cfg_attr(feature = "serde", serde(skip))]
    dedup: HashMap<u64, Vec<K>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    hash_builder: hash::RandomState,
}

impl<K> Default for Interner<K> {
    fn default() -> Self {
        Self {
            buffer: Default::default(),
            ends: Default::default(),
            dedup: Default::default(),
            hash_builder: Default::default(),
        }
    }
}

impl<K: Key> Interner<K> {
    /// Intern the provided string and return its key.
    ///
    /// If the same string is interned twice, the same key is returned.
    pub fn get_or_intern(&mut self, s: &str) -> K {
        let hash = self.hash_builder.hash_one(s);
        if let Some(key) = self.get_hashed(s, hash) {
            return key;
        }
        let key = K::try_from_usize(self.ends.len()).unwrap();
        self.buffer.push_str(s);
        self.ends.push(self.buffer.len());
        self.dedup.entry(hash).or_default().push(key);
        key
    }

    /// Get the key for the provided string if it has already been interned.
    pub fn get(&self, s: &str) -> Option<K> {
        self.get_hashed(s, self.hash_builder.hash_one(s))
    }

    fn get_hashed(&self, s: &str, hash: u64) -> Option<K> {
        let candidates = self.dedup.get(&hash)?;
        candidates
            .iter()
            .find(|key| self.resolve(**key) == Some(s))
            .copied()
    }

    /// Return the interned string corresponding to the provided key.
    pub fn resolve(&self, key: K) -> Option<&str> {
        let i = key.into_usize();
        let end = *self.ends.get(i)?;
        let start = match i.checked_sub(1) {
            None => 0,
            Some(prev) => self.ends[prev],
        };
        Some(&self.buffer[start..end])
    }
}

#[cfg(feature = "serde")]
impl<'de, K: Key> serde::Deserialize<'de> for Interner<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Fields {
            buffer: String,
            ends: Vec<usize>,
        }
        let Fields { buffer, ends } = Fields::deserialize(deserializer)?;
        let hash_builder = hash::RandomState::default();
        let mut dedup: HashMap<u64, Vec<K>> = Default::default();
        let mut start = 0;
        for (i, end) in ends.iter().enumerate() {
            let hash = hash_builder.hash_one(&buffer[start..*end]);
            dedup.entry(hash).or_default().push(K::try_from_usize(i).unwrap());
            start = *end;
        }
        Ok(Self {
            buffer,
            ends,
            dedup,
            hash_builder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string() {
        let mut interner: Interner = Default::default();
        let empty = interner.get_or_intern("");
        let non_empty = interner.get_or_intern("a");
        assert_ne!(empty, non_empty);
        assert_eq!(interner.resolve(empty), Some(""));
        assert_eq!(interner.resolve(non_empty), Some("a"));
    }

    #[test]
    fn get_without_interning() {
        let mut interner: Interner = Default::default();
        let hello = interner.get_or_intern("hello");
        assert_eq!(interner.get("hello"), Some(hello));
        assert_eq!(interner.get("other"), None);
    }

    #[test]
    fn resolve_unknown_key() {
        let interner: Interner = Default::default();
        let key = num::NonZeroU32::new(1).unwrap();
        assert_eq!(interner.resolve(key), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let mut interner: Interner = Default::default();
        let hello_1 = interner.get_or_intern("hello");
        let world_1 = interner.get_or_intern("world");

        let serialized = serde_json::to_string(&interner).unwrap();
        let mut de: Interner = serde_json::from_str(&serialized).unwrap();
        let hello_2 = de.get_or_intern("hello");
        let world_2 = de.get_or_intern("world");

        assert_eq!(hello_1, hello_2);
        assert_eq!(world_1, world_2);
    }
}
