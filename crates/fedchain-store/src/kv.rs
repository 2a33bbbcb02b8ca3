//! Abstract key-value store and its in-memory implementation.
//!
//! The host backs this with a persistent tree that commits atomically at
//! block boundary; from the module's point of view it behaves like local
//! memory with read-your-writes semantics. Tests use [`MemKvStore`].

use std::collections::BTreeMap;

/// Minimal key-value interface the slashing module needs from the host.
///
/// Range operations take a key prefix and are only used within a single
/// table (the key layout keeps every table's scan range prefix-contained).
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    fn set(&mut self, key: &[u8], value: Vec<u8>);

    fn delete(&mut self, key: &[u8]);

    /// Whether any key starting with `prefix` exists.
    fn has_prefix(&self, prefix: &[u8]) -> bool;

    /// Delete every key starting with `prefix`.
    fn delete_prefix(&mut self, prefix: &[u8]);
}

// ============================================================================
// MemKvStore
// ============================================================================

/// Ordered in-memory store used by tests and simulations.
#[derive(Debug, Default)]
pub struct MemKvStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, all tables included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemKvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.entries.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn has_prefix(&self, prefix: &[u8]) -> bool {
        self.entries
            .range(prefix.to_vec()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }

    fn delete_prefix(&mut self, prefix: &[u8]) {
        let doomed: Vec<Vec<u8>> = self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed {
            self.entries.remove(&key);
        }
    }
}

// ============================================================================
// PrefixedKvStore
// ============================================================================

/// A view of another store with every key prepended by a namespace.
///
/// Side-chain contexts use this so that per-chain state never leaks into
/// the primary chain's key space.
pub struct PrefixedKvStore<'a> {
    inner: &'a mut dyn KvStore,
    namespace: Vec<u8>,
}

impl<'a> PrefixedKvStore<'a> {
    pub fn new(inner: &'a mut dyn KvStore, namespace: Vec<u8>) -> Self {
        PrefixedKvStore { inner, namespace }
    }

    fn scoped(&self, key: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.namespace.len() + key.len());
        out.extend_from_slice(&self.namespace);
        out.extend_from_slice(key);
        out
    }
}

impl KvStore for PrefixedKvStore<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        let key = self.scoped(key);
        self.inner.set(&key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        let key = self.scoped(key);
        self.inner.delete(&key);
    }

    fn has_prefix(&self, prefix: &[u8]) -> bool {
        self.inner.has_prefix(&self.scoped(prefix))
    }

    fn delete_prefix(&mut self, prefix: &[u8]) {
        let prefix = self.scoped(prefix);
        self.inner.delete_prefix(&prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_store_get_set_delete() {
        let mut store = MemKvStore::new();
        assert_eq!(store.get(b"k"), None);
        store.set(b"k", vec![1, 2, 3]);
        assert_eq!(store.get(b"k"), Some(vec![1, 2, 3]));
        store.delete(b"k");
        assert_eq!(store.get(b"k"), None);
    }

    #[test]
    fn test_prefix_scan_stays_contained() {
        let mut store = MemKvStore::new();
        store.set(b"\x01a", vec![1]);
        store.set(b"\x01b", vec![2]);
        store.set(b"\x02a", vec![3]);

        assert!(store.has_prefix(b"\x01"));
        store.delete_prefix(b"\x01");
        assert!(!store.has_prefix(b"\x01"));
        assert_eq!(store.get(b"\x02a"), Some(vec![3]));
    }

    #[test]
    fn test_prefixed_store_isolation() {
        let mut store = MemKvStore::new();
        {
            let mut bsc = PrefixedKvStore::new(&mut store, b"sc/bsc/".to_vec());
            bsc.set(b"\x01k", vec![9]);
            assert_eq!(bsc.get(b"\x01k"), Some(vec![9]));
        }
        // Visible only under the namespaced key on the backing store.
        assert_eq!(store.get(b"\x01k"), None);
        assert_eq!(store.get(b"sc/bsc/\x01k"), Some(vec![9]));

        {
            let mut chapel = PrefixedKvStore::new(&mut store, b"sc/chapel/".to_vec());
            assert_eq!(chapel.get(b"\x01k"), None);
        }
    }

    #[test]
    fn test_prefixed_store_prefix_ops() {
        let mut store = MemKvStore::new();
        store.set(b"sc/bsc/\x02a", vec![1]);
        store.set(b"sc/chapel/\x02a", vec![2]);

        let mut bsc = PrefixedKvStore::new(&mut store, b"sc/bsc/".to_vec());
        assert!(bsc.has_prefix(b"\x02"));
        bsc.delete_prefix(b"\x02");
        assert!(!bsc.has_prefix(b"\x02"));
        drop(bsc);
        assert_eq!(store.get(b"sc/chapel/\x02a"), Some(vec![2]));
    }
}
