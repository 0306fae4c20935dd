use std::mem;

use crate::{config::TableConfig, polynomial_hash::PolynomialHash, table::StringTable};

/// A key-value pair stored in a chain
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// A chain of entries that share a bucket. The last element is the head of the chain, so a
/// prepend is a `push`.
type Chain<V> = Vec<Entry<V>>;

/// A hash table resolving collisions by separate chaining.
///
/// Every bucket owns the chain of entries whose key hashes to it. Keys are unique per table:
/// adding an existing key overwrites its value in place.
///
/// Note: This implementation is not thread-safe. Wrap it in a `Mutex` for shared mutation.
#[derive(Debug, Clone)]
pub struct ChainingTable<V> {
    /// One chain per bucket
    buckets: Vec<Chain<V>>,
    /// Current number of elements in the hash table
    size: usize,
    /// Bucket index hash, reduced modulo the bucket count
    hasher: PolynomialHash,
    /// Sizing parameters
    config: TableConfig,
}

impl<V> Default for ChainingTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for ChainingTable<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.add(k, v);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ChainingTable<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<V> ChainingTable<V> {
    /// Creates an empty table with 19 buckets
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty table sized by `config`
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        let capacity = config.initial_capacity();
        Self {
            buckets: Self::empty_buckets(capacity),
            size: 0,
            hasher: PolynomialHash::primary(capacity),
            config,
        }
    }

    /// Allocates `capacity` empty chains
    fn empty_buckets(capacity: usize) -> Vec<Chain<V>> {
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        buckets
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// New entries are prepended to their bucket's chain. The table grows once the number of
    /// entries reaches `capacity * load_factor_threshold`.
    pub fn add(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let index = self.hasher.index_caching(&key);
        let previous = self.insert_at(index, key, value);

        if self.config.should_grow(self.size, self.buckets.len()) {
            self.resize();
        }

        previous
    }

    /// Places an entry into the chain at `index`, overwriting a matching key
    fn insert_at(&mut self, index: usize, key: String, value: V) -> Option<V> {
        let chain = self.buckets.get_mut(index)?;

        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
            return Some(mem::replace(&mut entry.value, value));
        }

        chain.push(Entry { key, value });
        self.size = self.size.saturating_add(1);
        None
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&V> {
        self.chain(key)?.iter().rev().find(|entry| entry.key == key).map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.hasher.index(key);
        self.buckets
            .get_mut(index)?
            .iter_mut()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    /// Removes a key from the table, returning the value it held.
    ///
    /// The rest of the chain keeps its order.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let index = self.hasher.index(key);
        let chain = self.buckets.get_mut(index)?;
        let position = chain.iter().rposition(|entry| entry.key == key)?;
        let entry = chain.remove(position);
        self.size = self.size.saturating_sub(1);
        Some(entry.value)
    }

    /// The chain `key` hashes to
    fn chain(&self, key: &str) -> Option<&Chain<V>> {
        self.buckets.get(self.hasher.index(key))
    }

    /// Number of entries in the chain `key` hashes to
    #[must_use]
    pub fn chain_len(&self, key: &str) -> usize {
        self.chain(key).map_or(0, Vec::len)
    }

    /// Grows the bucket array and rehashes every entry into it.
    ///
    /// The new array is built aside and swapped in once every entry has been placed.
    fn resize(&mut self) {
        let new_capacity = self.config.grown_capacity(self.buckets.len());
        let old_buckets = mem::replace(&mut self.buckets, Self::empty_buckets(new_capacity));
        self.hasher.set_modulus(new_capacity as u64);
        self.size = 0;

        for entry in old_buckets.into_iter().flatten() {
            let index = self.hasher.index_caching(&entry.key);
            self.insert_at(index, entry.key, entry.value);
        }
    }

    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets in the hash table
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the sizing parameters of the table
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Clears the table, removing all key-value pairs. The capacity is kept.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.size = 0;
    }

    /// Returns an iterator over the key-value pairs, bucket by bucket
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().rev())
            .map(|entry| (entry.key.as_str(), &entry.value))
    }
}

impl<V> StringTable<V> for ChainingTable<V> {
    fn add(&mut self, key: String, value: V) -> Option<V> {
        Self::add(self, key, value)
    }

    fn find(&self, key: &str) -> Option<&V> {
        Self::find(self, key)
    }

    fn delete(&mut self, key: &str) -> Option<V> {
        Self::delete(self, key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }
}
