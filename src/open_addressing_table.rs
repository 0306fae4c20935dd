use std::{mem, slice};

use crate::{config::TableConfig, polynomial_hash::PolynomialHash, table::StringTable};

/// A key-value pair stored in a slot
#[derive(Debug, Clone)]
struct Bucket<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// State of a single slot
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never held an entry since the last rebuild; ends every probe
    Empty,
    /// Held an entry that was deleted; probes continue past it
    Tombstone,
    /// Holds a live entry
    Occupied(Bucket<V>),
}

impl<V> Slot<V> {
    /// Takes the live entry out of the slot, if any
    fn into_bucket(self) -> Option<Bucket<V>> {
        match self {
            Self::Occupied(bucket) => Some(bucket),
            Self::Empty | Self::Tombstone => None,
        }
    }
}

/// The slots visited for one key under double hashing.
///
/// Probing is iterative: the `i`-th probe is `(previous + i * step) mod capacity`. The sequence
/// ends when it comes back to its first slot, or after `2 * capacity` probes, by which point
/// every reachable slot has been visited.
#[derive(Debug, Clone, Copy)]
struct Probe {
    /// Slot the key hashes to
    start: usize,
    /// Slot the next call yields
    next: Option<usize>,
    /// Number of probes yielded so far
    attempt: usize,
    /// Secondary hash of the key, never zero
    step: usize,
    /// Slot count of the table
    capacity: usize,
}

impl Probe {
    /// Starts a probe sequence at `start`
    fn new(start: usize, step: usize, capacity: usize) -> Self {
        Self { start, next: Some(start), attempt: 0, step, capacity }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.attempt = self.attempt.saturating_add(1);

        let capacity = self.capacity.max(1) as u128;
        let offset = (self.attempt as u128 % capacity) * (self.step as u128 % capacity);
        // reduced modulo a `usize` capacity
        let advanced = ((current as u128 + offset) % capacity) as usize;

        self.next = if advanced == self.start || self.attempt >= self.capacity.saturating_mul(2) {
            None
        } else {
            Some(advanced)
        };
        Some(current)
    }
}

/// A hash table resolving collisions by open addressing with double hashing.
///
/// Each slot holds at most one entry. A key starts probing at its primary hash and moves by
/// multiples of its secondary hash. Deleted entries leave tombstones behind so that keys placed
/// past them stay reachable; tombstones are reused by later inserts and dropped on resize.
///
/// Note: This implementation is not thread-safe. Wrap it in a `Mutex` for shared mutation.
#[derive(Debug, Clone)]
pub struct OpenAddressingTable<V> {
    /// The slots storing the key-value pairs
    slots: Vec<Slot<V>>,
    /// Current number of elements in the hash table
    size: usize,
    /// Number of tombstones currently in `slots`
    tombstones: usize,
    /// Probe start hash, reduced modulo the slot count
    primary: PolynomialHash,
    /// Probe step hash, reduced modulo a large prime
    secondary: PolynomialHash,
    /// Sizing parameters
    config: TableConfig,
}

impl<V> Default for OpenAddressingTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for OpenAddressingTable<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.add(k, v);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OpenAddressingTable<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<V> OpenAddressingTable<V> {
    /// Creates an empty table with 19 slots
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty table sized by `config`
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        let capacity = config.initial_capacity();
        Self {
            slots: Self::empty_slots(capacity),
            size: 0,
            tombstones: 0,
            primary: PolynomialHash::primary(capacity),
            secondary: PolynomialHash::secondary(),
            config,
        }
    }

    /// Allocates `capacity` empty slots
    fn empty_slots(capacity: usize) -> Vec<Slot<V>> {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        slots
    }

    /// Probe sequence for `key` in the current slot array
    fn probe(&self, key: &str) -> Probe {
        let capacity = self.slots.len();
        Probe::new(self.primary.index(key), self.secondary.step(key, capacity), capacity)
    }

    /// Probe sequence for `key`, growing both power caches to the key's length first
    fn probe_caching(&mut self, key: &str) -> Probe {
        let len = key.chars().count();
        self.primary.reserve(len);
        self.secondary.reserve(len);
        self.probe(key)
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// The table grows once live entries reach `capacity * load_factor_threshold`. When live
    /// entries plus tombstones reach it instead, the slots are rebuilt at the same capacity.
    pub fn add(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let previous = self.add_entry(key.into(), value);

        let capacity = self.slots.len();
        if self.config.should_grow(self.size, capacity) {
            self.resize();
        } else if self.config.should_grow(self.size.saturating_add(self.tombstones), capacity) {
            self.rebuild(capacity);
        }

        previous
    }

    /// Inserts without the load-factor check, growing only when the probe finds no free slot
    fn add_entry(&mut self, key: String, value: V) -> Option<V> {
        let mut pending = (key, value);
        loop {
            match self.insert_entry(pending.0, pending.1) {
                Ok(previous) => return previous,
                Err(stranded) => {
                    pending = stranded;
                    self.resize();
                }
            }
        }
    }

    /// Walks the probe sequence of `key`, overwriting a live match or taking the first free
    /// slot once the key is known to be absent. Hands the pair back if no slot is free.
    fn insert_entry(&mut self, key: String, value: V) -> Result<Option<V>, (String, V)> {
        let mut free = None;

        for index in self.probe_caching(&key) {
            match self.slots.get_mut(index) {
                Some(Slot::Occupied(bucket)) if bucket.key == key => {
                    return Ok(Some(mem::replace(&mut bucket.value, value)));
                }
                Some(Slot::Empty) => {
                    free = free.or(Some(index));
                    break;
                }
                Some(Slot::Tombstone) => {
                    free = free.or(Some(index));
                }
                Some(Slot::Occupied(_)) | None => {}
            }
        }

        let Some(index) = free else {
            return Err((key, value));
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return Err((key, value));
        };
        if matches!(slot, Slot::Tombstone) {
            self.tombstones = self.tombstones.saturating_sub(1);
        }
        *slot = Slot::Occupied(Bucket { key, value });
        self.size = self.size.saturating_add(1);
        Ok(None)
    }

    /// Slot holding `key`, if the key is present
    fn position(&self, key: &str) -> Option<usize> {
        for index in self.probe(key) {
            match self.slots.get(index) {
                Some(Slot::Occupied(bucket)) if bucket.key == key => return Some(index),
                Some(Slot::Empty) | None => return None,
                Some(Slot::Occupied(_) | Slot::Tombstone) => {}
            }
        }
        None
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.position(key)?) {
            Some(Slot::Occupied(bucket)) => Some(&bucket.value),
            _ => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.position(key)?;
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(bucket)) => Some(&mut bucket.value),
            _ => None,
        }
    }

    /// Removes a key from the table, returning the value it held. The slot becomes a tombstone.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let index = self.position(key)?;
        let slot = self.slots.get_mut(index)?;
        let bucket = mem::replace(slot, Slot::Tombstone).into_bucket()?;
        self.size = self.size.saturating_sub(1);
        self.tombstones = self.tombstones.saturating_add(1);
        Some(bucket.value)
    }

    /// Grows the slot array by the configured growth factor
    fn resize(&mut self) {
        self.rebuild(self.config.grown_capacity(self.slots.len()));
    }

    /// Reinserts every live entry into `capacity` fresh slots, dropping tombstones.
    ///
    /// The new array is built aside and swapped in; if an entry finds no free slot the
    /// rebuild grows again before carrying on.
    fn rebuild(&mut self, capacity: usize) {
        let old_slots = mem::replace(&mut self.slots, Self::empty_slots(capacity));
        self.primary.set_modulus(capacity as u64);
        self.size = 0;
        self.tombstones = 0;

        for bucket in old_slots.into_iter().filter_map(Slot::into_bucket) {
            self.add_entry(bucket.key, bucket.value);
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

    /// Returns the number of slots in the hash table
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones left by deletions since the last resize
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the sizing parameters of the table
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Clears the table, removing all key-value pairs and tombstones. The capacity is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.size = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over the key-value pairs in slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: self.slots.iter() }
    }
}

impl<V> StringTable<V> for OpenAddressingTable<V> {
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

/// Iterator over the key-value pairs of the hash table
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Remaining slots
    slots: slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Occupied(bucket) => Some((bucket.key.as_str(), &bucket.value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}

impl<'a, V> IntoIterator for &'a OpenAddressingTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The five single-character keys all start probing at slot 1 of a 19-slot table
    const SAMPLE: [(&str, &str); 5] = [("'", "23"), (":", "14"), ("M", "3"), ("`", "900"), ("s", "12")];

    fn sample_table() -> OpenAddressingTable<String> {
        let mut table = OpenAddressingTable::new();
        for (key, value) in SAMPLE {
            table.add(key.to_string(), value.to_string());
        }
        table
    }

    #[test]
    fn test_add_and_find() {
        let mut table = OpenAddressingTable::new();
        assert_eq!(table.add("key1".to_string(), 1), None);
        assert_eq!(table.add("key2".to_string(), 2), None);
        assert_eq!(table.add("key3".to_string(), 3), None);

        assert_eq!(table.find("key1"), Some(&1));
        assert_eq!(table.find("key2"), Some(&2));
        assert_eq!(table.find("key3"), Some(&3));
        assert_eq!(table.find("key4"), None);
    }

    #[test]
    fn test_find_on_empty() {
        let table: OpenAddressingTable<i32> = OpenAddressingTable::new();
        assert_eq!(table.find(""), None);
        assert_eq!(table.find("anything"), None);
    }

    #[test]
    fn test_overwrite() {
        let mut table = OpenAddressingTable::new();
        assert_eq!(table.add("key1".to_string(), 1), None);
        assert_eq!(table.add("key1".to_string(), 10), Some(1));
        assert_eq!(table.find("key1"), Some(&10));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_probe_sequence_is_iterative() {
        // start 1, step 4: 1, 5, 13, 6, ...
        let probe: Vec<usize> = Probe::new(1, 4, 19).take(4).collect();
        assert_eq!(probe, vec![1, 5, 13, 6]);
    }

    #[test]
    fn test_probe_terminates() {
        for capacity in [2_usize, 19, 33, 57] {
            for step in 1..capacity {
                let probes = Probe::new(0, step, capacity).count();
                assert!(probes >= 2 && probes <= capacity * 2, "{capacity} {step} -> {probes}");
            }
        }
    }

    #[test]
    fn test_sample_keys_placed_by_double_hashing() {
        let table = sample_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table.capacity(), 19);

        let positions: Vec<Option<usize>> = SAMPLE.iter().map(|(key, _)| table.position(key)).collect();
        assert_eq!(positions, vec![Some(1), Some(6), Some(7), Some(8), Some(9)]);

        for (key, value) in SAMPLE {
            assert_eq!(table.find(key).map(String::as_str), Some(value));
        }
    }

    #[test]
    fn test_sample_keys_delete() {
        let mut table = sample_table();
        for (key, value) in SAMPLE {
            assert_eq!(table.delete(key).as_deref(), Some(value));
            assert_eq!(table.find(key), None);
        }
        assert!(table.is_empty());
        assert_eq!(table.tombstones(), 5);
    }

    #[test]
    fn test_delete_keeps_later_keys_reachable() {
        let mut table = sample_table();
        // ':' was placed by probing past the slot that "'" occupied
        assert_eq!(table.delete("'").as_deref(), Some("23"));
        assert_eq!(table.find(":").map(String::as_str), Some("14"));
        assert_eq!(table.find("s").map(String::as_str), Some("12"));
        assert_eq!(table.delete("'"), None);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_tombstone_is_reused() {
        let mut table = sample_table();
        table.delete("'");
        assert_eq!(table.tombstones(), 1);

        assert_eq!(table.add("'".to_string(), "24".to_string()), None);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.position("'"), Some(1));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_overwrite_past_tombstone() {
        let mut table = sample_table();
        table.delete("'");
        assert_eq!(table.add(":".to_string(), "15".to_string()).as_deref(), Some("14"));
        assert_eq!(table.len(), 4);
        assert_eq!(table.find(":").map(String::as_str), Some("15"));
    }

    #[test]
    fn test_resize() {
        let mut table = OpenAddressingTable::new();
        for i in 0..9 {
            table.add(format!("key{i}"), i);
        }
        assert_eq!(table.capacity(), 19);

        // 10 >= 19 * 0.5
        table.add("key9".to_string(), 9);
        assert_eq!(table.capacity(), 33);
        assert_eq!(table.len(), 10);

        for i in 0..10 {
            assert_eq!(table.find(&format!("key{i}")), Some(&i));
        }
    }

    #[test]
    fn test_resize_drops_tombstones() {
        let mut table = OpenAddressingTable::new();
        for i in 0..5 {
            table.add(i.to_string(), i);
        }
        for i in 0..4 {
            table.delete(&i.to_string());
        }
        assert_eq!(table.tombstones(), 4);
        for i in 10..15 {
            table.add(i.to_string(), i);
        }
        // 6 live entries stay under the threshold, so the slots are rebuilt in place
        assert_eq!(table.capacity(), 19);
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.len(), 6);
        assert_eq!(table.find("4"), Some(&4));
    }

    #[test]
    fn test_collect_and_extend_with_str_keys() {
        let mut table: OpenAddressingTable<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        table.extend([("c".to_string(), 3)]);
        assert_eq!(table.add("a", 10), Some(1));

        assert_eq!(table.len(), 3);
        assert_eq!(table.find("a"), Some(&10));
        assert_eq!(table.find("c"), Some(&3));
    }

    #[test]
    fn test_churn_purges_tombstones_without_growing() {
        let mut table = OpenAddressingTable::new();
        for i in 0..10_000 {
            table.add(format!("k{i}"), i);
            assert_eq!(table.delete(&format!("k{i}")), Some(i));
        }
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 19);
        assert!(table.tombstones() < 10);

        table.add("kept", 1);
        for i in 0..1_000 {
            table.add(format!("k{i}"), i);
            table.delete(&format!("k{i}"));
        }
        assert_eq!(table.capacity(), 19);
        assert_eq!(table.find("kept"), Some(&1));
    }

    #[test]
    fn test_resize_sequence_follows_growth_factor() {
        // keys of one repeated letter never exhaust their probe sequence at these capacities
        let mut table = OpenAddressingTable::new();
        let mut capacities = vec![table.capacity()];
        for len in 1..=50 {
            table.add("a".repeat(len), len);
            if capacities.last() != Some(&table.capacity()) {
                capacities.push(table.capacity());
            }
        }
        assert_eq!(capacities, vec![19, 33, 57, 99, 173]);
        assert_eq!(table.len(), 50);
    }

    #[test]
    fn test_many_resizes() {
        let mut table = OpenAddressingTable::new();
        for i in 0..1000 {
            table.add(i.to_string(), i);
        }
        assert_eq!(table.len(), 1000);
        for i in 0..1000 {
            assert_eq!(table.find(&i.to_string()), Some(&i));
        }
        for i in (0..1000).step_by(2) {
            assert_eq!(table.delete(&i.to_string()), Some(i));
        }
        for i in 0..1000 {
            let expected = if i % 2 == 0 { None } else { Some(&i) };
            assert_eq!(table.find(&i.to_string()), expected);
        }
    }

    #[test]
    fn test_full_threshold_still_places_every_key() {
        let config = TableConfig::new().with_initial_capacity(2).with_load_factor_threshold(1.0);
        let mut table = OpenAddressingTable::with_config(config);
        for i in 0..50 {
            table.add(i.to_string(), i);
        }
        assert_eq!(table.len(), 50);
        for i in 0..50 {
            assert_eq!(table.find(&i.to_string()), Some(&i));
        }
    }

    #[test]
    fn test_find_mut() {
        let mut table = OpenAddressingTable::new();
        table.add("key1".to_string(), 1);

        if let Some(value) = table.find_mut("key1") {
            *value += 10;
        }

        assert_eq!(table.find("key1"), Some(&11));
    }

    #[test]
    fn test_clear() {
        let mut table = sample_table();
        table.delete("M");
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.tombstones(), 0);
        assert_eq!(table.find("s"), None);
    }

    #[test]
    fn test_iter() {
        let mut table = OpenAddressingTable::new();
        table.add("key1".to_string(), 1);
        table.add("key2".to_string(), 2);
        table.add("key3".to_string(), 3);
        table.delete("key2");

        let mut count = 0;
        let mut sum = 0;
        for (_, &value) in &table {
            count += 1;
            sum += value;
        }

        assert_eq!(count, 2);
        assert_eq!(sum, 4);
    }
}
