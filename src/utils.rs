//! Utility functions and traits for the table variants

use crate::{ChainingTable, OpenAddressingTable, StringTable};

/// Extension trait for table implementations that provides additional utility methods
pub trait TableExtensions<V> {
    /// Returns the keys of the table as a Vec
    fn keys(&self) -> Vec<String>;

    /// Returns the values of the table as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns true if the table contains the given key
    fn contains_key(&self, key: &str) -> bool;
}

impl<V: Clone> TableExtensions<V> for ChainingTable<V> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }
}

impl<V: Clone> TableExtensions<V> for OpenAddressingTable<V> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }
}

/// Fills any table from an iterator of key-value pairs
pub fn from_pairs<T, V, K, I>(iter: I) -> T
where
    T: StringTable<V> + Default,
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = T::default();

    for (key, value) in iter {
        table.add(key.into(), value);
    }

    table
}
