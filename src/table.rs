//! The contract both table variants share.

/// A string-keyed associative table.
///
/// Absence is never an error: [`find`](Self::find) and [`delete`](Self::delete) answer `None`
/// for a missing key. Growth happens implicitly inside [`add`](Self::add).
pub trait StringTable<V> {
    /// Inserts `value` under `key`, or overwrites the value already stored there.
    ///
    /// Returns the previous value on overwrite.
    fn add(&mut self, key: String, value: V) -> Option<V>;

    /// Looks up the value stored under `key`.
    fn find(&self, key: &str) -> Option<&V>;

    /// Removes `key` and returns the value it held.
    fn delete(&mut self, key: &str) -> Option<V>;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Current number of buckets.
    fn capacity(&self) -> usize;

    /// Returns true if the table holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ratio of live entries to buckets.
    #[allow(clippy::cast_precision_loss)]
    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity().max(1) as f64
    }
}
