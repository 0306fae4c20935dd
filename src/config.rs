//! Sizing parameters shared by both table variants.

/// Initial number of buckets, a small prime.
pub const DEFAULT_INITIAL_CAPACITY: usize = 19;

/// A table grows once `size >= capacity * DEFAULT_LOAD_FACTOR_THRESHOLD`.
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.5;

/// A table grows to `capacity + floor(capacity * DEFAULT_GROWTH_FACTOR)` buckets.
pub const DEFAULT_GROWTH_FACTOR: f64 = 0.75;

/// Capacity, load-factor threshold and growth factor of a table.
///
/// Setters clamp their input into a usable range instead of rejecting it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Number of buckets a fresh table starts with
    initial_capacity: usize,
    /// Fraction of the capacity that may be filled before the table grows
    load_factor_threshold: f64,
    /// Fraction of the current capacity added on every growth
    growth_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl TableConfig {
    /// Creates the default configuration: 19 buckets, threshold 0.5, growth 0.75.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial bucket count. At least two buckets are kept so the probe step of the
    /// open-addressing table has a non-empty range.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(2);
        self
    }

    /// Sets the load-factor threshold, clamped to `[0.05, 1.0]`.
    #[must_use]
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold =
            if threshold.is_nan() { DEFAULT_LOAD_FACTOR_THRESHOLD } else { threshold.clamp(0.05, 1.0) };
        self
    }

    /// Sets the growth factor, clamped to `[0.05, 16.0]`.
    #[must_use]
    pub fn with_growth_factor(mut self, factor: f64) -> Self {
        self.growth_factor =
            if factor.is_nan() { DEFAULT_GROWTH_FACTOR } else { factor.clamp(0.05, 16.0) };
        self
    }

    /// Number of buckets a fresh table starts with.
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Fraction of the capacity that may be filled before the table grows.
    #[must_use]
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Fraction of the current capacity added on every growth.
    #[must_use]
    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    /// Whether `occupied` entries in `capacity` buckets have reached the threshold.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn should_grow(&self, occupied: usize, capacity: usize) -> bool {
        occupied as f64 >= capacity as f64 * self.load_factor_threshold
    }

    /// Capacity after one growth step: `capacity + floor(capacity * growth_factor)`, and
    /// always at least one bucket more than before.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn grown_capacity(&self, capacity: usize) -> usize {
        // `floor` of a non-negative product, truncation is the intended rounding
        let extra = (capacity as f64 * self.growth_factor).floor() as usize;
        capacity.saturating_add(extra.max(1))
    }
}
