//! Polynomial string hashing shared by both table variants.
//!
//! A key `c_0 c_1 ... c_{n-1}` hashes to `sum(c_i * base^i) mod modulus`, where `c_i` is the
//! Unicode scalar value of the `i`-th character. Powers of the base are cached modulo the
//! modulus and the cache only grows, so hashing a long key once makes every later key of the
//! same or smaller length cheaper to hash.

/// Base of the primary (bucket index) hash.
pub const PRIMARY_BASE: u64 = 343;

/// Base of the secondary (probe step) hash.
pub const SECONDARY_BASE: u64 = 351;

/// Prime modulus the secondary hash reduces through before it is mapped onto a step size.
pub const SECONDARY_PRIME: u64 = 100_000_003;

/// Multiplies two residues modulo `modulus` without overflowing.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
    // the product is reduced below `modulus`, which is a `u64`
    ((u128::from(a) * u128::from(b)) % u128::from(modulus)) as u64
}

/// Adds two residues modulo `modulus` without overflowing.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn add_mod(a: u64, b: u64, modulus: u64) -> u64 {
    ((u128::from(a) + u128::from(b)) % u128::from(modulus)) as u64
}

/// Computes `base^exp mod modulus` by square-and-multiply.
#[allow(clippy::arithmetic_side_effects)]
fn pow_mod(base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut result = 1 % modulus;
    let mut factor = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, factor, modulus);
        }
        factor = mul_mod(factor, factor, modulus);
        exp >>= 1;
    }
    result
}

/// Reference implementation of the polynomial hash without any caching.
///
/// Every power is computed from scratch, which makes this the yardstick the cached
/// [`PolynomialHash`] is checked against. A `modulus` of zero is treated as one.
#[must_use]
pub fn polynomial_hash(key: &str, base: u64, modulus: u64) -> u64 {
    let modulus = modulus.max(1);
    (0_u64..).zip(key.chars()).fold(0, |acc, (position, ch)| {
        let term = mul_mod(u64::from(ch), pow_mod(base, position, modulus), modulus);
        add_mod(acc, term, modulus)
    })
}

/// Polynomial hasher with a lazily grown cache of `base^i mod modulus`.
#[derive(Debug, Clone)]
pub struct PolynomialHash {
    /// Multiplier applied per character position
    base: u64,
    /// Every hash falls in `[0, modulus)`
    modulus: u64,
    /// `powers[i] == base^i mod modulus`
    powers: Vec<u64>,
}

impl PolynomialHash {
    /// Creates a hasher for the given base and modulus. A `modulus` of zero is treated as one.
    #[must_use]
    pub fn new(base: u64, modulus: u64) -> Self {
        Self { base, modulus: modulus.max(1), powers: Vec::new() }
    }

    /// Hasher used for bucket indices of a table with `capacity` buckets.
    #[must_use]
    pub fn primary(capacity: usize) -> Self {
        Self::new(PRIMARY_BASE, capacity as u64)
    }

    /// Hasher feeding the probe step of the open-addressing table.
    #[must_use]
    pub fn secondary() -> Self {
        Self::new(SECONDARY_BASE, SECONDARY_PRIME)
    }

    /// The base this hasher multiplies by.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// The modulus every hash is reduced by.
    #[must_use]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of powers currently cached.
    #[must_use]
    pub fn cached_powers(&self) -> usize {
        self.powers.len()
    }

    /// Switches to a new modulus. The power cache is only valid for one modulus, so it is
    /// dropped when the modulus actually changes.
    pub fn set_modulus(&mut self, modulus: u64) {
        let modulus = modulus.max(1);
        if modulus != self.modulus {
            self.modulus = modulus;
            self.powers.clear();
        }
    }

    /// Makes sure the cache holds powers for every position of a key with `len` characters.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn reserve(&mut self, len: usize) {
        while self.powers.len() < len {
            let next = match self.powers.last() {
                Some(&previous) => mul_mod(previous, self.base, self.modulus),
                None => 1 % self.modulus,
            };
            self.powers.push(next);
        }
    }

    /// Hashes `key`, extending the power cache to the key's length first.
    pub fn hash_caching(&mut self, key: &str) -> u64 {
        self.reserve(key.chars().count());
        self.hash(key)
    }

    /// Hashes `key` into `[0, modulus)`.
    ///
    /// Positions beyond the cache are served by continuing the power sequence on the fly, so
    /// the result never depends on what was hashed before.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn hash(&self, key: &str) -> u64 {
        let mut power = 1 % self.modulus;
        let mut acc = 0;
        for (position, ch) in key.chars().enumerate() {
            power = match self.powers.get(position) {
                Some(&cached) => cached,
                None if position == 0 => 1 % self.modulus,
                None => mul_mod(power, self.base, self.modulus),
            };
            acc = add_mod(acc, mul_mod(u64::from(ch), power, self.modulus), self.modulus);
        }
        acc
    }

    /// Hashes `key` straight to a bucket index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(&self, key: &str) -> usize {
        // bounded by the modulus, which was built from a `usize` capacity
        self.hash(key) as usize
    }

    /// Hashes `key` to a bucket index, extending the power cache first.
    #[allow(clippy::cast_possible_truncation)]
    pub fn index_caching(&mut self, key: &str) -> usize {
        self.hash_caching(key) as usize
    }

    /// Probe step for a table of `capacity` slots, always in `[1, capacity - 1]`.
    ///
    /// The `+ 1` keeps the step away from zero, which would pin the probe to one slot.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub fn step(&self, key: &str, capacity: usize) -> usize {
        let span = (capacity as u64).saturating_sub(1).max(1);
        // `hash % span` is below `capacity`, so it fits in a `usize`
        ((self.hash(key) % span) as usize).saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_hashes_to_zero() {
        assert_eq!(PolynomialHash::primary(19).hash(""), 0);
        assert_eq!(PolynomialHash::secondary().hash(""), 0);
        assert_eq!(polynomial_hash("", PRIMARY_BASE, 19), 0);
    }

    #[test]
    fn test_single_character_is_its_code() {
        let hasher = PolynomialHash::primary(1000);
        assert_eq!(hasher.hash("a"), 97);
        assert_eq!(hasher.hash("M"), 77);
    }

    #[test]
    fn test_two_characters() {
        // 'a' + 'b' * 343 = 97 + 98 * 343 = 33711
        let hasher = PolynomialHash::new(PRIMARY_BASE, 1_000_000);
        assert_eq!(hasher.hash("ab"), 33_711);
        assert_eq!(hasher.hash("ab") % 19, PolynomialHash::primary(19).hash("ab"));
    }

    #[test]
    fn test_cache_is_transparent() {
        let mut cached = PolynomialHash::primary(19);
        let keys = ["", "k", "key", "a much longer key than before", "mid-size"];
        for key in keys {
            let before = cached.hash(key);
            let after = cached.hash_caching(key);
            assert_eq!(before, after);
            assert_eq!(after, polynomial_hash(key, PRIMARY_BASE, 19));
        }
        assert_eq!(cached.cached_powers(), "a much longer key than before".chars().count());
    }

    #[test]
    fn test_cache_only_grows() {
        let mut hasher = PolynomialHash::secondary();
        hasher.reserve(10);
        hasher.reserve(3);
        assert_eq!(hasher.cached_powers(), 10);
    }

    #[test]
    fn test_set_modulus_resets_cache() {
        let mut hasher = PolynomialHash::primary(19);
        let _ = hasher.hash_caching("abcdef");
        hasher.set_modulus(19);
        assert_eq!(hasher.cached_powers(), 6);
        hasher.set_modulus(33);
        assert_eq!(hasher.cached_powers(), 0);
        assert_eq!(hasher.hash("abcdef"), polynomial_hash("abcdef", PRIMARY_BASE, 33));
    }

    #[test]
    fn test_non_ascii_uses_scalar_values() {
        let hasher = PolynomialHash::new(PRIMARY_BASE, 1_000_000_007);
        assert_eq!(hasher.hash("é"), 0xE9);
        assert_eq!(hasher.hash("\u{0}\u{1}"), 343);
    }

    #[test]
    fn test_step_is_never_zero() {
        let hasher = PolynomialHash::secondary();
        for capacity in [2_usize, 3, 19, 33, 57] {
            for key in ["", "'", ":", "M", "`", "s", "zzzzzz"] {
                let step = hasher.step(key, capacity);
                assert!(step >= 1 && step < capacity.max(2), "{key:?} {capacity} -> {step}");
            }
        }
    }

    #[test]
    fn test_step_for_sample_keys() {
        let hasher = PolynomialHash::secondary();
        // single characters: code % 18 + 1
        assert_eq!(hasher.step("'", 19), 4);
        assert_eq!(hasher.step(":", 19), 5);
        assert_eq!(hasher.step("s", 19), 8);
    }
}
