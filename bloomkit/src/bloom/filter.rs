// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::builder::BloomFilterBuilder;
use super::sizing::false_positive_rate;
use crate::canonical::Canonical;
use crate::error::Error;
use crate::hash::HashPositions;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Mutation needs `&mut self`; share it behind a lock, or use
/// [`AtomicBloomFilter`](super::AtomicBloomFilter) for lock-free concurrent inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    /// Seed of the first base hash
    pub(super) seed: u64,
    /// Number of hash functions to use (k)
    pub(super) num_hashes: u16,
    /// Total number of bits in the filter (m)
    pub(super) capacity_bits: u64,
    /// Count of bits set to 1 (for statistics)
    pub(super) num_bits_set: u64,
    /// Bit array packed into u64 words
    /// Length = ceil(capacity_bits / 64)
    pub(super) bit_array: Vec<u64>,
}

impl BloomFilter {
    /// Creates an empty filter with `num_bits` bits and `num_hashes` hash functions.
    ///
    /// Shorthand for [`BloomFilterBuilder::with_size`] followed by
    /// [`build`](BloomFilterBuilder::build).
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfig`](crate::error::ErrorKind::InvalidConfig) error if either
    /// argument is 0 or above its maximum.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let filter = BloomFilter::new(100, 3)?;
    /// assert_eq!(filter.capacity(), 100);
    /// assert!(BloomFilter::new(0, 3).is_err());
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn new(num_bits: u64, num_hashes: u16) -> Result<Self, Error> {
        Ok(BloomFilterBuilder::with_size(num_bits, num_hashes)?.build())
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 4)?;
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple"));
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn contains<T: Canonical + ?Sized>(&self, item: &T) -> bool {
        if self.is_empty() {
            return false;
        }

        self.positions(item).all(|bit_index| self.get_bit(bit_index))
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// This hashes the item once instead of twice for `contains()` then `insert()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 4)?;
    ///
    /// assert!(!filter.contains_and_insert("apple")); // First insertion
    /// assert!(filter.contains_and_insert("apple")); // Now it's in the set
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn contains_and_insert<T: Canonical + ?Sized>(&mut self, item: &T) -> bool {
        let positions = self.positions(item);
        let was_present = positions.clone().all(|bit_index| self.get_bit(bit_index));
        for bit_index in positions {
            self.set_bit(bit_index);
        }
        was_present
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. Inserting the same item
    /// again leaves the filter unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 4)?;
    ///
    /// filter.insert("apple");
    /// filter.insert(&42_u64);
    /// filter.insert(&[1u8, 2, 3]);
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(filter.contains(&42_u64));
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn insert<T: Canonical + ?Sized>(&mut self, item: &T) {
        for bit_index in self.positions(item) {
            self.set_bit(bit_index);
        }
    }

    /// Returns the bit positions `item` maps to, in hash-function order.
    ///
    /// Positions may repeat. The sequence depends only on the item's canonical bytes, the
    /// seed, the capacity and the number of hash functions.
    pub fn hash_positions<T: Canonical + ?Sized>(&self, item: &T) -> Vec<u64> {
        self.positions(item).collect()
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits while preserving capacity and configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 4)?;
    /// filter.insert("apple");
    /// assert!(!filter.is_empty());
    ///
    /// filter.clear();
    /// assert!(filter.is_empty());
    /// assert!(!filter.contains("apple"));
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn clear(&mut self) {
        tracing::debug!(
            num_bits = self.capacity_bits,
            bits_used = self.num_bits_set,
            "clearing bloom filter"
        );
        self.bit_array.fill(0);
        self.num_bits_set = 0;
    }

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter recognizes items inserted into either filter.
    ///
    /// # Errors
    ///
    /// Returns an [`IncompatibleFilters`](crate::error::ErrorKind::IncompatibleFilters) error,
    /// leaving this filter untouched, if the filters differ in capacity, hash count or seed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::new(1024, 4)?;
    /// let mut f2 = BloomFilter::new(1024, 4)?;
    ///
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.union(&f2)?;
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn union(&mut self, other: &BloomFilter) -> Result<(), Error> {
        self.check_union_compatible(other)?;

        let mut num_bits_set = 0;
        for (word, other_word) in self.bit_array.iter_mut().zip(&other.bit_array) {
            *word |= *other_word;
            num_bits_set += u64::from(word.count_ones());
        }
        self.num_bits_set = num_bits_set;
        Ok(())
    }

    /// Returns whether the filter is empty (no bit set).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter (capacity).
    pub fn capacity(&self) -> u64 {
        self.capacity_bits
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is approaching its designed capacity.
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.capacity_bits as f64
    }

    /// Estimates the current false positive probability from the bits actually set.
    ///
    /// Uses the approximation `load_factor^k`, which needs no count of inserted items.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.num_hashes))
    }

    /// Estimates the false positive probability after `inserted` distinct items.
    ///
    /// Formula: `(1 - e^(-k * n / m))^k`
    /// where k = num_hashes, n = inserted, m = capacity. The filter does not count
    /// insertions itself, so the caller supplies `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilter;
    /// let filter = BloomFilter::new(6236, 4)?;
    /// assert_eq!(filter.estimated_false_positive_rate(0), 0.0);
    /// assert!((filter.estimated_false_positive_rate(1000) - 0.05).abs() < 0.001);
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn estimated_false_positive_rate(&self, inserted: u64) -> f64 {
        false_positive_rate(self.capacity_bits, self.num_hashes, inserted)
    }

    /// Checks if two filters are compatible for merging.
    ///
    /// Filters are compatible if they have the same:
    /// - Capacity (number of bits)
    /// - Number of hash functions
    /// - Seed
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.capacity_bits == other.capacity_bits
            && self.num_hashes == other.num_hashes
            && self.seed == other.seed
    }

    fn check_union_compatible(&self, other: &BloomFilter) -> Result<(), Error> {
        if self.is_compatible(other) {
            return Ok(());
        }

        tracing::debug!(
            num_bits = self.capacity_bits,
            other_num_bits = other.capacity_bits,
            "rejecting union of incompatible bloom filters"
        );
        Err(Error::incompatible_filters()
            .with_context("num_bits", self.capacity_bits)
            .with_context("other_num_bits", other.capacity_bits)
            .with_context("num_hashes", self.num_hashes)
            .with_context("other_num_hashes", other.num_hashes)
            .with_context("seed", self.seed)
            .with_context("other_seed", other.seed))
    }

    fn positions<T: Canonical + ?Sized>(&self, item: &T) -> HashPositions {
        HashPositions::new(
            &item.canonical_bytes(),
            self.seed,
            self.num_hashes,
            self.capacity_bits,
        )
    }

    /// Gets the value of a single bit.
    fn get_bit(&self, bit_index: u64) -> bool {
        let word_index = (bit_index >> 6) as usize; // Equivalent to bit_index / 64
        let mask = 1u64 << (bit_index & 63);
        (self.bit_array[word_index] & mask) != 0
    }

    /// Sets a single bit and updates the count if it wasn't already set.
    fn set_bit(&mut self, bit_index: u64) {
        let word_index = (bit_index >> 6) as usize;
        let mask = 1u64 << (bit_index & 63);

        if (self.bit_array[word_index] & mask) == 0 {
            self.bit_array[word_index] |= mask;
            self.num_bits_set += 1;
        }
    }
}
