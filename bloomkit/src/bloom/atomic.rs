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

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use super::builder::BloomFilterBuilder;
use super::sizing::false_positive_rate;
use super::BloomFilter;
use crate::canonical::Canonical;
use crate::error::Error;
use crate::hash::HashPositions;

/// A Bloom filter that accepts concurrent inserts and queries without locking.
///
/// Bits are stored in atomic words and set with `fetch_or`, so `insert` and `contains` take
/// `&self` and the filter can be shared across threads (for example in an `Arc`). Bit setting
/// is commutative and idempotent, so relaxed ordering is enough: once `insert` returns on a
/// thread, a later `contains` on that thread sees the item. A `contains` racing with an
/// in-flight insert of the same item on another thread may return `false`.
///
/// [`clear`](Self::clear) takes `&mut self` and therefore never overlaps with other operations.
///
/// For identical capacity, hash count and seed, items map to the same positions as in
/// [`BloomFilter`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use bloomkit::bloom::BloomFilterBuilder;
///
/// let filter = Arc::new(BloomFilterBuilder::with_accuracy(1000, 0.01)?.build_atomic());
/// let handles: Vec<_> = (0..4_u32)
///     .map(|t| {
///         let filter = Arc::clone(&filter);
///         thread::spawn(move || {
///             for i in 0..100_u32 {
///                 filter.insert(&(t * 100 + i));
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert!((0..400_u32).all(|i| filter.contains(&i)));
/// # Ok::<(), bloomkit::error::Error>(())
/// ```
#[derive(Debug)]
pub struct AtomicBloomFilter {
    pub(super) seed: u64,
    pub(super) num_hashes: u16,
    pub(super) capacity_bits: u64,
    pub(super) bit_array: Box<[AtomicU64]>,
}

impl AtomicBloomFilter {
    /// Creates an empty filter with `num_bits` bits and `num_hashes` hash functions.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfig`](crate::error::ErrorKind::InvalidConfig) error if either
    /// argument is 0 or above its maximum.
    pub fn new(num_bits: u64, num_hashes: u16) -> Result<Self, Error> {
        Ok(BloomFilterBuilder::with_size(num_bits, num_hashes)?.build_atomic())
    }

    /// Tests whether an item is possibly in the set.
    pub fn contains<T: Canonical + ?Sized>(&self, item: &T) -> bool {
        self.positions(item).all(|bit_index| {
            let (word_index, mask) = locate(bit_index);
            (self.bit_array[word_index].load(Ordering::Relaxed) & mask) != 0
        })
    }

    /// Inserts an item into the filter.
    pub fn insert<T: Canonical + ?Sized>(&self, item: &T) {
        for bit_index in self.positions(item) {
            let (word_index, mask) = locate(bit_index);
            self.bit_array[word_index].fetch_or(mask, Ordering::Relaxed);
        }
    }

    /// Inserts an item and returns whether all of its bits were already set.
    ///
    /// When two threads insert the same new item at once, both may observe `false`.
    pub fn contains_and_insert<T: Canonical + ?Sized>(&self, item: &T) -> bool {
        let mut was_present = true;
        for bit_index in self.positions(item) {
            let (word_index, mask) = locate(bit_index);
            let previous = self.bit_array[word_index].fetch_or(mask, Ordering::Relaxed);
            was_present &= (previous & mask) != 0;
        }
        was_present
    }

    /// Returns the bit positions `item` maps to, in hash-function order.
    pub fn hash_positions<T: Canonical + ?Sized>(&self, item: &T) -> Vec<u64> {
        self.positions(item).collect()
    }

    /// Resets every bit to 0, preserving capacity and configuration.
    pub fn clear(&mut self) {
        tracing::debug!(num_bits = self.capacity_bits, "clearing atomic bloom filter");
        for word in self.bit_array.iter_mut() {
            *word.get_mut() = 0;
        }
    }

    /// Returns whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bit_array
            .iter()
            .all(|word| word.load(Ordering::Relaxed) == 0)
    }

    /// Returns the number of bits set to 1.
    ///
    /// Counted on demand; concurrent inserts may or may not be reflected.
    pub fn bits_used(&self) -> u64 {
        self.bit_array
            .iter()
            .map(|word| u64::from(word.load(Ordering::Relaxed).count_ones()))
            .sum()
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
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.capacity_bits as f64
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.num_hashes))
    }

    /// Estimates the false positive probability after `inserted` distinct items:
    /// `(1 - e^(-k * n / m))^k`.
    pub fn estimated_false_positive_rate(&self, inserted: u64) -> f64 {
        false_positive_rate(self.capacity_bits, self.num_hashes, inserted)
    }

    /// Copies the current bits into a single-owner [`BloomFilter`].
    ///
    /// Inserts running concurrently may or may not be included in the copy.
    pub fn snapshot(&self) -> BloomFilter {
        let bit_array: Vec<u64> = self
            .bit_array
            .iter()
            .map(|word| word.load(Ordering::Relaxed))
            .collect();
        let num_bits_set = bit_array.iter().map(|w| u64::from(w.count_ones())).sum();

        BloomFilter {
            seed: self.seed,
            num_hashes: self.num_hashes,
            capacity_bits: self.capacity_bits,
            num_bits_set,
            bit_array,
        }
    }

    fn positions<T: Canonical + ?Sized>(&self, item: &T) -> HashPositions {
        HashPositions::new(
            &item.canonical_bytes(),
            self.seed,
            self.num_hashes,
            self.capacity_bits,
        )
    }
}

fn locate(bit_index: u64) -> (usize, u64) {
    ((bit_index >> 6) as usize, 1u64 << (bit_index & 63))
}

#[cfg(test)]
mod tests {
    use super::AtomicBloomFilter;
    use crate::bloom::BloomFilter;
    use crate::bloom::BloomFilterBuilder;
    use crate::error::ErrorKind;

    #[test]
    fn test_insert_and_contains() {
        let filter = AtomicBloomFilter::new(1000, 5).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.contains("apple"));

        filter.insert("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_new_rejects_zero() {
        assert_eq!(
            AtomicBloomFilter::new(0, 1).unwrap_err().kind(),
            ErrorKind::InvalidConfig
        );
        assert_eq!(
            AtomicBloomFilter::new(1, 0).unwrap_err().kind(),
            ErrorKind::InvalidConfig
        );
    }

    #[test]
    fn test_contains_and_insert() {
        let filter = AtomicBloomFilter::new(1000, 5).unwrap();
        assert!(!filter.contains_and_insert("x"));
        assert!(filter.contains_and_insert("x"));
    }

    #[test]
    fn test_clear() {
        let mut filter = AtomicBloomFilter::new(1000, 5).unwrap();
        filter.insert("x");
        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter.bits_used(), 0);
        assert!(!filter.contains("x"));
    }

    #[test]
    fn test_snapshot_matches_single_owner_filter() {
        let atomic = BloomFilterBuilder::with_size(777, 4)
            .unwrap()
            .seed(5)
            .build_atomic();
        let mut owned = BloomFilterBuilder::with_size(777, 4)
            .unwrap()
            .seed(5)
            .build();

        for i in 0..50_u64 {
            atomic.insert(&i);
            owned.insert(&i);
            assert_eq!(atomic.hash_positions(&i), owned.hash_positions(&i));
        }

        let snapshot = atomic.snapshot();
        assert_eq!(snapshot, owned);
        assert_eq!(atomic.bits_used(), owned.bits_used());
        assert_eq!(atomic.estimated_fpp(), owned.estimated_fpp());
        assert_eq!(
            atomic.estimated_false_positive_rate(50),
            owned.estimated_false_positive_rate(50)
        );
    }

    #[test]
    fn test_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AtomicBloomFilter>();

        let filter = AtomicBloomFilter::new(4096, 3).unwrap();
        std::thread::scope(|s| {
            for t in 0..4_u64 {
                let filter = &filter;
                s.spawn(move || {
                    for i in 0..200_u64 {
                        filter.insert(&(t * 1000 + i));
                    }
                });
            }
        });

        for t in 0..4_u64 {
            for i in 0..200_u64 {
                assert!(filter.contains(&(t * 1000 + i)));
            }
        }

        let snapshot: BloomFilter = filter.snapshot();
        assert_eq!(snapshot.bits_used(), filter.bits_used());
        for t in 0..4_u64 {
            for i in 0..200_u64 {
                assert!(snapshot.contains(&(t * 1000 + i)));
            }
        }
    }
}
