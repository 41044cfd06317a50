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

use super::sizing::MAX_NUM_BITS;
use super::sizing::MAX_NUM_HASHES;
use super::sizing::MIN_NUM_BITS;
use super::sizing::MIN_NUM_HASHES;
use super::AtomicBloomFilter;
use super::BloomFilter;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;

/// Builder for creating [`BloomFilter`] and [`AtomicBloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify bit count and hash functions (manual)
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    num_bits: u64,
    num_hashes: u16,
    seed: u64,
}

impl BloomFilterBuilder {
    /// Creates a builder with optimal parameters for a target accuracy.
    ///
    /// The bit count comes from [`optimal_num_bits`](super::optimal_num_bits) and the hash
    /// count from [`optimal_num_hashes`](super::optimal_num_hashes).
    ///
    /// # Arguments
    ///
    /// - `expected_elements`: Expected number of distinct items
    /// - `fpp`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfig`](crate::error::ErrorKind::InvalidConfig) error if
    /// `expected_elements` is 0 or `fpp` is not strictly between 0.0 and 1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01)?
    ///     .seed(42)
    ///     .build();
    /// assert_eq!(filter.capacity(), 95_851);
    /// assert_eq!(filter.num_hashes(), 7);
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn with_accuracy(expected_elements: u64, fpp: f64) -> Result<Self, Error> {
        let num_bits = super::optimal_num_bits(expected_elements, fpp)?;
        let num_hashes = super::optimal_num_hashes(num_bits, expected_elements)?;

        Ok(BloomFilterBuilder {
            num_bits,
            num_hashes,
            seed: DEFAULT_SEED,
        })
    }

    /// Creates a builder with manual size specification.
    ///
    /// The filter has exactly `num_bits` addressable bits.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfig`](crate::error::ErrorKind::InvalidConfig) error if any of:
    /// - `num_bits` < [`MIN_NUM_BITS`] or `num_bits` > [`MAX_NUM_BITS`]
    /// - `num_hashes` < [`MIN_NUM_HASHES`] or `num_hashes` > [`MAX_NUM_HASHES`]
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomkit::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 7)?.build();
    /// assert_eq!(filter.capacity(), 10_000);
    ///
    /// assert!(BloomFilterBuilder::with_size(0, 7).is_err());
    /// assert!(BloomFilterBuilder::with_size(10_000, 0).is_err());
    /// # Ok::<(), bloomkit::error::Error>(())
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u16) -> Result<Self, Error> {
        if !(MIN_NUM_BITS..=MAX_NUM_BITS).contains(&num_bits) {
            return Err(Error::invalid_config(format!(
                "num_bits must be between {MIN_NUM_BITS} and {MAX_NUM_BITS}"
            ))
            .with_context("num_bits", num_bits));
        }
        if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&num_hashes) {
            return Err(Error::invalid_config(format!(
                "num_hashes must be between {MIN_NUM_HASHES} and {MAX_NUM_HASHES}"
            ))
            .with_context("num_hashes", num_hashes));
        }

        Ok(BloomFilterBuilder {
            num_bits,
            num_hashes,
            seed: DEFAULT_SEED,
        })
    }

    /// Sets a custom hash seed (default: [`DEFAULT_SEED`](crate::DEFAULT_SEED)).
    ///
    /// **Important**: Filters with different seeds cannot be combined.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the number of bits the built filter will have.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions the built filter will use.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Builds a single-owner Bloom filter.
    pub fn build(self) -> BloomFilter {
        tracing::debug!(
            num_bits = self.num_bits,
            num_hashes = self.num_hashes,
            seed = self.seed,
            "building bloom filter"
        );

        BloomFilter {
            seed: self.seed,
            num_hashes: self.num_hashes,
            capacity_bits: self.num_bits,
            num_bits_set: 0,
            bit_array: vec![0u64; self.num_words()],
        }
    }

    /// Builds a Bloom filter that accepts concurrent inserts and queries.
    pub fn build_atomic(self) -> AtomicBloomFilter {
        tracing::debug!(
            num_bits = self.num_bits,
            num_hashes = self.num_hashes,
            seed = self.seed,
            "building atomic bloom filter"
        );

        let bit_array = (0..self.num_words()).map(|_| AtomicU64::new(0)).collect();
        AtomicBloomFilter {
            seed: self.seed,
            num_hashes: self.num_hashes,
            capacity_bits: self.num_bits,
            bit_array,
        }
    }

    fn num_words(&self) -> usize {
        self.num_bits.div_ceil(64) as usize
    }
}
