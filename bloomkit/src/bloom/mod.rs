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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: Filters never resize; build a larger one and re-insert to grow
//! - **No deletion**: Bits are only ever set, except by `clear()` which resets all of them
//!
//! # Usage
//!
//! ```rust
//! use bloomkit::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(100, 3)?;
//!
//! filter.insert("apple");
//! filter.insert("banana");
//! filter.insert("orange");
//!
//! assert!(filter.contains("apple"));
//! assert!(filter.contains("banana"));
//! assert!(filter.contains("orange"));
//! // filter.contains("grape") may be either: it was never inserted
//!
//! println!("Est. FPP after 3 items: {:.4}%", filter.estimated_false_positive_rate(3) * 100.0);
//!
//! filter.clear();
//! assert!(!filter.contains("apple"));
//! # Ok::<(), bloomkit::error::Error>(())
//! ```
//!
//! # Sizing
//!
//! [`optimal_num_bits`] and [`optimal_num_hashes`] derive the parameters for a target false
//! positive rate, and [`BloomFilterBuilder::with_accuracy`] applies both:
//!
//! ```rust
//! use bloomkit::bloom::optimal_num_bits;
//! use bloomkit::bloom::optimal_num_hashes;
//! use bloomkit::bloom::BloomFilter;
//! use bloomkit::bloom::BloomFilterBuilder;
//!
//! let num_bits = optimal_num_bits(10_000, 0.01)?;
//! let num_hashes = optimal_num_hashes(num_bits, 10_000)?;
//! let manual = BloomFilter::new(num_bits, num_hashes)?;
//!
//! let built = BloomFilterBuilder::with_accuracy(10_000, 0.01)?.build();
//! assert_eq!(manual, built);
//! # Ok::<(), bloomkit::error::Error>(())
//! ```
//!
//! # Implementation Details
//!
//! - Items are hashed from their [`Canonical`](crate::canonical::Canonical) bytes
//! - Uses MurmurHash3 (x64, 128-bit) for hashing; the second base hash is seeded with the first
//! - Implements double hashing (Kirsch-Mitzenmacher method) for k hash functions:
//!   position `i` is `(h1 + i * h2) mod m`
//! - Bits packed in `u64` words; [`AtomicBloomFilter`] uses atomic words for lock-free inserts
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod atomic;
mod builder;
mod filter;
mod sizing;

pub use self::atomic::AtomicBloomFilter;
pub use self::builder::BloomFilterBuilder;
pub use self::filter::BloomFilter;
pub use self::sizing::optimal_num_bits;
pub use self::sizing::optimal_num_hashes;
pub use self::sizing::MAX_NUM_BITS;
pub use self::sizing::MAX_NUM_HASHES;
pub use self::sizing::MIN_NUM_BITS;
pub use self::sizing::MIN_NUM_HASHES;
