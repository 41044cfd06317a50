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

//! # bloomkit
//!
//! A fixed-size Bloom filter for probabilistic set membership testing.
//!
//! A filter answers "possibly inserted" or "definitely not inserted" for any item, using a
//! bit array whose size is chosen up front from the expected number of items and the
//! acceptable false positive rate. Inserted items are always reported (no false negatives).
//!
//! ```rust
//! use bloomkit::bloom::BloomFilterBuilder;
//!
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01)?.build();
//! filter.insert("apple");
//! assert!(filter.contains("apple"));
//! # Ok::<(), bloomkit::error::Error>(())
//! ```
//!
//! The crate is divided into the following modules:
//!
//! - [`bloom`]: the single-owner and concurrent filters, their builder and the sizing formulas
//! - [`canonical`]: the byte rendering every item is hashed from
//! - [`error`]: the error type returned by fallible operations

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod canonical;
pub mod error;

mod hash;

pub use self::hash::DEFAULT_SEED;
