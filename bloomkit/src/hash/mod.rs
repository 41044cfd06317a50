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

mod murmurhash;

pub(crate) use self::murmurhash::murmurhash3_x64_128;

/// The default seed of the first base hash, shared by every filter unless a builder overrides it.
///
/// The value 9001 is a prime chosen early on and carries no special property. What matters is
/// that filters meant to be compared or combined use the same seed: a different seed maps the
/// same item to different bit positions.
pub const DEFAULT_SEED: u64 = 9001;

/// Derives the two base hashes of an item's canonical bytes.
///
/// - h1 = MurmurHash3(bytes, seed)
/// - h1 seeds the second hash: h2 = MurmurHash3(bytes, h1)
pub(crate) fn base_hashes(bytes: &[u8], seed: u64) -> (u64, u64) {
    let (h1, _) = murmurhash3_x64_128(bytes, seed);
    let (h2, _) = murmurhash3_x64_128(bytes, h1);
    (h1, h2)
}

/// The bit positions of one item, derived by double hashing (Kirsch-Mitzenmacher).
///
/// Position `i` (0-based) is `(h1 + i * h2) mod num_bits` with wrapping 64-bit arithmetic.
/// Positions may repeat, which only makes some bit updates redundant.
#[derive(Debug, Clone)]
pub(crate) struct HashPositions {
    h1: u64,
    h2: u64,
    next: u16,
    num_hashes: u16,
    num_bits: u64,
}

impl HashPositions {
    pub(crate) fn new(bytes: &[u8], seed: u64, num_hashes: u16, num_bits: u64) -> Self {
        debug_assert!(num_bits > 0);
        let (h1, h2) = base_hashes(bytes, seed);
        HashPositions {
            h1,
            h2,
            next: 0,
            num_hashes,
            num_bits,
        }
    }
}

impl Iterator for HashPositions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.num_hashes {
            return None;
        }
        let hash = self
            .h1
            .wrapping_add(u64::from(self.next).wrapping_mul(self.h2));
        self.next += 1;
        Some(hash % self.num_bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.num_hashes - self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HashPositions {}
