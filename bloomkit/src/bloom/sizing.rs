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

use std::f64::consts::LN_2;

use crate::error::Error;

/// Smallest accepted bit-array length.
pub const MIN_NUM_BITS: u64 = 1;
/// Largest accepted bit-array length (2^31 - 1 words of 64 bits).
pub const MAX_NUM_BITS: u64 = i32::MAX as u64 * 64;
/// Smallest accepted number of hash functions.
pub const MIN_NUM_HASHES: u16 = 1;
/// Largest accepted number of hash functions.
pub const MAX_NUM_HASHES: u16 = i16::MAX as u16;

/// Returns the bit-array length that reaches a target false positive rate.
///
/// Formula: `m = ceil(-n * ln(p) / ln(2)^2)`
/// where n = expected_elements, p = fpp
///
/// # Errors
///
/// Returns an [`InvalidConfig`](crate::error::ErrorKind::InvalidConfig) error if
/// `expected_elements` is 0, if `fpp` is not strictly between 0 and 1, or if the resulting
/// length exceeds [`MAX_NUM_BITS`].
///
/// # Examples
///
/// ```
/// # use bloomkit::bloom::optimal_num_bits;
/// assert_eq!(optimal_num_bits(1000, 0.01)?, 9586);
/// assert!(optimal_num_bits(1000, 1.0).is_err());
/// # Ok::<(), bloomkit::error::Error>(())
/// ```
pub fn optimal_num_bits(expected_elements: u64, fpp: f64) -> Result<u64, Error> {
    check_expected_elements(expected_elements)?;
    if !(fpp > 0.0 && fpp < 1.0) {
        return Err(
            Error::invalid_config("fpp must be strictly between 0.0 and 1.0").with_context("fpp", fpp),
        );
    }

    let n = expected_elements as f64;
    let bits = (-n * fpp.ln() / (LN_2 * LN_2)).ceil();
    if bits > MAX_NUM_BITS as f64 {
        return Err(Error::invalid_config(format!(
            "required number of bits exceeds {MAX_NUM_BITS}"
        ))
        .with_context("expected_elements", expected_elements)
        .with_context("fpp", fpp));
    }

    Ok((bits as u64).max(MIN_NUM_BITS))
}

/// Returns the number of hash functions that minimizes the false positive rate for a
/// bit-array length and an expected number of elements.
///
/// Formula: `k = round((m / n) * ln(2))`, clamped to
/// [`MIN_NUM_HASHES`]..=[`MAX_NUM_HASHES`]
/// where m = num_bits, n = expected_elements
///
/// # Errors
///
/// Returns an [`InvalidConfig`](crate::error::ErrorKind::InvalidConfig) error if either
/// argument is 0.
///
/// # Examples
///
/// ```
/// # use bloomkit::bloom::optimal_num_hashes;
/// assert_eq!(optimal_num_hashes(10_000, 1000)?, 7); // 6.93 rounds to 7
/// assert_eq!(optimal_num_hashes(100, 1000)?, 1); // 0.07 is clamped up
/// # Ok::<(), bloomkit::error::Error>(())
/// ```
pub fn optimal_num_hashes(num_bits: u64, expected_elements: u64) -> Result<u16, Error> {
    if num_bits < MIN_NUM_BITS {
        return Err(Error::invalid_config(format!(
            "num_bits must be at least {MIN_NUM_BITS}"
        ))
        .with_context("num_bits", num_bits));
    }
    check_expected_elements(expected_elements)?;

    let k = (num_bits as f64 / expected_elements as f64 * LN_2).round();
    Ok(k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16)
}

/// Closed-form false positive rate after `inserted` distinct items:
/// `(1 - e^(-k * n / m))^k`.
pub(super) fn false_positive_rate(num_bits: u64, num_hashes: u16, inserted: u64) -> f64 {
    let k = f64::from(num_hashes);
    let n = inserted as f64;
    let m = num_bits as f64;
    (1.0 - (-k * n / m).exp()).powf(k).clamp(0.0, 1.0)
}

fn check_expected_elements(expected_elements: u64) -> Result<(), Error> {
    if expected_elements == 0 {
        return Err(Error::invalid_config("expected_elements must be at least 1")
            .with_context("expected_elements", expected_elements));
    }
    Ok(())
}
