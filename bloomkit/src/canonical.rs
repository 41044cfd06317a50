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

//! Canonical byte rendering of filter items.
//!
//! A Bloom filter never stores items, only the bit positions their hashes map to. Those
//! hashes are computed over the bytes returned by [`Canonical::canonical_bytes`], so the
//! rendering decides which values the filter treats as the same element.
//!
//! # Ambiguity
//!
//! Two distinct values with the same canonical bytes are indistinguishable to a filter.
//! The provided implementations render numbers as decimal text, which means `1_u8`, `1_i64`,
//! `1.0_f64` and the string `"1"` are all one element. This is intentional for scalar values
//! but it is a hazard for composite types: a type that renders itself through `Display` or
//! `Debug` may collapse different values onto one label. No blanket implementation exists for
//! that reason. Composite types implement [`Canonical`] themselves with an encoding that is
//! injective for the values they care about, for instance length-prefixed fields:
//!
//! ```rust
//! use std::borrow::Cow;
//!
//! use bloomkit::bloom::BloomFilter;
//! use bloomkit::canonical::Canonical;
//!
//! struct UserKey {
//!     tenant: String,
//!     user: String,
//! }
//!
//! impl Canonical for UserKey {
//!     fn canonical_bytes(&self) -> Cow<'_, [u8]> {
//!         let mut bytes = Vec::new();
//!         for field in [&self.tenant, &self.user] {
//!             bytes.extend_from_slice(&(field.len() as u32).to_le_bytes());
//!             bytes.extend_from_slice(field.as_bytes());
//!         }
//!         Cow::Owned(bytes)
//!     }
//! }
//!
//! let mut filter = BloomFilter::new(1024, 4)?;
//! filter.insert(&UserKey { tenant: "acme".into(), user: "bob".into() });
//! assert!(filter.contains(&UserKey { tenant: "acme".into(), user: "bob".into() }));
//! # Ok::<(), bloomkit::error::Error>(())
//! ```

use std::borrow::Cow;

/// A value that can be inserted into or looked up in a Bloom filter.
///
/// Implementations must be deterministic: equal logical values always produce equal bytes,
/// across calls and across processes.
pub trait Canonical {
    /// Returns the canonical byte rendering this value is hashed from.
    fn canonical_bytes(&self) -> Cow<'_, [u8]>;
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        (**self).canonical_bytes()
    }
}

impl Canonical for str {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Canonical for String {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Canonical for [u8] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl Canonical for Vec<u8> {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> Canonical for [u8; N] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Canonical for char {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        let mut buf = [0u8; 4];
        Cow::Owned(self.encode_utf8(&mut buf).as_bytes().to_vec())
    }
}

impl Canonical for bool {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        let text: &[u8] = if *self { b"true" } else { b"false" };
        Cow::Borrowed(text)
    }
}

macro_rules! impl_canonical_for_integer {
    ($($ty:ty),*) => {
        $(
            impl Canonical for $ty {
                fn canonical_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_canonical_for_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// -0.0 + 0.0 == +0.0 under IEEE754 roundTiesToEven, so adding a positive zero folds the
// signed zero into "0". NaN renders as "NaN" and infinities as "inf" / "-inf".
macro_rules! impl_canonical_for_float {
    ($($ty:ty),*) => {
        $(
            impl Canonical for $ty {
                fn canonical_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned((*self + 0.0).to_string().into_bytes())
                }
            }
        )*
    };
}

impl_canonical_for_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of<T: Canonical + ?Sized>(value: &T) -> Vec<u8> {
        value.canonical_bytes().into_owned()
    }

    #[test]
    fn test_text_and_bytes() {
        assert_eq!(bytes_of("apple"), b"apple");
        assert_eq!(bytes_of(&String::from("apple")), b"apple");
        assert_eq!(bytes_of(&&"apple"), b"apple");
        assert_eq!(bytes_of(&[1u8, 2, 3]), vec![1, 2, 3]);
        assert_eq!(bytes_of(&vec![1u8, 2, 3]), vec![1, 2, 3]);
        assert_eq!(bytes_of(&'é'), "é".as_bytes());
    }

    #[test]
    fn test_scalars_render_as_text() {
        assert_eq!(bytes_of(&true), b"true");
        assert_eq!(bytes_of(&false), b"false");
        assert_eq!(bytes_of(&42_u64), b"42");
        assert_eq!(bytes_of(&-7_i32), b"-7");
        assert_eq!(bytes_of(&u128::MAX), u128::MAX.to_string().as_bytes());
        assert_eq!(bytes_of(&0.5_f64), b"0.5");
    }

    #[test]
    fn test_numbers_with_same_text_are_one_element() {
        assert_eq!(bytes_of(&1_u8), bytes_of(&1_i64));
        assert_eq!(bytes_of(&1.0_f64), bytes_of("1"));
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(bytes_of(&-0.0_f64), b"0");
        assert_eq!(bytes_of(&0.0_f64), b"0");
        assert_eq!(bytes_of(&f64::NAN), b"NaN");
        assert_eq!(bytes_of(&f64::INFINITY), b"inf");
        assert_eq!(bytes_of(&f64::NEG_INFINITY), b"-inf");
        assert_eq!(bytes_of(&-0.0_f32), b"0");
    }
}
