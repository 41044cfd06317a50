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

use std::collections::BTreeSet;

use bloomkit::bloom::BloomFilter;
use bloomkit::bloom::BloomFilterBuilder;
use bloomkit::error::ErrorKind;
use bloomkit::DEFAULT_SEED;

#[test]
fn test_fruit_scenario() {
    let mut filter = BloomFilter::new(100, 3).unwrap();
    filter.insert("apple");
    filter.insert("banana");
    filter.insert("orange");

    assert!(filter.contains("apple"));
    assert!(filter.contains("banana"));
    assert!(filter.contains("orange"));
    // "grape" was never inserted, either answer is allowed
    let _ = filter.contains("grape");

    filter.clear();
    assert!(!filter.contains("apple"));
}

#[test]
fn test_no_false_negatives() {
    let mut filter = BloomFilter::new(2048, 5).unwrap();
    let items: Vec<String> = (0..500).map(|i| format!("item-{i}")).collect();

    for (n, item) in items.iter().enumerate() {
        filter.insert(item);
        // everything inserted so far is still reported
        assert!(items[..=n].iter().all(|seen| filter.contains(seen)));
    }
}

#[test]
fn test_idempotent_insertion() {
    let mut once = BloomFilter::new(256, 4).unwrap();
    let mut repeated = BloomFilter::new(256, 4).unwrap();

    once.insert("kiwi");
    for _ in 0..7 {
        repeated.insert("kiwi");
    }
    assert_eq!(once, repeated);
    assert!(repeated.contains_and_insert("kiwi"));
    assert_eq!(once, repeated);
}

#[test]
fn test_clear_restores_initial_state() {
    let pristine = BloomFilter::new(512, 3).unwrap();
    let mut filter = pristine.clone();
    for i in 0..100_u32 {
        filter.insert(&i);
    }

    filter.clear();
    assert_eq!(filter, pristine);
    assert_eq!(filter.capacity(), 512);
    assert_eq!(filter.num_hashes(), 3);
    assert!((0..100_u32).all(|i| !filter.contains(&i)));
}

#[test]
fn test_determinism() {
    let mut f1 = BloomFilter::new(1000, 6).unwrap();
    let mut f2 = BloomFilter::new(1000, 6).unwrap();
    for word in ["alpha", "beta", "gamma", "delta"] {
        f1.insert(word);
        f2.insert(word);
    }
    assert_eq!(f1, f2);
    assert_eq!(f1.hash_positions("alpha"), f2.hash_positions("alpha"));
    assert_eq!(f1.hash_positions("alpha"), f1.hash_positions("alpha"));
}

#[test]
fn test_seed_changes_positions() {
    let default = BloomFilter::new(1 << 20, 4).unwrap();
    let seeded = BloomFilterBuilder::with_size(1 << 20, 4)
        .unwrap()
        .seed(DEFAULT_SEED + 1)
        .build();
    assert_ne!(default.hash_positions("apple"), seeded.hash_positions("apple"));
}

#[test]
fn test_monotonicity() {
    let mut filter = BloomFilter::new(300, 4).unwrap();
    // every 1-bit belongs to the positions of some inserted item
    let mut set_positions = BTreeSet::new();
    let mut previous_used = 0;
    for i in 0..200_u32 {
        filter.insert(&i);
        set_positions.extend(filter.hash_positions(&i));

        let used = filter.bits_used();
        assert!(previous_used <= used);
        assert_eq!(used, set_positions.len() as u64);
        previous_used = used;

        // all positions of earlier items are still set
        for earlier in 0..=i {
            assert!(filter.contains(&earlier));
        }
    }
}

#[test]
fn test_minimal_filter_reports_everything() {
    let mut filter = BloomFilter::new(1, 1).unwrap();
    assert!(!filter.contains("anything"));

    filter.insert("first");
    assert_eq!(filter.bits_used(), 1);
    assert_eq!(filter.load_factor(), 1.0);
    for probe in ["first", "second", "third"] {
        assert!(filter.contains(probe));
    }
    for i in 0..100_u64 {
        assert!(filter.contains(&i));
    }
}

#[test]
fn test_positions_count_and_range() {
    let filter = BloomFilter::new(100, 3).unwrap();
    let positions = filter.hash_positions("apple");
    assert_eq!(positions.len(), 3);
    assert!(positions.iter().all(|&p| p < 100));
}

#[test]
fn test_canonical_ambiguity() {
    let mut filter = BloomFilter::new(4096, 4).unwrap();
    filter.insert(&1_u8);

    // same decimal text, same element
    assert!(filter.contains(&1_i64));
    assert!(filter.contains(&1.0_f64));
    assert!(filter.contains("1"));
    assert_eq!(filter.hash_positions(&1_u8), filter.hash_positions("1"));

    // different text, different positions
    assert_ne!(filter.hash_positions("1"), filter.hash_positions("01"));
    assert_ne!(filter.hash_positions(&true), filter.hash_positions(&1_u8));
}

#[test]
fn test_heterogeneous_items() {
    let mut filter = BloomFilter::new(4096, 5).unwrap();
    filter.insert("text");
    filter.insert(&String::from("owned"));
    filter.insert(&42_u64);
    filter.insert(&-3_i32);
    filter.insert(&2.5_f64);
    filter.insert(&false);
    filter.insert(&'z');
    filter.insert(b"raw bytes".as_slice());

    assert!(filter.contains(&String::from("text")));
    assert!(filter.contains("owned"));
    assert!(filter.contains(&42_u64));
    assert!(filter.contains(&-3_i32));
    assert!(filter.contains(&2.5_f64));
    assert!(filter.contains(&false));
    assert!(filter.contains("z"));
    assert!(filter.contains("raw bytes"));
}

#[test]
fn test_configuration_errors() {
    let err = BloomFilter::new(0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert!(err.to_string().starts_with("InvalidConfig, context: { num_bits: 0 }"));

    let err = BloomFilter::new(1, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert!(err.to_string().contains("num_hashes: 0"));
}
