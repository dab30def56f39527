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

use std::collections::HashSet;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::ge;
use googletest::prelude::le;
use googletest::prelude::lt;
use salted_bloom::bloom::BloomFilter;
use salted_bloom::bloom::BloomFilterBuilder;
use salted_bloom::error::ErrorKind;
use salted_bloom::hash::XxHash64Keyed;

fn set_bits(filter: &BloomFilter) -> Vec<u64> {
    filter
        .iter_bits()
        .enumerate()
        .filter(|(_, bit)| *bit)
        .map(|(i, _)| i as u64)
        .collect()
}

#[test]
fn test_alpha_is_found_and_unknown_is_not() {
    let mut filter = BloomFilter::with_bits_per_element(10.0, 1000, 7).unwrap();
    assert_eq!(filter.size(), 10_000);
    assert_eq!(filter.num_hashes(), 7);

    filter.insert("alpha").unwrap();
    assert!(filter.contains("alpha").unwrap());
    assert!(filter.contains_bytes("alpha".as_bytes()).unwrap());
    assert!(!filter.contains("zzz-not-added").unwrap());
}

#[test]
fn test_no_false_negatives() {
    let configs = [
        BloomFilter::with_bits_per_element(10.0, 1000, 7).unwrap(),
        BloomFilter::with_size(64, 1000).unwrap(),
        BloomFilter::with_size(3, 2).unwrap(),
        BloomFilter::with_accuracy(0.001, 50).unwrap(),
    ];

    for mut filter in configs {
        for i in 0..2000 {
            filter.insert(&format!("key-{i}")).unwrap();
        }
        for i in 0..2000 {
            assert!(
                filter.contains(&format!("key-{i}")).unwrap(),
                "false negative for key-{i} in filter of {} bits",
                filter.size()
            );
        }
        assert_eq!(filter.count(), 2000);
    }
}

#[test]
fn test_bits_only_grow_between_inserts() {
    let mut filter = BloomFilter::with_size(512, 64).unwrap();
    let mut previous: HashSet<u64> = HashSet::new();
    for i in 0..100 {
        filter.insert(&i).unwrap();
        let current: HashSet<u64> = set_bits(&filter).into_iter().collect();
        assert!(previous.is_subset(&current), "bits were lost at insert {i}");
        assert_eq!(current.len() as u64, filter.bits_used());
        previous = current;
    }
}

#[test]
fn test_same_inserts_give_identical_filters() {
    let mut a = BloomFilter::with_accuracy(0.05, 500).unwrap();
    let mut b = BloomFilter::with_accuracy(0.05, 500).unwrap();
    for i in 0..300 {
        a.insert(&i).unwrap();
        b.insert(&i).unwrap();
    }
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());
    assert_eq!(set_bits(&a), set_bits(&b));

    let mut set = HashSet::new();
    set.insert(a.clone());
    assert!(set.contains(&b));

    b.insert("one more").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_equality_ignores_counter_but_not_configuration() {
    let mut a = BloomFilter::with_size(1000, 100).unwrap();
    a.insert("x").unwrap();
    let mut b = BloomFilter::with_size(1000, 100).unwrap();
    b.insert("x").unwrap();
    b.insert("x").unwrap();
    assert_eq!(b.count(), 2);
    assert_eq!(a, b);

    let c = BloomFilter::with_size(1000, 101).unwrap();
    let d = BloomFilter::with_size(1000, 100).unwrap();
    assert_ne!(c, d);
}

#[test]
fn test_false_positive_probability_is_monotonic() {
    let filter = BloomFilter::with_size(10_000, 1000).unwrap();
    assert_eq!(filter.false_positive_probability_at(0), 0.0);

    let mut previous = 0.0;
    for n in (0..20_000).step_by(250) {
        let p = filter.false_positive_probability_at(n);
        assert_that!(p, ge(previous));
        assert_that!(p, le(1.0));
        previous = p;
    }
}

#[test]
fn test_current_probability_tracks_count() {
    let mut filter = BloomFilter::with_bits_per_element(10.0, 1000, 7).unwrap();
    assert_eq!(filter.false_positive_probability(), 0.0);
    for i in 0..1000 {
        filter.insert(&i).unwrap();
    }
    assert_eq!(
        filter.false_positive_probability(),
        filter.expected_false_positive_probability()
    );
    assert_eq!(
        filter.false_positive_probability(),
        filter.false_positive_probability_at(1000)
    );
}

#[test]
fn test_observed_false_positive_rate() {
    let mut filter = BloomFilter::with_accuracy(0.01, 10_000).unwrap();
    for i in 0..10_000 {
        filter.insert(&format!("present-{i}")).unwrap();
    }

    let false_positives = (0..10_000)
        .filter(|i| filter.contains(&format!("absent-{i}")).unwrap())
        .count();
    assert_that!(false_positives as f64 / 10_000.0, lt(0.02));
}

#[test]
fn test_clear_resets_bits_and_count() {
    let mut filter = BloomFilter::with_size(2048, 100).unwrap();
    for i in 0..50 {
        filter.insert(&format!("element-{i}")).unwrap();
    }
    assert_eq!(filter.count(), 50);
    assert!(filter.bits_used() > 0);

    filter.clear();
    assert_eq!(filter.count(), 0);
    assert!(filter.is_empty());
    for i in 0..filter.size() {
        assert!(!filter.get_bit(i).unwrap());
    }
    assert_eq!(filter.size(), 2048);
    assert_eq!(filter.expected_num_elements(), 100);
    assert_eq!(filter.num_hashes(), 14);
}

#[test]
fn test_rehydrated_empty_filter_contains_nothing() {
    let filter = BloomFilter::from_bits(800, 100, 0, vec![false; 800]).unwrap();
    assert_eq!(filter.size(), 800);
    assert_eq!(filter.count(), 0);
    for i in 0..500 {
        assert!(!filter.contains(&i).unwrap());
        assert!(!filter.contains(&format!("anything-{i}")).unwrap());
    }
}

#[test]
fn test_rehydration_round_trip() {
    let mut original = BloomFilter::with_size(4096, 300).unwrap();
    for i in 0..300 {
        original.insert(&format!("user:{i}")).unwrap();
    }

    let bits: Vec<bool> = original.iter_bits().collect();
    assert_eq!(bits.len(), 4096);
    let restored = BloomFilter::from_bits(original.size(), 300, original.count(), bits).unwrap();

    assert_eq!(restored.count(), 300);
    assert_eq!(restored, original);
    assert_eq!(restored.hash_code(), original.hash_code());
    for i in 0..300 {
        let key = format!("user:{i}");
        assert!(restored.contains(&key).unwrap());
    }
    for i in 0..1000 {
        let key = format!("other:{i}");
        assert_eq!(
            restored.contains(&key).unwrap(),
            original.contains(&key).unwrap()
        );
    }
}

#[test]
fn test_size_and_direct_shapes_agree() {
    let mut by_size = BloomFilter::with_size(10_000, 1000).unwrap();
    assert_eq!(by_size.expected_bits_per_element(), 10.0);
    let mut direct = BloomFilter::with_bits_per_element(
        by_size.expected_bits_per_element(),
        1000,
        by_size.num_hashes(),
    )
    .unwrap();
    assert_eq!(direct.size(), by_size.size());

    for i in 0..200 {
        let key = format!("k{i}");
        assert_eq!(
            by_size.bit_indices(key.as_bytes()).unwrap(),
            direct.bit_indices(key.as_bytes()).unwrap()
        );
        by_size.insert(&key).unwrap();
        direct.insert(&key).unwrap();
    }
    assert_eq!(by_size, direct);
}

#[test]
fn test_raw_bit_access() {
    let mut filter = BloomFilter::with_size(100, 10).unwrap();
    assert!(!filter.get_bit(99).unwrap());
    filter.set_bit(99, true).unwrap();
    assert!(filter.get_bit(99).unwrap());
    assert_eq!(filter.bits_used(), 1);
    filter.set_bit(99, false).unwrap();
    assert!(!filter.get_bit(99).unwrap());

    let err = filter.get_bit(100).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    let message = err.to_string();
    assert_that!(message.as_str(), contains_substring("index: 100"));
    let err = filter.set_bit(u64::MAX, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
}

#[test]
fn test_counter_increments_on_duplicates() {
    let mut filter = BloomFilter::with_size(1000, 100).unwrap();
    filter.insert("same").unwrap();
    let bits_after_first = filter.bits_used();
    filter.insert("same").unwrap();
    filter.insert(b"same").unwrap();
    assert_eq!(filter.count(), 3);
    assert_eq!(filter.bits_used(), bits_after_first);
}

#[test]
fn test_counter_saturates_after_rehydration() {
    let mut filter = BloomFilter::from_bits(800, 100, u64::MAX, vec![false; 800]).unwrap();
    filter.insert("x").unwrap();
    assert_eq!(filter.count(), u64::MAX);
    assert!(filter.contains("x").unwrap());
    assert_that!(filter.false_positive_probability(), le(1.0));
}

#[test]
fn test_bits_per_element_without_inserts() {
    let mut filter = BloomFilter::with_size(1000, 100).unwrap();
    assert_eq!(filter.bits_per_element(), f64::INFINITY);
    assert_eq!(filter.expected_bits_per_element(), 10.0);

    for i in 0..4 {
        filter.insert(&i).unwrap();
    }
    assert_eq!(filter.bits_per_element(), 250.0);
}

#[test]
fn test_elements_share_text_encoding() {
    let mut filter = BloomFilter::with_accuracy(0.01, 100).unwrap();
    filter.insert(&42).unwrap();
    filter.insert(&'x').unwrap();
    assert!(filter.contains("42").unwrap());
    assert!(filter.contains(&String::from("x")).unwrap());
    assert!(filter.contains(&vec![b'4', b'2']).unwrap());
}

#[test]
fn test_insert_all_is_all_or_nothing() {
    let mut filter = BloomFilter::with_size(1000, 100).unwrap();
    let err = filter.insert_all(["a", "b", "", "c"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidElement);
    assert_eq!(filter.count(), 0);
    assert_eq!(filter.bits_used(), 0);

    filter.insert_all(vec!["a", "b", "c"]).unwrap();
    assert_eq!(filter.count(), 3);
    assert!(filter.contains_all(["a", "b", "c"]).unwrap());
    assert!(!filter.contains_all(["a", "not-there"]).unwrap());
    assert!(filter.contains_all(Vec::<&str>::new()).unwrap());

    let err = filter.contains_all(["a", ""]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidElement);
}

#[test]
fn test_xxhash_filter_has_no_false_negatives() {
    let mut filter = BloomFilterBuilder::with_bits_per_element(12.0, 500, 9)
        .hasher(XxHash64Keyed)
        .build()
        .unwrap();
    let murmur = BloomFilter::with_bits_per_element(12.0, 500, 9).unwrap();

    for i in 0..500 {
        filter.insert(&i).unwrap();
    }
    for i in 0..500 {
        assert!(filter.contains(&i).unwrap());
    }
    assert_ne!(
        filter.bit_indices(b"alpha").unwrap(),
        murmur.bit_indices(b"alpha").unwrap()
    );
}

#[test]
fn test_load_factor() {
    let mut filter = BloomFilter::with_size(64, 8).unwrap();
    assert_eq!(filter.load_factor(), 0.0);
    filter.set_bit(0, true).unwrap();
    filter.set_bit(1, true).unwrap();
    assert_eq!(filter.load_factor(), 2.0 / 64.0);
}
