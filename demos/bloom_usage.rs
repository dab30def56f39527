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

use salted_bloom::bloom::BloomFilter;
use salted_bloom::bloom::BloomFilterBuilder;
use salted_bloom::hash::XxHash64Keyed;

fn main() {
    println!("=== Bloom Filter Example ===\n");

    // Size the filter for 10,000 URLs at a 1% false positive rate
    let mut filter = BloomFilter::with_accuracy(0.01, 10_000).unwrap();
    println!("Size: {} bits", filter.size());
    println!("Hash functions: {}", filter.num_hashes());
    println!(
        "Expected FPP at capacity: {:.4}%",
        filter.expected_false_positive_probability() * 100.0
    );

    println!("\nInserting 10,000 URLs...");
    for i in 0..10_000 {
        filter.insert(&format!("https://example.com/page/{i}")).unwrap();
    }
    println!("Count: {}", filter.count());
    println!("Bits used: {} ({:.2}% load)", filter.bits_used(), filter.load_factor() * 100.0);
    println!("Bits per element: {:.2}", filter.bits_per_element());

    let false_positives = (0..10_000)
        .filter(|i| {
            filter
                .contains(&format!("https://example.org/other/{i}"))
                .unwrap()
        })
        .count();
    println!(
        "Observed FPP over 10,000 unseen URLs: {:.4}%",
        false_positives as f64 / 100.0
    );

    // Persist and restore
    println!("\nRehydrating from raw bits...");
    let bits: Vec<bool> = filter.iter_bits().collect();
    let restored = BloomFilter::from_bits(
        filter.size(),
        filter.expected_num_elements(),
        filter.count(),
        bits,
    )
    .unwrap();
    println!("Restored equals original: {}", restored == filter);
    println!(
        "Restored contains page/42: {}",
        restored.contains("https://example.com/page/42").unwrap()
    );

    // Swap the keyed hash
    println!("\nXxHash64-keyed filter:");
    let mut xx = BloomFilterBuilder::with_size(1 << 16, 5_000)
        .hasher(XxHash64Keyed)
        .build()
        .unwrap();
    xx.insert_all(["alpha", "beta", "gamma"]).unwrap();
    println!(
        "Contains alpha, beta, gamma: {}",
        xx.contains_all(["alpha", "beta", "gamma"]).unwrap()
    );
    println!("Contains delta: {}", xx.contains("delta").unwrap());

    filter.clear();
    println!("\nAfter clear: count = {}, bits used = {}", filter.count(), filter.bits_used());
}
