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
//! - **No false negatives**: If an element was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for elements never inserted
//! - **Fixed size**: the bit array never grows; inserting past the expected capacity only
//!   degrades the false positive rate
//! - **Insert only**: elements cannot be removed, only the whole filter cleared
//!
//! # Usage
//!
//! ```rust
//! use salted_bloom::bloom::BloomFilter;
//!
//! // Create a filter for 1000 elements with a 1% false positive rate
//! let mut filter = BloomFilter::with_accuracy(0.01, 1000).unwrap();
//!
//! filter.insert("apple").unwrap();
//! filter.insert(&42_u64).unwrap();
//! filter.insert_bytes(&[1, 2, 3]).unwrap();
//!
//! assert!(filter.contains("apple").unwrap()); // true - definitely inserted
//! assert!(filter.contains("42").unwrap()); // integers hash as their decimal text
//! assert!(!filter.contains("grape").unwrap()); // false - never inserted (probably)
//!
//! println!("Size: {} bits", filter.size());
//! println!("Bits used: {}", filter.bits_used());
//! println!("Current FPP: {:.4}%", filter.false_positive_probability() * 100.0);
//! ```
//!
//! # Creating Filters
//!
//! ## By Accuracy
//!
//! ```rust
//! # use salted_bloom::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_accuracy(
//!     0.01,   // Target false positive probability (1%)
//!     10_000, // Expected elements
//! )
//! .build()
//! .unwrap();
//! ```
//!
//! ## By Size
//!
//! The hash count is derived from the bits available per element:
//!
//! ```rust
//! # use salted_bloom::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_size(
//!     95_851, // Number of bits
//!     10_000, // Expected elements
//! )
//! .build()
//! .unwrap();
//! assert_eq!(filter.num_hashes(), 7);
//! ```
//!
//! ## By Bits Per Element
//!
//! ```rust
//! # use salted_bloom::bloom::BloomFilterBuilder;
//! let filter = BloomFilterBuilder::with_bits_per_element(10.0, 1000, 7)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## From Persisted Bits
//!
//! ```rust
//! # use salted_bloom::bloom::BloomFilter;
//! let mut original = BloomFilter::with_size(1024, 100).unwrap();
//! original.insert("apple").unwrap();
//!
//! let bits: Vec<bool> = original.iter_bits().collect();
//! let restored = BloomFilter::from_bits(1024, 100, original.count(), bits).unwrap();
//! assert_eq!(original, restored);
//! ```
//!
//! # Implementation Details
//!
//! - Bit positions come from one keyed hash run under the salts `0, 1, 2, ...`; see
//!   [`crate::hash`]
//! - MurmurHash3 x64/128 by default, XxHash64 via [`BloomFilterBuilder::hasher`]
//! - Bits packed in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod bits;
mod builder;
mod element;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::MAX_NUM_BITS;
pub use self::builder::MAX_NUM_HASHES;
pub use self::builder::MIN_NUM_BITS;
pub use self::builder::MIN_NUM_HASHES;
pub use self::element::Element;
pub use self::sketch::BloomFilter;
