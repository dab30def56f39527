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

use std::hash::Hash;
use std::hash::Hasher;

use super::BloomFilterBuilder;
use super::Element;
use super::bits::BitArray;
use crate::error::Error;
use crate::hash::KeyedHash;
use crate::hash::Murmur3Keyed;
use crate::hash::bit_index;
use crate::hash::salted_hashes;

const HASH_CODE_SEED: u64 = 7;
const HASH_CODE_PRIME: u64 = 61;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Use [`BloomFilterBuilder`] or the shorthand constructors to create instances.
///
/// Mutation requires `&mut self`; share a filter across threads behind a lock if it is
/// written concurrently.
#[derive(Debug, Clone)]
pub struct BloomFilter<H = Murmur3Keyed> {
    pub(super) hasher: H,
    /// Number of hash values per element (k)
    pub(super) num_hashes: u16,
    /// Design capacity, used for probability estimates only (n)
    pub(super) expected_num_elements: u64,
    pub(super) bits_per_element: f64,
    /// Incremented once per insert, reset by clear
    pub(super) num_added_elements: u64,
    pub(super) bits: BitArray,
}

impl BloomFilter {
    /// Shorthand for [`BloomFilterBuilder::with_bits_per_element`] with the default hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// use salted_bloom::bloom::BloomFilter;
    ///
    /// let mut filter = BloomFilter::with_bits_per_element(10.0, 1000, 7).unwrap();
    /// filter.insert("alpha").unwrap();
    /// assert!(filter.contains("alpha").unwrap());
    /// ```
    pub fn with_bits_per_element(
        bits_per_element: f64,
        expected_num_elements: u64,
        num_hashes: u16,
    ) -> Result<Self, Error> {
        BloomFilterBuilder::with_bits_per_element(
            bits_per_element,
            expected_num_elements,
            num_hashes,
        )
        .build()
    }

    /// Shorthand for [`BloomFilterBuilder::with_size`] with the default hasher.
    pub fn with_size(num_bits: u64, expected_num_elements: u64) -> Result<Self, Error> {
        BloomFilterBuilder::with_size(num_bits, expected_num_elements).build()
    }

    /// Shorthand for [`BloomFilterBuilder::with_accuracy`] with the default hasher.
    pub fn with_accuracy(fpp: f64, expected_num_elements: u64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(fpp, expected_num_elements).build()
    }

    /// Restores a filter from persisted state without replaying inserts.
    ///
    /// Parameters are derived as in [`with_size`](Self::with_size); `bits` must hold exactly
    /// `num_bits` values in [`get_bit()`](Self::get_bit) order.
    ///
    /// # Examples
    ///
    /// ```
    /// use salted_bloom::bloom::BloomFilter;
    ///
    /// let filter = BloomFilter::from_bits(800, 100, 0, vec![false; 800]).unwrap();
    /// assert!(!filter.contains("anything").unwrap());
    /// ```
    pub fn from_bits<I>(
        num_bits: u64,
        expected_num_elements: u64,
        num_added_elements: u64,
        bits: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = bool>,
    {
        BloomFilterBuilder::with_size(num_bits, expected_num_elements)
            .build_from_bits(num_added_elements, bits)
    }
}

impl<H: KeyedHash> BloomFilter<H> {
    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an element into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. The element counter is
    /// incremented even when every bit was already set.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidElement`](crate::error::ErrorKind::InvalidElement) if the
    /// element has an empty byte representation.
    pub fn insert<T: Element + ?Sized>(&mut self, item: &T) -> Result<(), Error> {
        self.insert_bytes(&item.element_bytes())
    }

    /// Inserts raw bytes into the filter.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        check_element(bytes)?;
        for index in self.indices(bytes) {
            self.bits.set(index, true);
        }
        self.num_added_elements = self.num_added_elements.saturating_add(1);
        Ok(())
    }

    /// Inserts every element of `items`.
    ///
    /// All elements are checked before any is inserted, so on error the filter is unchanged.
    pub fn insert_all<I>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Element,
    {
        let items: Vec<I::Item> = items.into_iter().collect();
        if items.iter().any(|item| item.element_bytes().is_empty()) {
            return Err(Error::empty_element().with_context("batch_len", items.len()));
        }
        for item in &items {
            self.insert_bytes(&item.element_bytes())?;
        }
        Ok(())
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits and the element counter while preserving size and configuration.
    pub fn clear(&mut self) {
        self.bits.clear();
        self.num_added_elements = 0;
        tracing::trace!(num_bits = self.size(), "cleared bloom filter");
    }

    /// Sets a single bit.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`](crate::error::ErrorKind::IndexOutOfRange) if
    /// `index >= size()`.
    pub fn set_bit(&mut self, index: u64, value: bool) -> Result<(), Error> {
        self.check_index(index)?;
        self.bits.set(index, value);
        Ok(())
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether an element is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Element was **possibly** inserted (or false positive)
    /// - `false`: Element was **definitely not** inserted
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidElement`](crate::error::ErrorKind::InvalidElement) if the
    /// element has an empty byte representation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_accuracy(0.01, 100).unwrap();
    /// filter.insert("apple").unwrap();
    ///
    /// assert!(filter.contains("apple").unwrap()); // true - was inserted
    /// assert!(!filter.contains("grape").unwrap()); // false - never inserted (probably)
    /// ```
    pub fn contains<T: Element + ?Sized>(&self, item: &T) -> Result<bool, Error> {
        self.contains_bytes(&item.element_bytes())
    }

    /// Tests whether raw bytes are possibly in the set.
    pub fn contains_bytes(&self, bytes: &[u8]) -> Result<bool, Error> {
        check_element(bytes)?;
        Ok(self
            .indices(bytes)
            .into_iter()
            .all(|index| self.bits.get(index)))
    }

    /// Returns `true` if every element of `items` is possibly in the set.
    ///
    /// Stops at the first element that is definitely absent; elements after it are not checked.
    pub fn contains_all<I>(&self, items: I) -> Result<bool, Error>
    where
        I: IntoIterator,
        I::Item: Element,
    {
        for item in items {
            if !self.contains(&item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns the bit positions `bytes` maps to, in hash order.
    ///
    /// Two filters with the same size, hash count and hasher always agree on these.
    pub fn bit_indices(&self, bytes: &[u8]) -> Result<Vec<u64>, Error> {
        check_element(bytes)?;
        Ok(self.indices(bytes))
    }

    /// Computes the k bit indices for the given bytes.
    fn indices(&self, bytes: &[u8]) -> Vec<u64> {
        let num_bits = self.size();
        salted_hashes(&self.hasher, bytes, usize::from(self.num_hashes))
            .into_iter()
            .map(|hash| bit_index(hash, num_bits))
            .collect()
    }
}

impl<H> BloomFilter<H> {
    /// Reads a single bit.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IndexOutOfRange`](crate::error::ErrorKind::IndexOutOfRange) if
    /// `index >= size()`.
    pub fn get_bit(&self, index: u64) -> Result<bool, Error> {
        self.check_index(index)?;
        Ok(self.bits.get(index))
    }

    /// Iterates over all bits in index order, e.g. to persist the filter.
    pub fn iter_bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter()
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns the total number of bits in the filter (m).
    pub fn size(&self) -> u64 {
        self.bits.len()
    }

    /// Returns the number of inserts since construction or the last [`clear()`](Self::clear).
    ///
    /// Saturates at `u64::MAX`.
    pub fn count(&self) -> u64 {
        self.num_added_elements
    }

    /// Returns whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.num_added_elements == 0
    }

    /// Returns the number of hash values computed per element (k).
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the design capacity the filter was sized for.
    pub fn expected_num_elements(&self) -> u64 {
        self.expected_num_elements
    }

    /// Returns the bit budget per element the filter was sized with.
    pub fn expected_bits_per_element(&self) -> f64 {
        self.bits_per_element
    }

    /// Returns the achieved density `size() / count()`.
    ///
    /// Returns `f64::INFINITY` when nothing has been inserted.
    pub fn bits_per_element(&self) -> f64 {
        if self.num_added_elements == 0 {
            return f64::INFINITY;
        }
        self.size() as f64 / self.num_added_elements as f64
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns the fraction of bits set.
    ///
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.size() as f64
    }

    /// Returns the false positive probability once `expected_num_elements()` elements have been
    /// inserted.
    pub fn expected_false_positive_probability(&self) -> f64 {
        self.false_positive_probability_at(self.expected_num_elements)
    }

    /// Returns the false positive probability after `num_elements` inserts.
    ///
    /// Based on the formula: `(1 - e^(-k*n/m))^k`
    /// where:
    /// - k = num_hashes
    /// - n = num_elements
    /// - m = size
    ///
    /// Non-decreasing in `num_elements`.
    pub fn false_positive_probability_at(&self, num_elements: u64) -> f64 {
        let k = f64::from(self.num_hashes);
        let n = num_elements as f64;
        let m = self.size() as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Returns the false positive probability at the current [`count()`](Self::count).
    pub fn false_positive_probability(&self) -> f64 {
        self.false_positive_probability_at(self.num_added_elements)
    }

    /// Returns a hash of the configuration and bit contents.
    ///
    /// Equal filters always have equal hash codes. Reads the whole bit array, so this is
    /// `O(size)`.
    pub fn hash_code(&self) -> u64 {
        [
            self.bits_hash(),
            self.expected_num_elements,
            self.size(),
            u64::from(self.num_hashes),
        ]
        .into_iter()
        .fold(HASH_CODE_SEED, |acc, term| {
            acc.wrapping_mul(HASH_CODE_PRIME).wrapping_add(term)
        })
    }

    fn bits_hash(&self) -> u64 {
        let mut hash = 1234u64;
        for (i, word) in self.bits.words().iter().enumerate() {
            hash ^= word.wrapping_mul(i as u64 + 1);
        }
        (hash >> 32) ^ hash
    }

    fn check_index(&self, index: u64) -> Result<(), Error> {
        if index < self.size() {
            Ok(())
        } else {
            Err(Error::index_out_of_range(index, self.size()))
        }
    }
}

/// Filters are equal when they share size, hash count, design capacity and bit contents.
///
/// The hasher is not compared. Comparison is `O(size)`.
impl<H> PartialEq for BloomFilter<H> {
    fn eq(&self, other: &Self) -> bool {
        self.expected_num_elements == other.expected_num_elements
            && self.num_hashes == other.num_hashes
            && self.bits == other.bits
    }
}

impl<H> Eq for BloomFilter<H> {}

impl<H> Hash for BloomFilter<H> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        state.write_u64(self.hash_code());
    }
}

fn check_element(bytes: &[u8]) -> Result<(), Error> {
    if bytes.is_empty() {
        Err(Error::empty_element())
    } else {
        Ok(())
    }
}
