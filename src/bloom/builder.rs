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

use super::BloomFilter;
use super::bits::BitArray;
use crate::error::Error;
use crate::hash::KeyedHash;
use crate::hash::Murmur3Keyed;

/// Smallest supported bit array.
pub const MIN_NUM_BITS: u64 = 1;
/// Largest supported bit array (4 GiB of storage).
pub const MAX_NUM_BITS: u64 = (1u64 << 35) - 64;
/// Smallest supported hash count.
pub const MIN_NUM_HASHES: u16 = 1;
/// Largest supported hash count.
pub const MAX_NUM_HASHES: u16 = i16::MAX as u16;

/// The input shape a builder was created from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    BitsPerElement { bits_per_element: f64, num_hashes: u16 },
    Size { num_bits: u64 },
    Accuracy { fpp: f64 },
}

/// Fully resolved filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Params {
    num_bits: u64,
    bits_per_element: f64,
    num_hashes: u16,
}

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides three construction shapes, all producing the same kind of filter:
/// - [`with_bits_per_element()`](Self::with_bits_per_element): storage budget per element and
///   hash count given directly
/// - [`with_size()`](Self::with_size): total bit count and capacity; hash count is derived
/// - [`with_accuracy()`](Self::with_accuracy): target false positive probability and capacity
///
/// Parameters are validated by [`build()`](Self::build) and
/// [`build_from_bits()`](Self::build_from_bits), never by the shape constructors.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder<H = Murmur3Keyed> {
    shape: Shape,
    expected_num_elements: u64,
    hasher: H,
}

impl BloomFilterBuilder {
    /// Creates a builder from a per-element bit budget and an explicit hash count.
    ///
    /// The filter holds `ceil(bits_per_element * expected_num_elements)` bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_bits_per_element(10.0, 1000, 7)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.size(), 10_000);
    /// ```
    pub fn with_bits_per_element(
        bits_per_element: f64,
        expected_num_elements: u64,
        num_hashes: u16,
    ) -> Self {
        Self::from_shape(
            Shape::BitsPerElement {
                bits_per_element,
                num_hashes,
            },
            expected_num_elements,
        )
    }

    /// Creates a builder from a total bit count and the expected number of elements.
    ///
    /// The bit count is kept exactly; bits per element is `num_bits / expected_num_elements` and
    /// the hash count is the optimal `round(bits_per_element * ln 2)`, at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 1000).build().unwrap();
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_size(num_bits: u64, expected_num_elements: u64) -> Self {
        Self::from_shape(Shape::Size { num_bits }, expected_num_elements)
    }

    /// Creates a builder from a target false positive probability.
    ///
    /// The hash count is `ceil(-log2(fpp))` and bits per element is `num_hashes / ln 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(0.01, 10_000).build().unwrap();
    /// assert_eq!(filter.num_hashes(), 7);
    /// assert!(filter.expected_false_positive_probability() <= 0.011);
    /// ```
    pub fn with_accuracy(fpp: f64, expected_num_elements: u64) -> Self {
        Self::from_shape(Shape::Accuracy { fpp }, expected_num_elements)
    }

    fn from_shape(shape: Shape, expected_num_elements: u64) -> Self {
        BloomFilterBuilder {
            shape,
            expected_num_elements,
            hasher: Murmur3Keyed,
        }
    }

    /// Suggests the optimal hash count for a given per-element bit budget.
    ///
    /// Formula: `k = round(bits_per_element * ln 2)`, clamped to the supported range. NaN yields
    /// [`MIN_NUM_HASHES`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_bits_per_element(10.0), 7);
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_bits_per_element(0.1), 1);
    /// ```
    pub fn suggest_num_hashes_from_bits_per_element(bits_per_element: f64) -> u16 {
        clamp_num_hashes((bits_per_element * LN_2).round())
    }

    /// Suggests the hash count for a target false positive probability.
    ///
    /// Formula: `k = ceil(-log2(fpp))`, clamped to the supported range. NaN yields
    /// [`MIN_NUM_HASHES`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_fpp(0.01), 7); // -log2(0.01) ≈ 6.64
    /// ```
    pub fn suggest_num_hashes_from_fpp(fpp: f64) -> u16 {
        // Ceil to avoid selecting too few hashes.
        clamp_num_hashes((-fpp.log2()).ceil())
    }

    /// Bits per element at which `num_hashes` is the optimal hash count: `num_hashes / ln 2`.
    pub fn suggest_bits_per_element_from_num_hashes(num_hashes: u16) -> f64 {
        f64::from(num_hashes) / LN_2
    }
}

impl<H> BloomFilterBuilder<H> {
    /// Replaces the keyed hash used to derive bit positions.
    ///
    /// Filters only agree on membership when they use the same hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// # use salted_bloom::hash::XxHash64Keyed;
    /// let mut filter = BloomFilterBuilder::with_accuracy(0.01, 100)
    ///     .hasher(XxHash64Keyed)
    ///     .build()
    ///     .unwrap();
    /// filter.insert("apple").unwrap();
    /// assert!(filter.contains("apple").unwrap());
    /// ```
    pub fn hasher<K: KeyedHash>(self, hasher: K) -> BloomFilterBuilder<K> {
        BloomFilterBuilder {
            shape: self.shape,
            expected_num_elements: self.expected_num_elements,
            hasher,
        }
    }
}

impl<H: KeyedHash> BloomFilterBuilder<H> {
    /// Builds an empty Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if:
    /// - the expected number of elements is 0
    /// - bits per element is not a positive finite number
    /// - the false positive probability is not in (0.0, 1.0)
    /// - the hash count or the bit count is outside the supported range
    pub fn build(self) -> Result<BloomFilter<H>, Error> {
        let params = self.resolve()?;
        let filter = self.allocate(params)?;
        tracing::debug!(
            num_bits = params.num_bits,
            expected_num_elements = filter.expected_num_elements,
            bits_per_element = params.bits_per_element,
            num_hashes = params.num_hashes,
            "built bloom filter"
        );
        Ok(filter)
    }

    /// Builds a Bloom filter holding previously persisted bits.
    ///
    /// `bits` must yield exactly as many values as the filter has bits, in
    /// [`get_bit()`](BloomFilter::get_bit) index order. The element counter starts at
    /// `num_added_elements` instead of 0.
    ///
    /// # Errors
    ///
    /// Everything [`build()`](Self::build) rejects, plus a bit sequence of the wrong length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use salted_bloom::bloom::BloomFilterBuilder;
    /// let mut original = BloomFilterBuilder::with_size(800, 100).build().unwrap();
    /// original.insert("apple").unwrap();
    ///
    /// let restored = BloomFilterBuilder::with_size(800, 100)
    ///     .build_from_bits(original.count(), original.iter_bits())
    ///     .unwrap();
    /// assert_eq!(original, restored);
    /// assert!(restored.contains("apple").unwrap());
    /// ```
    pub fn build_from_bits<I>(
        self,
        num_added_elements: u64,
        bits: I,
    ) -> Result<BloomFilter<H>, Error>
    where
        I: IntoIterator<Item = bool>,
    {
        let params = self.resolve()?;
        let mut filter = self.allocate(params)?;

        let mut supplied = 0u64;
        for bit in bits {
            if supplied == params.num_bits {
                return Err(Error::config_invalid("too many bits supplied for rehydration")
                    .with_context("num_bits", params.num_bits));
            }
            filter.bits.set(supplied, bit);
            supplied += 1;
        }
        if supplied != params.num_bits {
            return Err(Error::config_invalid("too few bits supplied for rehydration")
                .with_context("num_bits", params.num_bits)
                .with_context("supplied", supplied));
        }
        filter.num_added_elements = num_added_elements;

        tracing::debug!(
            num_bits = params.num_bits,
            expected_num_elements = filter.expected_num_elements,
            num_added_elements,
            bits_set = filter.bits_used(),
            "rehydrated bloom filter"
        );
        Ok(filter)
    }

    fn resolve(&self) -> Result<Params, Error> {
        let expected = self.expected_num_elements;
        if expected == 0 {
            return Err(Error::config_invalid(
                "expected_num_elements must be greater than 0",
            ));
        }

        match self.shape {
            Shape::BitsPerElement {
                bits_per_element,
                num_hashes,
            } => resolve_direct(bits_per_element, expected, num_hashes),
            Shape::Size { num_bits } => {
                check_num_bits(num_bits)?;
                let bits_per_element = num_bits as f64 / expected as f64;
                Ok(Params {
                    num_bits,
                    bits_per_element,
                    num_hashes: BloomFilterBuilder::suggest_num_hashes_from_bits_per_element(
                        bits_per_element,
                    ),
                })
            }
            Shape::Accuracy { fpp } => {
                if !(fpp > 0.0 && fpp < 1.0) {
                    return Err(Error::config_invalid(
                        "fpp must be between 0.0 and 1.0 (exclusive)",
                    )
                    .with_context("fpp", fpp));
                }
                let num_hashes = BloomFilterBuilder::suggest_num_hashes_from_fpp(fpp);
                let bits_per_element =
                    BloomFilterBuilder::suggest_bits_per_element_from_num_hashes(num_hashes);
                resolve_direct(bits_per_element, expected, num_hashes)
            }
        }
    }

    fn allocate(self, params: Params) -> Result<BloomFilter<H>, Error> {
        let num_words = usize::try_from(params.num_bits.div_ceil(64)).map_err(|e| {
            Error::config_invalid("bit array does not fit in memory")
                .with_context("num_bits", params.num_bits)
                .set_source(e)
        })?;

        Ok(BloomFilter {
            hasher: self.hasher,
            num_hashes: params.num_hashes,
            expected_num_elements: self.expected_num_elements,
            bits_per_element: params.bits_per_element,
            num_added_elements: 0,
            bits: BitArray::new(params.num_bits, num_words),
        })
    }
}

fn resolve_direct(bits_per_element: f64, expected: u64, num_hashes: u16) -> Result<Params, Error> {
    if !(bits_per_element.is_finite() && bits_per_element > 0.0) {
        return Err(
            Error::config_invalid("bits_per_element must be a positive finite number")
                .with_context("bits_per_element", bits_per_element),
        );
    }
    if !(MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&num_hashes) {
        return Err(Error::config_invalid(format!(
            "num_hashes must be between {MIN_NUM_HASHES} and {MAX_NUM_HASHES}"
        ))
        .with_context("num_hashes", num_hashes));
    }

    let num_bits = (bits_per_element * expected as f64).ceil();
    if num_bits > MAX_NUM_BITS as f64 {
        return Err(Error::config_invalid(format!(
            "num_bits must not exceed {MAX_NUM_BITS}"
        ))
        .with_context("bits_per_element", bits_per_element)
        .with_context("expected_num_elements", expected));
    }
    let num_bits = num_bits as u64;
    check_num_bits(num_bits)?;

    Ok(Params {
        num_bits,
        bits_per_element,
        num_hashes,
    })
}

fn clamp_num_hashes(k: f64) -> u16 {
    if k.is_nan() {
        return MIN_NUM_HASHES;
    }
    k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16
}

fn check_num_bits(num_bits: u64) -> Result<(), Error> {
    if (MIN_NUM_BITS..=MAX_NUM_BITS).contains(&num_bits) {
        Ok(())
    } else {
        Err(Error::config_invalid(format!(
            "num_bits must be between {MIN_NUM_BITS} and {MAX_NUM_BITS}"
        ))
        .with_context("num_bits", num_bits))
    }
}
