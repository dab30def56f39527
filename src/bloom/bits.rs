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

/// Fixed-length bit array packed into `u64` words.
///
/// Bits past `len` in the last word are always zero, so word-wise comparison and hashing see
/// only real bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BitArray {
    len: u64,
    words: Box<[u64]>,
}

impl BitArray {
    /// Allocates `len` cleared bits. The caller has already checked that the word count fits
    /// in `usize`.
    pub fn new(len: u64, num_words: usize) -> Self {
        debug_assert_eq!(len.div_ceil(64), num_words as u64);
        BitArray {
            len,
            words: vec![0u64; num_words].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[inline]
    pub fn get(&self, index: u64) -> bool {
        assert!(index < self.len);
        let (word, mask) = locate(index);
        self.words[word] & mask != 0
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[inline]
    pub fn set(&mut self, index: u64, value: bool) {
        assert!(index < self.len);
        let (word, mask) = locate(index);
        if value {
            self.words[word] |= mask;
        } else {
            self.words[word] &= !mask;
        }
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|word| u64::from(word.count_ones())).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }
}

#[inline]
fn locate(index: u64) -> (usize, u64) {
    ((index / 64) as usize, 1u64 << (index % 64))
}
