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

//! Keyed hashing used to derive the bit positions of an element.
//!
//! A filter never hashes with `k` unrelated algorithms. Instead it runs one keyed hash under a
//! sequence of one-byte keys (salts) `0, 1, 2, ...` and cuts every digest into 4-byte big-endian
//! chunks, each read as an `i32`. Rounds continue until `k` values are collected, so a 16-byte
//! digest feeds four hash values per round.
//!
//! Hashers are stateless: the salt is an argument of [`KeyedHash::digest`], not mutable state on
//! the hasher, so a single hasher can be shared freely without locking.

use byteorder::BigEndian;
use byteorder::ByteOrder;

mod murmurhash;
mod xxhash;

pub use self::murmurhash::Murmur3Keyed;
pub use self::xxhash::XxHash64Keyed;

/// Width in bytes of every hash value cut from a digest.
const CHUNK_BYTES: usize = 4;

/// A hash function parameterized by a one-byte key.
///
/// Implementations must be deterministic: the same key and bytes always yield the same digest.
/// Digests must be at least four bytes long.
pub trait KeyedHash {
    /// Digest output, typically a fixed-size byte array.
    type Digest: AsRef<[u8]>;

    /// Hashes `bytes` under `key`.
    fn digest(&self, key: u8, bytes: &[u8]) -> Self::Digest;
}

impl<H: KeyedHash + ?Sized> KeyedHash for &H {
    type Digest = H::Digest;

    fn digest(&self, key: u8, bytes: &[u8]) -> Self::Digest {
        (**self).digest(key, bytes)
    }
}

/// Produces `k` hash values for `bytes`.
///
/// The salt restarts at zero on every call and wraps after 255.
///
/// # Panics
///
/// Panics if the hasher produces a digest shorter than four bytes.
pub fn salted_hashes<H: KeyedHash + ?Sized>(hasher: &H, bytes: &[u8], k: usize) -> Vec<i32> {
    let mut hashes = Vec::with_capacity(k);
    let mut salt = 0u8;
    while hashes.len() < k {
        let digest = hasher.digest(salt, bytes);
        let digest = digest.as_ref();
        assert!(
            digest.len() >= CHUNK_BYTES,
            "keyed hash digest must be at least {CHUNK_BYTES} bytes"
        );
        salt = salt.wrapping_add(1);

        let remaining = k - hashes.len();
        hashes.extend(
            digest
                .chunks_exact(CHUNK_BYTES)
                .take(remaining)
                .map(BigEndian::read_i32),
        );
    }
    hashes
}

/// Maps a hash value onto `[0, num_bits)` as `|hash| mod num_bits`.
///
/// `i32::MIN` has no positive counterpart, so the absolute value is taken in unsigned space.
#[inline]
pub fn bit_index(hash: i32, num_bits: u64) -> u64 {
    u64::from(hash.unsigned_abs()) % num_bits
}
