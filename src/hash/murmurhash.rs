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

use byteorder::ByteOrder;
use byteorder::LittleEndian;

use super::KeyedHash;

/// MurmurHash3 x64/128 keyed by using the salt as the 32-bit seed.
///
/// The digest is the canonical 16-byte output (`h1` then `h2`, little-endian), which yields four
/// hash values per round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Murmur3Keyed;

impl KeyedHash for Murmur3Keyed {
    type Digest = [u8; 16];

    fn digest(&self, key: u8, bytes: &[u8]) -> [u8; 16] {
        let (h1, h2) = mur3::murmurhash3_x64_128(bytes, u32::from(key));
        let mut out = [0u8; 16];
        LittleEndian::write_u64(&mut out[..8], h1);
        LittleEndian::write_u64(&mut out[8..], h2);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::salted_hashes;

    fn digest_halves(key: &[u8]) -> (u64, u64) {
        let digest = Murmur3Keyed.digest(0, key);
        (
            LittleEndian::read_u64(&digest[..8]),
            LittleEndian::read_u64(&digest[8..]),
        )
    }

    #[test]
    fn test_digest_matches_reference_vectors() {
        // remainder > 8
        let (h1, h2) = digest_halves(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(h1, 0xe34bbc7bbc071b6c);
        assert_eq!(h2, 0x7a433ca9c49a9347);

        // change one bit
        let (h1, h2) = digest_halves(b"The quick brown fox jumps over the lazy eog");
        assert_eq!(h1, 0x362108102c62d1c9);
        assert_eq!(h2, 0x3285cd100292b305);

        // remainder = 8
        let (h1, h2) = digest_halves(b"The quick brown fox jumps over the lazy1");
        assert_eq!(h1, 0xe3301a827e5cdfe3);
        assert_eq!(h2, 0xbdbf05f8da0f0392);

        // remainder = 0
        let (h1, h2) = digest_halves(b"The quick brown fox jumps over t");
        assert_eq!(h1, 0xdf6af91bb29bdacf);
        assert_eq!(h2, 0x91a341c58df1f3a6);
    }

    #[test]
    fn test_first_round_splits_into_four_values() {
        let hashes = salted_hashes(&Murmur3Keyed, b"The quick brown fox jumps over the lazy dog", 4);
        assert_eq!(
            hashes,
            vec![
                0x6c1b07bc,
                0x7bbc4be3,
                0x47939ac4,
                0xa93c437a_u32 as i32,
            ]
        );
    }

    #[test]
    fn test_salt_changes_digest() {
        let key = b"alpha";
        assert_ne!(Murmur3Keyed.digest(0, key), Murmur3Keyed.digest(1, key));
        assert_eq!(Murmur3Keyed.digest(3, key), Murmur3Keyed.digest(3, key));
    }
}
