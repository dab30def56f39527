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

use byteorder::BigEndian;
use byteorder::ByteOrder;
use byteorder::LittleEndian;

use super::KeyedHash;

// Unsigned 64-bit primes from xxhash64.
const P1: u64 = 0x9E3779B185EBCA87;
const P2: u64 = 0xC2B2AE3D27D4EB4F;
const P3: u64 = 0x165667B19E3779F9;
const P4: u64 = 0x85EBCA77C2B2AE63;
const P5: u64 = 0x27D4EB2F165667C5;

const STRIPE_BYTES: usize = 32;

/// XxHash64 keyed by using the salt as the 64-bit seed.
///
/// The digest is the 64-bit hash in big-endian order, which yields two hash values per round.
/// Cheaper than [`Murmur3Keyed`](super::Murmur3Keyed) for short keys, at the price of twice as
/// many rounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct XxHash64Keyed;

impl KeyedHash for XxHash64Keyed {
    type Digest = [u8; 8];

    fn digest(&self, key: u8, bytes: &[u8]) -> [u8; 8] {
        let mut out = [0u8; 8];
        BigEndian::write_u64(&mut out, xxhash64(bytes, u64::from(key)));
        out
    }
}

/// One-shot XxHash64 of `data`.
fn xxhash64(data: &[u8], seed: u64) -> u64 {
    let mut rest = data;

    let mut hash = if data.len() >= STRIPE_BYTES {
        let mut v1 = seed.wrapping_add(P1).wrapping_add(P2);
        let mut v2 = seed.wrapping_add(P2);
        let mut v3 = seed;
        let mut v4 = seed.wrapping_sub(P1);

        let mut stripes = data.chunks_exact(STRIPE_BYTES);
        for stripe in &mut stripes {
            v1 = round(v1, LittleEndian::read_u64(&stripe[0..8]));
            v2 = round(v2, LittleEndian::read_u64(&stripe[8..16]));
            v3 = round(v3, LittleEndian::read_u64(&stripe[16..24]));
            v4 = round(v4, LittleEndian::read_u64(&stripe[24..32]));
        }
        rest = stripes.remainder();

        let mut acc = v1
            .rotate_left(1)
            .wrapping_add(v2.rotate_left(7))
            .wrapping_add(v3.rotate_left(12))
            .wrapping_add(v4.rotate_left(18));
        acc = merge_round(acc, v1);
        acc = merge_round(acc, v2);
        acc = merge_round(acc, v3);
        merge_round(acc, v4)
    } else {
        seed.wrapping_add(P5)
    };

    hash = hash.wrapping_add(data.len() as u64);

    while rest.len() >= 8 {
        hash ^= round(0, LittleEndian::read_u64(&rest[..8]));
        hash = hash.rotate_left(27).wrapping_mul(P1).wrapping_add(P4);
        rest = &rest[8..];
    }

    if rest.len() >= 4 {
        hash ^= u64::from(LittleEndian::read_u32(&rest[..4])).wrapping_mul(P1);
        hash = hash.rotate_left(23).wrapping_mul(P2).wrapping_add(P3);
        rest = &rest[4..];
    }

    for &byte in rest {
        hash ^= u64::from(byte).wrapping_mul(P5);
        hash = hash.rotate_left(11).wrapping_mul(P1);
    }

    finalize(hash)
}

#[inline]
fn round(mut acc: u64, input: u64) -> u64 {
    acc = acc.wrapping_add(input.wrapping_mul(P2));
    acc = acc.rotate_left(31);
    acc.wrapping_mul(P1)
}

#[inline]
fn merge_round(acc: u64, val: u64) -> u64 {
    (acc ^ round(0, val)).wrapping_mul(P1).wrapping_add(P4)
}

#[inline]
fn finalize(mut hash: u64) -> u64 {
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(P2);
    hash ^= hash >> 29;
    hash = hash.wrapping_mul(P3);
    hash ^ (hash >> 32)
}
