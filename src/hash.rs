/*
 * Copyright (c) 2024 K--Aethiax
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 * Alternatively, the contents of this file may be used under the terms of
 * the MIT license as described below.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use super::*;

const C1: u64 = 0x87c37b91114253d5;
const C2: u64 = 0x4cf5ad432745937f;
/// Added to `h1` / `h2` after every block.
const N1: u64 = 0x52dce729;
const N2: u64 = 0x38495ab5;

const BLOCK: usize = 16;

type State = (u64, u64);

#[inline(always)]
const fn read_u64(bytes: &[u8], off: usize) -> u64 {
    u64::from_le_bytes([
        bytes[off],
        bytes[off + 1],
        bytes[off + 2],
        bytes[off + 3],
        bytes[off + 4],
        bytes[off + 5],
        bytes[off + 6],
        bytes[off + 7],
    ])
}

/// Widens one tail byte.
///
/// Cassandra reads tail bytes through a signed byte type, so with `SIGN_EXTEND`
/// a byte `>= 0x80` fills all the bits above it with ones.
#[inline(always)]
const fn widen<const SIGN_EXTEND: bool>(byte: u8) -> u64 {
    if SIGN_EXTEND {
        byte as i8 as i64 as u64
    } else {
        byte as u64
    }
}

#[inline(always)]
const fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}
#[inline(always)]
const fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

#[inline(always)]
const fn avalanche(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^= k >> 33;
    k
}

#[inline(always)]
const fn _block_mix((mut h1, mut h2): State, k1: u64, k2: u64) -> State {
    h1 ^= mix_k1(k1);
    h1 = h1.rotate_left(27).wrapping_add(h2);
    h1 = h1.wrapping_mul(5).wrapping_add(N1);

    h2 ^= mix_k2(k2);
    h2 = h2.rotate_left(31).wrapping_add(h1);
    h2 = h2.wrapping_mul(5).wrapping_add(N2);

    (h1, h2)
}

/// Folds the `bytes.len() - off` (< 16) trailing bytes into the state.
///
/// Every byte of a word is accumulated before that word is mixed, and each word
/// is mixed at most once: `k2` takes tail bytes 8.., `k1` takes tail bytes 0..8.
#[inline(always)]
const fn _tail_mix<const SIGN_EXTEND: bool>((mut h1, mut h2): State, bytes: &[u8], off: usize) -> State {
    let rem = bytes.len() - off;
    debug_assert!(rem < BLOCK);

    if rem > 8 {
        let mut k2 = 0;
        let mut i = rem;
        while i > 8 {
            i -= 1;
            k2 ^= widen::<SIGN_EXTEND>(bytes[off + i]) << ((i - 8) * 8) as u32;
        }
        h2 ^= mix_k2(k2);
    }

    if rem > 0 {
        let mut k1 = 0;
        let mut i = if rem > 8 { 8 } else { rem };
        while i > 0 {
            i -= 1;
            k1 ^= widen::<SIGN_EXTEND>(bytes[off + i]) << (i * 8) as u32;
        }
        h1 ^= mix_k1(k1);
    }

    (h1, h2)
}

#[inline(always)]
const fn _finalize((mut h1, mut h2): State, tot_len: u64) -> State {
    h1 ^= tot_len;
    h2 ^= tot_len;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = avalanche(h1);
    h2 = avalanche(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    (h1, h2)
}

#[inline(always)]
const fn base_hash<const SIGN_EXTEND: bool>(bytes: &[u8], seed: u64) -> State {
    let nblocks = bytes.len() / BLOCK;
    let mut state = (seed, seed);

    let mut i = 0;
    while i < nblocks {
        let off = i * BLOCK;
        state = _block_mix(state, read_u64(bytes, off), read_u64(bytes, off + 8));
        i += 1;
    }

    state = _tail_mix::<SIGN_EXTEND>(state, bytes, nblocks * BLOCK);
    _finalize(state, bytes.len() as u64)
}

/// One-shot MurmurHash3 x64-128 (seed 0), truncated to the lower 64 bits.
///
/// This is `h1` of the reference digest, so it equals `hash_128(bytes) as u64`.
/// `h2` is still computed because it feeds `h1` during finalization.
#[inline]
pub const fn hash64(bytes: &[u8]) -> u64 {
    base_hash::<false>(bytes, 0).0
}
/// One-shot MurmurHash3 x64-128 (seed 0) with the full 128-bit output.
///
/// `h1` occupies the lower 64 bits and `h2` the upper 64 bits.
#[inline]
pub const fn hash_128(bytes: &[u8]) -> u128 {
    let (h1, h2) = base_hash::<false>(bytes, 0);
    u64s_to_u128(h1, h2)
}

/// The variant used by Cassandra's `Murmur3Partitioner`.
///
/// Bytes in the trailing `len % 16` are sign-extended before they are shifted into place,
/// so results only differ from the reference when one of those bytes is `>= 0x80`.
/// Use this one when the values must match tokens assigned by a Cassandra cluster.
pub mod cassandra {
    use super::*;

    /// One-shot Cassandra-compatible MurmurHash3 x64-128, lower 64 bits.
    #[inline]
    pub const fn hash64(bytes: &[u8]) -> u64 {
        base_hash::<true>(bytes, 0).0
    }
    /// One-shot Cassandra-compatible MurmurHash3 x64-128 with the full 128-bit output.
    #[inline]
    pub const fn hash_128(bytes: &[u8]) -> u128 {
        let (h1, h2) = base_hash::<true>(bytes, 0);
        u64s_to_u128(h1, h2)
    }
}
