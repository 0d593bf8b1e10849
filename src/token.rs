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
use core::{fmt, str::FromStr};

/// A position on a Murmur3 token ring.
///
/// Cassandra stores and orders tokens as signed 64-bit integers, so this is the signed view
/// of a [`cassandra::hash64`] value. The bit pattern is unchanged by the conversion.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Token(pub i64);

impl Token {
    /// Smallest token. Cassandra reserves it as the ring's minimum, no key hashes to it.
    pub const MIN: Self = Self(i64::MIN);
    /// Largest token.
    pub const MAX: Self = Self(i64::MAX);

    /// Reinterprets the bits of a hash as a token.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits as i64)
    }
    /// The raw bit pattern, as produced by the hash.
    #[inline]
    pub const fn to_bits(self) -> u64 {
        self.0 as u64
    }
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
impl From<Token> for i64 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Cassandra's default partitioner: a key's token is its Cassandra-flavoured Murmur3 hash.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Murmur3Partitioner;

impl Murmur3Partitioner {
    /// Fully qualified class name Cassandra reports for this partitioner.
    pub const NAME: &'static str = "org.apache.cassandra.dht.Murmur3Partitioner";

    /// Token owning `partition_key`, as computed by the cluster.
    #[inline]
    pub const fn create_token(&self, partition_key: &[u8]) -> Token {
        token_of(cassandra::hash64(partition_key))
    }

    /// Parses a token as found in `system.local` / `system.peers`.
    pub fn parse_token(&self, token: &str) -> Result<Token> {
        token.parse()
    }

    #[allow(missing_docs)]
    pub const fn min_token(&self) -> Token {
        Token::MIN
    }
    #[allow(missing_docs)]
    pub const fn max_token(&self) -> Token {
        Token::MAX
    }
    #[allow(missing_docs)]
    pub const fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[inline(always)]
const fn token_of(hash: u64) -> Token {
    let token = Token::from_bits(hash);
    if unlikely(token.0 == i64::MIN) {
        Token::MAX
    } else {
        token
    }
}
