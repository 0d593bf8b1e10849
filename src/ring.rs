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
use alloc::vec::Vec;
use log::{debug, warn};

/// Ring tokens in ascending order, each with the owner (node, shard, ...) holding it.
///
/// A key belongs to the first token at or after the key's own token, wrapping around to the
/// smallest token once past the largest.
#[derive(Clone, Debug)]
pub struct TokenRing<H> {
    entries: Vec<(Token, H)>,
}

impl<H> TokenRing<H> {
    /// Builds a ring from typed tokens. If a token appears more than once, the last owner wins.
    pub fn new<I>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Token, H)>,
    {
        let mut entries = tokens.into_iter().collect::<Vec<_>>();
        // Stable sort of the reversed input keeps the last owner first within a token.
        entries.reverse();
        entries.sort_by_key(|(token, _)| *token);
        entries.dedup_by_key(|(token, _)| *token);

        if entries.is_empty() {
            return Err(Error::EmptyRing);
        }
        debug!("token ring built with {} tokens", entries.len());
        Ok(Self { entries })
    }

    /// Builds a ring from token strings as reported by the cluster.
    ///
    /// Unparsable tokens are skipped with a warning rather than failing the whole ring.
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, H)>,
        S: AsRef<str>,
    {
        Self::new(tokens.into_iter().filter_map(|(text, owner)| {
            let text = text.as_ref();
            match Murmur3Partitioner.parse_token(text) {
                Ok(token) => Some((token, owner)),
                Err(err) => {
                    warn!("skipping token {:?}: {}", text, err);
                    None
                }
            }
        }))
    }

    #[inline]
    fn position(&self, token: Token) -> usize {
        let idx = self.entries.partition_point(|(t, _)| *t < token);
        if idx == self.entries.len() {
            0
        } else {
            idx
        }
    }

    /// Owner of `partition_key`.
    pub fn owner(&self, partition_key: &[u8]) -> &H {
        self.owner_of(Murmur3Partitioner.create_token(partition_key))
    }
    /// Owner of an already computed token.
    pub fn owner_of(&self, token: Token) -> &H {
        &self.entries[self.position(token)].1
    }

    /// Replicas of `partition_key` under simple placement: the owner, then the owners of the
    /// following `factor - 1` ring positions. `factor` is capped at the number of tokens.
    ///
    /// With several tokens per owner the same owner can show up more than once.
    pub fn replicas(&self, partition_key: &[u8], factor: usize) -> impl Iterator<Item = &H> + '_ {
        self.replicas_of(Murmur3Partitioner.create_token(partition_key), factor)
    }
    /// Like [`Self::replicas`], starting from an already computed token.
    pub fn replicas_of(&self, token: Token, factor: usize) -> impl Iterator<Item = &H> + '_ {
        let start = self.position(token);
        let len = self.entries.len();
        (0..factor.min(len)).map(move |j| &self.entries[(start + j) % len].1)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// Always `false`: construction rejects empty rings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens in ascending order.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.entries.iter().map(|(token, _)| *token)
    }
    /// `(token, owner)` pairs in ascending token order.
    pub fn iter(&self) -> impl Iterator<Item = (Token, &H)> + '_ {
        self.entries.iter().map(|(token, owner)| (*token, owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::{sync::Arc, thread, vec, vec::Vec};

    const A: &str = "-3074457345618258603";
    const B: &str = "3074457345618258602";
    const C: &str = "9223372036854775807";

    // Tokens of these keys: -7468325962851647638, 1446172840243228796, 7162290910810015547.
    const KEY_IN_A: &[u8] = b"123";
    const KEY_IN_B: &[u8] = b"\x10\x10\x10\x10\x10\x10\x10\x10";
    const KEY_IN_C: &[u8] = b"9223372036854775807";

    fn three_nodes() -> TokenRing<&'static str> {
        TokenRing::parse([(C, "c"), (A, "a"), (B, "b")]).unwrap()
    }

    #[test]
    fn owner() {
        let ring = three_nodes();
        assert_eq!(*ring.owner(KEY_IN_A), "a");
        assert_eq!(*ring.owner(KEY_IN_B), "b");
        assert_eq!(*ring.owner(KEY_IN_C), "c");

        // A token equal to a ring token belongs to that token.
        assert_eq!(*ring.owner_of(Token(3074457345618258602)), "b");
        assert_eq!(*ring.owner_of(Token(3074457345618258603)), "c");
        assert_eq!(*ring.owner_of(Token::MIN), "a");
        assert_eq!(*ring.owner_of(Token::MAX), "c");
    }

    #[test]
    fn wraps_past_largest_token() {
        let ring = TokenRing::parse([(A, "a"), (B, "b")]).unwrap();
        assert_eq!(*ring.owner(KEY_IN_C), "a");
        assert_eq!(ring.replicas(KEY_IN_C, 2).collect::<Vec<_>>(), [&"a", &"b"]);
    }

    #[test]
    fn replicas() {
        let ring = three_nodes();
        assert_eq!(ring.replicas(KEY_IN_A, 1).collect::<Vec<_>>(), [&"a"]);
        assert_eq!(ring.replicas(KEY_IN_A, 2).collect::<Vec<_>>(), [&"a", &"b"]);
        assert_eq!(ring.replicas(KEY_IN_C, 2).collect::<Vec<_>>(), [&"c", &"a"]);
        assert_eq!(ring.replicas(KEY_IN_B, 5).collect::<Vec<_>>(), [&"b", &"c", &"a"]);
        assert_eq!(ring.replicas(KEY_IN_B, 0).count(), 0);
    }

    #[test]
    fn sorted_and_deduplicated() {
        let ring = TokenRing::new([(Token(5), 1), (Token(-5), 2), (Token(5), 3), (Token(0), 4)]).unwrap();
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_empty());
        assert_eq!(ring.tokens().collect::<Vec<_>>(), [Token(-5), Token(0), Token(5)]);
        assert_eq!(ring.iter().collect::<Vec<_>>(), [(Token(-5), &2), (Token(0), &4), (Token(5), &3)]);
    }

    #[test]
    fn skips_bad_tokens() {
        let ring = TokenRing::parse(vec![("nope", 0), (A, 1), ("", 2), (B, 3)]).unwrap();
        assert_eq!(ring.len(), 2);
        assert_eq!(*ring.owner(KEY_IN_B), 3);
    }

    #[test]
    fn empty_ring() {
        assert_eq!(TokenRing::<u8>::new([]).unwrap_err(), Error::EmptyRing);
        assert_eq!(TokenRing::parse([("x", 0u8), ("1e3", 1)]).unwrap_err(), Error::EmptyRing);
    }

    #[test]
    fn shared_between_threads() {
        let ring = Arc::new(three_nodes());
        let keys: [&[u8]; 3] = [KEY_IN_A, KEY_IN_B, KEY_IN_C];
        let handles = keys
            .into_iter()
            .map(|key| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || *ring.owner(key))
            })
            .collect::<Vec<_>>();
        let owners = handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>();
        assert_eq!(owners, ["a", "b", "c"]);
    }
}
