// Copyright 2024 The Jsonic Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::constants::CACHE_PROBE_WINDOW;
use crate::constants::INITIAL_CACHE_AGE;
use crate::constants::MAX_CACHE_AGE;
use crate::error::Result;
use crate::number::Number;

/// A scalar value materialized from a token, as stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CachedValue {
    String(String),
    Number(Number),
}

/// Value kind of a cached token. Two tokens with identical bytes but
/// different kinds never alias each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheKind {
    String,
    Number,
}

#[derive(Debug)]
struct CacheItem {
    hash: u64,
    bytes: Vec<u8>,
    kind: CacheKind,
    value: CachedValue,
    age: u8,
}

/// A fixed-capacity cache that deduplicates repeated scalar tokens.
///
/// Repeated documents and repeated keys within one document very often
/// repeat identical scalar tokens; re-decoding identical bytes is wasted
/// work. The token hash selects a slot and a short probe window past it
/// is scanned for a (hash, length, bytes, kind) match, so lookup cost is
/// bounded by the window, not the capacity. Eviction is a clock sweep
/// over the same window: a zero-age slot is the victim and every
/// non-zero age passed over is decremented, giving approximate LRU
/// behavior without a recency list.
#[derive(Debug)]
pub(crate) struct TokenCache {
    items: Vec<Option<CacheItem>>,
}

/// FNV-1a over the raw token bytes.
pub(crate) fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl TokenCache {
    pub(crate) fn new(slots: usize) -> TokenCache {
        let mut items = Vec::with_capacity(slots);
        items.resize_with(slots, || None);
        TokenCache { items }
    }

    fn probe_window(&self) -> usize {
        CACHE_PROBE_WINDOW.min(self.items.len())
    }

    /// Returns the cached value for the token bytes, materializing and
    /// inserting on a miss. The materializer is not called on a hit.
    pub(crate) fn lookup_or_insert<F>(
        &mut self,
        bytes: &[u8],
        kind: CacheKind,
        materialize: F,
    ) -> Result<CachedValue>
    where
        F: FnOnce() -> Result<CachedValue>,
    {
        if self.items.is_empty() {
            return materialize();
        }

        let hash = hash_bytes(bytes);
        let base = hash as usize % self.items.len();
        for i in 0..self.probe_window() {
            let idx = (base + i) % self.items.len();
            if let Some(item) = &mut self.items[idx] {
                if item.hash == hash
                    && item.kind == kind
                    && item.bytes.len() == bytes.len()
                    && item.bytes == bytes
                {
                    item.age = item.age.saturating_add(1).min(MAX_CACHE_AGE);
                    return Ok(item.value.clone());
                }
            }
        }

        let value = materialize()?;
        let item = CacheItem {
            hash,
            bytes: bytes.to_vec(),
            kind,
            value: value.clone(),
            age: INITIAL_CACHE_AGE,
        };
        self.insert(base, item);
        Ok(value)
    }

    // Clock eviction confined to the probe window: sweep from `base`
    // until an empty or zero-age slot turns up, decrementing each age
    // passed over. Ages are bounded, so some slot reaches zero within
    // MAX_CACHE_AGE sweeps.
    fn insert(&mut self, base: usize, item: CacheItem) {
        let window = self.probe_window();
        loop {
            for i in 0..window {
                let idx = (base + i) % self.items.len();
                let victim = match &mut self.items[idx] {
                    None => true,
                    Some(occupant) if occupant.age == 0 => true,
                    Some(occupant) => {
                        occupant.age -= 1;
                        false
                    }
                };
                if victim {
                    self.items[idx] = Some(item);
                    return;
                }
            }
        }
    }

    /// Empties every slot.
    pub(crate) fn clear(&mut self) {
        for slot in self.items.iter_mut() {
            *slot = None;
        }
    }
}
