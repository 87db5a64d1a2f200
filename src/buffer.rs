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

use crate::constants::DEFAULT_BUFFER_ROUND;
use crate::error::Error;
use crate::error::Result;

/// A growable byte buffer with a round-up allocation policy.
///
/// Used both as decode scratch space (string unescaping) and as the encode
/// output sink. Capacity grows in multiples of the configured rounding size
/// to amortize reallocation and never shrinks during a decode or encode
/// pass; `clear` resets the logical length but keeps the allocation.
///
/// Growth goes through `try_reserve_exact`, so allocation failure is
/// reported as `Error::Resource` instead of aborting.
#[derive(Debug, Default)]
pub(crate) struct ManagedBuffer {
    bytes: Vec<u8>,
    round_to: usize,
}

fn round_up(n: usize, multiple: usize) -> usize {
    debug_assert!(multiple > 0);
    match n % multiple {
        0 => n,
        rem => n + (multiple - rem),
    }
}

impl ManagedBuffer {
    pub(crate) fn new() -> ManagedBuffer {
        ManagedBuffer::with_round_to(DEFAULT_BUFFER_ROUND)
    }

    pub(crate) fn with_round_to(round_to: usize) -> ManagedBuffer {
        ManagedBuffer {
            bytes: Vec::new(),
            round_to: round_to.max(1),
        }
    }

    /// Grows the buffer so that `additional` more bytes fit, rounding the new
    /// capacity up to the configured multiple. Existing content is preserved.
    pub(crate) fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .bytes
            .len()
            .checked_add(additional)
            .ok_or(Error::Resource)?;
        if needed <= self.bytes.capacity() {
            return Ok(());
        }
        let target = round_up(needed, self.round_to);
        self.bytes
            .try_reserve_exact(target - self.bytes.len())
            .map_err(|_| Error::Resource)
    }

    /// Copies `data` onto the tail of the buffer and advances the logical
    /// length. Fails only on allocation failure.
    pub(crate) fn append(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_capacity(data.len())?;
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<()> {
        self.ensure_capacity(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Resets the logical length without releasing capacity, so the buffer
    /// can be recycled between tokens.
    pub(crate) fn clear(&mut self) {
        self.bytes.clear();
    }

    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}
