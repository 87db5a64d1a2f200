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

// JSON text constants
pub(crate) const UNICODE_LEN: usize = 4;

// JSON text escape characters constants
pub(crate) const BS: char = '\x5C'; // \\ Backslash
pub(crate) const QU: char = '\x22'; // \" Double quotation mark
pub(crate) const SD: char = '\x2F'; // \/ Slash or divide
pub(crate) const BB: char = '\x08'; // \b Backspace
pub(crate) const FF: char = '\x0C'; // \f Formfeed Page Break
pub(crate) const NN: char = '\x0A'; // \n Newline
pub(crate) const RR: char = '\x0D'; // \r Carriage Return
pub(crate) const TT: char = '\x09'; // \t Horizontal Tab

// Extra whitespace recognized under `ParseFlags::UNICODE_NEWLINES`.
// NEL, LS and PS are multi-byte and matched as UTF-8 sequences in the
// tokenizer.
pub(crate) const VT: u8 = 0x0B; // Vertical Tab
pub(crate) const FF_BYTE: u8 = 0x0C; // Form Feed

// Container nesting limit for the object stack. Bounds worst-case memory
// on adversarial input independent of the host call stack.
pub(crate) const DEFAULT_MAX_DEPTH: usize = 512;

// Token cache sizing. Lookups and evictions scan at most
// CACHE_PROBE_WINDOW slots starting at the hash-selected base. Ages
// saturate at MAX_CACHE_AGE and decay toward zero as the eviction sweep
// passes; fresh entries start partway up so a single sweep cannot evict
// them before they have a chance to hit.
pub(crate) const DEFAULT_CACHE_SLOTS: usize = 256;
pub(crate) const CACHE_PROBE_WINDOW: usize = 8;
pub(crate) const MAX_CACHE_AGE: u8 = 63;
pub(crate) const INITIAL_CACHE_AGE: u8 = 4;

// Managed buffers round their capacity up to a multiple of this.
pub(crate) const DEFAULT_BUFFER_ROUND: usize = 4096;

// Object stack frame storage grows in steps of this many frames.
pub(crate) const STACK_ROUND: usize = 16;
