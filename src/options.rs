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

use bitflags::bitflags;

use crate::error::Error;
use crate::error::Result;

bitflags! {
    /// Decode options. The empty set is strict RFC 8259 JSON.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParseFlags: u32 {
        /// Allow C style `//` and `/* ... */` comments, skipped as whitespace.
        const COMMENTS = 1 << 0;
        /// Treat the Unicode recommended line terminators (VT, FF, NEL,
        /// U+2028, U+2029) as whitespace in addition to CR and LF.
        const UNICODE_NEWLINES = 1 << 1;
        /// Replace malformed UTF-8 sequences with U+FFFD instead of failing.
        const LOOSE_UNICODE = 1 << 2;
        /// Ignore trailing bytes after a complete document.
        const PERMIT_TEXT_AFTER_VALID_JSON = 1 << 3;
    }
}

bitflags! {
    /// Encode options. The empty set emits compact JSON.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SerializeFlags: u32 {
        /// Emit all non-ASCII code points as `\uXXXX` escapes.
        const ESCAPE_UNICODE = 1 << 0;
        /// Indented multi-line output.
        const PRETTY = 1 << 1;
    }
}

impl ParseFlags {
    /// Builds a flag set from a raw options word, rejecting unknown bits.
    pub fn from_bits_checked(bits: u32) -> Result<ParseFlags> {
        ParseFlags::from_bits(bits).ok_or(Error::InvalidFlags(bits))
    }
}

impl SerializeFlags {
    /// Builds a flag set from a raw options word, rejecting unknown bits.
    pub fn from_bits_checked(bits: u32) -> Result<SerializeFlags> {
        SerializeFlags::from_bits(bits).ok_or(Error::InvalidFlags(bits))
    }
}
