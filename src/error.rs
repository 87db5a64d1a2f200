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

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

pub type Result<T> = std::result::Result<T, Error>;

/// A location in the input byte range.
///
/// `offset` is the byte offset from the start of the input, `line` and
/// `column` are 1-based. Columns count bytes, not grapheme clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub(crate) fn new(offset: usize, line: usize, column: usize) -> Position {
        Position {
            offset,
            line,
            column,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos {}, line {}, column {}",
            self.offset, self.line, self.column
        )
    }
}

/// Lexical failures: a token itself is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorCode {
    UnexpectedEof,
    InvalidNumberValue,
    InvalidEscaped(u8),
    InvalidHex(u8),
    UnexpectedEndOfHexEscape,
    UnpairedSurrogate,
    UnterminatedString,
    UnterminatedComment,
    ControlCharacterInString,
    ExpectedIdent,
}

impl LexErrorCode {
    fn message(&self) -> String {
        match self {
            LexErrorCode::UnexpectedEof => "EOF while parsing a value".to_string(),
            LexErrorCode::InvalidNumberValue => "invalid number".to_string(),
            LexErrorCode::InvalidEscaped(c) => {
                format!("invalid escape character `{}`", *c as char)
            }
            LexErrorCode::InvalidHex(c) => format!("invalid hex character `{}`", *c as char),
            LexErrorCode::UnexpectedEndOfHexEscape => "unexpected end of hex escape".to_string(),
            LexErrorCode::UnpairedSurrogate => "unpaired surrogate in hex escape".to_string(),
            LexErrorCode::UnterminatedString => "unterminated string".to_string(),
            LexErrorCode::UnterminatedComment => "unterminated block comment".to_string(),
            LexErrorCode::ControlCharacterInString => "control character in string".to_string(),
            LexErrorCode::ExpectedIdent => "expected ident".to_string(),
        }
    }
}

/// Grammar failures: every token is well formed but the sequence is not
/// valid JSON, or the nesting limit was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureErrorCode {
    ExpectedSomeValue,
    ExpectedObjectKey,
    ExpectedColon,
    ExpectedArrayCommaOrEnd,
    ExpectedObjectCommaOrEnd,
    ObjectKeyWithoutValue,
    DepthLimitExceeded,
}

impl StructureErrorCode {
    fn message(&self) -> &'static str {
        match self {
            StructureErrorCode::ExpectedSomeValue => "expected a value",
            StructureErrorCode::ExpectedObjectKey => "expected an object key or `}`",
            StructureErrorCode::ExpectedColon => "expected `:`",
            StructureErrorCode::ExpectedArrayCommaOrEnd => "expected `,` or `]`",
            StructureErrorCode::ExpectedObjectCommaOrEnd => "expected `,` or `}`",
            StructureErrorCode::ObjectKeyWithoutValue => "object key without a value",
            StructureErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
        }
    }
}

/// Encode-side failures: the value tree holds something JSON cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueErrorCode {
    NonFiniteNumber,
}

impl ValueErrorCode {
    fn message(&self) -> &'static str {
        match self {
            ValueErrorCode::NonFiniteNumber => "NaN and Infinity have no JSON representation",
        }
    }
}

/// The error type for decode and encode operations.
///
/// Decode-side variants carry the position at which the failure was detected;
/// structure errors additionally carry the position where the enclosing
/// container was opened, when one is relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A malformed token (bad escape, bad number literal, ...).
    Lex(LexErrorCode, Position),
    /// Invalid UTF-8 in the input without `ParseFlags::LOOSE_UNICODE`.
    Encoding(Position),
    /// A JSON grammar violation or an exceeded nesting limit.
    Structure(StructureErrorCode, Position, Option<Position>),
    /// Unconsumed input after a complete document.
    TrailingData(Position),
    /// An unrepresentable value on the encode side.
    Value(ValueErrorCode),
    /// Allocation failure. Fatal, never retried.
    Resource,
    /// An options word with unknown bits set.
    InvalidFlags(u32),
}

impl Error {
    /// The input position the error was detected at, for decode-side errors.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex(_, pos)
            | Error::Encoding(pos)
            | Error::Structure(_, pos, _)
            | Error::TrailingData(pos) => Some(*pos),
            Error::Value(_) | Error::Resource | Error::InvalidFlags(_) => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(code, pos) => write!(f, "{}, {}", code.message(), pos),
            Error::Encoding(pos) => write!(f, "invalid UTF-8 sequence, {}", pos),
            Error::Structure(code, pos, opened) => {
                write!(f, "{}, {}", code.message(), pos)?;
                if let Some(opened) = opened {
                    write!(f, ", container started at pos {}", opened.offset)?;
                }
                Ok(())
            }
            Error::TrailingData(pos) => write!(f, "trailing characters, {}", pos),
            Error::Value(code) => write!(f, "{}", code.message()),
            Error::Resource => write!(f, "out of memory"),
            Error::InvalidFlags(bits) => write!(f, "unrecognized option flags {:#x}", bits),
        }
    }
}

impl std::error::Error for Error {}
