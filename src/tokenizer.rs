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

use std::borrow::Cow;

use crate::buffer::ManagedBuffer;
use crate::constants::FF_BYTE;
use crate::constants::VT;
use crate::error::Error;
use crate::error::LexErrorCode;
use crate::error::Position;
use crate::error::Result;
use crate::error::StructureErrorCode;
use crate::number::Number;
use crate::options::ParseFlags;
use crate::util::unescape_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A string literal. `has_escapes` selects the materialization path:
    /// escape-free strings can alias the source bytes directly.
    String { has_escapes: bool },
    Number,
    True,
    False,
    Null,
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Comma,
    Colon,
    Eof,
}

/// One lexical token. `raw` is the token's source bytes: for strings the
/// content between the quotes, for everything else the full literal.
/// Scanning validates shape only; the value is materialized on demand so
/// the token cache can skip that work on a hit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) raw: &'a [u8],
    pub(crate) start: Position,
}

/// Scans the input byte range and produces one token at a time.
///
/// Tracks line and column for diagnostics, keeps the previous token's start
/// position so "expected X after Y" errors can reference both locations,
/// and supports one token of putback.
pub(crate) struct Tokenizer<'a> {
    buf: &'a [u8],
    idx: usize,
    line: usize,
    line_start: usize,
    flags: ParseFlags,
    token_start: Position,
    prev_start: Position,
    scratch: ManagedBuffer,
    putback: Option<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(buf: &'a [u8], flags: ParseFlags) -> Tokenizer<'a> {
        Tokenizer {
            buf,
            idx: 0,
            line: 1,
            line_start: 0,
            flags,
            token_start: Position::new(0, 1, 1),
            prev_start: Position::new(0, 1, 1),
            scratch: ManagedBuffer::new(),
            putback: None,
        }
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.idx, self.line, self.idx - self.line_start + 1)
    }

    /// Start of the most recent token before the current one.
    pub(crate) fn prev_token_start(&self) -> Position {
        self.prev_start
    }

    /// Returns the next token to `next_token`. Only one token deep.
    pub(crate) fn putback(&mut self, token: Token<'a>) {
        debug_assert!(self.putback.is_none());
        self.putback = Some(token);
    }

    /// Skips trailing whitespace (and comments, when enabled) after a
    /// complete document. Returns the position of the first leftover byte,
    /// or `None` when the input is exhausted.
    pub(crate) fn remainder(&mut self) -> Result<Option<Position>> {
        debug_assert!(self.putback.is_none());
        self.skip_whitespace()?;
        if self.idx < self.buf.len() {
            Ok(Some(self.position()))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Token<'a>> {
        if let Some(token) = self.putback.take() {
            return Ok(token);
        }
        self.skip_whitespace()?;
        self.prev_start = self.token_start;
        self.token_start = self.position();

        let start = self.token_start;
        let c = match self.buf.get(self.idx) {
            Some(c) => *c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    raw: &self.buf[self.idx..],
                    start,
                })
            }
        };
        match c {
            b'{' => Ok(self.punct(TokenKind::ObjectOpen)),
            b'}' => Ok(self.punct(TokenKind::ObjectClose)),
            b'[' => Ok(self.punct(TokenKind::ArrayOpen)),
            b']' => Ok(self.punct(TokenKind::ArrayClose)),
            b',' => Ok(self.punct(TokenKind::Comma)),
            b':' => Ok(self.punct(TokenKind::Colon)),
            b'"' => self.scan_string(),
            b'-' | b'0'..=b'9' => self.scan_number(),
            b'n' => self.scan_ident(b"null", TokenKind::Null),
            b't' => self.scan_ident(b"true", TokenKind::True),
            b'f' => self.scan_ident(b"false", TokenKind::False),
            _ => Err(Error::Structure(
                StructureErrorCode::ExpectedSomeValue,
                start,
                None,
            )),
        }
    }

    fn punct(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.token_start;
        let raw = &self.buf[self.idx..self.idx + 1];
        self.idx += 1;
        Token { kind, raw, start }
    }

    fn newline(&mut self, width: usize) {
        self.idx += width;
        self.line += 1;
        self.line_start = self.idx;
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.buf.get(self.idx) {
                Some(b' ') | Some(b'\t') => self.idx += 1,
                Some(b'\n') => self.newline(1),
                Some(b'\r') => {
                    // CRLF counts as a single newline.
                    if self.buf.get(self.idx + 1) == Some(&b'\n') {
                        self.newline(2);
                    } else {
                        self.newline(1);
                    }
                }
                Some(b'/') if self.flags.contains(ParseFlags::COMMENTS) => {
                    self.skip_comment()?;
                }
                Some(c) if self.flags.contains(ParseFlags::UNICODE_NEWLINES) => {
                    match *c {
                        VT | FF_BYTE => self.idx += 1,
                        // U+0085 NEL.
                        0xC2 if self.buf.get(self.idx + 1) == Some(&0x85) => self.newline(2),
                        // U+2028 LS and U+2029 PS.
                        0xE2 if self.buf.get(self.idx + 1) == Some(&0x80)
                            && matches!(self.buf.get(self.idx + 2), Some(&0xA8) | Some(&0xA9)) =>
                        {
                            self.newline(3)
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    // `//` to end of line, `/* ... */` possibly spanning lines. Only
    // entered when COMMENTS is set.
    fn skip_comment(&mut self) -> Result<()> {
        let start = self.position();
        match self.buf.get(self.idx + 1) {
            Some(b'/') => {
                self.idx += 2;
                while let Some(c) = self.buf.get(self.idx) {
                    if *c == b'\n' || *c == b'\r' {
                        break;
                    }
                    self.idx += 1;
                }
                Ok(())
            }
            Some(b'*') => {
                self.idx += 2;
                loop {
                    match self.buf.get(self.idx) {
                        Some(b'*') if self.buf.get(self.idx + 1) == Some(&b'/') => {
                            self.idx += 2;
                            return Ok(());
                        }
                        Some(b'\n') => self.newline(1),
                        Some(b'\r') => {
                            if self.buf.get(self.idx + 1) == Some(&b'\n') {
                                self.newline(2);
                            } else {
                                self.newline(1);
                            }
                        }
                        Some(_) => self.idx += 1,
                        None => {
                            return Err(Error::Lex(LexErrorCode::UnterminatedComment, start));
                        }
                    }
                }
            }
            _ => Err(Error::Structure(
                StructureErrorCode::ExpectedSomeValue,
                start,
                None,
            )),
        }
    }

    fn scan_ident(&mut self, ident: &'static [u8], kind: TokenKind) -> Result<Token<'a>> {
        let start = self.token_start;
        let begin = self.idx;
        for (i, expected) in ident.iter().enumerate() {
            match self.buf.get(begin + i) {
                Some(c) if c == expected => {}
                Some(_) => {
                    return Err(Error::Lex(
                        LexErrorCode::ExpectedIdent,
                        Position::new(begin + i, self.line, begin + i - self.line_start + 1),
                    ))
                }
                None => {
                    return Err(Error::Lex(
                        LexErrorCode::UnexpectedEof,
                        self.end_position(),
                    ))
                }
            }
        }
        self.idx = begin + ident.len();
        Ok(Token {
            kind,
            raw: &self.buf[begin..self.idx],
            start,
        })
    }

    fn end_position(&self) -> Position {
        Position::new(
            self.buf.len(),
            self.line,
            self.buf.len() - self.line_start + 1,
        )
    }

    // Scans a string literal, counting escapes but deferring their
    // decoding to materialization. Raw control characters are rejected
    // here so the unescape pass never sees them.
    fn scan_string(&mut self) -> Result<Token<'a>> {
        let start = self.token_start;
        self.idx += 1;
        let content_start = self.idx;
        let mut has_escapes = false;
        loop {
            match self.buf.get(self.idx) {
                Some(b'"') => {
                    let raw = &self.buf[content_start..self.idx];
                    self.idx += 1;
                    return Ok(Token {
                        kind: TokenKind::String { has_escapes },
                        raw,
                        start,
                    });
                }
                Some(b'\\') => {
                    has_escapes = true;
                    if self.idx + 1 >= self.buf.len() {
                        return Err(Error::Lex(LexErrorCode::UnterminatedString, start));
                    }
                    self.idx += 2;
                }
                Some(c) if *c < 0x20 => {
                    return Err(Error::Lex(
                        LexErrorCode::ControlCharacterInString,
                        self.position(),
                    ));
                }
                Some(_) => self.idx += 1,
                None => return Err(Error::Lex(LexErrorCode::UnterminatedString, start)),
            }
        }
    }

    // Strict RFC 8259 number grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)?
    // ([eE] [+-]? [0-9]+)?`. Classification happens in `materialize_number`.
    fn scan_number(&mut self) -> Result<Token<'a>> {
        let start = self.token_start;
        let begin = self.idx;

        if self.buf.get(self.idx) == Some(&b'-') {
            self.idx += 1;
        }
        match self.buf.get(self.idx) {
            Some(b'0') => {
                self.idx += 1;
                // Leading zeros are not valid JSON.
                if matches!(self.buf.get(self.idx), Some(c) if c.is_ascii_digit()) {
                    return Err(Error::Lex(LexErrorCode::InvalidNumberValue, self.position()));
                }
            }
            Some(c) if c.is_ascii_digit() => {
                self.step_digits();
            }
            Some(_) => {
                return Err(Error::Lex(LexErrorCode::InvalidNumberValue, self.position()));
            }
            None => return Err(Error::Lex(LexErrorCode::UnexpectedEof, self.end_position())),
        }

        if self.buf.get(self.idx) == Some(&b'.') {
            self.idx += 1;
            if self.step_digits() == 0 {
                return Err(Error::Lex(LexErrorCode::InvalidNumberValue, self.position()));
            }
        }

        if matches!(self.buf.get(self.idx), Some(b'e') | Some(b'E')) {
            self.idx += 1;
            if matches!(self.buf.get(self.idx), Some(b'+') | Some(b'-')) {
                self.idx += 1;
            }
            if self.step_digits() == 0 {
                return Err(Error::Lex(LexErrorCode::InvalidNumberValue, self.position()));
            }
        }

        Ok(Token {
            kind: TokenKind::Number,
            raw: &self.buf[begin..self.idx],
            start,
        })
    }

    fn step_digits(&mut self) -> usize {
        let begin = self.idx;
        while matches!(self.buf.get(self.idx), Some(c) if c.is_ascii_digit()) {
            self.idx += 1;
        }
        self.idx - begin
    }

    /// Decodes a string token's content.
    ///
    /// Escape-free valid UTF-8 aliases the source bytes (zero-copy);
    /// everything else is unescaped into the recycled scratch buffer.
    pub(crate) fn materialize_string(&mut self, token: &Token<'a>) -> Result<Cow<'a, str>> {
        let base = Position::new(
            token.start.offset + 1,
            token.start.line,
            token.start.column + 1,
        );
        let loose = self.flags.contains(ParseFlags::LOOSE_UNICODE);
        match token.kind {
            TokenKind::String { has_escapes: false } => match std::str::from_utf8(token.raw) {
                Ok(s) => Ok(Cow::Borrowed(s)),
                Err(err) => {
                    if loose {
                        Ok(Cow::Owned(String::from_utf8_lossy(token.raw).into_owned()))
                    } else {
                        let bad = err.valid_up_to();
                        Err(Error::Encoding(Position::new(
                            base.offset + bad,
                            base.line,
                            base.column + bad,
                        )))
                    }
                }
            },
            TokenKind::String { has_escapes: true } => {
                let s = unescape_string(token.raw, base, loose, &mut self.scratch)?;
                Ok(Cow::Owned(s))
            }
            _ => unreachable!("materialize_string on a non-string token"),
        }
    }
}

/// Converts a scanned numeric literal into a `Number`.
///
/// Integers prefer i64, fall back to u64 for non-negative values beyond the
/// signed range, and to f64 when 64 bits overflow. Literals with a fraction
/// or exponent always become floats.
pub(crate) fn materialize_number(token: &Token<'_>) -> Result<Number> {
    let raw = token.raw;
    let is_float = raw.iter().any(|c| matches!(c, b'.' | b'e' | b'E'));
    if !is_float {
        let (negative, digits) = match raw.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, raw),
        };
        // 20 digits can still fit u64::MAX; anything longer cannot.
        if digits.len() <= 20 {
            let mut value: u128 = 0;
            for d in digits {
                value = value * 10 + u128::from(d - b'0');
            }
            if negative {
                if value <= i64::MAX as u128 + 1 {
                    return Ok(Number::Int64((value as i128).wrapping_neg() as i64));
                }
            } else if value <= i64::MAX as u128 {
                return Ok(Number::Int64(value as i64));
            } else if value <= u64::MAX as u128 {
                return Ok(Number::UInt64(value as u64));
            }
        }
    }
    match fast_float2::parse(raw) {
        Ok(v) => Ok(Number::Float64(v)),
        Err(_) => Err(Error::Lex(LexErrorCode::InvalidNumberValue, token.start)),
    }
}
