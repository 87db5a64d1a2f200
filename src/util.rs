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

use crate::buffer::ManagedBuffer;
use crate::constants::*;
use crate::error::Error;
use crate::error::LexErrorCode;
use crate::error::Position;
use crate::error::Result;

#[allow(clippy::zero_prefixed_literal)]
static HEX: [u8; 256] = {
    const __: u8 = 255; // not a hex digit
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
        00, 01, 02, 03, 04, 05, 06, 07, 08, 09, __, __, __, __, __, __, // 3
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 5
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

// A position inside a string token. Strings cannot contain raw newlines,
// so only the offset and column move.
fn at(base: Position, rel: usize) -> Position {
    Position::new(base.offset + rel, base.line, base.column + rel)
}

#[inline]
fn decode_hex_val(val: u8) -> Option<u16> {
    let n = HEX[val as usize] as u16;
    if n == 255 {
        None
    } else {
        Some(n)
    }
}

#[inline]
fn decode_hex_escape(numbers: &[u8], pos: Position) -> Result<u16> {
    let mut n = 0;
    for number in numbers {
        if let Some(hex) = decode_hex_val(*number) {
            n = (n << 4) + hex;
        } else {
            return Err(Error::Lex(LexErrorCode::InvalidHex(*number), pos));
        }
    }
    Ok(n)
}

fn push_char(scratch: &mut ManagedBuffer, c: char) -> Result<()> {
    let mut tmp = [0u8; 4];
    scratch.append(c.encode_utf8(&mut tmp).as_bytes())
}

// Reads one `\uXXXX` escape starting after the `\u`, returning the code
// unit and the number of bytes consumed.
fn read_hex_unit(data: &[u8], idx: usize, base: Position) -> Result<u16> {
    if idx + UNICODE_LEN > data.len() {
        return Err(Error::Lex(
            LexErrorCode::UnexpectedEndOfHexEscape,
            at(base, idx),
        ));
    }
    decode_hex_escape(&data[idx..idx + UNICODE_LEN], at(base, idx))
}

/// Decodes the content of a string token that contains escape sequences
/// (and possibly non-ASCII bytes) into an owned string, using `scratch` as
/// the working buffer.
///
/// `data` is the token content between the quotes and `base` the position
/// of its first byte. Malformed UTF-8 fails with an encoding error unless
/// `loose` is set, in which case each malformed sequence becomes U+FFFD.
/// Under `loose`, unpaired surrogate escapes are likewise replaced.
pub(crate) fn unescape_string(
    data: &[u8],
    base: Position,
    loose: bool,
    scratch: &mut ManagedBuffer,
) -> Result<String> {
    scratch.clear();
    let mut idx = 0;
    while idx < data.len() {
        let byte = data[idx];
        if byte == b'\\' {
            idx = unescape_one(data, idx, base, loose, scratch)?;
        } else if byte < 0x80 {
            scratch.push(byte)?;
            idx += 1;
        } else {
            // Multi-byte sequence; validate it in place so errors carry the
            // exact input position.
            let len = utf8_sequence_len(byte);
            let end = (idx + len).min(data.len());
            match std::str::from_utf8(&data[idx..end]) {
                Ok(_) if len <= end - idx => {
                    scratch.append(&data[idx..end])?;
                    idx = end;
                }
                _ => {
                    if !loose {
                        return Err(Error::Encoding(at(base, idx)));
                    }
                    push_char(scratch, char::REPLACEMENT_CHARACTER)?;
                    idx += 1;
                }
            }
        }
    }
    Ok(String::from_utf8_lossy(scratch.as_slice()).into_owned())
}

fn utf8_sequence_len(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

// Decodes a single escape sequence starting at the backslash; returns the
// index just past it.
fn unescape_one(
    data: &[u8],
    start: usize,
    base: Position,
    loose: bool,
    scratch: &mut ManagedBuffer,
) -> Result<usize> {
    let mut idx = start + 1;
    let byte = match data.get(idx) {
        Some(byte) => *byte,
        None => {
            return Err(Error::Lex(
                LexErrorCode::UnexpectedEndOfHexEscape,
                at(base, start),
            ))
        }
    };
    idx += 1;
    match byte {
        b'\\' => push_char(scratch, BS)?,
        b'"' => push_char(scratch, QU)?,
        b'/' => push_char(scratch, SD)?,
        b'b' => push_char(scratch, BB)?,
        b'f' => push_char(scratch, FF)?,
        b'n' => push_char(scratch, NN)?,
        b'r' => push_char(scratch, RR)?,
        b't' => push_char(scratch, TT)?,
        b'u' => {
            let hex = read_hex_unit(data, idx, base)?;
            idx += UNICODE_LEN;

            match hex {
                0xDC00..=0xDFFF => {
                    // Low surrogate without a preceding high surrogate.
                    if !loose {
                        return Err(Error::Lex(LexErrorCode::UnpairedSurrogate, at(base, start)));
                    }
                    push_char(scratch, char::REPLACEMENT_CHARACTER)?;
                }
                // Non-BMP characters are encoded as a pair of hex escapes
                // representing UTF-16 surrogates.
                n1 @ 0xD800..=0xDBFF => {
                    if data.get(idx) == Some(&b'\\') && data.get(idx + 1) == Some(&b'u') {
                        let n2 = read_hex_unit(data, idx + 2, base)?;
                        if (0xDC00..=0xDFFF).contains(&n2) {
                            idx += 2 + UNICODE_LEN;
                            #[allow(clippy::precedence)]
                            let n = (((n1 - 0xD800) as u32) << 10 | (n2 - 0xDC00) as u32) + 0x1_0000;
                            match char::from_u32(n) {
                                Some(ch) => push_char(scratch, ch)?,
                                None => {
                                    if !loose {
                                        return Err(Error::Lex(
                                            LexErrorCode::UnpairedSurrogate,
                                            at(base, start),
                                        ));
                                    }
                                    push_char(scratch, char::REPLACEMENT_CHARACTER)?;
                                }
                            }
                        } else {
                            // High surrogate followed by a non-low escape.
                            if !loose {
                                return Err(Error::Lex(
                                    LexErrorCode::UnpairedSurrogate,
                                    at(base, start),
                                ));
                            }
                            push_char(scratch, char::REPLACEMENT_CHARACTER)?;
                        }
                    } else {
                        if !loose {
                            return Err(Error::Lex(
                                LexErrorCode::UnpairedSurrogate,
                                at(base, start),
                            ));
                        }
                        push_char(scratch, char::REPLACEMENT_CHARACTER)?;
                    }
                }
                n => match char::from_u32(n as u32) {
                    Some(ch) => push_char(scratch, ch)?,
                    None => {
                        if !loose {
                            return Err(Error::Lex(
                                LexErrorCode::UnpairedSurrogate,
                                at(base, start),
                            ));
                        }
                        push_char(scratch, char::REPLACEMENT_CHARACTER)?;
                    }
                },
            }
        }
        other => {
            return Err(Error::Lex(
                LexErrorCode::InvalidEscaped(other),
                at(base, start),
            ))
        }
    }
    Ok(idx)
}
