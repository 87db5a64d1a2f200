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
use crate::constants::BB;
use crate::constants::BS;
use crate::constants::FF;
use crate::constants::NN;
use crate::constants::QU;
use crate::constants::RR;
use crate::constants::TT;
use crate::error::Error;
use crate::error::Result;
use crate::error::ValueErrorCode;
use crate::number::Number;
use crate::options::SerializeFlags;
use crate::value::Value;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const INDENT: &[u8] = b"  ";

impl Value<'_> {
    /// Serializes `self` as compact JSON text.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        self.to_vec_with_options(SerializeFlags::empty())
    }

    /// Serializes `self` as JSON text with the given option flags.
    pub fn to_vec_with_options(&self, flags: SerializeFlags) -> Result<Vec<u8>> {
        let mut ser = Serializer::new(flags);
        ser.write_value(self)?;
        Ok(ser.buf.into_vec())
    }

    /// Serializes `self` as compact JSON text appended to `buf`.
    pub fn write_to_vec(&self, buf: &mut Vec<u8>) -> Result<()> {
        let bytes = self.to_vec()?;
        buf.extend_from_slice(&bytes);
        Ok(())
    }

    /// Serializes `self` as a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        self.to_json_string_with_options(SerializeFlags::empty())
    }

    /// Serializes `self` as a JSON string with the given option flags.
    pub fn to_json_string_with_options(&self, flags: SerializeFlags) -> Result<String> {
        let bytes = self.to_vec_with_options(flags)?;
        // The writer only ever emits UTF-8.
        Ok(unsafe { String::from_utf8_unchecked(bytes) })
    }
}

struct Serializer {
    buf: ManagedBuffer,
    flags: SerializeFlags,
    depth: usize,
}

impl Serializer {
    fn new(flags: SerializeFlags) -> Serializer {
        Serializer {
            buf: ManagedBuffer::new(),
            flags,
            depth: 0,
        }
    }

    fn pretty(&self) -> bool {
        self.flags.contains(SerializeFlags::PRETTY)
    }

    fn write_value(&mut self, value: &Value<'_>) -> Result<()> {
        match value {
            Value::Null => self.buf.append(b"null"),
            Value::Bool(true) => self.buf.append(b"true"),
            Value::Bool(false) => self.buf.append(b"false"),
            Value::String(s) => self.write_string(s),
            Value::Number(n) => self.write_number(n),
            Value::Array(items) => self.write_array(items),
            Value::Object(obj) => self.write_object(obj),
        }
    }

    fn write_array(&mut self, items: &[Value<'_>]) -> Result<()> {
        if items.is_empty() {
            return self.buf.append(b"[]");
        }
        self.buf.push(b'[')?;
        self.depth += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push(b',')?;
            }
            self.write_newline_indent()?;
            self.write_value(item)?;
        }
        self.depth -= 1;
        self.write_newline_indent()?;
        self.buf.push(b']')
    }

    fn write_object(&mut self, obj: &crate::value::Object<'_>) -> Result<()> {
        if obj.is_empty() {
            return self.buf.append(b"{}");
        }
        self.buf.push(b'{')?;
        self.depth += 1;
        for (i, (key, item)) in obj.iter().enumerate() {
            if i > 0 {
                self.buf.push(b',')?;
            }
            self.write_newline_indent()?;
            self.write_string(key)?;
            self.buf.push(b':')?;
            if self.pretty() {
                self.buf.push(b' ')?;
            }
            self.write_value(item)?;
        }
        self.depth -= 1;
        self.write_newline_indent()?;
        self.buf.push(b'}')
    }

    fn write_newline_indent(&mut self) -> Result<()> {
        if !self.pretty() {
            return Ok(());
        }
        self.buf.push(b'\n')?;
        for _ in 0..self.depth {
            self.buf.append(INDENT)?;
        }
        Ok(())
    }

    fn write_number(&mut self, n: &Number) -> Result<()> {
        match *n {
            Number::Int64(v) => {
                let mut fmt = itoa::Buffer::new();
                self.buf.append(fmt.format(v).as_bytes())
            }
            Number::UInt64(v) => {
                let mut fmt = itoa::Buffer::new();
                self.buf.append(fmt.format(v).as_bytes())
            }
            Number::Float64(v) => {
                if !v.is_finite() {
                    return Err(Error::Value(ValueErrorCode::NonFiniteNumber));
                }
                let mut fmt = ryu::Buffer::new();
                self.buf.append(fmt.format(v).as_bytes())
            }
        }
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let escape_unicode = self.flags.contains(SerializeFlags::ESCAPE_UNICODE);
        self.buf.push(b'"')?;
        let mut start = 0;
        for (i, c) in s.char_indices() {
            let simple: Option<&[u8]> = match c {
                QU => Some(b"\\\""),
                BS => Some(b"\\\\"),
                BB => Some(b"\\b"),
                FF => Some(b"\\f"),
                NN => Some(b"\\n"),
                RR => Some(b"\\r"),
                TT => Some(b"\\t"),
                _ => None,
            };
            let needs_unit = c.is_control() || (escape_unicode && !c.is_ascii());
            if simple.is_none() && !needs_unit {
                continue;
            }
            self.buf.append(&s.as_bytes()[start..i])?;
            match simple {
                Some(seq) => self.buf.append(seq)?,
                None => self.write_unicode_escape(c)?,
            }
            start = i + c.len_utf8();
        }
        self.buf.append(&s.as_bytes()[start..])?;
        self.buf.push(b'"')
    }

    // Code points above the BMP become a UTF-16 surrogate pair, the only
    // representation JSON's \u escape admits for them.
    fn write_unicode_escape(&mut self, c: char) -> Result<()> {
        let cp = c as u32;
        if cp < 0x1_0000 {
            return self.write_hex_unit(cp as u16);
        }
        let reduced = cp - 0x1_0000;
        self.write_hex_unit(0xD800 + (reduced >> 10) as u16)?;
        self.write_hex_unit(0xDC00 + (reduced & 0x3FF) as u16)
    }

    fn write_hex_unit(&mut self, unit: u16) -> Result<()> {
        let out = [
            b'\\',
            b'u',
            HEX_DIGITS[(unit >> 12) as usize & 0xF],
            HEX_DIGITS[(unit >> 8) as usize & 0xF],
            HEX_DIGITS[(unit >> 4) as usize & 0xF],
            HEX_DIGITS[unit as usize & 0xF],
        ];
        self.buf.append(&out)
    }
}
