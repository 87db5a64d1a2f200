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

use crate::cache::CacheKind;
use crate::cache::CachedValue;
use crate::cache::TokenCache;
use crate::constants::DEFAULT_CACHE_SLOTS;
use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::Error;
use crate::error::LexErrorCode;
use crate::error::Result;
use crate::error::StructureErrorCode;
use crate::options::ParseFlags;
use crate::stack::ContainerKind;
use crate::stack::ObjectStack;
use crate::tokenizer::materialize_number;
use crate::tokenizer::Token;
use crate::tokenizer::TokenKind;
use crate::tokenizer::Tokenizer;
use crate::value::Value;

/// Parse JSON text into a Value tree using strict RFC 8259 rules.
pub fn parse_value(buf: &[u8]) -> Result<Value<'_>> {
    parse_value_with_options(buf, ParseFlags::empty())
}

/// Parse JSON text into a Value tree with the given option flags.
pub fn parse_value_with_options(buf: &[u8], flags: ParseFlags) -> Result<Value<'_>> {
    let mut decoder = Decoder::new(flags);
    decoder.decode(buf)
}

/// A reusable decode engine.
///
/// Holds the option flags, the nesting limit and the token cache. The cache
/// persists across `decode` calls on the same instance, so repeated
/// documents sharing keys or scalar values skip re-materialization; call
/// `clear_cache` to drop it between unrelated workloads. A `Decoder` is
/// single-threaded per call; independent instances share nothing and may
/// run in parallel.
pub struct Decoder {
    flags: ParseFlags,
    max_depth: usize,
    cache: TokenCache,
}

impl Decoder {
    pub fn new(flags: ParseFlags) -> Decoder {
        Decoder {
            flags,
            max_depth: DEFAULT_MAX_DEPTH,
            cache: TokenCache::new(DEFAULT_CACHE_SLOTS),
        }
    }

    /// Sets the maximum container nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Decoder {
        self.max_depth = max_depth;
        self
    }

    /// Sets the number of token cache slots. Zero disables the cache.
    pub fn with_cache_slots(mut self, slots: usize) -> Decoder {
        self.cache = TokenCache::new(slots);
        self
    }

    /// Empties the token cache.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Decodes one complete JSON document from `buf`.
    pub fn decode<'a>(&mut self, buf: &'a [u8]) -> Result<Value<'a>> {
        let mut parser = Parser {
            tokenizer: Tokenizer::new(buf, self.flags),
            stack: ObjectStack::new(self.max_depth),
            cache: &mut self.cache,
            flags: self.flags,
        };
        parser.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ExpectValue,
    ExpectObjectKeyOrClose,
    ExpectColon,
    ExpectCommaOrArrayClose,
    ExpectCommaOrObjectClose,
    Done,
}

struct Parser<'a, 'c> {
    tokenizer: Tokenizer<'a>,
    stack: ObjectStack<'a>,
    cache: &'c mut TokenCache,
    flags: ParseFlags,
}

impl<'a> Parser<'a, '_> {
    // The decode loop: one token per iteration, no recursion. Nesting
    // lives entirely in the object stack.
    fn parse(&mut self) -> Result<Value<'a>> {
        let mut state = ParseState::ExpectValue;
        let mut root = None;

        while state != ParseState::Done {
            let token = self.tokenizer.next_token()?;
            state = match state {
                ParseState::ExpectValue => self.on_expect_value(token, &mut root)?,
                ParseState::ExpectObjectKeyOrClose => self.on_expect_key(token, &mut root)?,
                ParseState::ExpectColon => self.on_expect_colon(token)?,
                ParseState::ExpectCommaOrArrayClose => {
                    self.on_expect_comma_or_close(token, &mut root, ContainerKind::Array)?
                }
                ParseState::ExpectCommaOrObjectClose => {
                    self.on_expect_comma_or_close(token, &mut root, ContainerKind::Object)?
                }
                ParseState::Done => unreachable!(),
            };
        }

        if !self.flags.contains(ParseFlags::PERMIT_TEXT_AFTER_VALID_JSON) {
            if let Some(pos) = self.tokenizer.remainder()? {
                return Err(Error::TrailingData(pos));
            }
        }

        // `Done` is only ever reached with a completed root.
        match root {
            Some(value) => Ok(value),
            None => Err(Error::Lex(
                LexErrorCode::UnexpectedEof,
                self.tokenizer.position(),
            )),
        }
    }

    fn on_expect_value(
        &mut self,
        token: Token<'a>,
        root: &mut Option<Value<'a>>,
    ) -> Result<ParseState> {
        match token.kind {
            TokenKind::Null => self.finish_value(Value::Null, token, root),
            TokenKind::True => self.finish_value(Value::Bool(true), token, root),
            TokenKind::False => self.finish_value(Value::Bool(false), token, root),
            TokenKind::Number => {
                let number = self.cached_number(&token)?;
                self.finish_value(Value::Number(number), token, root)
            }
            TokenKind::String { .. } => {
                let s = self.cached_string(&token)?;
                self.finish_value(Value::String(s), token, root)
            }
            TokenKind::ArrayOpen => {
                self.stack.push_container(ContainerKind::Array, token.start)?;
                Ok(ParseState::ExpectValue)
            }
            TokenKind::ObjectOpen => {
                self.stack
                    .push_container(ContainerKind::Object, token.start)?;
                Ok(ParseState::ExpectObjectKeyOrClose)
            }
            // `[]`: a close is legal here only directly after the open.
            TokenKind::ArrayClose if self.stack.top_is_empty_array() => {
                self.close_container(token, root)
            }
            TokenKind::Eof => Err(Error::Lex(LexErrorCode::UnexpectedEof, token.start)),
            _ => Err(Error::Structure(
                StructureErrorCode::ExpectedSomeValue,
                token.start,
                self.stack.top_open_pos(),
            )),
        }
    }

    fn on_expect_key(
        &mut self,
        token: Token<'a>,
        root: &mut Option<Value<'a>>,
    ) -> Result<ParseState> {
        match token.kind {
            TokenKind::String { .. } => {
                let key = self.cached_key(&token)?;
                self.stack.set_pending_key(key, token.start)?;
                Ok(ParseState::ExpectColon)
            }
            // `{}`: a close is legal here only directly after the open,
            // which rules out trailing commas.
            TokenKind::ObjectClose if self.stack.top_is_empty_object() => {
                self.close_container(token, root)
            }
            TokenKind::Eof => Err(Error::Lex(LexErrorCode::UnexpectedEof, token.start)),
            _ => Err(Error::Structure(
                StructureErrorCode::ExpectedObjectKey,
                token.start,
                self.stack.top_open_pos(),
            )),
        }
    }

    fn on_expect_colon(&mut self, token: Token<'a>) -> Result<ParseState> {
        match token.kind {
            TokenKind::Colon => Ok(ParseState::ExpectValue),
            TokenKind::Eof => Err(Error::Lex(LexErrorCode::UnexpectedEof, token.start)),
            _ => Err(Error::Structure(
                StructureErrorCode::ExpectedColon,
                token.start,
                self.stack.top_open_pos(),
            )),
        }
    }

    fn on_expect_comma_or_close(
        &mut self,
        token: Token<'a>,
        root: &mut Option<Value<'a>>,
        kind: ContainerKind,
    ) -> Result<ParseState> {
        match (token.kind, kind) {
            (TokenKind::Comma, ContainerKind::Array) => Ok(ParseState::ExpectValue),
            (TokenKind::Comma, ContainerKind::Object) => Ok(ParseState::ExpectObjectKeyOrClose),
            (TokenKind::ArrayClose, ContainerKind::Array)
            | (TokenKind::ObjectClose, ContainerKind::Object) => {
                self.close_container(token, root)
            }
            (TokenKind::Eof, _) => Err(Error::Lex(LexErrorCode::UnexpectedEof, token.start)),
            (_, ContainerKind::Array) => Err(Error::Structure(
                StructureErrorCode::ExpectedArrayCommaOrEnd,
                token.start,
                self.stack.top_open_pos(),
            )),
            (_, ContainerKind::Object) => Err(Error::Structure(
                StructureErrorCode::ExpectedObjectCommaOrEnd,
                token.start,
                self.stack.top_open_pos(),
            )),
        }
    }

    fn finish_value(
        &mut self,
        value: Value<'a>,
        token: Token<'a>,
        root: &mut Option<Value<'a>>,
    ) -> Result<ParseState> {
        if self.stack.is_empty() {
            *root = Some(value);
            return Ok(ParseState::Done);
        }
        self.stack.push_value(value, token.start)?;
        Ok(self.state_for_top())
    }

    fn close_container(
        &mut self,
        token: Token<'a>,
        root: &mut Option<Value<'a>>,
    ) -> Result<ParseState> {
        match self.stack.pop_container(token.start)? {
            Some(value) => {
                *root = Some(value);
                Ok(ParseState::Done)
            }
            None => Ok(self.state_for_top()),
        }
    }

    fn state_for_top(&self) -> ParseState {
        match self.stack.top_kind() {
            Some(ContainerKind::Array) => ParseState::ExpectCommaOrArrayClose,
            Some(ContainerKind::Object) => ParseState::ExpectCommaOrObjectClose,
            None => ParseState::Done,
        }
    }

    fn cached_number(&mut self, token: &Token<'a>) -> Result<crate::Number> {
        let cached = self
            .cache
            .lookup_or_insert(token.raw, CacheKind::Number, || {
                materialize_number(token).map(CachedValue::Number)
            })?;
        match cached {
            CachedValue::Number(n) => Ok(n),
            CachedValue::String(_) => unreachable!("number slot held a string"),
        }
    }

    // String values only pay the cache toll when they needed unescaping;
    // the zero-copy borrow is already cheaper than a cache hit.
    fn cached_string(&mut self, token: &Token<'a>) -> Result<Cow<'a, str>> {
        match token.kind {
            TokenKind::String { has_escapes: false } => self.tokenizer.materialize_string(token),
            _ => {
                let tokenizer = &mut self.tokenizer;
                let cached = self
                    .cache
                    .lookup_or_insert(token.raw, CacheKind::String, || {
                        tokenizer
                            .materialize_string(token)
                            .map(|s| CachedValue::String(s.into_owned()))
                    })?;
                match cached {
                    CachedValue::String(s) => Ok(Cow::Owned(s)),
                    CachedValue::Number(_) => unreachable!("string slot held a number"),
                }
            }
        }
    }

    // Keys must be owned by the object map regardless, so they always go
    // through the cache; repeated keys then share the materialization.
    fn cached_key(&mut self, token: &Token<'a>) -> Result<String> {
        let tokenizer = &mut self.tokenizer;
        let cached = self
            .cache
            .lookup_or_insert(token.raw, CacheKind::String, || {
                tokenizer
                    .materialize_string(token)
                    .map(|s| CachedValue::String(s.into_owned()))
            })?;
        match cached {
            CachedValue::String(s) => Ok(s),
            CachedValue::Number(_) => unreachable!("string slot held a number"),
        }
    }
}
