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

//! `jsonic` is a fast `JSON` codec operating on in-memory byte buffers. It parses
//! UTF-8 `JSON` text into a borrowing [`Value`] tree and serializes trees back to
//! text, with precise error positions and optional syntax extensions.
//!
//! ## Features
//!
//! - Strict by default: conforms to RFC 8259, rejecting comments, trailing
//!   text and malformed UTF-8, with byte offset, line and column on every error.
//! - Zero-copy strings: string values without escape sequences borrow directly
//!   from the input buffer as `Cow::Borrowed`.
//! - Token caching: a [`Decoder`] keeps a small cache of materialized object
//!   keys, unescaped strings and numbers, so documents with repetitive
//!   structure skip redundant work; the cache persists across documents.
//! - Iterative parsing: container nesting lives on an explicit stack with a
//!   configurable depth limit, so adversarial input cannot overflow the call
//!   stack.
//! - Optional extensions via [`ParseFlags`]: `//` and `/* */` comments,
//!   Unicode line terminators as whitespace, lossy decoding of broken Unicode,
//!   and trailing text after the document.
//!
//! ## Example
//!
//! ```
//! use jsonic::parse_value;
//!
//! let value = parse_value(br#"{"greeting": "hello", "count": 3}"#).unwrap();
//! assert_eq!(value.as_object().unwrap()["count"].as_i64(), Some(3));
//! let text = value.to_json_string().unwrap();
//! assert_eq!(text, r#"{"greeting":"hello","count":3}"#);
//! ```

#![allow(clippy::uninlined_format_args)]

mod buffer;
mod cache;
mod constants;
mod error;
mod from;
mod number;
mod options;
mod parser;
mod ser;
mod stack;
mod tokenizer;
mod util;
mod value;

pub use error::Error;
pub use error::LexErrorCode;
pub use error::Position;
pub use error::Result;
pub use error::StructureErrorCode;
pub use error::ValueErrorCode;
pub use number::Number;
pub use options::ParseFlags;
pub use options::SerializeFlags;
pub use parser::parse_value;
pub use parser::parse_value_with_options;
pub use parser::Decoder;
pub use value::Object;
pub use value::Value;
