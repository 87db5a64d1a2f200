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

use jsonic::parse_value;
use jsonic::parse_value_with_options;
use jsonic::Decoder;
use jsonic::Number;
use jsonic::ParseFlags;
use jsonic::Value;

fn test_decode_ok(flags: ParseFlags, tests: Vec<(&str, Value<'_>)>) {
    for (s, val) in tests {
        assert_eq!(
            parse_value_with_options(s.as_bytes(), flags).unwrap(),
            val,
            "input {s:?}"
        );
    }
}

fn test_decode_err(flags: ParseFlags, errors: &[(&str, &'static str)]) {
    for &(s, err) in errors {
        let res = parse_value_with_options(s.as_bytes(), flags);
        assert!(res.is_err(), "expected error for {s:?}");
        assert_eq!(res.err().unwrap().to_string(), err, "input {s:?}");
    }
}

#[test]
fn test_comments() {
    test_decode_ok(
        ParseFlags::COMMENTS,
        vec![
            (
                "[1, // one\n 2]",
                Value::Array(vec![
                    Value::Number(Number::Int64(1)),
                    Value::Number(Number::Int64(2)),
                ]),
            ),
            (
                "/* head */ [1] /* tail */",
                Value::Array(vec![Value::Number(Number::Int64(1))]),
            ),
            (
                "{\"a\" /* between */ : 1}",
                [("a", 1i64)].into_iter().collect(),
            ),
            ("// only a prefix\nnull", Value::Null),
            ("{ // c\n \"a\":1}", [("a", 1i64)].into_iter().collect()),
        ],
    );

    test_decode_err(
        ParseFlags::COMMENTS,
        &[
            (
                "[1] /* x",
                "unterminated block comment, pos 4, line 1, column 5",
            ),
            ("/x", "expected a value, pos 0, line 1, column 1"),
        ],
    );

    // Without the flag a comment is just a stray byte.
    test_decode_err(
        ParseFlags::empty(),
        &[
            ("// c\n1", "expected a value, pos 0, line 1, column 1"),
            (
                "{ // c\n \"a\":1}",
                "expected a value, pos 2, line 1, column 3",
            ),
        ],
    );
}

#[test]
fn test_comment_newlines_count() {
    // Line numbers keep advancing inside comments.
    test_decode_err(
        ParseFlags::COMMENTS,
        &[(
            "/* a\n b */ [1 2]",
            "expected `,` or `]`, pos 14, line 2, column 10, container started at pos 11",
        )],
    );
}

#[test]
fn test_trailing_text() {
    test_decode_err(
        ParseFlags::empty(),
        &[("[1] tail", "trailing characters, pos 4, line 1, column 5")],
    );

    test_decode_ok(
        ParseFlags::PERMIT_TEXT_AFTER_VALID_JSON,
        vec![
            (
                "[1] anything at all",
                Value::Array(vec![Value::Number(Number::Int64(1))]),
            ),
            ("null null", Value::Null),
        ],
    );
}

#[test]
fn test_unicode_newlines() {
    // NEL, LS and PS advance the line counter when the flag is set.
    test_decode_err(
        ParseFlags::UNICODE_NEWLINES,
        &[
            (
                "[1,\u{2028}2 3]",
                "expected `,` or `]`, pos 8, line 2, column 3, container started at pos 0",
            ),
            (
                "[1,\u{0085}2 3]",
                "expected `,` or `]`, pos 7, line 2, column 3, container started at pos 0",
            ),
        ],
    );

    // Vertical tab and form feed become plain whitespace.
    test_decode_ok(
        ParseFlags::UNICODE_NEWLINES,
        vec![("\u{000B}\u{000C}1", Value::Number(Number::Int64(1)))],
    );
    test_decode_err(
        ParseFlags::empty(),
        &[("\u{000B}1", "expected a value, pos 0, line 1, column 1")],
    );
}

#[test]
fn test_loose_unicode() {
    // Malformed UTF-8 is rejected by default and replaced under the flag.
    let res = parse_value(b"\"ab\xFFcd\"");
    assert_eq!(
        res.err().unwrap().to_string(),
        "invalid UTF-8 sequence, pos 3, line 1, column 4"
    );
    assert_eq!(
        parse_value_with_options(b"\"ab\xFFcd\"", ParseFlags::LOOSE_UNICODE).unwrap(),
        Value::String(Cow::from("ab\u{FFFD}cd"))
    );

    // Lone surrogate escapes are likewise replaced.
    assert_eq!(
        parse_value_with_options(br#""a\uD834b""#, ParseFlags::LOOSE_UNICODE).unwrap(),
        Value::String(Cow::from("a\u{FFFD}b"))
    );
    assert_eq!(
        parse_value_with_options(br#""a\uDD1Eb""#, ParseFlags::LOOSE_UNICODE).unwrap(),
        Value::String(Cow::from("a\u{FFFD}b"))
    );
}

#[test]
fn test_flag_validation() {
    assert!(ParseFlags::from_bits_checked(0).is_ok());
    let err = ParseFlags::from_bits_checked(1 << 30).unwrap_err();
    assert_eq!(err.to_string(), "unrecognized option flags 0x40000000");
}

#[test]
fn test_depth_limit() {
    let mut decoder = Decoder::new(ParseFlags::empty()).with_max_depth(2);
    let res = decoder.decode(b"[[[1]]]");
    assert_eq!(
        res.err().unwrap().to_string(),
        "nesting depth limit exceeded, pos 2, line 1, column 3, container started at pos 1"
    );
    assert!(decoder.decode(b"[[1]]").is_ok());

    // The default limit comfortably covers ordinary documents.
    let deep = format!("{}1{}", "[".repeat(100), "]".repeat(100));
    assert!(parse_value(deep.as_bytes()).is_ok());
}

#[test]
fn test_decoder_reuse() {
    let mut decoder = Decoder::new(ParseFlags::empty());
    let doc = br#"{"name": "a", "tags": ["x", "x", "x"], "n": 42, "m": 42}"#;

    let first = decoder.decode(doc).unwrap();
    // Repeat decodes hit the token cache and must produce identical trees.
    let second = decoder.decode(doc).unwrap();
    assert_eq!(first, second);

    decoder.clear_cache();
    let third = decoder.decode(doc).unwrap();
    assert_eq!(first, third);

    // A zero-slot decoder skips caching entirely.
    let mut uncached = Decoder::new(ParseFlags::empty()).with_cache_slots(0);
    assert_eq!(uncached.decode(doc).unwrap(), first);
}

#[test]
fn test_decoder_separate_documents() {
    let mut decoder = Decoder::new(ParseFlags::empty());
    assert_eq!(
        decoder.decode(b"[1,2]").unwrap(),
        Value::Array(vec![
            Value::Number(Number::Int64(1)),
            Value::Number(Number::Int64(2)),
        ])
    );
    assert_eq!(decoder.decode(b"true").unwrap(), Value::Bool(true));
    assert!(decoder.decode(b"[").is_err());
    // A failed decode leaves the decoder usable.
    assert_eq!(decoder.decode(b"3").unwrap(), Value::Number(Number::Int64(3)));
}

#[test]
fn test_combined_flags() {
    let flags = ParseFlags::COMMENTS | ParseFlags::PERMIT_TEXT_AFTER_VALID_JSON;
    assert_eq!(
        parse_value_with_options(b"// c\n[1] tail", flags).unwrap(),
        Value::Array(vec![Value::Number(Number::Int64(1))])
    );
}
