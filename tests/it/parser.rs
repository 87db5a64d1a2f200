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
use jsonic::Number;
use jsonic::Object;
use jsonic::Value;

fn test_parse_err(errors: &[(&str, &'static str)]) {
    for &(s, err) in errors {
        let res = parse_value(s.as_bytes());
        assert!(res.is_err(), "expected error for {s:?}");
        assert_eq!(res.err().unwrap().to_string(), err, "input {s:?}");
    }
}

fn test_parse_ok(tests: Vec<(&str, Value<'_>)>) {
    for (s, val) in tests {
        assert_eq!(parse_value(s.as_bytes()).unwrap(), val, "input {s:?}");
    }
}

#[test]
fn test_parse_null() {
    test_parse_err(&[
        ("", "EOF while parsing a value, pos 0, line 1, column 1"),
        ("  ", "EOF while parsing a value, pos 2, line 1, column 3"),
        ("n", "EOF while parsing a value, pos 1, line 1, column 2"),
        ("nul", "EOF while parsing a value, pos 3, line 1, column 4"),
        ("nulx", "expected ident, pos 3, line 1, column 4"),
        ("nulla", "trailing characters, pos 4, line 1, column 5"),
        ("NULL", "expected a value, pos 0, line 1, column 1"),
    ]);

    test_parse_ok(vec![("null", Value::Null), (" null ", Value::Null)]);
}

#[test]
fn test_parse_boolean() {
    test_parse_err(&[
        ("t", "EOF while parsing a value, pos 1, line 1, column 2"),
        ("truz", "expected ident, pos 3, line 1, column 4"),
        ("f", "EOF while parsing a value, pos 1, line 1, column 2"),
        ("faz", "expected ident, pos 2, line 1, column 3"),
        ("truea", "trailing characters, pos 4, line 1, column 5"),
        ("falsea", "trailing characters, pos 5, line 1, column 6"),
        ("True", "expected a value, pos 0, line 1, column 1"),
    ]);

    test_parse_ok(vec![
        ("true", Value::Bool(true)),
        (" true ", Value::Bool(true)),
        ("false", Value::Bool(false)),
        (" false ", Value::Bool(false)),
    ]);
}

#[test]
fn test_parse_number_errors() {
    test_parse_err(&[
        ("+", "expected a value, pos 0, line 1, column 1"),
        (".", "expected a value, pos 0, line 1, column 1"),
        ("-", "EOF while parsing a value, pos 1, line 1, column 2"),
        ("\\0", "expected a value, pos 0, line 1, column 1"),
        ("+1", "expected a value, pos 0, line 1, column 1"),
        ("00", "invalid number, pos 1, line 1, column 2"),
        ("0123", "invalid number, pos 1, line 1, column 2"),
        (".0", "expected a value, pos 0, line 1, column 1"),
        ("0.", "invalid number, pos 2, line 1, column 3"),
        ("1.", "invalid number, pos 2, line 1, column 3"),
        ("1.e1", "invalid number, pos 2, line 1, column 3"),
        ("1e", "invalid number, pos 2, line 1, column 3"),
        ("1e+", "invalid number, pos 3, line 1, column 4"),
        ("1e-", "invalid number, pos 3, line 1, column 4"),
        ("1a", "trailing characters, pos 1, line 1, column 2"),
        ("1.a", "invalid number, pos 2, line 1, column 3"),
        ("0x80", "trailing characters, pos 1, line 1, column 2"),
        ("- 1", "invalid number, pos 1, line 1, column 2"),
        ("Infinity", "expected a value, pos 0, line 1, column 1"),
        ("NaN", "expected a value, pos 0, line 1, column 1"),
    ]);
}

#[test]
fn test_parse_number() {
    test_parse_ok(vec![
        ("0", Value::Number(Number::Int64(0))),
        ("-0", Value::Number(Number::Int64(0))),
        ("123", Value::Number(Number::Int64(123))),
        ("-123", Value::Number(Number::Int64(-123))),
        (
            "9223372036854775807",
            Value::Number(Number::Int64(i64::MAX)),
        ),
        (
            "-9223372036854775808",
            Value::Number(Number::Int64(i64::MIN)),
        ),
        (
            "9223372036854775808",
            Value::Number(Number::UInt64(9223372036854775808)),
        ),
        (
            "18446744073709551615",
            Value::Number(Number::UInt64(u64::MAX)),
        ),
        (
            "18446744073709551616",
            Value::Number(Number::Float64(18446744073709551616.0)),
        ),
        (
            "-9223372036854775809",
            Value::Number(Number::Float64(-9223372036854775809.0)),
        ),
        ("0.5", Value::Number(Number::Float64(0.5))),
        ("-1.5e3", Value::Number(Number::Float64(-1500.0))),
        ("1E2", Value::Number(Number::Float64(100.0))),
        ("2e+2", Value::Number(Number::Float64(200.0))),
        ("2e-2", Value::Number(Number::Float64(0.02))),
        ("1.0", Value::Number(Number::Float64(1.0))),
        // Magnitudes beyond f64 saturate rather than fail.
        ("1e400", Value::Number(Number::Float64(f64::INFINITY))),
        ("-1e400", Value::Number(Number::Float64(f64::NEG_INFINITY))),
        ("1e-999", Value::Number(Number::Float64(0.0))),
    ]);
}

#[test]
fn test_parse_string_errors() {
    test_parse_err(&[
        (r#"""#, "unterminated string, pos 0, line 1, column 1"),
        (r#""abc"#, "unterminated string, pos 0, line 1, column 1"),
        (r#""abc\"#, "unterminated string, pos 0, line 1, column 1"),
        ("\"a\nb\"", "control character in string, pos 2, line 1, column 3"),
        ("\"a\tb\"", "control character in string, pos 2, line 1, column 3"),
        (r#""\z""#, "invalid escape character `z`, pos 1, line 1, column 2"),
        (r#""\u12""#, "unexpected end of hex escape, pos 3, line 1, column 4"),
        (r#""\uGHIJ""#, "invalid hex character `G`, pos 3, line 1, column 4"),
        (r#""\uD834""#, "unpaired surrogate in hex escape, pos 1, line 1, column 2"),
        (r#""\uDD1E""#, "unpaired surrogate in hex escape, pos 1, line 1, column 2"),
        (r#""\uD834\n""#, "unpaired surrogate in hex escape, pos 1, line 1, column 2"),
    ]);
}

#[test]
fn test_parse_string() {
    test_parse_ok(vec![
        (r#""""#, Value::String(Cow::from(""))),
        (r#""abc""#, Value::String(Cow::from("abc"))),
        (r#""\"\\\/\b\f\n\r\t""#, Value::String(Cow::from("\"\\/\u{8}\u{c}\n\r\t"))),
        (r#""\u0041""#, Value::String(Cow::from("A"))),
        (r#""\u4e2d\u6587""#, Value::String(Cow::from("中文"))),
        (r#""\uD834\uDD1E""#, Value::String(Cow::from("\u{1D11E}"))),
        (r#""中文""#, Value::String(Cow::from("中文"))),
        (r#""😀""#, Value::String(Cow::from("😀"))),
    ]);
}

#[test]
fn test_parse_array_errors() {
    test_parse_err(&[
        ("[", "EOF while parsing a value, pos 1, line 1, column 2"),
        ("[1", "EOF while parsing a value, pos 2, line 1, column 3"),
        ("[1,", "EOF while parsing a value, pos 3, line 1, column 4"),
        (
            "[1,]",
            "expected a value, pos 3, line 1, column 4, container started at pos 0",
        ),
        (
            "[,]",
            "expected a value, pos 1, line 1, column 2, container started at pos 0",
        ),
        (
            "[1 2]",
            "expected `,` or `]`, pos 3, line 1, column 4, container started at pos 0",
        ),
        (
            "[1:2]",
            "expected `,` or `]`, pos 2, line 1, column 3, container started at pos 0",
        ),
        ("[1]]", "trailing characters, pos 3, line 1, column 4"),
        ("]", "expected a value, pos 0, line 1, column 1"),
    ]);
}

#[test]
fn test_parse_array() {
    test_parse_ok(vec![
        ("[]", Value::Array(vec![])),
        ("[ ]", Value::Array(vec![])),
        (
            "[1, \"a\", null, true]",
            Value::Array(vec![
                Value::Number(Number::Int64(1)),
                Value::String(Cow::from("a")),
                Value::Null,
                Value::Bool(true),
            ]),
        ),
        (
            "[[],[[]]]",
            Value::Array(vec![
                Value::Array(vec![]),
                Value::Array(vec![Value::Array(vec![])]),
            ]),
        ),
    ]);
}

#[test]
fn test_parse_object_errors() {
    test_parse_err(&[
        ("{", "EOF while parsing a value, pos 1, line 1, column 2"),
        ("{\"a\"", "EOF while parsing a value, pos 4, line 1, column 5"),
        ("{\"a\":", "EOF while parsing a value, pos 5, line 1, column 6"),
        ("{\"a\":1", "EOF while parsing a value, pos 6, line 1, column 7"),
        (
            "{1:2}",
            "expected an object key or `}`, pos 1, line 1, column 2, container started at pos 0",
        ),
        (
            "{\"a\" 1}",
            "expected `:`, pos 5, line 1, column 6, container started at pos 0",
        ),
        (
            "{\"a\":1,}",
            "expected an object key or `}`, pos 7, line 1, column 8, container started at pos 0",
        ),
        (
            "{,}",
            "expected an object key or `}`, pos 1, line 1, column 2, container started at pos 0",
        ),
        (
            "{\"a\":1 \"b\":2}",
            "expected `,` or `}`, pos 7, line 1, column 8, container started at pos 0",
        ),
        ("}", "expected a value, pos 0, line 1, column 1"),
    ]);
}

#[test]
fn test_parse_object() {
    let mut obj = Object::new();
    obj.insert("k1".to_string(), Value::Number(Number::Int64(1)));
    obj.insert("k2".to_string(), Value::String(Cow::from("v2")));
    test_parse_ok(vec![
        ("{}", Value::Object(Object::new())),
        ("{ }", Value::Object(Object::new())),
        (
            "{\"k1\": 1, \"k2\": \"v2\"}",
            Value::Object(obj.clone()),
        ),
    ]);

    // Insertion order is preserved and equality is order sensitive.
    let reordered = parse_value(b"{\"k2\": \"v2\", \"k1\": 1}").unwrap();
    assert_ne!(reordered, Value::Object(obj));

    // Duplicate keys keep the last value at the first key's slot.
    let dup = parse_value(b"{\"a\":1,\"b\":2,\"a\":3}").unwrap();
    let obj = dup.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(
        obj.get_index(0),
        Some((&"a".to_string(), &Value::Number(Number::Int64(3))))
    );
}

#[test]
fn test_parse_multiline_positions() {
    test_parse_err(&[
        (
            "[1,\n2,\n3 4]",
            "expected `,` or `]`, pos 9, line 3, column 3, container started at pos 0",
        ),
        (
            "{\n  \"a\": 1\n  \"b\": 2\n}",
            "expected `,` or `}`, pos 13, line 3, column 3, container started at pos 0",
        ),
        // CRLF counts as one newline.
        (
            "[1,\r\n2,\r\ntrue false]",
            "expected `,` or `]`, pos 14, line 3, column 6, container started at pos 0",
        ),
    ]);
}

#[test]
fn test_parse_nested() {
    let value = parse_value(
        br#"{"store": {"books": [{"title": "A", "price": 1.5}, {"title": "B", "price": 2}], "open": true}}"#,
    )
    .unwrap();
    let store = value.as_object().unwrap().get("store").unwrap();
    let books = store.as_object().unwrap().get("books").unwrap();
    assert_eq!(books.array_length(), Some(2));
    let first = &books.as_array().unwrap()[0];
    assert_eq!(
        first.as_object().unwrap().get("price"),
        Some(&Value::Number(Number::Float64(1.5)))
    );
    assert_eq!(
        store.as_object().unwrap().get("open"),
        Some(&Value::Bool(true))
    );
}

#[test]
fn test_parse_invalid_utf8() {
    let res = parse_value(b"\"ab\xFF\"");
    assert_eq!(
        res.err().unwrap().to_string(),
        "invalid UTF-8 sequence, pos 3, line 1, column 4"
    );

    // Truncated multi-byte sequence inside an escaped string.
    let res = parse_value(b"\"\\n\xE4\xB8\"");
    assert_eq!(
        res.err().unwrap().to_string(),
        "invalid UTF-8 sequence, pos 3, line 1, column 4"
    );
}

#[test]
fn test_parse_zero_copy_strings() {
    // No escapes: the string borrows from the input.
    let value = parse_value(br#"["plain"]"#).unwrap();
    match &value.as_array().unwrap()[0] {
        Value::String(Cow::Borrowed(s)) => assert_eq!(*s, "plain"),
        other => panic!("expected borrowed string, got {other:?}"),
    }

    // Escapes force an owned copy.
    let value = parse_value(br#"["pla\nin"]"#).unwrap();
    match &value.as_array().unwrap()[0] {
        Value::String(Cow::Owned(s)) => assert_eq!(s, "pla\nin"),
        other => panic!("expected owned string, got {other:?}"),
    }
}
