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
use jsonic::SerializeFlags;
use jsonic::Value;

fn test_encode_ok(tests: Vec<(Value<'_>, &str)>) {
    for (val, expect) in tests {
        assert_eq!(val.to_json_string().unwrap(), expect);
        assert_eq!(val.to_vec().unwrap(), expect.as_bytes());
    }
}

#[test]
fn test_encode_scalars() {
    test_encode_ok(vec![
        (Value::Null, "null"),
        (Value::Bool(true), "true"),
        (Value::Bool(false), "false"),
        (Value::Number(Number::Int64(0)), "0"),
        (Value::Number(Number::Int64(-42)), "-42"),
        (Value::Number(Number::UInt64(u64::MAX)), "18446744073709551615"),
        (Value::Number(Number::Float64(0.5)), "0.5"),
        (Value::Number(Number::Float64(-1500.0)), "-1500.0"),
        (Value::String(Cow::from("")), r#""""#),
        (Value::String(Cow::from("hello")), r#""hello""#),
    ]);
}

#[test]
fn test_encode_containers() {
    test_encode_ok(vec![
        (Value::Array(vec![]), "[]"),
        (
            Value::Array(vec![Value::Null, Value::Bool(true)]),
            "[null,true]",
        ),
        ([("a", 1i64), ("b", 2)].into_iter().collect(), r#"{"a":1,"b":2}"#),
        (
            Value::Array(vec![[("k", Value::Array(vec![]))].into_iter().collect()]),
            r#"[{"k":[]}]"#,
        ),
    ]);
}

#[test]
fn test_encode_string_escapes() {
    test_encode_ok(vec![
        (
            Value::String(Cow::from("a\"b\\c")),
            r#""a\"b\\c""#,
        ),
        (
            Value::String(Cow::from("\u{8}\u{c}\n\r\t")),
            r#""\b\f\n\r\t""#,
        ),
        (
            Value::String(Cow::from("nul\u{0}")),
            r#""nul\u0000""#,
        ),
        // Forward slash needs no escaping on output.
        (Value::String(Cow::from("a/b")), r#""a/b""#),
    ]);
}

#[test]
fn test_encode_escape_unicode() {
    let val = Value::String(Cow::from("caf\u{e9} 中 \u{1d11e}"));
    assert_eq!(
        val.to_json_string().unwrap(),
        "\"caf\u{e9} 中 \u{1d11e}\""
    );
    assert_eq!(
        val.to_json_string_with_options(SerializeFlags::ESCAPE_UNICODE)
            .unwrap(),
        r#""caf\u00e9 \u4e2d \ud834\udd1e""#
    );

    // ASCII-escaped output re-decodes to the original string.
    let bytes = val
        .to_vec_with_options(SerializeFlags::ESCAPE_UNICODE)
        .unwrap();
    assert!(bytes.iter().all(u8::is_ascii));
    assert_eq!(parse_value(&bytes).unwrap(), val);
}

#[test]
fn test_encode_pretty() {
    let val: Value<'_> = [
        ("name", Value::String(Cow::from("a"))),
        (
            "items",
            Value::Array(vec![
                Value::Number(Number::Int64(1)),
                Value::Number(Number::Int64(2)),
            ]),
        ),
        ("empty", Value::Object(jsonic::Object::new())),
    ]
    .into_iter()
    .collect();

    let expect = "{\n  \"name\": \"a\",\n  \"items\": [\n    1,\n    2\n  ],\n  \"empty\": {}\n}";
    assert_eq!(
        val.to_json_string_with_options(SerializeFlags::PRETTY).unwrap(),
        expect
    );

    // Pretty output re-decodes to the same tree.
    assert_eq!(parse_value(expect.as_bytes()).unwrap(), val);
}

#[test]
fn test_encode_non_finite() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let res = Value::Number(Number::Float64(bad)).to_vec();
        assert_eq!(
            res.err().unwrap().to_string(),
            "NaN and Infinity have no JSON representation"
        );
    }

    // Nested occurrences fail too, wherever they sit in the tree.
    let val = Value::Array(vec![Value::Null, Value::Number(Number::Float64(f64::NAN))]);
    assert!(val.to_vec().is_err());
}

#[test]
fn test_encode_invalid_flags() {
    let err = SerializeFlags::from_bits_checked(1 << 7).unwrap_err();
    assert_eq!(err.to_string(), "unrecognized option flags 0x80");
}

#[test]
fn test_write_to_vec_appends() {
    let mut buf = b"prefix:".to_vec();
    Value::Bool(true).write_to_vec(&mut buf).unwrap();
    assert_eq!(buf, b"prefix:true");
}

#[test]
fn test_round_trip_random() {
    for _ in 0..100 {
        let val = Value::rand_value();
        let bytes = val.to_vec().unwrap();
        let decoded = parse_value(&bytes).unwrap();
        assert_eq!(decoded, val, "document {}", String::from_utf8_lossy(&bytes));

        // Our compact output is the same document serde_json sees.
        let json = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap();
        assert_eq!(Value::from(&json), decoded);
    }
}
