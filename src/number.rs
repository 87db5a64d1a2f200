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

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use ordered_float::OrderedFloat;
use serde::de;
use serde::de::Deserialize;
use serde::de::Deserializer;
use serde::de::Visitor;
use serde::ser::Serialize;
use serde::ser::Serializer;

/// A JSON number.
///
/// The decoder classifies numeric literals three ways: signed 64-bit if the
/// literal fits, unsigned 64-bit if it is non-negative and exceeds the
/// signed range, and 64-bit float if a fraction or exponent is present or
/// the integer overflows 64 bits. This preserves precision for large
/// integer IDs that would lose digits as doubles.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int64(i64),
    UInt64(u64),
    Float64(f64),
}

impl Number {
    /// Returns the i64 representation of the number, if it is an integer in
    /// range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int64(v) => Some(*v),
            Number::UInt64(v) => {
                if *v <= i64::MAX as u64 {
                    Some(*v as i64)
                } else {
                    None
                }
            }
            Number::Float64(_) => None,
        }
    }

    /// Returns the u64 representation of the number, if it is a non-negative
    /// integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int64(v) => {
                if *v >= 0 {
                    Some(*v as u64)
                } else {
                    None
                }
            }
            Number::UInt64(v) => Some(*v),
            Number::Float64(_) => None,
        }
    }

    /// Returns the number as a float, converting lossily for large integers.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int64(v) => *v as f64,
            Number::UInt64(v) => *v as f64,
            Number::Float64(v) => *v,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float64(_))
    }

    /// True unless the number is a non-finite float, which JSON cannot
    /// represent.
    pub fn is_json_representable(&self) -> bool {
        match self {
            Number::Float64(v) => v.is_finite(),
            _ => true,
        }
    }
}

// Numbers compare numerically across variants, so `Int64(5)`, `UInt64(5)`
// and `Float64(5.0)` are all equal. Floats use a total order.
impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int64(a), Number::Int64(b)) => a.cmp(b),
            (Number::UInt64(a), Number::UInt64(b)) => a.cmp(b),
            (Number::Int64(a), Number::UInt64(b)) => {
                if *a < 0 {
                    Ordering::Less
                } else {
                    (*a as u64).cmp(b)
                }
            }
            (Number::UInt64(a), Number::Int64(b)) => {
                if *b < 0 {
                    Ordering::Greater
                } else {
                    a.cmp(&(*b as u64))
                }
            }
            (a, b) => OrderedFloat(a.as_f64()).cmp(&OrderedFloat(b.as_f64())),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Number::Int64(v) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            Number::UInt64(v) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            Number::Float64(v) => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format(*v))
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::Int64(v) => serializer.serialize_i64(*v),
            Number::UInt64(v) => serializer.serialize_u64(*v),
            Number::Float64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number (int64, uint64, or float64)")
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::Int64(v))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::UInt64(v))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::Float64(v))
            }
        }
        deserializer.deserialize_any(NumberVisitor)
    }
}
