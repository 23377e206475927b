//! The conversion matrix between kinds.
//!
//! [`convert`] is a partial function: `None` means no conversion exists for the
//! pair. Scalar conversions either produce a value or nothing. Element-wise
//! conversions of sequences and mappings never fail as a whole; an element that
//! cannot be converted is replaced by the zero value of the target element type.

use super::{normalize, AnyMap, Kind, StringMap, Value};

/// Converts `value` to `target`, or returns `None` if the pair is unsupported.
pub fn convert(value: &Value, target: Kind) -> Option<Value> {
    if value.kind() == target {
        return Some(value.clone());
    }

    match value {
        Value::Int(i) | Value::Int64(i) => from_int(*i, target),
        Value::Byte(b) => from_byte(*b, target),
        Value::Rune(c) => match target {
            Kind::Int => Some(Value::Int(u32::from(*c).into())),
            Kind::String => Some(Value::String(c.to_string())),
            _ => None,
        },
        // Truncate toward zero, then follow the integer rules.
        Value::Float64(f) => from_int(*f as i64, target),
        Value::String(s) => from_string(s, target),
        Value::Bool(b) => match target {
            Kind::Int => Some(Value::Int((*b).into())),
            Kind::Int64 => Some(Value::Int64((*b).into())),
            Kind::Byte => Some(Value::Byte((*b).into())),
            Kind::String => Some(Value::String(b.to_string())),
            _ => None,
        },
        Value::IntSeq(items) => match target {
            Kind::StringSeq => Some(Value::StringSeq(
                items.iter().map(i64::to_string).collect(),
            )),
            Kind::AnySeq => Some(normalize::widen(value.clone())),
            _ => None,
        },
        Value::ByteSeq(bytes) => from_bytes(bytes, target),
        Value::StringSeq(items) => match target {
            Kind::IntSeq => Some(Value::IntSeq(
                items.iter().map(|s| parse_int(s)).collect(),
            )),
            Kind::AnySeq => Some(normalize::widen(value.clone())),
            _ => None,
        },
        Value::AnySeq(items) => match target {
            Kind::IntSeq => Some(Value::IntSeq(
                items.iter().map(int_or_zero).collect(),
            )),
            Kind::StringSeq => Some(Value::StringSeq(
                items.iter().map(string_or_empty).collect(),
            )),
            _ => None,
        },
        Value::StringMapSeq(maps) => match target {
            Kind::AnyMapSeq => Some(Value::AnyMapSeq(maps.iter().map(widen_map).collect())),
            Kind::AnySeq => Some(normalize::widen(value.clone())),
            _ => None,
        },
        Value::AnyMapSeq(maps) => match target {
            Kind::StringMapSeq => Some(Value::StringMapSeq(
                maps.iter().map(narrow_map).collect(),
            )),
            Kind::AnySeq => Some(normalize::widen(value.clone())),
            _ => None,
        },
        Value::StringMap(map) => match target {
            Kind::StringSeq => Some(Value::StringSeq(map.values().cloned().collect())),
            Kind::AnySeq => Some(Value::AnySeq(
                map.values().cloned().map(Value::String).collect(),
            )),
            Kind::AnyMap => Some(Value::AnyMap(widen_map(map))),
            _ => None,
        },
        Value::AnyMap(map) => match target {
            Kind::StringMap => Some(Value::StringMap(narrow_map(map))),
            _ => None,
        },
        Value::Nil | Value::Error(_) | Value::Opaque(_) => None,
    }
}

fn from_int(i: i64, target: Kind) -> Option<Value> {
    match target {
        Kind::Int => Some(Value::Int(i)),
        Kind::Int64 => Some(Value::Int64(i)),
        Kind::Byte => Some(Value::Byte(i as u8)),
        Kind::Float64 => Some(Value::Float64(i as f64)),
        Kind::String => Some(Value::String(i.to_string())),
        Kind::Bool => Some(Value::Bool(i > 0)),
        _ => None,
    }
}

fn from_byte(b: u8, target: Kind) -> Option<Value> {
    match target {
        Kind::Int => Some(Value::Int(b.into())),
        Kind::Int64 => Some(Value::Int64(b.into())),
        Kind::Float64 => Some(Value::Float64(b.into())),
        // The byte is read as a single character, not formatted as a number.
        Kind::String => Some(Value::String(char::from(b).to_string())),
        Kind::Bool => Some(Value::Bool(b > 0)),
        _ => None,
    }
}

fn from_string(s: &str, target: Kind) -> Option<Value> {
    match target {
        Kind::Int => Some(Value::Int(parse_int(s))),
        Kind::Int64 => Some(Value::Int64(parse_int(s))),
        Kind::Float64 => Some(Value::Float64(s.parse().unwrap_or(0.0))),
        Kind::Bool => Some(Value::Bool(s == "true")),
        Kind::ByteSeq => Some(Value::ByteSeq(s.as_bytes().to_vec())),
        _ => None,
    }
}

fn from_bytes(bytes: &[u8], target: Kind) -> Option<Value> {
    match target {
        Kind::String => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        Kind::IntSeq => Some(Value::IntSeq(bytes.iter().map(|&b| b.into()).collect())),
        Kind::StringSeq => Some(Value::StringSeq(
            bytes.iter().map(|&b| char::from(b).to_string()).collect(),
        )),
        Kind::AnyMap => {
            let object: serde_json::Map<String, serde_json::Value> =
                serde_json::from_slice(bytes).ok()?;
            Some(Value::from(serde_json::Value::Object(object)))
        }
        _ => None,
    }
}

/// Parses a base-10 integer, yielding `0` when the text is not one.
fn parse_int(s: &str) -> i64 {
    s.parse().unwrap_or(0)
}

fn int_or_zero(value: &Value) -> i64 {
    match convert(value, Kind::Int) {
        Some(Value::Int(i)) => i,
        _ => 0,
    }
}

pub(crate) fn string_or_empty(value: &Value) -> String {
    match convert(value, Kind::String) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

pub(crate) fn widen_map(map: &StringMap) -> AnyMap {
    map.iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

pub(crate) fn narrow_map(map: &AnyMap) -> StringMap {
    map.iter()
        .map(|(k, v)| (k.clone(), string_or_empty(v)))
        .collect()
}
