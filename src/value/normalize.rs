//! Conversion between narrow (typed) and dynamic containers.

use super::convert::{narrow_map, string_or_empty, widen_map};
use super::Value;

/// Reinterprets a narrow container as its dynamic form.
///
/// `StringMap` becomes `AnyMap`; every typed sequence becomes `AnySeq`. The
/// conversion is lossless. Dynamic containers and non-containers are returned
/// unchanged.
pub fn widen(container: Value) -> Value {
    match container {
        Value::StringMap(map) => Value::AnyMap(widen_map(&map)),
        Value::StringSeq(items) => Value::AnySeq(items.into_iter().map(Value::String).collect()),
        Value::IntSeq(items) => Value::AnySeq(items.into_iter().map(Value::Int).collect()),
        Value::ByteSeq(items) => Value::AnySeq(items.into_iter().map(Value::Byte).collect()),
        Value::StringMapSeq(maps) => Value::AnySeq(maps.into_iter().map(Value::StringMap).collect()),
        Value::AnyMapSeq(maps) => Value::AnySeq(maps.into_iter().map(Value::AnyMap).collect()),
        other => other,
    }
}

/// Collapses a dynamic container to its string-valued form.
///
/// Every value is coerced to a string; values with no string conversion
/// (nested containers, `Nil`, errors) become `""`. Sequences of mappings keep
/// their shape and narrow each mapping instead. Anything else is returned as a
/// copy.
pub fn narrow(container: &Value) -> Value {
    match container {
        Value::AnyMap(map) => Value::StringMap(narrow_map(map)),
        Value::AnySeq(items) => Value::StringSeq(items.iter().map(string_or_empty).collect()),
        Value::IntSeq(items) => Value::StringSeq(items.iter().map(i64::to_string).collect()),
        Value::AnyMapSeq(maps) => Value::StringMapSeq(maps.iter().map(narrow_map).collect()),
        other => other.clone(),
    }
}
