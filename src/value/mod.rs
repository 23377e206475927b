//! Dynamic, path-addressable values.
//!
//! A [`Value`] is a loosely-typed tree of scalars, sequences and mappings, the
//! shape configuration data takes after it has been decoded from a file.
//! Values are read with [`get`] and rewritten with [`set`]; every read yields a
//! [`TypedValue`] that can be coerced to the type the caller wants.
//!
//! ```
//! use dynstore::value::{get, set, AnyMap, Value};
//!
//! let root = set(Value::from(AnyMap::new()), "server.port", Value::from(8080));
//! assert_eq!(get(&root, "server.port").as_string(), "8080");
//! assert_eq!(get(&root, "server.host").as_string(), "");
//! ```

mod convert;
mod error;
mod get;
mod kind;
mod normalize;
mod path;
mod set;
mod typed;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

pub use convert::convert;
pub use error::StoreError;
pub use get::{get, get_path};
pub use kind::{classify, Kind};
pub use normalize::{narrow, widen};
pub use path::Path;
pub use set::{set, set_path, try_set, try_set_path};
pub use typed::{FromValue, Lookup, TypedValue};

/// A narrow mapping: string keys, string values.
pub type StringMap = BTreeMap<String, String>;

/// A dynamic mapping: string keys, values of any kind.
pub type AnyMap = BTreeMap<String, Value>;

/// A runtime value of any supported kind.
///
/// Each variant corresponds to exactly one [`Kind`]; see [`classify`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Int(i64),
    Int64(i64),
    Byte(u8),
    Rune(char),
    Float64(f64),
    String(String),
    Bool(bool),
    IntSeq(Vec<i64>),
    ByteSeq(Vec<u8>),
    StringSeq(Vec<String>),
    AnySeq(Vec<Value>),
    StringMapSeq(Vec<StringMap>),
    AnyMapSeq(Vec<AnyMap>),
    StringMap(StringMap),
    AnyMap(AnyMap),
    Error(ErrorValue),
    Opaque(Opaque),
}

impl Value {
    /// Wraps a failure so it can be stored like any other value.
    pub fn error(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Value::Error(ErrorValue(Arc::from(error.into())))
    }

    /// Wraps a foreign payload. It classifies as [`Kind::Unknown`].
    pub fn opaque<T: Any + Send + Sync>(payload: T) -> Self {
        Value::Opaque(Opaque(Arc::new(payload)))
    }

    pub fn kind(&self) -> Kind {
        classify(self)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_any_map(&self) -> Option<&AnyMap> {
        match self {
            Value::AnyMap(m) => Some(m),
            _ => None,
        }
    }
}

/// A stored failure. Compares equal to another failure with the same message.
#[derive(Clone)]
pub struct ErrorValue(Arc<dyn std::error::Error + Send + Sync>);

impl ErrorValue {
    pub fn get(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorValue").field(&self.0.to_string()).finish()
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq for ErrorValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_string() == other.0.to_string()
    }
}

/// A payload of a type the store knows nothing about.
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque(..)")
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Rune(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::IntSeq(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::ByteSeq(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringSeq(v)
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::StringSeq(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::AnySeq(v)
    }
}

impl From<Vec<StringMap>> for Value {
    fn from(v: Vec<StringMap>) -> Self {
        Value::StringMapSeq(v)
    }
}

impl From<Vec<AnyMap>> for Value {
    fn from(v: Vec<AnyMap>) -> Self {
        Value::AnyMapSeq(v)
    }
}

impl From<StringMap> for Value {
    fn from(v: StringMap) -> Self {
        Value::StringMap(v)
    }
}

impl From<AnyMap> for Value {
    fn from(v: AnyMap) -> Self {
        Value::AnyMap(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        match v {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(f) => Value::Float64(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => Value::AnySeq(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::AnyMap(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float64(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::AnySeq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::AnyMap(
                object
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(v: serde_yaml::Value) -> Self {
        match v {
            serde_yaml::Value::Null => Value::Nil,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float64(n.as_f64().unwrap_or_default()),
            },
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::AnySeq(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => Value::AnyMap(
                mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; they are stored under their scalar text.
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil | Value::Opaque(_) => serializer.serialize_unit(),
            Value::Int(i) | Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Byte(b) => serializer.serialize_u8(*b),
            Value::Rune(c) => serializer.serialize_char(*c),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::IntSeq(items) => serialize_seq(serializer, items),
            Value::ByteSeq(items) => serialize_seq(serializer, items),
            Value::StringSeq(items) => serialize_seq(serializer, items),
            Value::AnySeq(items) => serialize_seq(serializer, items),
            Value::StringMapSeq(items) => serialize_seq(serializer, items),
            Value::AnyMapSeq(items) => serialize_seq(serializer, items),
            Value::StringMap(map) => serialize_map(serializer, map),
            Value::AnyMap(map) => serialize_map(serializer, map),
            Value::Error(e) => serializer.serialize_str(&e.to_string()),
        }
    }
}

fn serialize_seq<S: Serializer, T: Serialize>(serializer: S, items: &[T]) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

fn serialize_map<S: Serializer, T: Serialize>(
    serializer: S,
    map: &BTreeMap<String, T>,
) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (key, value) in map {
        out.serialize_entry(key, value)?;
    }
    out.end()
}
