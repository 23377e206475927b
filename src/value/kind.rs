use std::fmt;

use super::Value;

/// The semantic classification of a [`Value`].
///
/// A kind is always derived from the value's shape, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Int64,
    Byte,
    Rune,
    Float64,
    String,
    Bool,
    IntSeq,
    ByteSeq,
    StringSeq,
    AnySeq,
    StringMapSeq,
    AnyMapSeq,
    StringMap,
    AnyMap,
    ErrorKind,
    NilKind,
    Unknown,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Int => "Int",
            Kind::Int64 => "Int64",
            Kind::Byte => "Byte",
            Kind::Rune => "Rune",
            Kind::Float64 => "Float64",
            Kind::String => "String",
            Kind::Bool => "Bool",
            Kind::IntSeq => "IntSeq",
            Kind::ByteSeq => "ByteSeq",
            Kind::StringSeq => "StringSeq",
            Kind::AnySeq => "AnySeq",
            Kind::StringMapSeq => "StringMapSeq",
            Kind::AnyMapSeq => "AnyMapSeq",
            Kind::StringMap => "StringMap",
            Kind::AnyMap => "AnyMap",
            Kind::ErrorKind => "Error",
            Kind::NilKind => "Nil",
            Kind::Unknown => "Unknown",
        }
    }

    /// Mappings are addressed by key.
    pub fn is_mapping(self) -> bool {
        matches!(self, Kind::StringMap | Kind::AnyMap)
    }

    /// Sequences are addressed by a non-negative index.
    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            Kind::IntSeq
                | Kind::ByteSeq
                | Kind::StringSeq
                | Kind::AnySeq
                | Kind::StringMapSeq
                | Kind::AnyMapSeq
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a value by its runtime representation.
pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Nil => Kind::NilKind,
        Value::Int(_) => Kind::Int,
        Value::Int64(_) => Kind::Int64,
        Value::Byte(_) => Kind::Byte,
        Value::Rune(_) => Kind::Rune,
        Value::Float64(_) => Kind::Float64,
        Value::String(_) => Kind::String,
        Value::Bool(_) => Kind::Bool,
        Value::IntSeq(_) => Kind::IntSeq,
        Value::ByteSeq(_) => Kind::ByteSeq,
        Value::StringSeq(_) => Kind::StringSeq,
        Value::AnySeq(_) => Kind::AnySeq,
        Value::StringMapSeq(_) => Kind::StringMapSeq,
        Value::AnyMapSeq(_) => Kind::AnyMapSeq,
        Value::StringMap(_) => Kind::StringMap,
        Value::AnyMap(_) => Kind::AnyMap,
        Value::Error(_) => Kind::ErrorKind,
        Value::Opaque(_) => Kind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{AnyMap, StringMap};

    #[test]
    fn test_classify_scalars() {
        assert_eq!(classify(&Value::from(5)), Kind::Int);
        assert_eq!(classify(&Value::Int64(5)), Kind::Int64);
        assert_eq!(classify(&Value::from(5u8)), Kind::Byte);
        assert_eq!(classify(&Value::from('x')), Kind::Rune);
        assert_eq!(classify(&Value::from(1.5)), Kind::Float64);
        assert_eq!(classify(&Value::from("s")), Kind::String);
        assert_eq!(classify(&Value::from(true)), Kind::Bool);
    }

    #[test]
    fn test_classify_containers() {
        assert_eq!(classify(&Value::from(vec![1i64])), Kind::IntSeq);
        assert_eq!(classify(&Value::from(b"ab".to_vec())), Kind::ByteSeq);
        assert_eq!(classify(&Value::from(vec!["a"])), Kind::StringSeq);
        assert_eq!(classify(&Value::from(vec![Value::Nil])), Kind::AnySeq);
        assert_eq!(classify(&Value::from(vec![StringMap::new()])), Kind::StringMapSeq);
        assert_eq!(classify(&Value::from(vec![AnyMap::new()])), Kind::AnyMapSeq);
        assert_eq!(classify(&Value::from(StringMap::new())), Kind::StringMap);
        assert_eq!(classify(&Value::from(AnyMap::new())), Kind::AnyMap);
    }

    #[test]
    fn test_classify_absent_and_failure() {
        assert_eq!(classify(&Value::Nil), Kind::NilKind);
        assert_eq!(classify(&Value::from(None::<i64>)), Kind::NilKind);
        assert_eq!(classify(&Value::error("bad")), Kind::ErrorKind);
    }

    #[test]
    fn test_container_predicates() {
        assert!(Kind::StringMap.is_mapping());
        assert!(!Kind::AnySeq.is_mapping());
        assert!(Kind::StringMapSeq.is_sequence());
        assert!(!Kind::String.is_sequence());
    }
}
