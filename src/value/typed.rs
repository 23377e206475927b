use std::borrow::Cow;

use super::{convert, AnyMap, ErrorValue, Kind, StringMap, Value};

static NIL: Value = Value::Nil;

/// The outcome of asking for a value as a particular kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// Nothing is stored at the path.
    NotFound,
    /// A value is stored but has no conversion to the requested kind.
    Unsupported(Kind),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound | Lookup::Unsupported(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(v) => Lookup::Found(f(v)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Unsupported(kind) => Lookup::Unsupported(kind),
        }
    }
}

impl<T: Default> Lookup<T> {
    /// Collapses absence and unsupported conversions into the zero value.
    pub fn unwrap_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}

/// Rust types a [`Value`] of a given [`Kind`] can be unpacked into.
pub trait FromValue: Sized {
    const KIND: Kind;

    /// Unpacks a value already converted to [`Self::KIND`].
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! from_value {
    ($ty:ty, $kind:ident, $($variant:ident)|+) => {
        impl FromValue for $ty {
            const KIND: Kind = Kind::$kind;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    $(Value::$variant(v) => Some(v),)+
                    _ => None,
                }
            }
        }
    };
}

from_value!(i64, Int, Int | Int64);
from_value!(u8, Byte, Byte);
from_value!(char, Rune, Rune);
from_value!(f64, Float64, Float64);
from_value!(String, String, String);
from_value!(bool, Bool, Bool);
from_value!(Vec<i64>, IntSeq, IntSeq);
from_value!(Vec<u8>, ByteSeq, ByteSeq);
from_value!(Vec<String>, StringSeq, StringSeq);
from_value!(Vec<Value>, AnySeq, AnySeq);
from_value!(Vec<StringMap>, StringMapSeq, StringMapSeq);
from_value!(Vec<AnyMap>, AnyMapSeq, AnyMapSeq);
from_value!(StringMap, StringMap, StringMap);
from_value!(AnyMap, AnyMap, AnyMap);

/// A resolved value together with coercing accessors.
///
/// The `as_*` accessors never fail: when nothing is stored, or the stored value
/// has no conversion to the requested kind, they return the zero value (`0`,
/// `""`, `false`, an empty container). Use [`lookup`](Self::lookup) or
/// [`try_as`](Self::try_as) to tell those cases apart.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue<'a> {
    value: Option<Cow<'a, Value>>,
}

impl<'a> TypedValue<'a> {
    pub fn new(value: Value) -> Self {
        Self {
            value: Some(Cow::Owned(value)),
        }
    }

    pub(crate) fn borrowed(value: &'a Value) -> Self {
        Self {
            value: Some(Cow::Borrowed(value)),
        }
    }

    pub(crate) fn absent() -> Self {
        Self { value: None }
    }

    /// Whether the path resolved to a stored value.
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn kind(&self) -> Kind {
        self.value().kind()
    }

    /// The underlying value; `Nil` when nothing was found.
    pub fn value(&self) -> &Value {
        self.value.as_deref().unwrap_or(&NIL)
    }

    pub fn into_value(self) -> Value {
        self.value.map(Cow::into_owned).unwrap_or_default()
    }

    /// Converts the value to `target`, distinguishing absence from failure.
    pub fn lookup(&self, target: Kind) -> Lookup<Value> {
        let Some(value) = self.value.as_deref() else {
            return Lookup::NotFound;
        };
        match convert(value, target) {
            Some(converted) => Lookup::Found(converted),
            None => Lookup::Unsupported(value.kind()),
        }
    }

    pub fn try_as<T: FromValue>(&self) -> Lookup<T> {
        self.extract(T::KIND)
    }

    fn extract<T: FromValue>(&self, target: Kind) -> Lookup<T> {
        match self.lookup(target) {
            Lookup::Found(value) => match T::from_value(value) {
                Some(v) => Lookup::Found(v),
                None => Lookup::Unsupported(self.kind()),
            },
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Unsupported(kind) => Lookup::Unsupported(kind),
        }
    }

    pub fn as_int(&self) -> i64 {
        self.try_as().unwrap_or_default()
    }

    pub fn as_int64(&self) -> i64 {
        self.extract(Kind::Int64).unwrap_or_default()
    }

    pub fn as_byte(&self) -> u8 {
        self.try_as().unwrap_or_default()
    }

    pub fn as_rune(&self) -> char {
        self.try_as().unwrap_or_default()
    }

    pub fn as_float(&self) -> f64 {
        self.try_as().unwrap_or_default()
    }

    pub fn as_string(&self) -> String {
        self.try_as().unwrap_or_default()
    }

    pub fn as_bool(&self) -> bool {
        self.try_as().unwrap_or_default()
    }

    pub fn as_int_seq(&self) -> Vec<i64> {
        self.try_as().unwrap_or_default()
    }

    pub fn as_byte_seq(&self) -> Vec<u8> {
        self.try_as().unwrap_or_default()
    }

    pub fn as_string_seq(&self) -> Vec<String> {
        self.try_as().unwrap_or_default()
    }

    pub fn as_any_seq(&self) -> Vec<Value> {
        self.try_as().unwrap_or_default()
    }

    pub fn as_string_map(&self) -> StringMap {
        self.try_as().unwrap_or_default()
    }

    pub fn as_any_map(&self) -> AnyMap {
        self.try_as().unwrap_or_default()
    }

    pub fn as_string_map_seq(&self) -> Vec<StringMap> {
        self.try_as().unwrap_or_default()
    }

    pub fn as_any_map_seq(&self) -> Vec<AnyMap> {
        self.try_as().unwrap_or_default()
    }

    /// The stored failure, if the value is one.
    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self.value() {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Value> for TypedValue<'static> {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
