//! The dynamic [`Value`] every codec validates, encodes and decodes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dynamically typed value passed through codec trees.
///
/// Codecs are strict about variants: an integer codec accepts `Int`, a float
/// codec accepts `Float`, and so on, so that decoding an accepted value always
/// reproduces it exactly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Absent marker. Produced by optional codecs and omitted from objects.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    /// Integers handled by fixed-width and variable-length integer codecs.
    Int(i64),
    /// Values of the 64-bit big-integer codec (signed or unsigned range).
    BigInt(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Arrays and tuples.
    Array(Vec<Value>),
    /// Named fields. Equality ignores key order.
    Object(IndexMap<String, Value>),
    /// Key-value entries of a record codec.
    Map(Vec<(Value, Value)>),
}

pub(crate) static UNDEFINED: Value = Value::Undefined;

impl Value {
    /// Builds an object from `(name, value)` pairs.
    ///
    /// ```
    /// use binform::Value;
    ///
    /// let value = Value::object([("count", Value::Int(3)), ("flag", Value::Bool(true))]);
    /// assert_eq!(value.get("count"), Some(&Value::Int(3)));
    /// ```
    pub fn object<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer as a length or index. `None` for negative or non-integer values.
    pub fn as_usize(&self) -> Option<usize> {
        self.as_i64().and_then(|n| usize::try_from(n).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Field lookup on objects; `None` for missing fields and non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}
