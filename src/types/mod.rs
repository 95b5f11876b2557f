//! Argument values for template compilation.
//!
//! Every argument handed to [`crate::compile`] is a [`Value`]. The variants
//! mirror the kinds a placeholder can accept:
//!
//! | Variant  | Accepted by                    |
//! |----------|--------------------------------|
//! | `Null`   | `?`, `?d`, `?f`                |
//! | `Bool`   | `?`, `?d`, `?f`                |
//! | `Int`    | `?`, `?d`, `?f`                |
//! | `Float`  | `?`, `?d`, `?f`                |
//! | `String` | `?`, `?d`, `?f`, `?#`          |
//! | `List`   | `?a`, `?#`                     |
//! | `Assoc`  | `?a`, `?#` (non-associative)   |
//! | `Skip`   | any placeholder inside `{...}` |
//!
//! [`Value::Skip`] is the skip sentinel. It is a tag of its own, so no
//! string, number or container can ever compare equal to it.

use std::fmt;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A dynamically-typed template argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A boolean, rendered as `1` / `0`.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// An IEEE 754 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An ordered key/value list. Insertion order is preserved.
    Assoc(Vec<(String, Value)>),
    /// The skip sentinel returned by [`crate::skip`].
    Skip,
}

impl Value {
    /// Builds an [`Value::Assoc`] from key/value pairs, keeping their order.
    ///
    /// ```
    /// use sqlweave::Value;
    ///
    /// let v = Value::assoc([("a", 1), ("b", 2)]);
    /// assert_eq!(v.kind_name(), "key/value list");
    /// ```
    pub fn assoc<K, V, I>(pairs: I) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Assoc(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` if this value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this value is the skip sentinel.
    pub fn is_skip(&self) -> bool {
        matches!(self, Value::Skip)
    }

    /// Returns `true` for the scalar kinds accepted by the generic `?`
    /// placeholder: null, boolean, integer, float and string.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
        )
    }

    /// A short human-readable name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Assoc(_) => "key/value list",
            Value::Skip => "skip sentinel",
        }
    }
}

/// Returns `true` if the keys of a key/value list are not a contiguous
/// zero-based run (`"0"`, `"1"`, ...) in insertion order.
///
/// A non-associative key/value list is formatted exactly like a plain list.
pub fn is_associative(entries: &[(String, Value)]) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(i, (key, _))| *key != i.to_string())
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(r) => write!(f, "{r}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Assoc(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Skip => write!(f, "<skip>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Float(r)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    /// Maps JSON onto template arguments. Numbers that fit an `i64` become
    /// [`Value::Int`], everything else numeric becomes [`Value::Float`].
    /// Object keys keep their document order.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Assoc(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
