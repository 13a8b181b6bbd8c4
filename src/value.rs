//! Native document values and the ordered document map.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fmt;

/// An ordered mapping of field name to value, as returned by the database.
///
/// Field order is preserved verbatim through encode/decode.
pub type Document = IndexMap<String, Value>;

/// A 12-byte object identifier, held in its 24-character lowercase hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse a 24-character hex string, normalizing to lowercase.
    ///
    /// Returns `None` if the input has the wrong length or contains
    /// non-hex characters.
    #[must_use]
    pub fn parse(hex: &str) -> Option<Self> {
        if hex.len() == 24 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(hex.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The 24-character lowercase hex representation.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One field value inside a [`Document`].
///
/// Seven variants carry database-native types that plain JSON cannot express;
/// these are what the codec wraps in `$`-tagged objects. The remaining
/// variants pass through the codec unchanged. Any database type outside this
/// union is not representable and would be lost on backup (documented
/// limitation of the snapshot format).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// A number the source type system did not mark as Int32/Int64/Double.
    /// Stays untagged on the wire.
    Number(serde_json::Number),
    String(String),
    ObjectId(ObjectId),
    /// Instant with millisecond precision on the wire.
    Date(DateTime<Utc>),
    /// High-precision decimal, carried verbatim as its string form.
    Decimal128(String),
    Double(f64),
    Int32(i32),
    Int64(i64),
    /// Logical timestamp: seconds since epoch plus an ordinal.
    Timestamp { time: u32, increment: u32 },
    Array(Vec<Value>),
    Document(Document),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
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

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Value::ObjectId(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Document(v)
    }
}

/// Build a [`Document`] from `key => value` pairs.
///
/// Values go through [`Value::from`], so integers map to `Int32`/`Int64` and
/// floats to `Double`.
///
/// # Example
/// ```
/// use mongovault::{doc, Value};
///
/// let d = doc! {
///     "name" => "ada",
///     "age" => 36,
///     "scores" => vec![Value::Int32(1), Value::Int32(2)],
/// };
/// assert_eq!(d.get("age"), Some(&Value::Int32(36)));
/// ```
#[macro_export]
macro_rules! doc {
    () => { $crate::Document::new() };
    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut document = $crate::Document::new();
        $(document.insert($key.to_string(), $crate::Value::from($val));)+
        document
    }};
}

// =============================================================================
// Tests
// =============================================================================
