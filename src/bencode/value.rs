use bytes::Bytes;
use std::collections::BTreeMap;

/// A bencode value.
///
/// Bencode has four wire productions: integers, byte strings, lists, and
/// dictionaries. Byte strings appear here as two variants: [`Value::Text`]
/// for ordinary strings (paths and names, usually but not necessarily
/// valid UTF-8) and [`Value::Binary`] for the `pieces` digest blob, which
/// must never be treated as text. Exactly one variant is populated; the
/// typed accessors return `None` on a tag mismatch.
///
/// # Examples
///
/// ```
/// use bitcheck::bencode::Value;
///
/// let int = Value::Integer(42);
/// let name = Value::text("hello");
///
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(name.as_str(), Some("hello"));
/// assert_eq!(name.as_integer(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Text(Bytes),
    /// A raw digest blob, the value of a `pieces` key.
    Binary(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with UTF-8 string keys.
    Dict(BTreeMap<String, Value>),
}

impl Value {
    /// Creates a text value from a UTF-8 string.
    pub fn text(s: &str) -> Self {
        Value::Text(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the raw bytes of a text string.
    ///
    /// Binary-valued descriptor fields such as `filehash` are carried in
    /// the text variant; this accessor exposes them without a UTF-8 check.
    pub fn as_text(&self) -> Option<&Bytes> {
        match self {
            Value::Text(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 text
    /// string.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitcheck::bencode::Value;
    ///
    /// assert_eq!(Value::text("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::Integer(42).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the value as a binary blob, if it is one.
    ///
    /// Only `pieces` values decode to this variant; a text string does
    /// not satisfy it.
    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<BTreeMap<String, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or the key is
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitcheck::bencode::decode_exact;
    ///
    /// let value = decode_exact(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get("foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get("missing"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(d: BTreeMap<String, Value>) -> Self {
        Value::Dict(d)
    }
}
