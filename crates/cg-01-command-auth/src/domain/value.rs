//! # Value Trees
//!
//! The canonicalizer walks any structured value through the [`ValueTree`]
//! accessor: type discrimination, array iteration and object key iteration.
//! Two trees are provided: parsed `serde_json::Value` documents as they come
//! off the wire, and [`CanonicalValue`] for building command parameters in
//! code.

use serde_json::Value;

/// One level of a value tree, as seen by the canonicalizer.
pub enum Node<'a, V: ?Sized> {
    /// `null`, or an absent value.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer above `i64::MAX`.
    UInt(u64),
    /// Floating-point number.
    Float(f64),
    /// String value.
    Str(&'a str),
    /// Array elements in order.
    Array(Box<dyn Iterator<Item = &'a V> + 'a>),
    /// Object members in source order (keys unique).
    Object(Box<dyn Iterator<Item = (&'a str, &'a V)> + 'a>),
}

/// Read-only access to a structured value.
pub trait ValueTree {
    /// Discriminate this value and expose its children.
    fn node(&self) -> Node<'_, Self>;
}

impl ValueTree for Value {
    fn node(&self) -> Node<'_, Self> {
        match self {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Node::UInt(u)
                } else {
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::Str(s),
            Value::Array(items) => Node::Array(Box::new(items.iter())),
            Value::Object(map) => Node::Object(Box::new(map.iter().map(|(k, v)| (k.as_str(), v)))),
        }
    }
}

/// Owned structured value with unique, insertion-ordered object keys.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// Floating-point number.
    Float(f64),
    /// String.
    String(String),
    /// Ordered sequence.
    Array(Vec<CanonicalValue>),
    /// Ordered key/value pairs, keys unique.
    Object(Vec<(String, CanonicalValue)>),
}

impl CanonicalValue {
    /// Empty object.
    pub fn object() -> Self {
        Self::Object(Vec::new())
    }

    /// Set `key` on an object, replacing an existing member in place.
    ///
    /// Has no effect on non-object values.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CanonicalValue>) {
        let Self::Object(members) = self else {
            return;
        };
        let key = key.into();
        let value = value.into();
        match members.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => members.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CanonicalValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up an object member.
    pub fn get(&self, key: &str) -> Option<&CanonicalValue> {
        match self {
            Self::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl ValueTree for CanonicalValue {
    fn node(&self) -> Node<'_, Self> {
        match self {
            Self::Null => Node::Null,
            Self::Bool(b) => Node::Bool(*b),
            Self::Integer(i) => Node::Int(*i),
            Self::Unsigned(u) => Node::UInt(*u),
            Self::Float(f) => Node::Float(*f),
            Self::String(s) => Node::Str(s),
            Self::Array(items) => Node::Array(Box::new(items.iter())),
            Self::Object(members) => {
                Node::Object(Box::new(members.iter().map(|(k, v)| (k.as_str(), v))))
            }
        }
    }
}

impl From<bool> for CanonicalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CanonicalValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for CanonicalValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for CanonicalValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Unsigned(value), Self::Integer)
    }
}

impl From<f64> for CanonicalValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CanonicalValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for CanonicalValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<CanonicalValue>> for CanonicalValue {
    fn from(value: Vec<CanonicalValue>) -> Self {
        Self::Array(value)
    }
}

impl From<&Value> for CanonicalValue {
    fn from(value: &Value) -> Self {
        match value.node() {
            Node::Null => Self::Null,
            Node::Bool(b) => Self::Bool(b),
            Node::Int(i) => Self::Integer(i),
            Node::UInt(u) => Self::Unsigned(u),
            Node::Float(f) => Self::Float(f),
            Node::Str(s) => Self::String(s.to_owned()),
            Node::Array(items) => Self::Array(items.map(Self::from).collect()),
            Node::Object(members) => Self::Object(
                members
                    .map(|(k, v)| (k.to_owned(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}
