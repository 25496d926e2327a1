//! Record shape accepted by the engine.

use crate::{error::Result, Error, Recency};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

/// Field carrying the last-modified timestamp unless configured otherwise.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "updatedAt";

/// Which of the two inputs a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Possibly stale cached copy
    Local,
    /// Authoritative copy from the server
    Remote,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Local => write!(f, "local"),
            Side::Remote => write!(f, "remote"),
        }
    }
}

/// JSON kind of a value, reported when an argument is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Borrow `value` as a record, or reject it on behalf of `side`.
pub fn as_record(value: &Value, side: Side) -> Result<&Map<String, Value>> {
    value.as_object().ok_or(Error::InvalidArgument {
        side,
        found: ValueKind::of(value),
    })
}

/// A record that knows how recently it was written.
///
/// Implement this for domain structs with a fixed field set to resolve them
/// with [`resolve_versioned`](crate::resolve_versioned) without going
/// through JSON.
pub trait Versioned {
    fn recency(&self) -> Recency;
}

impl<T: Versioned + ?Sized> Versioned for &T {
    fn recency(&self) -> Recency {
        (**self).recency()
    }
}

/// An owned JSON object with an optional `updatedAt` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionedRecord(Map<String, Value>);

impl VersionedRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw timestamp value, if present.
    pub fn updated_at(&self) -> Option<&Value> {
        self.0.get(DEFAULT_TIMESTAMP_FIELD)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for VersionedRecord {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Value> for VersionedRecord {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(Error::InvalidArgument {
                side: Side::Local,
                found: ValueKind::of(&other),
            }),
        }
    }
}

impl From<VersionedRecord> for Value {
    fn from(record: VersionedRecord) -> Self {
        record.into_value()
    }
}

impl Versioned for VersionedRecord {
    fn recency(&self) -> Recency {
        Recency::from_value(self.updated_at())
    }
}
