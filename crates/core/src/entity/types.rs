//! Statically declared entity schemas.
//!
//! An entity declares its externally visible properties once, as an ordered
//! list of [`Property`] descriptors. Serialization (`to_map`, `to_tuple`) and
//! query validation (`has_property`) both consult that list, so there is no
//! runtime reflection involved.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::EntityError;

/// Storage type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Integer,
    Text,
    /// Stored as integer Unix epoch seconds (UTC).
    Timestamp,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Integer => write!(f, "integer"),
            PropertyKind::Text => write!(f, "text"),
            PropertyKind::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// One declared property of an entity and the column backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: PropertyKind,
    pub nullable: bool,
}

impl Property {
    pub const fn new(name: &'static str, column: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            column,
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Whether `value` can be stored in this property.
    ///
    /// Timestamps also accept epoch seconds, their storage representation.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self.kind, value) {
            (_, Value::Null) => self.nullable,
            (PropertyKind::Integer, Value::Integer(_)) => true,
            (PropertyKind::Text, Value::Text(_)) => true,
            (PropertyKind::Timestamp, Value::Timestamp(_) | Value::Integer(_)) => true,
            _ => false,
        }
    }
}

/// A property value as seen by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Converts a timestamp to Unix epoch seconds; other values are returned as is.
    pub fn into_unix(self) -> Self {
        match self {
            Value::Timestamp(ts) => Value::Integer(ts.timestamp()),
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A domain object with a declared, closed set of externally visible properties.
pub trait Entity: Sized {
    /// Name used in log lines and error records.
    const ENTITY_TYPE: &'static str;

    /// Table backing this entity.
    const TABLE: &'static str;

    /// Store-assigned identity property; never written by updates.
    const PRIMARY_KEY: &'static str = "id";

    /// Declared properties, in serialization order.
    const PROPERTIES: &'static [Property];

    /// Current value of a declared property, `None` for undeclared names.
    fn value_of(&self, name: &str) -> Option<Value>;

    /// Entity rules a new value for `name` must satisfy beyond its kind.
    fn check_value(_name: &str, _value: &Value) -> Result<(), EntityError> {
        Ok(())
    }

    fn property(name: &str) -> Option<&'static Property> {
        Self::PROPERTIES.iter().find(|p| p.name == name)
    }

    fn has_property(name: &str) -> bool {
        Self::property(name).is_some()
    }

    /// Returns the subset of `names` that are declared properties.
    fn has_properties<I, S>(names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| Self::has_property(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect()
    }

    /// All declared properties with their current values, in declaration order.
    fn to_map(&self) -> Vec<(&'static str, Value)> {
        Self::PROPERTIES
            .iter()
            .map(|p| (p.name, self.value_of(p.name).unwrap_or(Value::Null)))
            .collect()
    }

    /// Values to bind into a parameterized statement.
    ///
    /// Properties named in `excluded` are skipped. With `dt_to_unix` set,
    /// timestamps are converted to epoch seconds.
    fn to_tuple(&self, excluded: &[&str], dt_to_unix: bool) -> Vec<Value> {
        self.to_map()
            .into_iter()
            .filter(|(name, _)| !excluded.contains(name))
            .map(|(_, value)| if dt_to_unix { value.into_unix() } else { value })
            .collect()
    }
}
