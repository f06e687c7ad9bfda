//! Typed value container for component values
//!
//! `FieldValue` holds exactly one value of one of five serialization-stable
//! kinds. Its JSON form is decoded in a fixed priority order: integer, float,
//! string, boolean, timestamp. Timestamps are written as a one-key object
//! `{"timestamp": "<RFC 3339>"}` so no earlier kind can claim them.

use crate::error::{FormError, FormResult};
use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key used for the timestamp object form
const TIMESTAMP_KEY: &str = "timestamp";

/// A single component value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Date(DateTime<Utc>),
}

/// Discriminant of a [`FieldValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    String,
    Bool,
    Date,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Bool => "boolean",
            ValueKind::Date => "timestamp",
        };
        f.write_str(name)
    }
}

impl FieldValue {
    /// Store the textual description of a value that has no native kind
    pub fn describing(value: impl fmt::Display) -> Self {
        FieldValue::String(value.to_string())
    }

    /// Which representation this value holds
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Int(_) => ValueKind::Int,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::String(_) => ValueKind::String,
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Date(_) => ValueKind::Date,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a number (integers are widened)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as timestamp
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if numeric (int or float)
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Int(_) | FieldValue::Float(_))
    }

    /// Encode to the JSON wire form
    ///
    /// Non-finite floats have no JSON representation and are rejected.
    pub fn encode(&self) -> FormResult<String> {
        if let FieldValue::Float(v) = self {
            if !v.is_finite() {
                return Err(FormError::decode(format!("non-finite float {}", v)));
            }
        }
        serde_json::to_string(self).map_err(|e| FormError::decode(e.to_string()))
    }

    /// Decode from the JSON wire form
    pub fn decode(json: &str) -> FormResult<Self> {
        serde_json::from_str(json).map_err(|e| FormError::decode(e.to_string()))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::String(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Date(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Date(v)
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Int(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::String(v) => serializer.serialize_str(v),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Date(v) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(TIMESTAMP_KEY, &v.to_rfc3339())?;
                map.end()
            }
        }
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, float, string, boolean or timestamp object")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        match i64::try_from(v) {
            Ok(v) => Ok(FieldValue::Int(v)),
            Err(_) => Ok(FieldValue::Float(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Ok(FieldValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
        Ok(FieldValue::String(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Bool(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FieldValue, A::Error> {
        let mut timestamp: Option<String> = None;
        while let Some(key) = map.next_key::<String>()? {
            if key != TIMESTAMP_KEY || timestamp.is_some() {
                return Err(de::Error::custom(format!("unexpected key '{}'", key)));
            }
            timestamp = Some(map.next_value()?);
        }
        let raw = timestamp.ok_or_else(|| de::Error::missing_field(TIMESTAMP_KEY))?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| FieldValue::Date(d.with_timezone(&Utc)))
            .map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

// ============================================================================
// Tests
// ============================================================================
