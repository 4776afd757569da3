//! Attribute bags for ABAC evaluation.
//!
//! Three bags reach a rule:
//! - **Subject**: who is asking. Always carries a role, plus arbitrary attributes.
//! - **Resource**: what is being accessed (optional).
//! - **Context**: the circumstances of the request, e.g. time of day (optional).
//!
//! The engine never inspects these bags; it hands them to the rule as-is.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Attribute Value
// ============================================================================

/// A weakly-typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttributeValue>),
    Map(Attributes),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Attributes> {
        match self {
            AttributeValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        AttributeValue::List(value)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(value: Attributes) -> Self {
        AttributeValue::Map(value)
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Open key/value bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// Returns the attribute if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Subject
// ============================================================================

const ROLE_KEY: &str = "role";

/// The party requesting access.
///
/// The role is mandatory; it is the key the RBAC gate resolves permissions
/// for. Everything else is free-form. Attributes are serialized flat next to
/// `role`, so `role` is never stored as an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    role: String,
    #[serde(flatten)]
    attributes: Attributes,
}

impl Subject {
    /// Creates a subject with the given role and no other attributes.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            attributes: Attributes::new(),
        }
    }

    /// Sets an attribute (builder pattern).
    ///
    /// The `role` key is reserved and ignored here; the role is fixed by
    /// [`Subject::new`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        let key = key.into();
        if key != ROLE_KEY {
            self.attributes.insert(key, value);
        }
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// All attributes except the role.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Returns the attribute if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get_str(key)
    }
}

// ============================================================================
// Request Context
// ============================================================================

/// Builds a context bag describing the moment of a request.
///
/// Keys: `timestamp` (RFC 3339), `hour` (0-23), `weekday` (e.g. `"Wed"`)
/// and `is_business_hours` (09:00-17:00 UTC, Monday to Friday).
pub fn request_context(ts: DateTime<Utc>) -> Attributes {
    let hour = ts.hour();
    let weekday = ts.weekday();
    let is_weekday = !matches!(weekday, chrono::Weekday::Sat | chrono::Weekday::Sun);
    let is_business_hours = is_weekday && (9..17).contains(&hour);

    Attributes::new()
        .with("timestamp", ts.to_rfc3339())
        .with("hour", hour)
        .with("weekday", weekday.to_string())
        .with("is_business_hours", is_business_hours)
}

// ============================================================================
// Tests
// ============================================================================
