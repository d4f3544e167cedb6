//! Field Values
//!
//! Untyped field storage the validation rules operate on.

use crate::types::scope;

/// A single field value.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// Null, empty string and empty list count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Str(s) => s.is_empty(),
            Self::Bool(_) => false,
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Wire encoding: lists are space-joined, booleans are `1`/`0`, null is absent.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Str(s) => Some(s.clone()),
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Self::List(items) => scope::join(items),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Internal field name mapped to its name on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireName {
    pub field: &'static str,
    pub wire: &'static str,
}

impl WireName {
    pub const fn new(field: &'static str, wire: &'static str) -> Self {
        Self { field, wire }
    }
}

/// Ordered set of named field values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(&'static str, FieldValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field, chaining.
    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Current value; unknown fields read as null.
    pub fn get(&self, name: &str) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .unwrap_or(&NULL)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    pub fn set(&mut self, name: &'static str, value: FieldValue) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn is_empty(&self, name: &str) -> bool {
        self.get(name).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    /// Encode in the order of the wire-name table, skipping absent values.
    pub fn to_wire_pairs(&self, names: &[WireName]) -> Vec<(&'static str, String)> {
        names
            .iter()
            .filter_map(|name| self.get(name.field).to_wire().map(|v| (name.wire, v)))
            .collect()
    }
}
