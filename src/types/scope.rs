//! Scope Encoding
//!
//! Scopes travel as a single space-separated string and live in memory as an ordered list.

/// Join scope tokens for the wire. Empty input yields `None`.
pub fn join(scopes: &[String]) -> Option<String> {
    if scopes.is_empty() {
        None
    } else {
        Some(scopes.join(" "))
    }
}

/// Split a wire scope string. Blank input yields `None`.
pub fn split(scope: &str) -> Option<Vec<String>> {
    let scopes: Vec<String> = scope.split_whitespace().map(String::from).collect();
    if scopes.is_empty() {
        None
    } else {
        Some(scopes)
    }
}

/// Serde adapter for `Option<Vec<String>>` scope fields.
pub mod serde_scope {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.as_deref().and_then(super::join) {
            Some(joined) => serializer.serialize_str(&joined),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::split))
    }

    /// Used with `skip_serializing_if`.
    pub fn is_empty(value: &Option<Vec<String>>) -> bool {
        value.as_ref().map_or(true, Vec::is_empty)
    }
}
