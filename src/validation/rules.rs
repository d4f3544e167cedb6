//! Validation Rules
//!
//! Declarative per-field rules. Rules are applied in declaration order, so a
//! trim or default declared first is visible to the constraints declared after it.

use url::Url;

use super::field::{FieldSet, FieldValue};

/// Source of configuration-provided defaults, looked up by field name.
pub trait DefaultSource {
    fn default_for(&self, field: &str) -> Option<FieldValue>;
}

/// Default source with nothing to offer.
pub struct NoDefaults;

impl DefaultSource for NoDefaults {
    fn default_for(&self, _field: &str) -> Option<FieldValue> {
        None
    }
}

/// Value substituted into an empty field.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    /// Normalize empty strings and lists to null.
    Null,
    Static(FieldValue),
    /// Pull the value of the same-named field from the configuration.
    Config,
}

/// Value transformation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// `false` becomes null so the flag is omitted.
    FalseAsAbsent,
}

/// Predicate over the whole field set, evaluated when the rule runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    Equals {
        field: &'static str,
        value: &'static str,
    },
}

impl Condition {
    pub fn equals(field: &'static str, value: &'static str) -> Self {
        Self::Equals { field, value }
    }

    pub fn holds(&self, fields: &FieldSet) -> bool {
        match self {
            Self::Equals { field, value } => fields.get_str(field) == Some(*value),
        }
    }
}

/// A single declared rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    Trim(&'static str),
    Default(&'static str, DefaultValue),
    Filter(&'static str, Filter),
    Required(&'static str),
    RequiredWhen(&'static str, Condition),
    Length {
        field: &'static str,
        min: Option<usize>,
        max: Option<usize>,
    },
    PrintableAscii(&'static str),
    In(&'static str, &'static [&'static str]),
    Url(&'static str),
    Boolean(&'static str),
    /// Ordered set of whitespace-free tokens.
    Strings(&'static str),
}

impl Rule {
    pub fn trim(field: &'static str) -> Self {
        Self::Trim(field)
    }

    pub fn default_null(field: &'static str) -> Self {
        Self::Default(field, DefaultValue::Null)
    }

    pub fn default_value(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::Default(field, DefaultValue::Static(value.into()))
    }

    pub fn default_from_config(field: &'static str) -> Self {
        Self::Default(field, DefaultValue::Config)
    }

    pub fn required(field: &'static str) -> Self {
        Self::Required(field)
    }

    pub fn required_when(field: &'static str, condition: Condition) -> Self {
        Self::RequiredWhen(field, condition)
    }

    pub fn length(field: &'static str, min: Option<usize>, max: Option<usize>) -> Self {
        Self::Length { field, min, max }
    }

    pub fn max_length(field: &'static str, max: usize) -> Self {
        Self::Length {
            field,
            min: None,
            max: Some(max),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::Trim(f)
            | Self::Default(f, _)
            | Self::Filter(f, _)
            | Self::Required(f)
            | Self::RequiredWhen(f, _)
            | Self::PrintableAscii(f)
            | Self::In(f, _)
            | Self::Url(f)
            | Self::Boolean(f)
            | Self::Strings(f) => *f,
            Self::Length { field, .. } => *field,
        }
    }

    /// Constraint rules can fail; transformations never do.
    pub fn is_constraint(&self) -> bool {
        !matches!(self, Self::Trim(_) | Self::Default(..) | Self::Filter(..))
    }

    /// Apply the rule, mutating the field set in place.
    pub fn apply(&self, fields: &mut FieldSet, defaults: &dyn DefaultSource) -> Result<(), String> {
        let field = self.field();
        let value = fields.get(field).clone();

        match self {
            Self::Trim(_) => {
                if let FieldValue::Str(s) = &value {
                    fields.set(field, FieldValue::Str(s.trim().to_string()));
                }
            }
            Self::Default(_, default) => {
                if value.is_empty() {
                    let substituted = match default {
                        DefaultValue::Null => FieldValue::Null,
                        DefaultValue::Static(v) => v.clone(),
                        DefaultValue::Config => defaults.default_for(field).unwrap_or_default(),
                    };
                    fields.set(field, substituted);
                }
            }
            Self::Filter(_, Filter::FalseAsAbsent) => {
                if value == FieldValue::Bool(false) {
                    fields.set(field, FieldValue::Null);
                }
            }
            Self::Required(_) => {
                if value.is_empty() {
                    return Err(format!("{} cannot be blank", field));
                }
            }
            Self::RequiredWhen(_, condition) => {
                if value.is_empty() && condition.holds(fields) {
                    return Err(format!("{} cannot be blank", field));
                }
            }
            _ if value.is_empty() => {}
            Self::Length { min, max, .. } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("{} must be a string", field))?;
                let len = s.chars().count();
                if let Some(min) = min.filter(|m| len < *m) {
                    return Err(format!("{} must contain at least {} characters", field, min));
                }
                if let Some(max) = max.filter(|m| len > *m) {
                    return Err(format!("{} must contain at most {} characters", field, max));
                }
            }
            Self::PrintableAscii(_) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("{} must be a string", field))?;
                if !s.chars().all(|c| (' '..='~').contains(&c)) {
                    return Err(format!(
                        "{} may contain only printable ASCII characters",
                        field
                    ));
                }
            }
            Self::In(_, range) => {
                let valid = value
                    .as_str()
                    .is_some_and(|s| range.iter().any(|r| *r == s));
                if !valid {
                    return Err(format!("{} must be one of: {}", field, range.join(", ")));
                }
            }
            Self::Url(_) => {
                let valid = value
                    .as_str()
                    .and_then(|s| Url::parse(s).ok())
                    .is_some_and(|u| {
                        matches!(u.scheme(), "http" | "https") && u.host_str().is_some()
                    });
                if !valid {
                    return Err(format!("{} is not a valid URL", field));
                }
            }
            Self::Boolean(_) => {
                let coerced = match &value {
                    FieldValue::Bool(b) => *b,
                    FieldValue::Str(s) => match s.as_str() {
                        "1" | "true" => true,
                        "0" | "false" => false,
                        _ => return Err(format!("{} must be either true or false", field)),
                    },
                    _ => return Err(format!("{} must be either true or false", field)),
                };
                fields.set(field, FieldValue::Bool(coerced));
            }
            Self::Strings(_) => {
                let items: Vec<String> = match &value {
                    FieldValue::Str(s) => s.split_whitespace().map(String::from).collect(),
                    FieldValue::List(items) => items.iter().map(|i| i.trim().to_string()).collect(),
                    _ => return Err(format!("{} must be a list of strings", field)),
                };

                let mut normalized: Vec<String> = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_empty() {
                        return Err(format!("{} must not contain empty values", field));
                    }
                    if item.chars().any(char::is_whitespace) {
                        return Err(format!("{} values must not contain whitespace", field));
                    }
                    if !normalized.contains(&item) {
                        normalized.push(item);
                    }
                }
                fields.set(field, FieldValue::List(normalized));
            }
        }

        Ok(())
    }
}

/// Rules shared by every request that carries device identification.
pub fn device_rules() -> Vec<Rule> {
    vec![
        Rule::trim("device_id"),
        Rule::default_from_config("device_id"),
        Rule::length("device_id", Some(6), Some(50)),
        Rule::PrintableAscii("device_id"),
        Rule::trim("device_name"),
        Rule::default_from_config("device_name"),
        Rule::max_length("device_name", 100),
    ]
}
