//! Validation Engine
//!
//! Ordered, declarative field rules shared by every request type and by the
//! client configuration.

pub mod field;
pub mod rules;

pub use field::{FieldSet, FieldValue, WireName};
pub use rules::{device_rules, Condition, DefaultSource, DefaultValue, Filter, NoDefaults, Rule};

use crate::error::{ValidationDetail, ValidationError};

/// Applies a list of rules to a field set.
#[derive(Clone, Debug)]
pub struct Validator {
    message: String,
    rules: Vec<Rule>,
}

impl Validator {
    /// Create a validator; `message` heads the error when any rule fails.
    pub fn new(message: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            message: message.into(),
            rules,
        }
    }

    /// Normalize `fields` in place and check every constraint.
    ///
    /// All failing fields are reported; a field is checked only until its first failure.
    pub fn validate(
        &self,
        fields: &mut FieldSet,
        defaults: &dyn DefaultSource,
    ) -> Result<(), ValidationError> {
        let mut details: Vec<ValidationDetail> = Vec::new();

        for rule in &self.rules {
            let field = rule.field();
            if rule.is_constraint() && details.iter().any(|d| d.field == field) {
                continue;
            }
            if let Err(description) = rule.apply(fields, defaults) {
                details.push(ValidationDetail::new(field, description));
            }
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.message.clone(), details))
        }
    }

    /// Owned variant of [`Validator::validate`].
    pub fn run(
        &self,
        mut fields: FieldSet,
        defaults: &dyn DefaultSource,
    ) -> Result<FieldSet, ValidationError> {
        self.validate(&mut fields, defaults)?;
        Ok(fields)
    }
}
