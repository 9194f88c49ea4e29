//! Rule-driven form validation.
//!
//! A form is described by [`FormRules`]: for each field, a list of tagged
//! [`Rule`]s. Rules always run in a fixed order regardless of the order they
//! were added in:
//!
//! required → email → password → username → url → did → min length →
//! max length → custom
//!
//! The first failing rule wins and the rest are skipped, so each field gets
//! at most one error. Optional fields left empty skip the format and length
//! rules; custom rules still run so cross-field checks keep working.

use super::validators::{
    text_length, validate_did, validate_email, validate_password, validate_required, validate_url,
    validate_username,
};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Field name to error message. Valid fields are absent.
pub type FormErrors = HashMap<String, String>;

/// Custom check receiving the field value and the whole form.
pub type CustomCheck = Arc<dyn Fn(&Value, &Value) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub enum Rule {
    Required,
    Email,
    Password,
    Username,
    Url,
    Did,
    MinLength(usize),
    MaxLength(usize),
    Custom(CustomCheck),
}

impl Rule {
    /// Position in the fixed evaluation order.
    fn rank(&self) -> u8 {
        match self {
            Rule::Required => 0,
            Rule::Email => 1,
            Rule::Password => 2,
            Rule::Username => 3,
            Rule::Url => 4,
            Rule::Did => 5,
            Rule::MinLength(_) => 6,
            Rule::MaxLength(_) => 7,
            Rule::Custom(_) => 8,
        }
    }

    /// Whether the rule still applies to a blank optional field.
    fn applies_to_blank(&self) -> bool {
        matches!(self, Rule::Required | Rule::Custom(_))
    }

    fn check(&self, value: &Value, data: &Value) -> Option<String> {
        let text = text_of(value);
        match self {
            Rule::Required => validate_required(value, "This field"),
            Rule::Email => validate_email(&text),
            Rule::Password => validate_password(&text),
            Rule::Username => validate_username(&text),
            Rule::Url => validate_url(&text),
            Rule::Did => validate_did(&text),
            Rule::MinLength(min) => (text_length(&text) < *min)
                .then(|| format!("Must be at least {min} characters")),
            Rule::MaxLength(max) => (text_length(&text) > *max)
                .then(|| format!("Must be no more than {max} characters")),
            Rule::Custom(check) => check(value, data),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "Required"),
            Rule::Email => write!(f, "Email"),
            Rule::Password => write!(f, "Password"),
            Rule::Username => write!(f, "Username"),
            Rule::Url => write!(f, "Url"),
            Rule::Did => write!(f, "Did"),
            Rule::MinLength(n) => write!(f, "MinLength({n})"),
            Rule::MaxLength(n) => write!(f, "MaxLength({n})"),
            Rule::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Rules for a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    pub fn email(self) -> Self {
        self.rule(Rule::Email)
    }

    pub fn password(self) -> Self {
        self.rule(Rule::Password)
    }

    pub fn username(self) -> Self {
        self.rule(Rule::Username)
    }

    pub fn url(self) -> Self {
        self.rule(Rule::Url)
    }

    pub fn did(self) -> Self {
        self.rule(Rule::Did)
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(Rule::MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(Rule::MaxLength(max))
    }

    pub fn custom<F>(self, check: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.rule(Rule::Custom(Arc::new(check)))
    }

    /// First failing rule's message, in the fixed evaluation order.
    pub fn evaluate(&self, value: &Value, data: &Value) -> Option<String> {
        let mut ordered: Vec<&Rule> = self.rules.iter().collect();
        ordered.sort_by_key(|rule| rule.rank());

        // Only truly empty values count; whitespace still gets format checks
        let blank = text_of(value).is_empty();

        ordered
            .into_iter()
            .filter(|rule| !blank || rule.applies_to_blank())
            .find_map(|rule| rule.check(value, data))
    }
}

/// Rules for a whole form, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    fields: Vec<(String, FieldRules)>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rules for `name`, replacing any earlier entry.
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, existing)) => *existing = rules,
            None => self.fields.push((name, rules)),
        }
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn validate(&self, data: &Value) -> FormErrors {
        validate_form(data, self)
    }
}

/// Validates `data` (a JSON object) against `rules`.
///
/// Fields missing from `data` are treated as `null`. Returns a fresh map on
/// every call; an empty map means the form is valid.
pub fn validate_form(data: &Value, rules: &FormRules) -> FormErrors {
    rules
        .fields()
        .filter_map(|(name, field_rules)| {
            let value = data.get(name).unwrap_or(&Value::Null);
            field_rules
                .evaluate(value, data)
                .map(|message| (name.to_string(), message))
        })
        .collect()
}

/// String view of a form value; `null` reads as empty.
fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
