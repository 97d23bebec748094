// validation/mod.rs - Declarative request validation
//
// A `Schema` is a list of `FieldRule`s. Every rule is evaluated against the
// whole candidate object, so rules that depend on sibling fields
// (password requires confirmPassword, confirmPassword must equal password)
// are data rather than control flow. Validation never mutates the input; on
// success it hands back the normalized values.

pub mod email;
pub mod rule;

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use uuid::Uuid;

pub use email::is_valid_email;
pub use rule::FieldRule;

/// Per-field validation failures. The first failure for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("Validation fails")]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn into_field_errors(self) -> HashMap<String, String> {
        self.fields.into_iter().collect()
    }
}

/// A normalized field value produced by a successful validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Id(Uuid),
}

/// Values that passed a `Schema`, keyed by field name. Fields that were
/// absent from the candidate are absent here too.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Validated {
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text for a field the schema marks as required
    pub fn required_text(&self, field: &str) -> Result<&str, ValidationErrors> {
        self.text(field)
            .ok_or_else(|| ValidationErrors::single(field, format!("{} is a required field", field)))
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.values.get(field) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn id(&self, field: &str) -> Option<Uuid> {
        match self.values.get(field) {
            Some(FieldValue::Id(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }
}

/// Declarative object schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Check `candidate` against every rule and collect all failures
    pub fn validate(&self, candidate: &Value) -> Result<Validated, ValidationErrors> {
        let object = match candidate {
            Value::Object(map) => map,
            _ => return Err(ValidationErrors::single("body", "body must be an object")),
        };

        let mut errors = ValidationErrors::new();
        let mut validated = Validated::default();

        for rule in &self.rules {
            match rule.check(object) {
                Ok(Some(value)) => {
                    validated.values.insert(rule.field(), value);
                }
                Ok(None) => {}
                Err(message) => errors.add(rule.field(), message),
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }

    /// Convenience for callers that only need a yes/no answer
    pub fn is_valid(&self, candidate: &Value) -> bool {
        self.validate(candidate).is_ok()
    }
}

/// JavaScript-style truthiness used by conditional rules: absent, null,
/// `false`, `0` and `""` do not trigger a dependent rule.
pub(crate) fn is_truthy(object: &Map<String, Value>, field: &str) -> bool {
    match object.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(_) => true,
    }
}
