use serde_json::{Map, Value};
use uuid::Uuid;

use super::{is_truthy, is_valid_email, FieldValue};

/// Shape a field's value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Strings, or numbers coerced to their decimal text
    Text,
    /// JSON booleans
    Flag,
    /// Text that parses as a UUID
    Id,
}

/// When a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Optional,
    Required,
    /// Required only when the named sibling field is truthy
    RequiredWhen(&'static str),
}

/// A single field's rules, evaluated against the full candidate object
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    kind: FieldKind,
    requirement: Requirement,
    min_len: Option<usize>,
    email: bool,
    must_equal: Option<&'static str>,
}

impl FieldRule {
    fn new(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            kind,
            requirement: Requirement::Optional,
            min_len: None,
            email: false,
            must_equal: None,
        }
    }

    pub fn text(field: &'static str) -> Self {
        Self::new(field, FieldKind::Text)
    }

    pub fn flag(field: &'static str) -> Self {
        Self::new(field, FieldKind::Flag)
    }

    pub fn id(field: &'static str) -> Self {
        Self::new(field, FieldKind::Id)
    }

    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Required;
        self
    }

    pub fn required_when(mut self, other: &'static str) -> Self {
        self.requirement = Requirement::RequiredWhen(other);
        self
    }

    /// Minimum length in characters, checked whenever the field is present
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    /// Value must equal the named sibling whenever that sibling is truthy
    pub fn must_equal(mut self, other: &'static str) -> Self {
        self.must_equal = Some(other);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    fn is_required(&self, object: &Map<String, Value>) -> bool {
        match self.requirement {
            Requirement::Optional => false,
            Requirement::Required => true,
            Requirement::RequiredWhen(other) => is_truthy(object, other),
        }
    }

    /// `Ok(None)` when the field is absent and allowed to be, `Ok(Some(_))`
    /// with the normalized value when it passes, `Err` with a message otherwise.
    pub(crate) fn check(&self, object: &Map<String, Value>) -> Result<Option<FieldValue>, String> {
        let required = self.is_required(object);
        let raw = match object.get(self.field) {
            None | Some(Value::Null) => {
                return if required {
                    Err(format!("{} is a required field", self.field))
                } else {
                    Ok(None)
                };
            }
            Some(raw) => raw,
        };

        match self.kind {
            FieldKind::Flag => match raw {
                Value::Bool(b) => Ok(Some(FieldValue::Flag(*b))),
                _ => Err(format!("{} must be a boolean", self.field)),
            },
            FieldKind::Id => {
                let text = as_text(raw).ok_or_else(|| format!("{} must be a text value", self.field))?;
                if text.is_empty() && required {
                    return Err(format!("{} is a required field", self.field));
                }
                Uuid::parse_str(&text)
                    .map(|id| Some(FieldValue::Id(id)))
                    .map_err(|_| format!("{} must be a valid identifier", self.field))
            }
            FieldKind::Text => self.check_text(object, raw, required),
        }
    }

    fn check_text(
        &self,
        object: &Map<String, Value>,
        raw: &Value,
        required: bool,
    ) -> Result<Option<FieldValue>, String> {
        let text = as_text(raw).ok_or_else(|| format!("{} must be a text value", self.field))?;

        if text.is_empty() && required {
            return Err(format!("{} is a required field", self.field));
        }

        if let Some(min) = self.min_len {
            if text.chars().count() < min {
                return Err(format!("{} must be at least {} characters", self.field, min));
            }
        }

        if self.email && !is_valid_email(&text) {
            return Err(format!("{} must be a valid email", self.field));
        }

        if let Some(other) = self.must_equal {
            if is_truthy(object, other) {
                let expected = object.get(other).and_then(as_text);
                if expected.as_deref() != Some(text.as_str()) {
                    return Err(format!("{} must match {}", self.field, other));
                }
            }
        }

        Ok(Some(FieldValue::Text(text)))
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
