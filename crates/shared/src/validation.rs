//! Required-field checks shared by the form controller and the relay.
//!
//! A field counts as filled when it holds a string whose trimmed form is
//! non-empty. Anything else (absent, `null`, numbers, whitespace) is missing.

use serde_json::{Map, Value};

use crate::{domain::Field, error::ValidationError, protocol::RegistrationPayload};

pub trait FieldSource {
    fn field_value(&self, field: Field) -> Option<&str>;
}

impl FieldSource for RegistrationPayload {
    fn field_value(&self, field: Field) -> Option<&str> {
        Some(self.get(field))
    }
}

impl FieldSource for Map<String, Value> {
    fn field_value(&self, field: Field) -> Option<&str> {
        self.get(field.as_str()).and_then(Value::as_str)
    }
}

pub fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

pub fn missing_fields<S: FieldSource + ?Sized>(source: &S, fields: &[Field]) -> Vec<Field> {
    fields
        .iter()
        .copied()
        .filter(|field| !is_filled(source.field_value(*field)))
        .collect()
}

pub fn validate_identity<S: FieldSource + ?Sized>(source: &S) -> Result<(), ValidationError> {
    if missing_fields(source, &Field::IDENTITY).is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingIdentity)
    }
}

pub fn validate_required<S: FieldSource + ?Sized>(source: &S) -> Result<(), ValidationError> {
    let fields = missing_fields(source, &Field::REQUIRED);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequired { fields })
    }
}
