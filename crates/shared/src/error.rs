use thiserror::Error;

use crate::domain::Field;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Full Name and Email are required")]
    MissingIdentity,
    #[error("Missing required fields: {}", labels(fields))]
    MissingRequired { fields: Vec<Field> },
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[Field] {
        match self {
            ValidationError::MissingIdentity => &Field::IDENTITY,
            ValidationError::MissingRequired { fields } => fields,
        }
    }
}

fn labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A string that does not name any known field or option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
