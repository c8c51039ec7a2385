use shared::{domain::Field, error::ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid registration endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error(
        "registration proxy responded with status {status}{}",
        message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Rejected { status: u16, message: Option<String> },
    #[error("registration request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Caught before any request was made.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    pub fn missing_fields(&self) -> &[Field] {
        match self {
            SubmitError::Invalid(error) => error.missing_fields(),
            SubmitError::Transport(_) => &[],
        }
    }
}
