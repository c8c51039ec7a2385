//! Form state and the pure reducer that replaces it on every action.

use shared::{domain::Field, protocol::RegistrationPayload};

pub const VALIDATION_MESSAGE: &str = "Please complete all required fields.";
pub const SUCCESS_BANNER: &str = "Submitted successfully!";
pub const FAILURE_BANNER: &str = "Something went wrong. Please try again.";
pub const SUCCESS_TOAST: &str = "Registration received! We will be in touch soon.";
pub const FAILURE_TOAST: &str = "Submission failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Form,
    /// Confirmation page shown after a successful submission.
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Update { field: Field, value: String },
    Reset,
    SubmitRequested,
    ValidationFailed,
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed,
    /// The in-flight request was dropped without an answer.
    SubmitCancelled,
    ReturnToForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub payload: RegistrationPayload,
    pub submission: SubmissionStatus,
    pub view: View,
    /// Inline message shown above the form.
    pub banner: Option<String>,
}

impl FormState {
    pub fn reduce(&self, action: FormAction) -> FormState {
        match action {
            FormAction::Update { field, value } => FormState {
                payload: self.payload.with(field, value),
                ..self.clone()
            },
            FormAction::Reset => FormState {
                payload: RegistrationPayload::default(),
                submission: SubmissionStatus::Idle,
                banner: None,
                ..self.clone()
            },
            FormAction::SubmitRequested => FormState {
                banner: None,
                ..self.clone()
            },
            FormAction::ValidationFailed => FormState {
                submission: SubmissionStatus::Idle,
                banner: Some(VALIDATION_MESSAGE.to_string()),
                ..self.clone()
            },
            FormAction::SubmitStarted => FormState {
                submission: SubmissionStatus::Pending,
                ..self.clone()
            },
            FormAction::SubmitSucceeded => FormState {
                submission: SubmissionStatus::Succeeded,
                view: View::Success,
                banner: Some(SUCCESS_BANNER.to_string()),
                ..self.clone()
            },
            FormAction::SubmitFailed => FormState {
                submission: SubmissionStatus::Failed,
                banner: Some(FAILURE_BANNER.to_string()),
                ..self.clone()
            },
            FormAction::SubmitCancelled => FormState {
                submission: SubmissionStatus::Idle,
                ..self.clone()
            },
            // Leaving the confirmation page drops whatever the old form held.
            FormAction::ReturnToForm => FormState::default(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.submission == SubmissionStatus::Pending
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
