use serde::{Deserialize, Serialize};

use crate::domain::{EmploymentStatus, Field, OptionSet};

/// Everything the registration form collects. Always serialized with all
/// thirteen keys, empty ones included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationPayload {
    pub full_name: String,
    pub branch: String,
    pub email: String,
    pub phone: String,
    pub employment_status: String,
    pub employment_other: String,
    pub main_goal: String,
    pub track: String,
    pub skill: String,
    pub income_goal: String,
    pub serve_interest: String,
    pub contribution: String,
    pub comments: String,
}

impl RegistrationPayload {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Branch => &self.branch,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::EmploymentStatus => &self.employment_status,
            Field::EmploymentOther => &self.employment_other,
            Field::MainGoal => &self.main_goal,
            Field::Track => &self.track,
            Field::Skill => &self.skill,
            Field::IncomeGoal => &self.income_goal,
            Field::ServeInterest => &self.serve_interest,
            Field::Contribution => &self.contribution,
            Field::Comments => &self.comments,
        }
    }

    /// Returns a copy with `field` replaced; every other field is carried over.
    pub fn with(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(field) = value.into();
        next
    }

    /// The free-text employment details only apply to the "Other" status.
    pub fn employment_other_enabled(&self) -> bool {
        self.employment_status == EmploymentStatus::Other.as_str()
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FullName => &mut self.full_name,
            Field::Branch => &mut self.branch,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::EmploymentStatus => &mut self.employment_status,
            Field::EmploymentOther => &mut self.employment_other,
            Field::MainGoal => &mut self.main_goal,
            Field::Track => &mut self.track,
            Field::Skill => &mut self.skill,
            Field::IncomeGoal => &mut self.income_goal,
            Field::ServeInterest => &mut self.serve_interest,
            Field::Contribution => &mut self.contribution,
            Field::Comments => &mut self.comments,
        }
    }
}

/// Body returned by the relay and expected back from the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}
