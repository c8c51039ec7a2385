use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownValue;

/// The thirteen fields of a registration, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Branch,
    Email,
    Phone,
    EmploymentStatus,
    EmploymentOther,
    MainGoal,
    Track,
    Skill,
    IncomeGoal,
    ServeInterest,
    Contribution,
    Comments,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::FullName,
        Field::Branch,
        Field::Email,
        Field::Phone,
        Field::EmploymentStatus,
        Field::EmploymentOther,
        Field::MainGoal,
        Field::Track,
        Field::Skill,
        Field::IncomeGoal,
        Field::ServeInterest,
        Field::Contribution,
        Field::Comments,
    ];

    pub const REQUIRED: [Field; 9] = [
        Field::FullName,
        Field::Branch,
        Field::Email,
        Field::Phone,
        Field::EmploymentStatus,
        Field::MainGoal,
        Field::Track,
        Field::Skill,
        Field::ServeInterest,
    ];

    /// Fields the relay insists on even in its most lenient mode.
    pub const IDENTITY: [Field; 2] = [Field::FullName, Field::Email];

    /// Wire key used in the JSON payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Branch => "branch",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::EmploymentStatus => "employmentStatus",
            Field::EmploymentOther => "employmentOther",
            Field::MainGoal => "mainGoal",
            Field::Track => "track",
            Field::Skill => "skill",
            Field::IncomeGoal => "incomeGoal",
            Field::ServeInterest => "serveInterest",
            Field::Contribution => "contribution",
            Field::Comments => "comments",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Branch => "Church Branch",
            Field::Email => "Email Address",
            Field::Phone => "Phone Number",
            Field::EmploymentStatus => "Current Employment Status",
            Field::EmploymentOther => "Employment Details",
            Field::MainGoal => "Main Goal",
            Field::Track => "Skill Track",
            Field::Skill => "Skill Interest",
            Field::IncomeGoal => "Income Goal",
            Field::ServeInterest => "Serve Interest",
            Field::Contribution => "Contribution",
            Field::Comments => "Comments",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownValue::new("field", s))
    }
}

/// A fixed set of choices offered for one of the radio/select fields.
pub trait OptionSet: Copy + fmt::Display + 'static {
    /// The payload field this set fills.
    const FIELD: Field;

    fn all() -> &'static [Self];

    fn as_str(self) -> &'static str;
}

macro_rules! option_set {
    ($name:ident, $field:expr, { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl OptionSet for $name {
            const FIELD: Field = $field;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(OptionSet::as_str(*self))
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| OptionSet::as_str(*option) == s)
                    .ok_or_else(|| UnknownValue::new($field.as_str(), s))
            }
        }
    };
}

option_set!(ChurchBranch, Field::Branch, {
    Toronto => "GPC TORONTO",
    Oshawa => "GPC OSHAWA",
    Edmonton => "GPC EDMONTON",
});

option_set!(EmploymentStatus, Field::EmploymentStatus, {
    FullTime => "Employed (Full-Time)",
    PartTime => "Employed (Part-Time)",
    SelfEmployed => "Self-Employed",
    Unemployed => "Unemployed",
    Student => "Student",
    Homemaker => "Homemaker",
    Retired => "Retired",
    Other => "Other",
});

option_set!(MainGoal, Field::MainGoal, {
    BetterJob => "Get a better Job",
    IncreaseSalary => "Increase my salary",
    StartBusiness => "Start a business",
    LearnTech => "Learn tech/AI Skills",
    SideHustle => "Build a side hustle",
    CareerChange => "Career change",
    Leadership => "Leadership Development",
});

option_set!(Track, Field::Track, {
    AiGeneralist => "AI Generalist",
    BusinessCareer => "Business & Career",
    ItEnthusiast => "IT Enthusiast",
    NotSure => "Not sure yet",
});

option_set!(Skill, Field::Skill, {
    AiTools => "AI tools",
    DataAnalytics => "Data/Analytics",
    CloudComputing => "Cloud Computing",
    DigitalMarketing => "Digital Marketing",
    BusinessSetup => "Business Setup",
    SalesNegotiation => "Sales & negotiation",
    Coding => "Coding/Software",
    LeadershipSkills => "Leadership skills",
    FinancialLiteracy => "Financial literacy",
    Other => "Other",
});

option_set!(ServeInterest, Field::ServeInterest, {
    Leadership => "Yes: I'm interested in leadership",
    Volunteer => "Yes: I can volunteer",
    NotNow => "Not right now",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().expect("field"), field);
        }
        assert!("full_name".parse::<Field>().is_err());
    }

    #[test]
    fn required_fields_exclude_free_text_extras() {
        assert_eq!(Field::REQUIRED.len(), 9);
        for field in [
            Field::EmploymentOther,
            Field::IncomeGoal,
            Field::Contribution,
            Field::Comments,
        ] {
            assert!(!field.is_required(), "{field} should be optional");
        }
    }

    #[test]
    fn option_sets_have_expected_sizes() {
        assert_eq!(ChurchBranch::ALL.len(), 3);
        assert_eq!(EmploymentStatus::ALL.len(), 8);
        assert_eq!(MainGoal::ALL.len(), 7);
        assert_eq!(Track::ALL.len(), 4);
        assert_eq!(Skill::ALL.len(), 10);
        assert_eq!(ServeInterest::ALL.len(), 3);
    }

    #[test]
    fn option_parse_matches_exact_value_only() {
        assert_eq!(
            "Business & Career".parse::<Track>().expect("track"),
            Track::BusinessCareer
        );
        let err = "gpc toronto".parse::<ChurchBranch>().expect_err("case matters");
        assert_eq!(err.kind, "branch");
    }
}
