//! Request and response bodies shared by the survey surfaces.
//!
//! Answer sets are plain free-text strings. Any field missing from a request deserialises as the
//! empty string, which matches what an untouched text input submits.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Which question set a session is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Section1,
    Section2,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Section1 => "section1",
            Page::Section2 => "section2",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section 1: general health questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Section1Answers {
    pub name: String,
    pub email: String,
    pub age_group: String,
    pub gender: String,
    pub blood_pressure: String,
    pub fasting_blood_sugar: String,
    pub random_blood_sugar: String,
    pub diagnosed_diabetes: String,
    pub diabetes_type: String,
    pub bmi: String,
    pub exercise_frequency: String,
    pub diet: String,
    pub resources: String,
    pub medications: String,
}

/// Section 2: medication management questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Section2Answers {
    pub medication_types: String,
    pub medication_duration: String,
    pub medication_frequency: String,
    pub side_effects: String,
    pub side_effects_specify: String,
    pub medication_needs_changed: String,
    pub tracking_methods: String,
}

/// A session and the page it is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionRes {
    /// Canonical session id (32 lowercase hex characters).
    pub session_id: String,
    pub page: Page,
}

/// Result of a completed survey submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmitRes {
    /// Page the session was reset to; always `section1`.
    pub page: Page,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serialises_as_state_name() {
        assert_eq!(
            serde_json::to_string(&Page::Section1).unwrap(),
            "\"section1\""
        );
        assert_eq!(
            serde_json::to_string(&Page::Section2).unwrap(),
            "\"section2\""
        );
        assert_eq!(Page::Section2.to_string(), "section2");
    }

    #[test]
    fn test_missing_answer_fields_default_to_empty() {
        let answers: Section1Answers =
            serde_json::from_str(r#"{"name": "Asha", "bmi": "not a number"}"#).unwrap();

        assert_eq!(answers.name, "Asha");
        assert_eq!(answers.bmi, "not a number");
        assert_eq!(answers.email, "");
        assert_eq!(answers.medications, "");
    }

    #[test]
    fn test_unknown_answer_fields_are_ignored() {
        let answers: Section2Answers =
            serde_json::from_str(r#"{"side_effects": "No", "favourite_colour": "blue"}"#)
                .unwrap();

        assert_eq!(answers.side_effects, "No");
        assert_eq!(answers, Section2Answers {
            side_effects: "No".into(),
            ..Default::default()
        });
    }
}
