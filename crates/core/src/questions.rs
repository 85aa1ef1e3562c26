//! The survey's question schema.
//!
//! Every answer is free text. A [`FieldSpec`] only carries what the form needs to render an
//! input: the stored column name, the question label and an optional placeholder hint. Nothing
//! here constrains what a respondent may type.

use crate::wire::{Section1Answers, Section2Answers};

/// One question of the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name in the store and form field name.
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
}

const fn field(
    key: &'static str,
    label: &'static str,
    placeholder: Option<&'static str>,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        placeholder,
    }
}

/// Section 1: general health, in form and column order.
pub const SECTION_1: &[FieldSpec] = &[
    field("name", "Please enter your name", Some("Your Name")),
    field(
        "email",
        "Please enter your email address",
        Some("Your Email"),
    ),
    field("age_group", "What is your age group?", Some("e.g., 30-39")),
    field(
        "gender",
        "What is your gender?",
        Some("e.g., Male/Female/Other"),
    ),
    field(
        "blood_pressure",
        "What is your average blood pressure?",
        Some("e.g., 120/80 mmHg"),
    ),
    field(
        "fasting_blood_sugar",
        "What is your most recent fasting blood sugar level?",
        Some("e.g., 90 mg/dL"),
    ),
    field(
        "random_blood_sugar",
        "What is your most recent random blood sugar level?",
        Some("e.g., 150 mg/dL"),
    ),
    field(
        "diagnosed_diabetes",
        "Have you been diagnosed with diabetes? (Yes/No)",
        Some("Yes or No"),
    ),
    field(
        "diabetes_type",
        "What type of diabetes have you been diagnosed with?",
        Some("Type 1/Type 2/Gestational/Not diagnosed"),
    ),
    field(
        "bmi",
        "What is your body mass index (BMI)?",
        Some("e.g., 22.5"),
    ),
    field(
        "exercise_frequency",
        "How often do you exercise?",
        Some("e.g., Regularly, Occasionally"),
    ),
    field(
        "diet",
        "What is your typical diet?",
        Some("e.g., Balanced, Low-carb"),
    ),
    field(
        "resources",
        "What resources or support do you feel would help you manage your diabetes better?",
        None,
    ),
    field(
        "medications",
        "Are you currently taking any medications for diabetes? (Yes/No)",
        Some("Yes or No"),
    ),
];

/// Section 2: medication management, in form and column order.
pub const SECTION_2: &[FieldSpec] = &[
    field(
        "medication_types",
        "What type of diabetes medications are you taking? (List all that apply)",
        Some("e.g., Insulin, Metformin"),
    ),
    field(
        "medication_duration",
        "How long have you been taking these medications?",
        Some("e.g., 1 year"),
    ),
    field(
        "medication_frequency",
        "How often do you take your diabetes medications?",
        Some("e.g., Once daily"),
    ),
    field(
        "side_effects",
        "Do you experience any side effects from your diabetes medications? (Yes/No)",
        Some("Yes or No"),
    ),
    field(
        "side_effects_specify",
        "If yes, please specify:",
        Some("e.g., Nausea"),
    ),
    field(
        "medication_needs_changed",
        "Have your medication needs changed over time? (Yes/No)",
        Some("Yes or No"),
    ),
    field(
        "tracking_methods",
        "How do you keep track of your medication regimen? (List all that apply)",
        Some("e.g., Pill organizer, Mobile app"),
    ),
];

/// Every question, Section 1 first.
pub fn all_fields() -> impl Iterator<Item = &'static FieldSpec> {
    SECTION_1.iter().chain(SECTION_2.iter())
}

/// A set of answers to one section of the survey.
pub trait AnswerSet {
    /// The questions this set answers, in column order.
    const FIELDS: &'static [FieldSpec];

    /// Consumes the answers as `(key, value)` pairs in [`AnswerSet::FIELDS`] order.
    fn into_pairs(self) -> Vec<(&'static str, String)>;
}

impl AnswerSet for Section1Answers {
    const FIELDS: &'static [FieldSpec] = SECTION_1;

    fn into_pairs(self) -> Vec<(&'static str, String)> {
        let Section1Answers {
            name,
            email,
            age_group,
            gender,
            blood_pressure,
            fasting_blood_sugar,
            random_blood_sugar,
            diagnosed_diabetes,
            diabetes_type,
            bmi,
            exercise_frequency,
            diet,
            resources,
            medications,
        } = self;

        vec![
            ("name", name),
            ("email", email),
            ("age_group", age_group),
            ("gender", gender),
            ("blood_pressure", blood_pressure),
            ("fasting_blood_sugar", fasting_blood_sugar),
            ("random_blood_sugar", random_blood_sugar),
            ("diagnosed_diabetes", diagnosed_diabetes),
            ("diabetes_type", diabetes_type),
            ("bmi", bmi),
            ("exercise_frequency", exercise_frequency),
            ("diet", diet),
            ("resources", resources),
            ("medications", medications),
        ]
    }
}

impl AnswerSet for Section2Answers {
    const FIELDS: &'static [FieldSpec] = SECTION_2;

    fn into_pairs(self) -> Vec<(&'static str, String)> {
        let Section2Answers {
            medication_types,
            medication_duration,
            medication_frequency,
            side_effects,
            side_effects_specify,
            medication_needs_changed,
            tracking_methods,
        } = self;

        vec![
            ("medication_types", medication_types),
            ("medication_duration", medication_duration),
            ("medication_frequency", medication_frequency),
            ("side_effects", side_effects),
            ("side_effects_specify", side_effects_specify),
            ("medication_needs_changed", medication_needs_changed),
            ("tracking_methods", tracking_methods),
        ]
    }
}
