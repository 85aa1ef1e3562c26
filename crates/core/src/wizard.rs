//! The two-page survey wizard.
//!
//! A session starts on Section 1. Submitting Section 1 stages its answers and moves to Section 2.
//! Submitting Section 2 merges the staged answers with the new ones into a [`SurveyRecord`] and,
//! once the record has been stored, returns to Section 1.
//!
//! The staged answers live inside [`WizardState::Section2`], so there is no way to be on the
//! second page without them.

use crate::record::SurveyRecord;
use crate::wire::{Page, Section1Answers, Section2Answers};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WizardState {
    #[default]
    Section1,
    Section2 {
        staged: Section1Answers,
    },
}

impl WizardState {
    pub fn page(&self) -> Page {
        match self {
            WizardState::Section1 => Page::Section1,
            WizardState::Section2 { .. } => Page::Section2,
        }
    }

    /// Stages Section 1 answers and moves to Section 2.
    ///
    /// Resubmitting Section 1 while already on Section 2 replaces the staged answers.
    pub fn submit_section1(&mut self, answers: Section1Answers) -> Page {
        *self = WizardState::Section2 { staged: answers };
        self.page()
    }

    /// Takes the staged answers and merges them with `answers`, leaving the wizard on Section 1.
    ///
    /// Returns `None`, without changing state, if nothing is staged.
    pub fn take_record(
        &mut self,
        answers: Section2Answers,
    ) -> Option<(Section1Answers, SurveyRecord)> {
        match std::mem::take(self) {
            WizardState::Section2 { staged } => {
                let record = SurveyRecord::from_sections(staged.clone(), answers);
                Some((staged, record))
            }
            WizardState::Section1 => None,
        }
    }

    /// Puts previously taken answers back, returning to Section 2.
    pub fn restore(&mut self, staged: Section1Answers) {
        *self = WizardState::Section2 { staged };
    }
}
