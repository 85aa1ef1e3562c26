//! Completed survey records.

use crate::questions::AnswerSet;
use crate::wire::{Section1Answers, Section2Answers};

/// One completed survey response: an ordered mapping of field name to free-text value.
///
/// Keys are unique. Inserting an existing key replaces its value in place, so the first
/// occurrence fixes the key's position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyRecord {
    fields: Vec<(String, String)>,
}

impl SurveyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges staged Section 1 answers with Section 2 answers into a 21-field record.
    pub fn from_sections(section1: Section1Answers, section2: Section2Answers) -> Self {
        let mut record = Self::new();
        record.extend_answers(section1);
        record.extend_answers(section2);
        record
    }

    /// Appends every answer of `answers` in schema order.
    pub fn extend_answers<A: AnswerSet>(&mut self, answers: A) {
        let pairs = answers.into_pairs();
        debug_assert_eq!(pairs.len(), A::FIELDS.len());
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    /// Sets `key` to `value`, keeping the key's position if already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SurveyRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}
