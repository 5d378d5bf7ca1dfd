//! Words used to read prerequisite text.
//!
//! Prerequisites are free text in the host's language; skill association and
//! dedication lookups match against both the canonical English terms and the
//! localized ones carried here.

use std::collections::{BTreeMap, BTreeSet};

use crate::common::contains_word;
use crate::entities::Skill;

/// Localized skill labels and the localized "dedication" trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    skill_labels: BTreeMap<Skill, String>,
    dedication: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::english()
    }
}

impl Vocabulary {
    pub fn english() -> Self {
        Self {
            skill_labels: Skill::ALL
                .into_iter()
                .map(|skill| (skill, skill.label().to_string()))
                .collect(),
            dedication: "dedication".to_string(),
        }
    }

    pub fn with_skill_label(mut self, skill: Skill, label: impl Into<String>) -> Self {
        self.skill_labels.insert(skill, label.into());
        self
    }

    pub fn with_dedication(mut self, dedication: impl Into<String>) -> Self {
        self.dedication = dedication.into().to_lowercase();
        self
    }

    pub fn skill_label(&self, skill: Skill) -> &str {
        self.skill_labels
            .get(&skill)
            .map(String::as_str)
            .unwrap_or_else(|| skill.label())
    }

    /// Whether `clause` names `skill` as a whole word, by slug or label.
    pub fn mentions_skill(&self, clause: &str, skill: Skill) -> bool {
        contains_word(clause, skill.slug()) || contains_word(clause, self.skill_label(skill))
    }

    /// Skills named anywhere in a feat's prerequisite clauses.
    pub fn associated_skills(&self, prerequisites: &[String]) -> BTreeSet<Skill> {
        prerequisites
            .iter()
            .flat_map(|clause| {
                Skill::ALL
                    .into_iter()
                    .filter(move |skill| self.mentions_skill(clause, *skill))
            })
            .collect()
    }

    /// Whether a lower-cased clause refers to a dedication feat.
    pub fn is_dedication_clause(&self, lowered_clause: &str) -> bool {
        lowered_clause.contains("dedication") || lowered_clause.contains(&self.dedication)
    }
}
