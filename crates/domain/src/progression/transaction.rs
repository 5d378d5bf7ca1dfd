//! The level-up transaction state machine.
//!
//! ```text
//! Idle -> AwaitingSelections -> Confirming -> Committing -> Done
//!                                   |             |
//!                                   +--> Aborted <+
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::plan::{LevelUpPlan, Requirement};
use super::selection::ProgressionSelection;
use crate::entities::{CharacterContext, FeatRecord};
use crate::error::DomainError;
use crate::ids::ItemRef;
use crate::value_objects::{AbilityKey, FeatSlot, ProficiencyRank};

/// When the boost count is checked relative to the other commit steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitOrder {
    /// Every requirement, the boost count included, is checked before the
    /// first mutation.
    #[default]
    ValidateFirst,
    /// Level, feats and skill are written first; the boost count is checked
    /// last and a mismatch leaves those writes in place.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The user answered "no" to the confirmation prompt
    Declined,
    /// A commit invariant failed
    Validation(DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelUpState {
    #[default]
    Idle,
    AwaitingSelections,
    Confirming,
    Committing,
    Done,
    Aborted(AbortReason),
}

impl LevelUpState {
    pub fn name(&self) -> &'static str {
        match self {
            LevelUpState::Idle => "idle",
            LevelUpState::AwaitingSelections => "awaiting selections",
            LevelUpState::Confirming => "confirming",
            LevelUpState::Committing => "committing",
            LevelUpState::Done => "done",
            LevelUpState::Aborted(_) => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LevelUpState::Done | LevelUpState::Aborted(_))
    }
}

/// One write to the character document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CharacterPatch {
    /// Set the character level
    Level { level: u8 },
    /// Set a skill's proficiency rank
    SkillRank { skill: String, rank: ProficiencyRank },
    /// Record the boosts chosen at `level` in the build table
    AbilityBoosts {
        level: u8,
        boosts: BTreeSet<AbilityKey>,
    },
}

/// A picked feat waiting to be resolved to its full document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFeat {
    pub slot: FeatSlot,
    pub reference: ItemRef,
    /// Sheet location, `"{group}-{level}"`
    pub location: String,
    pub level_taken: u8,
}

/// A resolved feat ready to be added to the character.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantedFeat {
    pub slot: FeatSlot,
    pub feat: FeatRecord,
    pub location: String,
    pub level_taken: u8,
}

impl GrantedFeat {
    pub fn new(pending: PendingFeat, feat: FeatRecord) -> Self {
        Self {
            slot: pending.slot,
            feat,
            location: pending.location,
            level_taken: pending.level_taken,
        }
    }
}

/// A single level-up, from opening the wizard to the final write.
///
/// # Invariants
///
/// - Selections can only change while awaiting selections
/// - Confirmation is requested only once every required slot is filled
/// - Under [`CommitOrder::ValidateFirst`] the boost count is also required
///   before confirmation
/// - Terminal states accept no further transitions
#[derive(Debug, Clone)]
pub struct LevelUpTransaction {
    plan: LevelUpPlan,
    selection: ProgressionSelection,
    state: LevelUpState,
    commit_order: CommitOrder,
}

impl LevelUpTransaction {
    pub fn new(plan: LevelUpPlan) -> Self {
        Self {
            plan,
            selection: ProgressionSelection::new(),
            state: LevelUpState::Idle,
            commit_order: CommitOrder::default(),
        }
    }

    pub fn with_commit_order(mut self, order: CommitOrder) -> Self {
        self.commit_order = order;
        self
    }

    // Accessors

    pub fn plan(&self) -> &LevelUpPlan {
        &self.plan
    }

    pub fn state(&self) -> &LevelUpState {
        &self.state
    }

    pub fn selection(&self) -> &ProgressionSelection {
        &self.selection
    }

    pub fn commit_order(&self) -> CommitOrder {
        self.commit_order
    }

    // Transitions

    pub fn begin(&mut self) -> Result<(), DomainError> {
        self.expect_state(&LevelUpState::Idle, "begin")?;
        self.state = LevelUpState::AwaitingSelections;
        Ok(())
    }

    pub fn selection_mut(&mut self) -> Result<&mut ProgressionSelection, DomainError> {
        self.expect_state(&LevelUpState::AwaitingSelections, "change selections")?;
        Ok(&mut self.selection)
    }

    /// Everything still missing, boosts included.
    pub fn missing_requirements(&self) -> Vec<Requirement> {
        let mut missing: Vec<Requirement> = self
            .plan
            .required_slots
            .iter()
            .filter(|slot| self.selection.feat(**slot).is_none())
            .map(|slot| Requirement::Feat(*slot))
            .collect();

        if self.plan.skill_increase_required && self.selection.skill_increase().is_none() {
            missing.push(Requirement::SkillIncrease);
        }

        let actual = self.selection.boosts().len();
        if self.plan.required_boosts > 0 && actual != self.plan.required_boosts {
            missing.push(Requirement::AbilityBoosts {
                expected: self.plan.required_boosts,
                actual,
            });
        }
        missing
    }

    pub fn is_ready(&self) -> bool {
        self.blocking_requirements().is_empty()
    }

    /// Move to the confirmation prompt.
    pub fn request_confirmation(&mut self) -> Result<(), DomainError> {
        self.expect_state(&LevelUpState::AwaitingSelections, "request confirmation")?;

        let blocking = self.blocking_requirements();
        let (boosts, others): (Vec<_>, Vec<_>) = blocking
            .iter()
            .partition(|r| matches!(r, Requirement::AbilityBoosts { .. }));
        if !others.is_empty() {
            let names: Vec<String> = others.iter().map(ToString::to_string).collect();
            return Err(DomainError::validation(format!(
                "Missing selections: {}",
                names.join(", ")
            )));
        }
        if let Some(Requirement::AbilityBoosts { expected, actual }) = boosts.first() {
            return Err(DomainError::BoostCount {
                expected: *expected,
                actual: *actual,
            });
        }

        self.state = LevelUpState::Confirming;
        Ok(())
    }

    /// Answer the confirmation prompt.
    pub fn confirm(&mut self, accepted: bool) -> Result<(), DomainError> {
        self.expect_state(&LevelUpState::Confirming, "confirm")?;
        self.state = if accepted {
            LevelUpState::Committing
        } else {
            LevelUpState::Aborted(AbortReason::Declined)
        };
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.expect_state(&LevelUpState::Committing, "complete")?;
        self.state = LevelUpState::Done;
        Ok(())
    }

    pub fn abort(&mut self, reason: AbortReason) -> Result<(), DomainError> {
        match self.state {
            LevelUpState::Confirming | LevelUpState::Committing => {
                self.state = LevelUpState::Aborted(reason);
                Ok(())
            }
            _ => Err(self.transition_error("abort")),
        }
    }

    // Commit steps

    /// Level write; none for retroactive level-ups.
    pub fn level_patch(&self) -> Option<CharacterPatch> {
        (!self.plan.retroactive).then_some(CharacterPatch::Level {
            level: self.plan.target_level,
        })
    }

    /// Picked feats in slot order, tagged with their sheet location.
    pub fn pending_feats(&self) -> Vec<PendingFeat> {
        let level = self.plan.target_level;
        self.selection
            .feats()
            .map(|(slot, feat)| PendingFeat {
                slot,
                reference: feat.id.clone(),
                location: slot.location(level),
                level_taken: level,
            })
            .collect()
    }

    /// Picked feats themselves, in slot order.
    pub fn picked_feats(&self) -> Vec<(FeatSlot, Arc<FeatRecord>)> {
        self.selection
            .feats()
            .map(|(slot, feat)| (slot, Arc::clone(feat)))
            .collect()
    }

    /// Rank write for the skill increase, one rank above the current one.
    pub fn skill_patch(
        &self,
        character: &CharacterContext,
    ) -> Result<Option<CharacterPatch>, DomainError> {
        let Some(slug) = self.selection.skill_increase() else {
            return Ok(None);
        };
        let entry = character
            .skills
            .get(slug)
            .ok_or_else(|| DomainError::validation(format!("Unknown skill: {slug}")))?;
        let rank = entry.rank.next().ok_or_else(|| {
            DomainError::validation(format!("{} cannot be increased further", entry.label))
        })?;
        Ok(Some(CharacterPatch::SkillRank {
            skill: slug.to_string(),
            rank,
        }))
    }

    /// Boost-table write; fails when the count differs from the plan.
    pub fn boost_patch(&self) -> Result<Option<CharacterPatch>, DomainError> {
        let expected = self.plan.required_boosts;
        if expected == 0 {
            return Ok(None);
        }
        let actual = self.selection.boosts().len();
        if actual != expected {
            return Err(DomainError::BoostCount { expected, actual });
        }
        Ok(Some(CharacterPatch::AbilityBoosts {
            level: self.plan.target_level,
            boosts: self.selection.boosts().clone(),
        }))
    }

    /// Checks every write that can fail before anything is written.
    pub fn validate_commit(&self, character: &CharacterContext) -> Result<(), DomainError> {
        self.skill_patch(character)?;
        self.boost_patch()?;
        Ok(())
    }

    // Helpers

    fn blocking_requirements(&self) -> Vec<Requirement> {
        let mut missing = self.missing_requirements();
        if self.commit_order == CommitOrder::Legacy {
            missing.retain(|r| !matches!(r, Requirement::AbilityBoosts { .. }));
        }
        missing
    }

    fn expect_state(&self, expected: &LevelUpState, action: &str) -> Result<(), DomainError> {
        if &self.state == expected {
            Ok(())
        } else {
            Err(self.transition_error(action))
        }
    }

    fn transition_error(&self, action: &str) -> DomainError {
        DomainError::invalid_state_transition(format!(
            "cannot {action} while {}",
            self.state.name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClassInfo, SkillEntry};
    use crate::selection::FeatSelected;

    fn character() -> CharacterContext {
        CharacterContext::new("actor-1", "Valeros", 4)
            .with_class(ClassInfo::new("Fighter").with_standard_progression())
            .with_skill(
                "athletics",
                SkillEntry::new("Athletics", ProficiencyRank::Expert, 9),
            )
            .with_skill(
                "stealth",
                SkillEntry::new("Stealth", ProficiencyRank::Legendary, 20),
            )
    }

    fn transaction(order: CommitOrder) -> LevelUpTransaction {
        let plan = LevelUpPlan::new(&character(), false)
            .with_required_slot(FeatSlot::Ancestry)
            .with_skill_increase_required(true)
            .with_required_boosts(4);
        let mut tx = LevelUpTransaction::new(plan).with_commit_order(order);
        tx.begin().expect("begin");
        tx
    }

    fn fill_feats_and_skill(tx: &mut LevelUpTransaction) {
        let selection = tx.selection_mut().expect("awaiting");
        selection.apply(FeatSelected {
            slot: FeatSlot::Ancestry,
            feat: Arc::new(FeatRecord::new("anc-5", "Clan Protector", 5)),
        });
        selection.set_skill_increase(Some("athletics".to_string()));
    }

    fn choose_boosts(tx: &mut LevelUpTransaction, keys: &[AbilityKey]) {
        let selection = tx.selection_mut().expect("awaiting");
        for key in keys {
            selection.toggle_boost(*key, 4);
        }
    }

    #[test]
    fn reports_missing_requirements() {
        let tx = transaction(CommitOrder::ValidateFirst);
        assert_eq!(
            tx.missing_requirements(),
            vec![
                Requirement::Feat(FeatSlot::Ancestry),
                Requirement::SkillIncrease,
                Requirement::AbilityBoosts {
                    expected: 4,
                    actual: 0
                },
            ]
        );
        assert!(!tx.is_ready());
    }

    #[test]
    fn full_selection_walks_to_done() {
        let mut tx = transaction(CommitOrder::ValidateFirst);
        fill_feats_and_skill(&mut tx);
        choose_boosts(
            &mut tx,
            &[AbilityKey::Str, AbilityKey::Dex, AbilityKey::Con, AbilityKey::Wis],
        );

        tx.request_confirmation().expect("ready");
        assert_eq!(tx.state(), &LevelUpState::Confirming);
        assert!(tx.selection_mut().is_err());

        tx.confirm(true).expect("confirm");
        assert_eq!(tx.state(), &LevelUpState::Committing);
        tx.validate_commit(&character()).expect("valid");

        assert_eq!(tx.level_patch(), Some(CharacterPatch::Level { level: 5 }));
        let pending = tx.pending_feats();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].location, "ancestry-5");
        assert_eq!(pending[0].level_taken, 5);
        assert_eq!(
            tx.skill_patch(&character()),
            Ok(Some(CharacterPatch::SkillRank {
                skill: "athletics".to_string(),
                rank: ProficiencyRank::Master,
            }))
        );

        tx.complete().expect("complete");
        assert!(tx.state().is_terminal());
        assert!(tx.complete().is_err());
    }

    #[test]
    fn three_boosts_block_confirmation_by_default() {
        let mut tx = transaction(CommitOrder::ValidateFirst);
        fill_feats_and_skill(&mut tx);
        choose_boosts(&mut tx, &[AbilityKey::Str, AbilityKey::Dex, AbilityKey::Con]);

        assert_eq!(
            tx.request_confirmation(),
            Err(DomainError::BoostCount {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(tx.state(), &LevelUpState::AwaitingSelections);
    }

    #[test]
    fn legacy_order_defers_boost_check_to_commit() {
        let mut tx = transaction(CommitOrder::Legacy);
        fill_feats_and_skill(&mut tx);
        choose_boosts(&mut tx, &[AbilityKey::Str, AbilityKey::Dex, AbilityKey::Con]);

        tx.request_confirmation().expect("boosts not checked yet");
        tx.confirm(true).expect("confirm");
        assert!(tx.skill_patch(&character()).expect("skill").is_some());
        assert_eq!(
            tx.boost_patch(),
            Err(DomainError::BoostCount {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn declining_aborts_without_commit() {
        let mut tx = transaction(CommitOrder::ValidateFirst);
        fill_feats_and_skill(&mut tx);
        choose_boosts(
            &mut tx,
            &[AbilityKey::Str, AbilityKey::Dex, AbilityKey::Con, AbilityKey::Int],
        );
        tx.request_confirmation().expect("ready");
        tx.confirm(false).expect("answer");
        assert_eq!(tx.state(), &LevelUpState::Aborted(AbortReason::Declined));
        assert!(tx.confirm(true).is_err());
    }

    #[test]
    fn retroactive_level_up_skips_level_write() {
        let plan = LevelUpPlan::new(&character(), true);
        assert_eq!(plan.target_level, 4);
        let tx = LevelUpTransaction::new(plan);
        assert_eq!(tx.level_patch(), None);
        assert_eq!(tx.boost_patch(), Ok(None));
    }

    #[test]
    fn legendary_skill_cannot_increase() {
        let mut tx = transaction(CommitOrder::ValidateFirst);
        tx.selection_mut()
            .expect("awaiting")
            .set_skill_increase(Some("stealth".to_string()));
        assert!(matches!(
            tx.skill_patch(&character()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn patches_serialize_with_kind_tag() {
        let patch = CharacterPatch::Level { level: 5 };
        let json = serde_json::to_value(&patch).expect("serialize");
        assert_eq!(json, serde_json::json!({ "kind": "level", "level": 5 }));
    }
}
