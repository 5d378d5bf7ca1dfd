//! An open level-up wizard.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures_util::future::join_all;
use levelwiz_domain::{
    AbilityBoostOption, AbilityKey, AbortReason, ActorId, CharacterContext, CharacterPatch,
    CommitOrder, DomainError, FeatCatalog, FeatSelected, FeatSlot, GrantedFeat, ItemRef,
    LevelUpPlan, LevelUpState, LevelUpTransaction, ProficiencyRank, Requirement,
    SelectionFilterState, SelectionSession, SkillIncreaseOption, SlotCandidates, UserId,
};
use tokio::sync::mpsc;

use super::candidates::slot_candidates;
use super::error::LevelUpError;
use super::features::LevelFeatures;
use super::messages::MessageComposer;
use super::picker::FeatPicker;
use super::LevelUpPorts;
use crate::infrastructure::ports::HostError;
use crate::infrastructure::settings::LevelUpSettings;

/// Slots whose candidates depend on the archetype toggle.
const CLASS_SLOTS: [FeatSlot; 2] = [FeatSlot::Class, FeatSlot::DualClass];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillIncreaseReport {
    pub skill: String,
    pub label: String,
    pub rank: ProficiencyRank,
}

/// What a commit actually wrote.
#[derive(Debug, Clone, Default)]
pub struct CommitReport {
    pub target_level: u8,
    pub level_written: bool,
    pub granted: Vec<GrantedFeat>,
    /// Picks whose reference no longer resolved
    pub unresolved: Vec<ItemRef>,
    pub skill_increase: Option<SkillIncreaseReport>,
    pub boosts: BTreeSet<AbilityKey>,
    /// Host writes and posts that failed; the commit carried on without them
    pub host_failures: Vec<HostError>,
}

impl CommitReport {
    fn new(target_level: u8) -> Self {
        Self {
            target_level,
            ..Self::default()
        }
    }

    fn record_failure(&mut self, step: &'static str, error: HostError) {
        tracing::warn!(step, error = %error, "Level-up step failed");
        self.host_failures.push(error);
    }
}

#[derive(Debug)]
pub enum CommitOutcome {
    /// The user declined the confirmation prompt.
    Cancelled,
    Completed(CommitReport),
}

pub struct LevelUpSession {
    ports: LevelUpPorts,
    composer: Arc<MessageComposer>,
    user: UserId,
    character: CharacterContext,
    settings: LevelUpSettings,
    catalog: Arc<FeatCatalog>,
    include_archetype_feats: bool,
    candidates: BTreeMap<FeatSlot, SlotCandidates>,
    skill_options: Vec<SkillIncreaseOption>,
    boost_options: Vec<AbilityBoostOption>,
    features: LevelFeatures,
    transaction: LevelUpTransaction,
    selections_tx: mpsc::UnboundedSender<FeatSelected>,
    selections_rx: mpsc::UnboundedReceiver<FeatSelected>,
}

impl LevelUpSession {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ports: LevelUpPorts,
        composer: Arc<MessageComposer>,
        user: UserId,
        character: CharacterContext,
        settings: LevelUpSettings,
        catalog: Arc<FeatCatalog>,
        candidates: BTreeMap<FeatSlot, SlotCandidates>,
        skill_options: Vec<SkillIncreaseOption>,
        boost_options: Vec<AbilityBoostOption>,
        features: LevelFeatures,
        transaction: LevelUpTransaction,
    ) -> Self {
        let (selections_tx, selections_rx) = mpsc::unbounded_channel();
        Self {
            ports,
            composer,
            user,
            character,
            settings,
            catalog,
            include_archetype_feats: false,
            candidates,
            skill_options,
            boost_options,
            features,
            transaction,
            selections_tx,
            selections_rx,
        }
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.character.actor_id
    }

    pub fn character(&self) -> &CharacterContext {
        &self.character
    }

    pub fn settings(&self) -> &LevelUpSettings {
        &self.settings
    }

    pub fn plan(&self) -> &LevelUpPlan {
        self.transaction.plan()
    }

    pub fn state(&self) -> &LevelUpState {
        self.transaction.state()
    }

    pub fn transaction(&self) -> &LevelUpTransaction {
        &self.transaction
    }

    pub fn features(&self) -> &LevelFeatures {
        &self.features
    }

    pub fn skill_options(&self) -> &[SkillIncreaseOption] {
        &self.skill_options
    }

    pub fn boost_options(&self) -> &[AbilityBoostOption] {
        &self.boost_options
    }

    pub fn include_archetype_feats(&self) -> bool {
        self.include_archetype_feats
    }

    /// Candidates for a slot; slots never computed are not applicable.
    pub fn candidates(&self, slot: FeatSlot) -> &SlotCandidates {
        static NOT_APPLICABLE: SlotCandidates = SlotCandidates::NotApplicable;
        self.candidates.get(&slot).unwrap_or(&NOT_APPLICABLE)
    }

    /// Open a picker over one slot's candidates.
    pub fn open_picker(&self, slot: FeatSlot) -> Result<FeatPicker, LevelUpError> {
        let candidates = self
            .candidates
            .get(&slot)
            .filter(|candidates| candidates.is_applicable())
            .ok_or(LevelUpError::SlotNotApplicable(slot))?;

        let filters = SelectionFilterState::new(self.settings.feat_sort)
            .with_include_archetype(self.include_archetype_feats);
        let session = SelectionSession::new(
            slot,
            candidates.feats().to_vec(),
            filters,
            self.ports.vocabulary.get(),
        )
        .with_hide_uncommon(self.settings.hide_uncommon_feats);

        tracing::debug!(slot = %slot, candidates = candidates.len(), "Picker opened");
        Ok(FeatPicker::new(
            session,
            self.settings.show_feat_prerequisites,
            self.selections_tx.clone(),
        ))
    }

    /// Apply every pick reported by pickers since the last call.
    ///
    /// Picks that arrive after the wizard stopped accepting changes, or that
    /// name a feat the slot no longer offers, are dropped.
    pub fn drain_selections(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(selected) = self.selections_rx.try_recv() {
            let offered = self.candidates.get(&selected.slot).is_some_and(|candidates| {
                candidates
                    .feats()
                    .iter()
                    .any(|candidate| candidate.id == selected.feat.id)
            });
            if !offered {
                tracing::warn!(
                    slot = %selected.slot,
                    feat = %selected.feat.name,
                    "Dropping pick the slot no longer offers"
                );
                continue;
            }
            match self.transaction.selection_mut() {
                Ok(selection) => {
                    tracing::debug!(slot = %selected.slot, feat = %selected.feat.name, "Pick applied");
                    selection.apply(selected);
                    applied += 1;
                }
                Err(e) => {
                    tracing::warn!(slot = %selected.slot, error = %e, "Dropping late pick");
                }
            }
        }
        applied
    }

    /// Choose the skill to increase; `None` clears it.
    pub fn select_skill_increase(&mut self, skill: Option<&str>) -> Result<(), LevelUpError> {
        if let Some(slug) = skill.filter(|slug| !slug.is_empty()) {
            if !self.skill_options.iter().any(|option| option.slug == slug) {
                return Err(LevelUpError::SkillNotOffered(slug.to_string()));
            }
        }
        self.transaction
            .selection_mut()?
            .set_skill_increase(skill.map(str::to_string));
        Ok(())
    }

    /// Toggle an attribute boost; returns whether it is now selected.
    pub fn toggle_boost(&mut self, key: AbilityKey) -> Result<bool, LevelUpError> {
        let cap = self.transaction.plan().required_boosts;
        Ok(self.transaction.selection_mut()?.toggle_boost(key, cap))
    }

    /// Let class slots offer archetype feats.
    ///
    /// Class picks that are no longer candidates are cleared.
    pub fn set_include_archetype_feats(&mut self, include: bool) -> Result<(), LevelUpError> {
        if include == self.include_archetype_feats {
            return Ok(());
        }
        let target_level = self.transaction.plan().target_level;
        let options = self.settings.slot_query_options(include);

        let mut recomputed = Vec::with_capacity(CLASS_SLOTS.len());
        for slot in CLASS_SLOTS {
            let candidates =
                slot_candidates(&self.catalog, &self.character, slot, target_level, &options)?;
            recomputed.push((slot, candidates));
        }

        self.drain_selections();
        let selection = self.transaction.selection_mut()?;
        for (slot, candidates) in recomputed {
            let still_offered = selection
                .feat(slot)
                .map_or(true, |feat| candidates.feats().iter().any(|c| c.id == feat.id));
            if !still_offered {
                selection.clear_feat(slot);
                tracing::debug!(slot = %slot, "Cleared pick no longer offered");
            }
            self.candidates.insert(slot, candidates);
        }
        self.include_archetype_feats = include;
        Ok(())
    }

    pub fn missing_requirements(&mut self) -> Vec<Requirement> {
        self.drain_selections();
        self.transaction.missing_requirements()
    }

    /// Move to the confirmation prompt once every requirement is met.
    pub fn request_confirmation(&mut self) -> Result<(), LevelUpError> {
        self.drain_selections();
        self.transaction
            .request_confirmation()
            .map_err(|e| match e {
                DomainError::Validation(_) | DomainError::BoostCount { .. } => {
                    LevelUpError::Validation(e)
                }
                other => LevelUpError::Domain(other),
            })
    }

    /// Answer the confirmation prompt and, when accepted, write the level-up.
    ///
    /// Host failures are logged and recorded in the report. A selection that
    /// fails commit validation aborts the wizard; in the legacy order the
    /// writes made before the boost step stay applied.
    pub async fn commit(&mut self, confirmed: bool) -> Result<CommitOutcome, LevelUpError> {
        self.transaction.confirm(confirmed)?;
        if !confirmed {
            tracing::info!(actor = %self.character.actor_id, "Level-up declined");
            return Ok(CommitOutcome::Cancelled);
        }
        tracing::info!(
            actor = %self.character.actor_id,
            level = self.transaction.plan().target_level,
            order = ?self.transaction.commit_order(),
            "Level-up commit started"
        );

        if self.transaction.commit_order() == CommitOrder::ValidateFirst {
            if let Err(e) = self.transaction.validate_commit(&self.character) {
                return self.fail(e);
            }
        }

        let actor = self.character.actor_id.clone();
        let mut report = CommitReport::new(self.transaction.plan().target_level);

        if let Some(patch) = self.transaction.level_patch() {
            match self.ports.characters.apply_mutation(&actor, patch).await {
                Ok(()) => report.level_written = true,
                Err(e) => report.record_failure("level", e),
            }
        }

        self.grant_feats(&actor, &mut report).await;

        let skill_patch = match self.transaction.skill_patch(&self.character) {
            Ok(patch) => patch,
            Err(e) => return self.fail(e),
        };
        if let Some(CharacterPatch::SkillRank { skill, rank }) = skill_patch {
            let patch = CharacterPatch::SkillRank {
                skill: skill.clone(),
                rank,
            };
            match self.ports.characters.apply_mutation(&actor, patch).await {
                Ok(()) => {
                    let label = self
                        .character
                        .skills
                        .get(&skill)
                        .map(|entry| entry.label.clone())
                        .unwrap_or_else(|| skill.clone());
                    report.skill_increase = Some(SkillIncreaseReport { skill, label, rank });
                }
                Err(e) => report.record_failure("skill increase", e),
            }
        }

        let boost_patch = match self.transaction.boost_patch() {
            Ok(patch) => patch,
            Err(e) => return self.fail(e),
        };
        if let Some(patch) = boost_patch {
            match self.ports.characters.apply_mutation(&actor, patch).await {
                Ok(()) => report.boosts = self.transaction.selection().boosts().clone(),
                Err(e) => report.record_failure("ability boosts", e),
            }
        }

        self.post_messages(&mut report).await;
        self.transaction.complete()?;

        tracing::info!(
            actor = %actor,
            level = report.target_level,
            feats = report.granted.len(),
            unresolved = report.unresolved.len(),
            host_failures = report.host_failures.len(),
            "Level-up committed"
        );
        Ok(CommitOutcome::Completed(report))
    }

    fn fail(&mut self, error: DomainError) -> Result<CommitOutcome, LevelUpError> {
        tracing::warn!(actor = %self.character.actor_id, error = %error, "Level-up aborted");
        self.transaction
            .abort(AbortReason::Validation(error.clone()))?;
        Err(LevelUpError::Validation(error))
    }

    async fn grant_feats(&self, actor: &ActorId, report: &mut CommitReport) {
        let pending = self.transaction.pending_feats();
        if pending.is_empty() {
            return;
        }

        let resolved = join_all(
            pending
                .iter()
                .map(|feat| self.ports.resolver.resolve(&feat.reference)),
        )
        .await;

        let mut granted = Vec::with_capacity(pending.len());
        for (feat, result) in pending.into_iter().zip(resolved) {
            match result {
                Ok(record) => granted.push(GrantedFeat::new(feat, record)),
                Err(e) => {
                    tracing::warn!(
                        slot = %feat.slot,
                        reference = %feat.reference,
                        error = %e,
                        "Skipping unresolved feat"
                    );
                    report.unresolved.push(feat.reference);
                }
            }
        }

        if granted.is_empty() {
            return;
        }
        match self.ports.characters.add_items(actor, granted.clone()).await {
            Ok(()) => report.granted = granted,
            Err(e) => report.record_failure("feats", e),
        }
    }

    async fn post_messages(&self, report: &mut CommitReport) {
        let name = self.character.name.clone();

        let skill_line = report
            .skill_increase
            .as_ref()
            .map(|skill| self.composer.skill_increase_line(&skill.label, skill.rank));
        let summary = self.composer.global_summary(
            &name,
            report.target_level,
            &report.granted,
            skill_line.as_deref(),
        );
        if let Err(e) = self.ports.messages.post_public(summary, name.clone()).await {
            report.record_failure("public summary", e);
        }

        let full_intelligence_boost = report.boosts.contains(&AbilityKey::Int)
            && self
                .boost_options
                .iter()
                .any(|option| option.key == AbilityKey::Int && !option.is_partial);
        let reminders = self.composer.personal_reminders(
            self.features.spellcasting,
            self.features.new_spell_rank_level,
            full_intelligence_boost,
        );
        let Some(message) = self.composer.personal_message(&name, &reminders) else {
            return;
        };

        let recipients = self.reminder_recipients(report).await;
        if let Err(e) = self
            .ports
            .messages
            .post_private(message, recipients, name)
            .await
        {
            report.record_failure("personal reminder", e);
        }
    }

    async fn reminder_recipients(&self, report: &mut CommitReport) -> Vec<UserId> {
        let mut recipients = vec![self.user.clone()];
        if !self.settings.send_gm_whispers {
            return recipients;
        }
        match self.ports.users.game_master_ids().await {
            Ok(game_masters) => {
                for gm in game_masters {
                    if !recipients.contains(&gm) {
                        recipients.push(gm);
                    }
                }
            }
            Err(e) => report.record_failure("game master lookup", e),
        }
        recipients
    }
}
