//! Level-up wizard use cases.
//!
//! Opening the wizard reads the character once, computes every slot's
//! candidates, the skill increase and boost options and the class features
//! for the target level, and starts a [`LevelUpTransaction`]. The returned
//! [`LevelUpSession`] collects picks from feat pickers and drives the commit.

mod candidates;
mod error;
mod features;
mod messages;
mod picker;
mod session;

pub use candidates::{assemble_candidates, candidates_for_key, slot_candidates};
pub use error::LevelUpError;
pub use features::{
    class_journal_reference, class_journals, class_specific_description, enrich_content_links,
    features_for_level, icon_for_reference, strip_paragraph_tags, ClassFeatureView,
    ClassJournalLink, LevelFeatures,
};
pub use messages::MessageComposer;
pub use picker::{FeatOption, FeatPicker};
pub use session::{CommitOutcome, CommitReport, LevelUpSession, SkillIncreaseReport};

use std::collections::BTreeMap;
use std::sync::Arc;

use levelwiz_domain::{
    detect_partial_boosts, skill_increase_options, ActorId, CharacterContext, FeatSlot, ItemRef,
    LevelUpPlan, LevelUpTransaction, SkillIncreaseOption, SlotCandidates, UserId,
};

use crate::infrastructure::cache::{FeatCatalogCache, VocabularyCache};
use crate::infrastructure::ports::{
    CharacterStore, Localizer, MessageSink, ReferenceResolver, SettingsProvider, UserDirectory,
};
use crate::infrastructure::settings::LevelUpSettings;

/// Host collaborators the wizard needs.
#[derive(Clone)]
pub struct LevelUpPorts {
    pub catalog: Arc<FeatCatalogCache>,
    pub resolver: Arc<dyn ReferenceResolver>,
    pub characters: Arc<dyn CharacterStore>,
    pub messages: Arc<dyn MessageSink>,
    pub users: Arc<dyn UserDirectory>,
    pub settings: Arc<dyn SettingsProvider>,
    pub localizer: Arc<dyn Localizer>,
    pub vocabulary: Arc<VocabularyCache>,
}

/// Entry point for the level-up wizard.
pub struct LevelUpWizard {
    ports: LevelUpPorts,
    composer: Arc<MessageComposer>,
}

impl LevelUpWizard {
    pub fn new(ports: LevelUpPorts) -> Self {
        let composer = Arc::new(MessageComposer::new(Arc::clone(&ports.localizer)));
        Self { ports, composer }
    }

    /// Open the wizard for `actor` on behalf of `user`.
    ///
    /// `retroactive` is set when the level field was already raised by other
    /// means; the target level is then the current level.
    ///
    /// # Errors
    ///
    /// Fails when the character cannot be read, has no class, or carries a
    /// translated dual class.
    pub async fn open(
        &self,
        actor: &ActorId,
        user: UserId,
        retroactive: bool,
    ) -> Result<LevelUpSession, LevelUpError> {
        let character = self.ports.characters.read(actor).await?;
        let class = character.validate_for_level_up()?.clone();
        let settings = LevelUpSettings::load(self.ports.settings.as_ref());
        let target_level = character.target_level(retroactive);

        let catalog = self.ports.catalog.get().await;
        let candidates = assemble_candidates(
            &catalog,
            &character,
            target_level,
            &settings.slot_query_options(false),
        )?;
        let skill_options = skill_increase_options(&character, &class, target_level);
        let boost_rule = settings.boost_rule();
        let boost_options = if boost_rule.is_active(target_level) {
            detect_partial_boosts(&character)
        } else {
            Vec::new()
        };
        let features = features_for_level(
            &class,
            target_level,
            boost_rule,
            Arc::clone(&self.ports.resolver),
        )
        .await;

        let plan = build_plan(
            &character,
            retroactive,
            &candidates,
            &skill_options,
            boost_rule.required_count(target_level),
        );
        let mut transaction =
            LevelUpTransaction::new(plan).with_commit_order(settings.commit_order());
        transaction.begin()?;

        tracing::info!(
            actor = %actor,
            level = target_level,
            retroactive,
            required_slots = transaction.plan().required_slots.len(),
            "Level-up wizard opened"
        );

        Ok(LevelUpSession::new(
            self.ports.clone(),
            Arc::clone(&self.composer),
            user,
            character,
            settings,
            catalog,
            candidates,
            skill_options,
            boost_options,
            features,
            transaction,
        ))
    }

    /// Post a feat card to chat.
    ///
    /// Returns `false` when the reference no longer resolves.
    pub async fn send_feat_to_chat(
        &self,
        reference: &ItemRef,
        actor: Option<&ActorId>,
        speaker: &str,
    ) -> Result<bool, LevelUpError> {
        let feat = match self.ports.resolver.resolve(reference).await {
            Ok(feat) => feat,
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Feat not found for chat card");
                return Ok(false);
            }
        };
        let card = self.composer.feat_card(&feat, actor);
        self.ports
            .messages
            .post_public(card, speaker.to_string())
            .await?;
        Ok(true)
    }
}

/// Slots that grant a feat and have something to pick are required.
fn build_plan(
    character: &CharacterContext,
    retroactive: bool,
    candidates: &BTreeMap<FeatSlot, SlotCandidates>,
    skill_options: &[SkillIncreaseOption],
    required_boosts: usize,
) -> LevelUpPlan {
    candidates
        .iter()
        .filter(|(_, list)| list.is_applicable() && !list.is_empty())
        .fold(LevelUpPlan::new(character, retroactive), |plan, (slot, _)| {
            plan.with_required_slot(*slot)
        })
        .with_skill_increase_required(!skill_options.is_empty())
        .with_required_boosts(required_boosts)
}
