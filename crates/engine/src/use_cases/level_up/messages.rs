//! Chat message composition.
//!
//! Text comes from the host translation table when it has an entry and
//! falls back to English otherwise. Placeholders use `{name}` syntax.

use std::sync::Arc;

use levelwiz_domain::common::capitalize;
use levelwiz_domain::{ActorId, FeatRecord, GrantedFeat, ProficiencyRank, Rarity};

use crate::infrastructure::ports::Localizer;

const KEY_PREFIX: &str = "PF2E_LEVEL_UP_WIZARD.messages";

/// Builds the public summary, the private reminder and feat cards.
pub struct MessageComposer {
    localizer: Arc<dyn Localizer>,
}

impl MessageComposer {
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self { localizer }
    }

    fn text(&self, key: &str, fallback: &str) -> String {
        self.localizer
            .localize(&format!("{KEY_PREFIX}.{key}"))
            .unwrap_or_else(|| fallback.to_string())
    }

    fn format(&self, key: &str, fallback: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.text(key, fallback), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    /// `"<Skill> increased to <Rank>"`.
    pub fn skill_increase_line(&self, skill_label: &str, rank: ProficiencyRank) -> String {
        self.format(
            "skillIncrease.rankIncrease",
            "{skill} increased to {rankName}",
            &[("skill", skill_label), ("rankName", rank.name())],
        )
    }

    /// Public level-up summary: header, feat links and the skill line.
    pub fn global_summary(
        &self,
        actor_name: &str,
        target_level: u8,
        feats: &[GrantedFeat],
        skill_line: Option<&str>,
    ) -> String {
        let header = self.format(
            "global.header",
            "{actorName} is now level {targetLevel}!",
            &[
                ("actorName", actor_name),
                ("targetLevel", &target_level.to_string()),
            ],
        );
        let feat_links = if feats.is_empty() {
            self.text("global.noFeats", "None")
        } else {
            feats
                .iter()
                .map(|granted| format!("@UUID[{}]", granted.feat.id))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut message = format!(
            "<h2>{header}</h2><p><strong>{}</strong> {feat_links}</p>",
            self.text("global.feats", "Feats:")
        );
        if let Some(line) = skill_line {
            message.push_str(&format!(
                "<p><strong>{}</strong> {line}</p>",
                self.text("global.skills", "Skills:")
            ));
        }
        message
    }

    /// Manual follow-ups the player has to do on the sheet.
    pub fn personal_reminders(
        &self,
        spellcasting: bool,
        new_spell_rank_level: bool,
        full_intelligence_boost: bool,
    ) -> Vec<String> {
        let mut reminders = Vec::new();
        if spellcasting {
            reminders.push(if new_spell_rank_level {
                self.text(
                    "personal.spellRank",
                    "You gained a new spell rank: add the new spells and slots to your sheet.",
                )
            } else {
                self.text(
                    "personal.spellSlots",
                    "You gained new spell slots: add them to your sheet.",
                )
            });
        }
        if full_intelligence_boost {
            reminders.push(self.text(
                "personal.intIncrease",
                "Your Intelligence increased: become trained in an additional skill or learn a new language.",
            ));
        }
        reminders
    }

    /// Private reminder message; none when there is nothing to remind.
    pub fn personal_message(&self, actor_name: &str, reminders: &[String]) -> Option<String> {
        if reminders.is_empty() {
            return None;
        }
        let header = self.format(
            "personal.header",
            "Level-up reminders for {actorName}",
            &[("actorName", actor_name)],
        );
        let items: String = reminders
            .iter()
            .map(|reminder| format!("<li>{reminder}</li>"))
            .collect();
        Some(format!("<h2>{header}</h2><ul>{items}</ul>"))
    }

    /// Item card for posting a feat to chat.
    pub fn feat_card(&self, feat: &FeatRecord, actor: Option<&ActorId>) -> String {
        let glyph = feat
            .action
            .glyph()
            .map(|g| format!(r#" <span class="action-glyph">{g}</span>"#))
            .unwrap_or_default();

        let rarity_tag = match feat.rarity {
            Rarity::Common => String::new(),
            rarity => {
                let label = capitalize(rarity.as_str());
                format!(
                    r#"<span class="tag rarity {r}" data-trait="{r}" data-tooltip="PF2E.TraitDescription{label}">{label}</span>"#,
                    r = rarity.as_str()
                )
            }
        };
        let trait_tags: String = feat
            .traits()
            .iter()
            .map(|t| {
                let label = capitalize(t);
                format!(
                    r#"<span class="tag" data-trait data-tooltip="PF2E.TraitDescription{label}">{label}</span>"#
                )
            })
            .collect();

        let actor_id = actor.map(ActorId::as_str).unwrap_or_default();
        let img = feat.img.as_deref().unwrap_or_default();
        format!(
            concat!(
                r#"<div class="pf2e chat-card item-card" data-actor-id="{actor_id}" data-item-id="{item_id}">"#,
                r#"<header class="card-header flexrow"><img src="{img}" alt="{name}" /><h3>{name}{glyph}</h3></header>"#,
                r#"<div class="tags paizo-style" data-tooltip-class="pf2e">{rarity_tag}{trait_tags}</div>"#,
                r#"<div class="card-content">{description}</div>"#,
                r#"<footer><span>{feat_label} {level}</span></footer>"#,
                r#"</div>"#
            ),
            actor_id = actor_id,
            item_id = feat.id,
            img = img,
            name = feat.name,
            glyph = glyph,
            rarity_tag = rarity_tag,
            trait_tags = trait_tags,
            description = feat.description,
            feat_label = self.text("global.feat", "Feat"),
            level = feat.level,
        )
    }
}
