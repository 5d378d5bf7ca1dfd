//! Class features gained at the target level.
//!
//! Class feature descriptions are shared between classes: a description may
//! hold several `<p><strong>Class, Class</strong>...</p>` paragraphs, and only
//! the paragraph for the character's class is shown. Content references in
//! the form `@UUID[ref]{label}` are rewritten into content links whose icon
//! depends on the compendium the reference points into.

use std::sync::{Arc, LazyLock};

use futures_util::future::join_all;
use levelwiz_domain::{is_new_spell_rank_level, BoostRule, ClassInfo, ItemRef};
use regex_lite::Regex;

use crate::infrastructure::ports::ReferenceResolver;

const DEFAULT_ICON: &str = "fa-solid fa-file-lines";
const CLASS_JOURNAL_PREFIX: &str =
    "Compendium.pf2e.journals.JournalEntry.classes.JournalEntryPage.";

/// A class feature as shown in the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFeatureView {
    pub name: String,
    pub reference: ItemRef,
    /// Enriched description markup
    pub description: String,
    pub img: Option<String>,
}

/// A page of the core classes journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassJournalLink {
    pub class_name: String,
    pub name: String,
    pub reference: ItemRef,
}

/// Everything the class grants at one level besides feats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelFeatures {
    pub features: Vec<ClassFeatureView>,
    /// One entry per class half that has a journal page
    pub class_journals: Vec<ClassJournalLink>,
    pub ability_boost_level: bool,
    /// Only set for spellcasting classes
    pub new_spell_rank_level: bool,
    pub spellcasting: bool,
}

// Compiled regexes for description enrichment
static CLASS_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p><strong>(.*?)</strong>(.*?)</p>").expect("valid regex")
});
static CONTENT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@UUID\[([^\]]+)\]\{([^}]+)\}").expect("valid regex"));

/// The paragraph written for `class_name`, or the whole description when no
/// paragraph names it.
///
/// Dual-class names match a paragraph naming either class.
pub fn class_specific_description(description: &str, class_name: &str) -> String {
    let wanted: Vec<String> = class_name
        .split('-')
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    if wanted.is_empty() {
        return description.to_string();
    }

    for captures in CLASS_PARAGRAPH_RE.captures_iter(description) {
        let (Some(classes), Some(text)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let listed = classes
            .as_str()
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .any(|c| wanted.contains(&c));
        if listed {
            return format!("<p>{}</p>", text.as_str().trim());
        }
    }
    description.to_string()
}

/// Removes a leading `<p>` and a trailing `</p>`.
pub fn strip_paragraph_tags(html: &str) -> &str {
    let html = html.strip_prefix("<p>").unwrap_or(html);
    html.strip_suffix("</p>").unwrap_or(html)
}

fn pack_icon(pack: &str) -> Option<&'static str> {
    match pack {
        "conditionitems" => Some("fa-solid fa-face-zany"),
        "classfeatures" | "feats-srd" => Some("fa-solid fa-medal"),
        "actionspf2e" => Some("fa-solid fa-running"),
        "spells-srd" => Some("fa-solid fa-sparkles"),
        "feat-effects" => Some("fa-solid fa-person-rays"),
        _ => None,
    }
}

fn equipment_icon(kind: &str) -> &'static str {
    match kind {
        "weapon" => "fa-solid fa-sword",
        "shield" => "fa-solid fa-shield-halved",
        "equipment" => "fa-solid fa-hat-cowboy",
        _ => DEFAULT_ICON,
    }
}

/// Icon class for a content link.
///
/// Equipment references are looked up to tell weapons and shields apart.
pub async fn icon_for_reference(reference: &ItemRef, resolver: &dyn ReferenceResolver) -> String {
    let icon = match reference.pack_name() {
        Some("equipment-srd") => match resolver.describe(reference).await {
            Ok(summary) => equipment_icon(&summary.kind),
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Equipment lookup failed");
                DEFAULT_ICON
            }
        },
        Some(pack) => pack_icon(pack).unwrap_or(DEFAULT_ICON),
        None => DEFAULT_ICON,
    };
    icon.to_string()
}

/// Rewrites `@UUID[ref]{label}` references into content links.
pub async fn enrich_content_links(description: &str, resolver: &dyn ReferenceResolver) -> String {
    let links: Vec<(String, ItemRef, String)> = CONTENT_LINK_RE
        .captures_iter(description)
        .filter_map(|captures| {
            Some((
                captures.get(0)?.as_str().to_string(),
                ItemRef::new(captures.get(1)?.as_str()),
                captures.get(2)?.as_str().to_string(),
            ))
        })
        .collect();

    let icons = join_all(
        links
            .iter()
            .map(|(_, reference, _)| icon_for_reference(reference, resolver)),
    )
    .await;

    let mut enriched = description.to_string();
    for ((full, reference, label), icon) in links.iter().zip(icons) {
        let link = format!(
            r#"<a class="content-link" data-link data-uuid="{reference}"><i class="{icon}"></i>{label}</a>"#
        );
        enriched = enriched.replacen(full.as_str(), &link, 1);
    }
    enriched
}

pub fn class_journal_reference(class_name: &str) -> ItemRef {
    ItemRef::new(format!(
        "{CLASS_JOURNAL_PREFIX}{}",
        class_name.trim().to_lowercase()
    ))
}

/// Journal pages for each class in `class_name`, in class order.
pub async fn class_journals(
    class_name: &str,
    resolver: &dyn ReferenceResolver,
) -> Vec<ClassJournalLink> {
    let classes: Vec<&str> = class_name
        .split('-')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    let pages = join_all(classes.iter().map(|class| async move {
        let reference = class_journal_reference(class);
        match resolver.describe(&reference).await {
            Ok(summary) if summary.name.to_lowercase() == class.to_lowercase() => {
                Some(ClassJournalLink {
                    class_name: (*class).to_string(),
                    name: summary.name,
                    reference,
                })
            }
            Ok(summary) => {
                tracing::debug!(class = %class, page = %summary.name, "Journal page name mismatch");
                None
            }
            Err(e) => {
                tracing::debug!(class = %class, error = %e, "No class journal page");
                None
            }
        }
    }))
    .await;
    pages.into_iter().flatten().collect()
}

/// Class features for `target_level` plus the boost and spell-rank gates.
///
/// Features whose document cannot be described are left out.
pub async fn features_for_level(
    class: &ClassInfo,
    target_level: u8,
    boost_rule: BoostRule,
    resolver: Arc<dyn ReferenceResolver>,
) -> LevelFeatures {
    let due: Vec<_> = class
        .features
        .iter()
        .filter(|feature| feature.level == target_level)
        .collect();

    let views = join_all(due.into_iter().map(|feature| {
        let resolver = Arc::clone(&resolver);
        async move {
            let summary = match resolver.describe(&feature.reference).await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!(
                        reference = %feature.reference,
                        error = %e,
                        "Skipping class feature"
                    );
                    return None;
                }
            };
            let filtered = class_specific_description(&summary.description, &class.name);
            let description =
                enrich_content_links(strip_paragraph_tags(&filtered), resolver.as_ref()).await;
            Some(ClassFeatureView {
                name: feature.name.clone(),
                reference: feature.reference.clone(),
                description,
                img: feature.img.clone().or(summary.img),
            })
        }
    }))
    .await;
    let class_journals = class_journals(&class.name, resolver.as_ref()).await;

    LevelFeatures {
        features: views.into_iter().flatten().collect(),
        class_journals,
        ability_boost_level: boost_rule.is_active(target_level),
        new_spell_rank_level: class.spellcasting && is_new_spell_rank_level(target_level),
        spellcasting: class.spellcasting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{DocumentSummary, HostError, MockReferenceResolver};
    use levelwiz_domain::ClassFeatureRef;

    fn summary(kind: &str, description: &str) -> DocumentSummary {
        DocumentSummary {
            name: "Doc".to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            img: Some("icons/doc.webp".to_string()),
        }
    }

    #[test]
    fn picks_paragraph_for_class() {
        let description = "<p><strong>Fighter, Champion</strong> You gain armor expertise.</p>\
                           <p><strong>Wizard</strong> You gain arcane expertise.</p>";
        assert_eq!(
            class_specific_description(description, "Wizard"),
            "<p>You gain arcane expertise.</p>"
        );
        assert_eq!(
            class_specific_description(description, "champion"),
            "<p>You gain armor expertise.</p>"
        );
        assert_eq!(class_specific_description(description, "Rogue"), description);
    }

    #[test]
    fn strips_outer_paragraph_only() {
        assert_eq!(strip_paragraph_tags("<p>One</p><p>Two</p>"), "One</p><p>Two");
        assert_eq!(strip_paragraph_tags("plain"), "plain");
    }

    #[tokio::test]
    async fn content_links_use_pack_icons() {
        let mut resolver = MockReferenceResolver::new();
        resolver
            .expect_describe()
            .withf(|r| r.as_str() == "Compendium.pf2e.equipment-srd.Item.shield1")
            .returning(|_| Ok(summary("shield", "")));

        let text = "Raise a @UUID[Compendium.pf2e.equipment-srd.Item.shield1]{Steel Shield} \
                    or use @UUID[Compendium.pf2e.actionspf2e.Item.a1]{Shield Block}.";
        let enriched = enrich_content_links(text, &resolver).await;
        assert!(enriched.contains(
            r#"data-uuid="Compendium.pf2e.equipment-srd.Item.shield1"><i class="fa-solid fa-shield-halved"></i>Steel Shield</a>"#
        ));
        assert!(enriched.contains(r#"<i class="fa-solid fa-running"></i>Shield Block</a>"#));
        assert!(!enriched.contains("@UUID"));
    }

    #[tokio::test]
    async fn failed_equipment_lookup_uses_default_icon() {
        let mut resolver = MockReferenceResolver::new();
        resolver
            .expect_describe()
            .returning(|r| Err(HostError::not_found("Item", r)));
        let icon = icon_for_reference(
            &ItemRef::new("Compendium.pf2e.equipment-srd.Item.x"),
            &resolver,
        )
        .await;
        assert_eq!(icon, DEFAULT_ICON);
    }

    #[tokio::test]
    async fn features_filtered_to_level_and_class() {
        let class = ClassInfo::new("Wizard")
            .with_standard_progression()
            .with_spellcasting(true)
            .with_feature(ClassFeatureRef {
                name: "Expert Spellcaster".to_string(),
                level: 7,
                reference: ItemRef::new("Compendium.pf2e.classfeatures.Item.es"),
                img: None,
            })
            .with_feature(ClassFeatureRef {
                name: "Lost Feature".to_string(),
                level: 7,
                reference: ItemRef::new("Compendium.pf2e.classfeatures.Item.gone"),
                img: None,
            })
            .with_feature(ClassFeatureRef {
                name: "Arcane Thesis".to_string(),
                level: 1,
                reference: ItemRef::new("Compendium.pf2e.classfeatures.Item.at"),
                img: None,
            });

        let mut resolver = MockReferenceResolver::new();
        resolver.expect_describe().returning(|r| {
            if r.as_str().ends_with(".es") {
                Ok(summary(
                    "classfeature",
                    "<p><strong>Wizard, Witch</strong>Your spells improve.</p>",
                ))
            } else {
                Err(HostError::not_found("Item", r))
            }
        });

        let features =
            features_for_level(&class, 7, BoostRule::Standard, Arc::new(resolver)).await;
        assert_eq!(features.features.len(), 1);
        assert_eq!(features.features[0].name, "Expert Spellcaster");
        assert_eq!(features.features[0].description, "Your spells improve.");
        assert_eq!(features.features[0].img.as_deref(), Some("icons/doc.webp"));
        assert!(!features.ability_boost_level);
        assert!(features.new_spell_rank_level);
        assert!(features.spellcasting);
        assert!(features.class_journals.is_empty());
    }

    #[tokio::test]
    async fn journal_pages_need_a_matching_name() {
        let mut resolver = MockReferenceResolver::new();
        resolver.expect_describe().returning(|r| match r.as_str() {
            "Compendium.pf2e.journals.JournalEntry.classes.JournalEntryPage.fighter" => {
                Ok(DocumentSummary {
                    name: "Fighter".to_string(),
                    ..summary("JournalEntryPage", "")
                })
            }
            "Compendium.pf2e.journals.JournalEntry.classes.JournalEntryPage.wizard" => {
                Ok(summary("JournalEntryPage", ""))
            }
            _ => Err(HostError::not_found("JournalEntryPage", r)),
        });

        let journals = class_journals("Fighter - Wizard", &resolver).await;
        assert_eq!(journals.len(), 1);
        assert_eq!(journals[0].class_name, "Fighter");
        assert_eq!(
            journals[0].reference,
            class_journal_reference("fighter")
        );
    }
}
