//! Fill-once caches for host data.
//!
//! The feat compendium and the translated prerequisite vocabulary are loaded
//! on first use and then only read. Both caches are owned values injected
//! into the wizard rather than process globals.

use std::sync::{Arc, OnceLock};

use levelwiz_domain::{FeatCatalog, Skill, Vocabulary};
use tokio::sync::OnceCell;

use super::ports::{CatalogProvider, HostError, Localizer};

/// The feat catalog, fetched once from the host.
///
/// A failed fetch is not cached: callers get an empty catalog and the next
/// access tries the host again.
pub struct FeatCatalogCache {
    provider: Arc<dyn CatalogProvider>,
    catalog: OnceCell<Arc<FeatCatalog>>,
}

impl FeatCatalogCache {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            catalog: OnceCell::new(),
        }
    }

    /// The cached catalog, fetching it on first access.
    pub async fn get(&self) -> Arc<FeatCatalog> {
        match self.try_get().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "Feat catalog unavailable, offering no feats");
                Arc::new(FeatCatalog::default())
            }
        }
    }

    pub async fn try_get(&self) -> Result<Arc<FeatCatalog>, HostError> {
        self.catalog
            .get_or_try_init(|| async {
                let feats = self.provider.fetch_all_feats().await?;
                tracing::info!(feats = feats.len(), "Feat catalog loaded");
                Ok::<_, HostError>(Arc::new(FeatCatalog::new(feats)))
            })
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }
}

/// Localization key for a skill's label.
pub fn skill_label_key(skill: Skill) -> String {
    format!("PF2E.Skill{}", skill.label())
}

pub const DEDICATION_TRAIT_KEY: &str = "PF2E.TraitDedication";

/// Prerequisite vocabulary built from the host's translations.
pub struct VocabularyCache {
    localizer: Arc<dyn Localizer>,
    vocabulary: OnceLock<Arc<Vocabulary>>,
}

impl VocabularyCache {
    pub fn new(localizer: Arc<dyn Localizer>) -> Self {
        Self {
            localizer,
            vocabulary: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Arc<Vocabulary> {
        Arc::clone(self.vocabulary.get_or_init(|| Arc::new(self.build())))
    }

    fn build(&self) -> Vocabulary {
        let mut vocabulary = Vocabulary::english();
        for skill in Skill::ALL {
            if let Some(label) = self.localizer.localize(&skill_label_key(skill)) {
                vocabulary = vocabulary.with_skill_label(skill, label);
            }
        }
        if let Some(dedication) = self.localizer.localize(DEDICATION_TRAIT_KEY) {
            vocabulary = vocabulary.with_dedication(dedication);
        }
        vocabulary
    }
}
