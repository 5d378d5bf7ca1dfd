//! Typed level-up settings.
//!
//! The host stores module settings as loose JSON values keyed by name.
//! `LevelUpSettings` is the defaulted, typed view the wizard works with.
//!
//! # Keys
//!
//! | Key                        | Type   | Default      |
//! |----------------------------|--------|--------------|
//! | `feat-sort-method`         | string | `LEVEL_DESC` |
//! | `show-feat-prerequisites`  | bool   | `false`      |
//! | `hide-uncommon-feats`      | bool   | `false`      |
//! | `gradual-boosts-variant`   | bool   | `false`      |
//! | `free-archetype-variant`   | bool   | `false`      |
//! | `ancestry-paragon-variant` | bool   | `false`      |
//! | `send-gm-whispers`         | bool   | `false`      |
//! | `legacy-commit-order`      | bool   | `false`      |
//!
//! Invalid values are logged and replaced by the default.

use std::collections::HashMap;

use levelwiz_domain::{BoostRule, CommitOrder, SlotQueryOptions, SortPreset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ports::{HostError, SettingsProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettingKey {
    FeatSortMethod,
    ShowFeatPrerequisites,
    HideUncommonFeats,
    GradualBoostsVariant,
    FreeArchetypeVariant,
    AncestryParagonVariant,
    SendGmWhispers,
    LegacyCommitOrder,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::FeatSortMethod,
        SettingKey::ShowFeatPrerequisites,
        SettingKey::HideUncommonFeats,
        SettingKey::GradualBoostsVariant,
        SettingKey::FreeArchetypeVariant,
        SettingKey::AncestryParagonVariant,
        SettingKey::SendGmWhispers,
        SettingKey::LegacyCommitOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::FeatSortMethod => "feat-sort-method",
            SettingKey::ShowFeatPrerequisites => "show-feat-prerequisites",
            SettingKey::HideUncommonFeats => "hide-uncommon-feats",
            SettingKey::GradualBoostsVariant => "gradual-boosts-variant",
            SettingKey::FreeArchetypeVariant => "free-archetype-variant",
            SettingKey::AncestryParagonVariant => "ancestry-paragon-variant",
            SettingKey::SendGmWhispers => "send-gm-whispers",
            SettingKey::LegacyCommitOrder => "legacy-commit-order",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingKey {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| HostError::UnknownSetting(s.to_string()))
    }
}

/// Settings the wizard reads once when it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelUpSettings {
    pub feat_sort: SortPreset,
    pub show_feat_prerequisites: bool,
    pub hide_uncommon_feats: bool,
    pub gradual_boosts: bool,
    pub free_archetype: bool,
    pub ancestry_paragon: bool,
    pub send_gm_whispers: bool,
    pub legacy_commit_order: bool,
}

impl LevelUpSettings {
    pub fn load(provider: &dyn SettingsProvider) -> Self {
        let flag = |key: SettingKey| read_bool(provider, key);
        Self {
            feat_sort: read_sort(provider),
            show_feat_prerequisites: flag(SettingKey::ShowFeatPrerequisites),
            hide_uncommon_feats: flag(SettingKey::HideUncommonFeats),
            gradual_boosts: flag(SettingKey::GradualBoostsVariant),
            free_archetype: flag(SettingKey::FreeArchetypeVariant),
            ancestry_paragon: flag(SettingKey::AncestryParagonVariant),
            send_gm_whispers: flag(SettingKey::SendGmWhispers),
            legacy_commit_order: flag(SettingKey::LegacyCommitOrder),
        }
    }

    pub fn boost_rule(&self) -> BoostRule {
        if self.gradual_boosts {
            BoostRule::Gradual
        } else {
            BoostRule::Standard
        }
    }

    pub fn commit_order(&self) -> CommitOrder {
        if self.legacy_commit_order {
            CommitOrder::Legacy
        } else {
            CommitOrder::ValidateFirst
        }
    }

    pub fn slot_query_options(&self, include_archetype_feats: bool) -> SlotQueryOptions {
        SlotQueryOptions {
            free_archetype: self.free_archetype,
            ancestry_paragon: self.ancestry_paragon,
            include_archetype_feats,
            sort: self.feat_sort,
        }
    }
}

fn read_bool(provider: &dyn SettingsProvider, key: SettingKey) -> bool {
    match provider.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(value)) => value,
        Some(other) => {
            tracing::warn!(setting = %key, value = %other, "Ignoring non-boolean setting");
            false
        }
    }
}

fn read_sort(provider: &dyn SettingsProvider) -> SortPreset {
    let key = SettingKey::FeatSortMethod;
    match provider.get(key) {
        None | Some(Value::Null) => SortPreset::default(),
        Some(Value::String(raw)) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(setting = %key, error = %e, "Falling back to default feat sort");
            SortPreset::default()
        }),
        Some(other) => {
            tracing::warn!(setting = %key, value = %other, "Ignoring non-string feat sort");
            SortPreset::default()
        }
    }
}

/// HashMap-backed settings for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettings {
    values: HashMap<SettingKey, Value>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: SettingKey, value: impl Into<Value>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Build from a JSON object keyed by setting name. Unknown keys are skipped.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let raw: HashMap<String, Value> =
            serde_json::from_str(json).map_err(HostError::serialization)?;
        let mut values = HashMap::new();
        for (name, value) in raw {
            match name.parse::<SettingKey>() {
                Ok(key) => {
                    values.insert(key, value);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping unknown setting"),
            }
        }
        Ok(Self { values })
    }
}

impl SettingsProvider for InMemorySettings {
    fn get(&self, key: SettingKey) -> Option<Value> {
        self.values.get(&key).cloned()
    }
}
