//! Feat picker sessions.
//!
//! A picker filters one slot's candidates and reports the chosen feat back
//! to its wizard over a channel; the slot carried in each message is the
//! routing key, so pickers never touch the selection directly.

use std::sync::Arc;

use levelwiz_domain::{
    FeatRecord, FeatSelected, FeatSlot, ItemRef, Rarity, SelectionFilterState, SelectionSession,
};
use tokio::sync::mpsc;

use super::error::LevelUpError;

/// One row of the picker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatOption {
    pub reference: ItemRef,
    pub display_name: String,
    pub level: u8,
    pub rarity: Rarity,
    pub action_glyph: Option<String>,
    pub img: Option<String>,
}

pub struct FeatPicker {
    session: SelectionSession,
    show_prerequisites: bool,
    selections: mpsc::UnboundedSender<FeatSelected>,
}

impl FeatPicker {
    pub(crate) fn new(
        session: SelectionSession,
        show_prerequisites: bool,
        selections: mpsc::UnboundedSender<FeatSelected>,
    ) -> Self {
        Self {
            session,
            show_prerequisites,
            selections,
        }
    }

    pub fn slot(&self) -> FeatSlot {
        self.session.slot()
    }

    pub fn filters(&self) -> &SelectionFilterState {
        self.session.filters()
    }

    pub fn visible(&self) -> &[Arc<FeatRecord>] {
        self.session.visible()
    }

    /// Visible feats as list rows.
    pub fn options(&self) -> Vec<FeatOption> {
        self.session
            .visible()
            .iter()
            .map(|feat| FeatOption {
                reference: feat.id.clone(),
                display_name: feat.display_name(self.show_prerequisites),
                level: feat.level,
                rarity: feat.rarity,
                action_glyph: feat.action.glyph(),
                img: feat.img.clone(),
            })
            .collect()
    }

    /// Change the filters; returns how many feats remain visible.
    pub fn update<F>(&mut self, change: F) -> usize
    where
        F: FnOnce(&mut SelectionFilterState),
    {
        let visible = self.session.update(change).len();
        tracing::debug!(
            slot = %self.session.slot(),
            visible,
            total = self.session.base().len(),
            "Picker list recomputed"
        );
        visible
    }

    /// Pick a visible feat and report it to the wizard.
    pub fn select(&self, reference: &ItemRef) -> Result<(), LevelUpError> {
        let selected = self.session.select(reference)?;
        tracing::debug!(slot = %selected.slot, reference = %reference, "Feat selected");
        self.selections
            .send(selected)
            .map_err(|_| LevelUpError::WizardClosed)
    }
}
