//! Pathfinder 2e proficiency ranks.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Pathfinder 2e proficiency ranks, stored by the host as `0..=4`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProficiencyRank {
    /// Not trained in the skill
    #[default]
    Untrained,
    /// Basic training
    Trained,
    /// Advanced training
    Expert,
    /// Mastery
    Master,
    /// Ultimate mastery
    Legendary,
}

impl ProficiencyRank {
    /// Numeric rank as stored on the character document.
    pub fn value(&self) -> u8 {
        match self {
            ProficiencyRank::Untrained => 0,
            ProficiencyRank::Trained => 1,
            ProficiencyRank::Expert => 2,
            ProficiencyRank::Master => 3,
            ProficiencyRank::Legendary => 4,
        }
    }

    /// Rank for a stored numeric value, if it is in range.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProficiencyRank::Untrained),
            1 => Some(ProficiencyRank::Trained),
            2 => Some(ProficiencyRank::Expert),
            3 => Some(ProficiencyRank::Master),
            4 => Some(ProficiencyRank::Legendary),
            _ => None,
        }
    }

    /// Display name of the rank.
    pub fn name(&self) -> &'static str {
        match self {
            ProficiencyRank::Untrained => "Untrained",
            ProficiencyRank::Trained => "Trained",
            ProficiencyRank::Expert => "Expert",
            ProficiencyRank::Master => "Master",
            ProficiencyRank::Legendary => "Legendary",
        }
    }

    /// The next rank up, or `None` at Legendary.
    pub fn next(&self) -> Option<Self> {
        Self::from_value(self.value() + 1)
    }
}

impl std::fmt::Display for ProficiencyRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for ProficiencyRank {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
            .ok_or_else(|| DomainError::parse(format!("Proficiency rank out of range: {}", value)))
    }
}

impl From<ProficiencyRank> for u8 {
    fn from(rank: ProficiencyRank) -> Self {
        rank.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_ordered() {
        assert!(ProficiencyRank::Untrained < ProficiencyRank::Trained);
        assert!(ProficiencyRank::Master < ProficiencyRank::Legendary);
    }

    #[test]
    fn next_rank_stops_at_legendary() {
        assert_eq!(
            ProficiencyRank::Expert.next(),
            Some(ProficiencyRank::Master)
        );
        assert_eq!(ProficiencyRank::Legendary.next(), None);
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&ProficiencyRank::Master).expect("serialize");
        assert_eq!(json, "3");
        let rank: ProficiencyRank = serde_json::from_str("1").expect("deserialize");
        assert_eq!(rank, ProficiencyRank::Trained);
        assert!(serde_json::from_str::<ProficiencyRank>("7").is_err());
    }
}
