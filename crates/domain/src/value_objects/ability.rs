//! Attribute keys.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The six attributes that receive boosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKey {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl AbilityKey {
    pub const ALL: [AbilityKey; 6] = [
        AbilityKey::Str,
        AbilityKey::Dex,
        AbilityKey::Con,
        AbilityKey::Int,
        AbilityKey::Wis,
        AbilityKey::Cha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityKey::Str => "str",
            AbilityKey::Dex => "dex",
            AbilityKey::Con => "con",
            AbilityKey::Int => "int",
            AbilityKey::Wis => "wis",
            AbilityKey::Cha => "cha",
        }
    }
}

impl std::fmt::Display for AbilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbilityKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(AbilityKey::Str),
            "dex" | "dexterity" => Ok(AbilityKey::Dex),
            "con" | "constitution" => Ok(AbilityKey::Con),
            "int" | "intelligence" => Ok(AbilityKey::Int),
            "wis" | "wisdom" => Ok(AbilityKey::Wis),
            "cha" | "charisma" => Ok(AbilityKey::Cha),
            _ => Err(DomainError::parse(format!("Unknown attribute: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("int".parse::<AbilityKey>(), Ok(AbilityKey::Int));
        assert_eq!("Wisdom".parse::<AbilityKey>(), Ok(AbilityKey::Wis));
        assert!("luck".parse::<AbilityKey>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        for key in AbilityKey::ALL {
            assert_eq!(key.to_string().parse::<AbilityKey>(), Ok(key));
        }
    }
}
