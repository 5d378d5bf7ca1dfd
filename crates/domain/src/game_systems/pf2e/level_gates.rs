//! Static level gates.
//!
//! Fixed game-balance tables; a level is active for a gate iff it is listed.

/// Levels granting a full set of attribute boosts.
pub const ABILITY_BOOST_LEVELS: [u8; 4] = [5, 10, 15, 20];

/// Levels at which spellcasting classes gain a new spell rank.
pub const NEW_SPELL_RANK_LEVELS: [u8; 10] = [1, 3, 5, 7, 9, 11, 13, 15, 17, 19];

/// Levels granting a free-archetype feat (variant rule).
pub const FREE_ARCHETYPE_FEAT_LEVELS: [u8; 10] = [2, 4, 6, 8, 10, 12, 14, 16, 18, 20];

/// Levels granting an ancestry-paragon feat (variant rule).
pub const ANCESTRY_PARAGON_FEAT_LEVELS: [u8; 6] = [1, 3, 7, 11, 15, 19];

/// A static level-indexed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelGate {
    AbilityBoost,
    NewSpellRank,
    ArchetypeFeat,
    AncestryParagonFeat,
}

impl LevelGate {
    pub fn levels(&self) -> &'static [u8] {
        match self {
            LevelGate::AbilityBoost => &ABILITY_BOOST_LEVELS,
            LevelGate::NewSpellRank => &NEW_SPELL_RANK_LEVELS,
            LevelGate::ArchetypeFeat => &FREE_ARCHETYPE_FEAT_LEVELS,
            LevelGate::AncestryParagonFeat => &ANCESTRY_PARAGON_FEAT_LEVELS,
        }
    }

    pub fn is_active(&self, level: u8) -> bool {
        self.levels().contains(&level)
    }
}

pub fn is_ability_boost_level(level: u8) -> bool {
    LevelGate::AbilityBoost.is_active(level)
}

pub fn is_new_spell_rank_level(level: u8) -> bool {
    LevelGate::NewSpellRank.is_active(level)
}

pub fn is_archetype_feat_level(level: u8) -> bool {
    LevelGate::ArchetypeFeat.is_active(level)
}

pub fn is_ancestry_paragon_level(level: u8) -> bool {
    LevelGate::AncestryParagonFeat.is_active(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_boost_gate() {
        for level in [5, 10, 15, 20] {
            assert!(is_ability_boost_level(level));
        }
        assert!(!is_ability_boost_level(6));
        assert!(!is_ability_boost_level(0));
    }

    #[test]
    fn spell_rank_gate_is_odd_levels() {
        assert!(is_new_spell_rank_level(1));
        assert!(is_new_spell_rank_level(19));
        assert!(!is_new_spell_rank_level(2));
        assert!(!is_new_spell_rank_level(21));
    }

    #[test]
    fn archetype_gate_is_even_levels() {
        assert!(is_archetype_feat_level(2));
        assert!(is_archetype_feat_level(20));
        assert!(!is_archetype_feat_level(1));
        assert!(!is_archetype_feat_level(22));
    }

    #[test]
    fn ancestry_paragon_gate() {
        assert!(is_ancestry_paragon_level(1));
        assert!(is_ancestry_paragon_level(7));
        assert!(!is_ancestry_paragon_level(5));
        assert!(!is_ancestry_paragon_level(9));
    }
}
