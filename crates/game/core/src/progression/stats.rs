//! The five base stats a player invests stat points into.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Recognized base stats.
///
/// Parsing is case-insensitive so request payloads like `"Vitality"` and
/// `"vitality"` resolve to the same stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    /// Physical damage of strikes.
    Strength,
    /// Dash distance.
    Agility,
    /// Extraction success and perception.
    Sense,
    /// Maximum health.
    Vitality,
    /// Maximum mana, mana regeneration and army size.
    Intelligence,
}

impl StatKind {
    /// Derived value recomputed when this stat changes, if any.
    pub const fn derived(self) -> Option<DerivedKind> {
        match self {
            StatKind::Vitality => Some(DerivedKind::MaxHealth),
            StatKind::Intelligence => Some(DerivedKind::MaxMana),
            _ => None,
        }
    }
}

/// Values derived from base stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DerivedKind {
    MaxHealth,
    MaxMana,
}

/// Base stat block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub strength: u32,
    pub agility: u32,
    pub sense: u32,
    pub vitality: u32,
    pub intelligence: u32,
}

impl BaseStats {
    /// All stats set to the same value.
    pub const fn uniform(value: u32) -> Self {
        Self {
            strength: value,
            agility: value,
            sense: value,
            vitality: value,
            intelligence: value,
        }
    }

    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Agility => self.agility,
            StatKind::Sense => self.sense,
            StatKind::Vitality => self.vitality,
            StatKind::Intelligence => self.intelligence,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Strength => &mut self.strength,
            StatKind::Agility => &mut self.agility,
            StatKind::Sense => &mut self.sense,
            StatKind::Vitality => &mut self.vitality,
            StatKind::Intelligence => &mut self.intelligence,
        }
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self::uniform(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("vitality".parse::<StatKind>(), Ok(StatKind::Vitality));
        assert_eq!("INTELLIGENCE".parse::<StatKind>(), Ok(StatKind::Intelligence));
        assert!("charisma".parse::<StatKind>().is_err());
    }

    #[test]
    fn exactly_five_stats() {
        assert_eq!(StatKind::iter().count(), 5);
    }

    #[test]
    fn only_vitality_and_intelligence_have_derived_values() {
        let derived: Vec<_> = StatKind::iter().filter_map(StatKind::derived).collect();
        assert_eq!(derived, vec![DerivedKind::MaxHealth, DerivedKind::MaxMana]);
    }
}
