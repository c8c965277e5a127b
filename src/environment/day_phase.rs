use crate::combatant::CombatantStats;
use schema::{ElementType, StatKind};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Flat damage multiplier for an attacker whose type the phase favours.
pub const PHASE_TYPE_BONUS: f64 = 1.15;

/// Real-time band of the day. Derived from the local hour, never from turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum DayPhase {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPhase {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPhase::Morning,
            12..=17 => DayPhase::Afternoon,
            18..=21 => DayPhase::Evening,
            _ => DayPhase::Night,
        }
    }

    pub fn stat_multipliers(self) -> &'static [(StatKind, f64)] {
        match self {
            DayPhase::Morning => &[(StatKind::Speed, 1.15)],
            DayPhase::Afternoon => &[(StatKind::Attack, 1.20), (StatKind::SpecialAttack, 1.20)],
            DayPhase::Evening => &[(StatKind::Defense, 1.15), (StatKind::SpecialDefense, 1.15)],
            DayPhase::Night => &[(StatKind::SpecialAttack, 1.25), (StatKind::Speed, 1.10)],
        }
    }

    /// Morning's accuracy bonus. Combatants carry no accuracy stat, so this
    /// is display-only.
    pub fn accuracy_multiplier(self) -> f64 {
        match self {
            DayPhase::Morning => 1.10,
            _ => 1.0,
        }
    }

    pub fn dodge_multiplier(self) -> f64 {
        match self {
            DayPhase::Night => 1.5,
            _ => 1.0,
        }
    }

    pub fn boosted_types(self) -> &'static [ElementType] {
        use ElementType::*;
        match self {
            DayPhase::Morning => &[Light, Star, Human],
            DayPhase::Afternoon => &[Light, Grass, Car],
            DayPhase::Evening => &[Imagination, Catgirl, Miwiwi],
            DayPhase::Night => &[Star, Mod, Bonk, CrudeOil],
        }
    }

    /// 1.15 if any of the attacker's types is favoured, else 1.0.
    pub fn type_bonus(self, attacker_types: &[ElementType]) -> f64 {
        let favoured = attacker_types
            .iter()
            .any(|t| self.boosted_types().contains(t));
        if favoured {
            PHASE_TYPE_BONUS
        } else {
            1.0
        }
    }

    /// Returns a copy of `stats` with this phase's multipliers applied and
    /// each affected stat truncated to an integer.
    pub fn apply_stat_bonus(self, stats: &CombatantStats) -> CombatantStats {
        self.stat_multipliers()
            .iter()
            .fold(stats.clone(), |acc, &(kind, multiplier)| {
                let boosted = (f64::from(acc.stat(kind)) * multiplier) as u32;
                acc.with_stat(kind, boosted)
            })
    }
}
