use crate::ElementType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Name of the synthetic move every combatant may choose instead of attacking.
pub const SKIP_TURN: &str = "Skip Turn";

/// Behavioural tag carried by every move. The tag decides which offensive and
/// defensive stats a move uses and feeds a handful of special cases (crit
/// bonus, AI strategy fit, the skip-turn sentinel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MoveEffect {
    // Physical-like
    Physical,
    Strong,
    Devastating,
    Stun,
    Combo,
    Pierce,
    Speed,
    Rush,
    Intimidate,
    Evasive,
    Authority,

    // Special-like
    Special,
    Psychic,
    Energy,
    Heal,
    Charm,
    Cute,
    Piercing,
    Artistic,
    Confuse,
    Slip,
    Status,
    Disable,
    Charge,
    Multi,
    Critical,

    SkipTurn,
}

impl MoveEffect {
    /// Physical-like moves use attack vs defense; everything else is
    /// special-like and uses special attack vs special defense.
    pub fn is_physical_like(self) -> bool {
        use MoveEffect::*;
        matches!(
            self,
            Physical | Strong | Devastating | Stun | Combo | Pierce | Speed | Rush | Intimidate | Evasive | Authority
        )
    }

    /// Moves with these tags get the flat crit-chance bonus.
    pub fn boosts_crit(self) -> bool {
        matches!(self, MoveEffect::Critical | MoveEffect::Devastating)
    }
}

/// A single move definition from the character catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub power: u32,
    pub move_type: ElementType,
    /// Hit chance in percent, 0..=100.
    pub accuracy: u8,
    pub effect: MoveEffect,
    pub energy_cost: u32,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub is_ultimate: bool,
}

impl MoveData {
    /// The always-available "Skip Turn" action, expressed as a move.
    pub fn skip_turn() -> Self {
        Self {
            name: SKIP_TURN.to_string(),
            power: 0,
            move_type: ElementType::Neutral,
            accuracy: 100,
            effect: MoveEffect::SkipTurn,
            energy_cost: 0,
            is_special: false,
            is_ultimate: false,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.effect == MoveEffect::SkipTurn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum StatKind {
    Attack,
    Defense,
    #[strum(to_string = "Special Attack", serialize = "SpecialAttack")]
    SpecialAttack,
    #[strum(to_string = "Special Defense", serialize = "SpecialDefense")]
    SpecialDefense,
    Speed,
}
