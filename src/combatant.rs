//! Battle-time combatant state built from a catalog template.

use crate::boosts::PermanentBoosts;
use schema::{CharacterTemplate, ElementType, MoveData, StatKind, SKIP_TURN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live stats for one combatant. Transformations (environment bonuses,
/// temporary boosts) return a new value rather than editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub hp: u32,
    pub max_hp: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
    pub types: Vec<ElementType>,
    /// Item-granted deltas, cleared at battle start.
    pub temp_boosts: BTreeMap<StatKind, i32>,
}

impl CombatantStats {
    pub fn stat(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpecialAttack => self.special_attack,
            StatKind::SpecialDefense => self.special_defense,
            StatKind::Speed => self.speed,
        }
    }

    pub fn with_stat(&self, kind: StatKind, value: u32) -> Self {
        let mut next = self.clone();
        match kind {
            StatKind::Attack => next.attack = value,
            StatKind::Defense => next.defense = value,
            StatKind::SpecialAttack => next.special_attack = value,
            StatKind::SpecialDefense => next.special_defense = value,
            StatKind::Speed => next.speed = value,
        }
        next
    }

    pub fn temp_boost(&self, kind: StatKind) -> i32 {
        self.temp_boosts.get(&kind).copied().unwrap_or(0)
    }

    pub fn with_temp_boost(&self, kind: StatKind, delta: i32) -> Self {
        let mut next = self.clone();
        *next.temp_boosts.entry(kind).or_insert(0) += delta;
        next
    }

    /// Copy with every negative temporary delta removed.
    pub fn without_negative_boosts(&self) -> Self {
        let mut next = self.clone();
        next.temp_boosts.retain(|_, delta| *delta >= 0);
        next
    }

    /// Stat value with its temporary delta folded in, floored at zero.
    pub fn boosted_stat(&self, kind: StatKind) -> u32 {
        let value = i64::from(self.stat(kind)) + i64::from(self.temp_boost(kind));
        value.max(0) as u32
    }

    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }

    pub fn hp_ratio(&self) -> f64 {
        ratio(self.hp, self.max_hp)
    }

    pub fn energy_ratio(&self) -> f64 {
        ratio(self.energy, self.max_energy)
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }
}

fn ratio(current: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(current) / f64::from(max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub stats: CombatantStats,
    pub energy_regen: u32,
    pub moves: Vec<MoveData>,
}

impl Combatant {
    /// Builds a fresh, full-health combatant from a template plus its
    /// persisted permanent boosts.
    pub fn from_template(template: &CharacterTemplate, boosts: &PermanentBoosts) -> Self {
        let base = &template.base_stats;
        let max_hp = base.hp + boosts.hp_boost;
        let max_energy = base.max_energy + boosts.mp_boost;
        Self {
            name: template.name.clone(),
            stats: CombatantStats {
                hp: max_hp,
                max_hp,
                energy: max_energy,
                max_energy,
                attack: base.attack + boosts.attack_boost,
                defense: base.defense + boosts.defense_boost,
                special_attack: base.special_attack,
                special_defense: base.special_defense,
                speed: base.speed,
                types: template.types.clone(),
                temp_boosts: BTreeMap::new(),
            },
            energy_regen: base.energy_regen,
            moves: template.moves.clone(),
        }
    }

    /// Looks up a move by name. "Skip Turn" always resolves.
    pub fn find_move(&self, name: &str) -> Option<MoveData> {
        if name == SKIP_TURN {
            return Some(MoveData::skip_turn());
        }
        self.moves.iter().find(|m| m.name == name).cloned()
    }

    pub fn can_afford(&self, move_data: &MoveData) -> bool {
        self.stats.energy >= move_data.energy_cost
    }

    pub fn affordable_moves(&self) -> Vec<&MoveData> {
        self.moves.iter().filter(|m| self.can_afford(m)).collect()
    }

    pub fn cheapest_move_cost(&self) -> Option<u32> {
        self.moves.iter().map(|m| m.energy_cost).min()
    }

    /// Energy restored by choosing "Skip Turn":
    /// `energy_regen + min(max_energy / 8, cheapest cost)`, or
    /// `energy_regen + max_energy / 10` with an empty roster.
    pub fn skip_turn_regen(&self) -> u32 {
        let bonus = match self.cheapest_move_cost() {
            Some(cheapest) => (self.stats.max_energy / 8).min(cheapest),
            None => self.stats.max_energy / 10,
        };
        self.energy_regen + bonus
    }

    pub fn spend_energy(&mut self, amount: u32) {
        self.stats.energy = self.stats.energy.saturating_sub(amount);
    }

    /// Adds energy up to the maximum and returns the amount actually gained.
    pub fn restore_energy(&mut self, amount: u32) -> u32 {
        let before = self.stats.energy;
        self.stats.energy = (before + amount).min(self.stats.max_energy);
        self.stats.energy - before
    }

    /// Removes hp, clamped at zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let dealt = damage.min(self.stats.hp);
        self.stats.hp -= dealt;
        dealt
    }

    /// Adds hp up to the maximum and returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.stats.hp;
        self.stats.hp = (before + amount).min(self.stats.max_hp);
        self.stats.hp - before
    }

    pub fn is_fainted(&self) -> bool {
        self.stats.is_fainted()
    }
}
