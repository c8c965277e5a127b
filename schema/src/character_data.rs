use crate::{ElementType, MoveData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
    pub max_energy: u32,
    pub energy_regen: u32,
}

/// A playable character archetype as shipped in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub name: String,
    pub types: Vec<ElementType>,
    pub base_stats: BaseStats,
    pub moves: Vec<MoveData>,
}

impl CharacterTemplate {
    pub fn find_move(&self, name: &str) -> Option<&MoveData> {
        self.moves.iter().find(|m| m.name == name)
    }

    /// Cost of the cheapest move in the roster, if there is one.
    pub fn cheapest_move_cost(&self) -> Option<u32> {
        self.moves.iter().map(|m| m.energy_cost).min()
    }
}
