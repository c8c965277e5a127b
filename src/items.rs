//! Battle items and the player's inventory.
//!
//! Items are used between turns only. Each use either changes the target
//! and consumes one unit, or is rejected with no change at all.

use crate::battle::rng::BattleRng;
use crate::boosts::{BoostKind, BoostStore};
use crate::combatant::Combatant;
use crate::errors::{ActionError, ActionResult, SnapshotError};
use schema::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use tracing::debug;

/// A temporary stat boost is refused once the stat's delta reaches this.
pub const MAX_TEMP_BOOST: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ItemCategory {
    Healing,
    #[strum(to_string = "MP")]
    Mana,
    Stat,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    Heal(u32),
    RestoreEnergy(u32),
    StatBoost { stats: &'static [StatKind], amount: i32 },
    /// Permanent max HP increase, written to the boost store.
    MaxHpBoost(u32),
    FullRestore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ItemCategory,
    pub effect: ItemEffect,
    pub cost: u32,
    pub rarity: Rarity,
}

const fn item(
    name: &'static str,
    description: &'static str,
    category: ItemCategory,
    effect: ItemEffect,
    cost: u32,
    rarity: Rarity,
) -> Item {
    Item {
        name,
        description,
        category,
        effect,
        cost,
        rarity,
    }
}

use ItemCategory::*;
use ItemEffect::*;
use Rarity::*;

pub static ITEMS: [Item; 16] = [
    item("Healing Potion", "Restores 50 HP", Healing, Heal(50), 100, Common),
    item("Super Potion", "Restores 100 HP", Healing, Heal(100), 200, Uncommon),
    item("Hyper Potion", "Restores 200 HP", Healing, Heal(200), 400, Rare),
    item("Max Potion", "Fully restores HP", Healing, Heal(400), 800, Epic),
    item("MP Elixir", "Restores 30 MP", Mana, RestoreEnergy(30), 80, Common),
    item("Super Elixir", "Restores 60 MP", Mana, RestoreEnergy(60), 160, Uncommon),
    item("Max Elixir", "Fully restores MP", Mana, RestoreEnergy(400), 400, Rare),
    item(
        "Attack Boost",
        "Raises Attack for this battle",
        Stat,
        StatBoost { stats: &[StatKind::Attack], amount: 1 },
        150,
        Common,
    ),
    item(
        "Defense Boost",
        "Raises Defense for this battle",
        Stat,
        StatBoost { stats: &[StatKind::Defense], amount: 1 },
        150,
        Common,
    ),
    item(
        "Speed Boost",
        "Raises Speed for this battle",
        Stat,
        StatBoost { stats: &[StatKind::Speed], amount: 1 },
        150,
        Common,
    ),
    item(
        "Special Boost",
        "Raises Special Attack & Defense",
        Stat,
        StatBoost { stats: &[StatKind::SpecialAttack, StatKind::SpecialDefense], amount: 1 },
        200,
        Uncommon,
    ),
    item(
        "Mega Booster",
        "Greatly raises Attack",
        Stat,
        StatBoost { stats: &[StatKind::Attack], amount: 2 },
        500,
        Epic,
    ),
    item("HP Up", "Permanently increases max HP by 10", Special, MaxHpBoost(10), 1000, Rare),
    item("Vitality Stone", "Permanently increases max HP by 25", Special, MaxHpBoost(25), 2500, Epic),
    item("Life Crystal", "Permanently increases max HP by 50", Special, MaxHpBoost(50), 5000, Legendary),
    item("Full Restore", "Completely restores HP and MP", Special, FullRestore, 1200, Epic),
];

pub fn find_item(name: &str) -> Option<&'static Item> {
    ITEMS.iter().find(|item| item.name == name)
}

/// Rarities in roll order. The cumulative walk starts from the rarest band.
const DROP_ORDER: [Rarity; 5] = [Legendary, Epic, Rare, Uncommon, Common];

impl Rarity {
    /// Percent weight before luck is applied. The five weights sum to 100.
    pub fn base_drop_weight(self) -> f64 {
        match self {
            Common => 50.0,
            Uncommon => 25.0,
            Rare => 15.0,
            Epic => 8.0,
            Legendary => 2.0,
        }
    }

    fn scales_with_luck(self) -> bool {
        matches!(self, Rare | Epic | Legendary)
    }
}

/// How lucky a drop roll is. Luck scales the Rare, Epic and Legendary
/// weights, then the table is renormalised to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Luck {
    #[default]
    Normal,
    Low,
    Medium,
    High,
    Blessed,
}

impl Luck {
    pub fn multiplier(self) -> f64 {
        match self {
            Luck::Normal => 1.0,
            Luck::Low => 1.2,
            Luck::Medium => 1.5,
            Luck::High => 2.0,
            Luck::Blessed => 3.0,
        }
    }
}

/// Percent chance of each rarity under `luck`, rarest first.
pub fn drop_rates(luck: Luck) -> [(Rarity, f64); 5] {
    let weights = DROP_ORDER.map(|rarity| {
        let base = rarity.base_drop_weight();
        let weight = if rarity.scales_with_luck() {
            base * luck.multiplier()
        } else {
            base
        };
        (rarity, weight)
    });
    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
    weights.map(|(rarity, weight)| (rarity, weight / total * 100.0))
}

/// Rolls a rarity: one draw in `[0, 100)` walked through the cumulative
/// bands from Legendary down.
pub fn roll_rarity(rng: &mut dyn BattleRng, luck: Luck) -> Rarity {
    let roll = rng.roll_chance("drop rarity");
    let mut cumulative = 0.0;
    for (rarity, rate) in drop_rates(luck) {
        cumulative += rate;
        if roll <= cumulative {
            return rarity;
        }
    }
    Common
}

/// Draws a random item: a rarity roll, then a uniform pick among the items
/// of that rarity (optionally restricted to `category`). Falls back to the
/// Common pool when the rolled band has nothing to offer.
pub fn random_drop(rng: &mut dyn BattleRng, luck: Luck, category: Option<ItemCategory>) -> Option<&'static Item> {
    let rarity = roll_rarity(rng, luck);
    let pool = |wanted: Rarity| -> Vec<&'static Item> {
        ITEMS
            .iter()
            .filter(|item| item.rarity == wanted && category.map_or(true, |c| item.category == c))
            .collect()
    };
    let mut candidates = pool(rarity);
    if candidates.is_empty() {
        candidates = pool(Common);
    }
    if candidates.is_empty() {
        return None;
    }
    let item = candidates[rng.pick_index(candidates.len(), "drop item")];
    debug!(item = item.name, %rarity, %luck, "item dropped");
    Some(item)
}

/// What a successful item use did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemOutcome {
    Healed(u32),
    EnergyRestored(u32),
    StatRaised(Vec<StatKind>),
    MaxHpRaised { amount: u32, total_boost: u32 },
    FullyRestored { hp: u32, energy: u32 },
}

impl Item {
    /// Applies the item to `target`. Permanent effects are also written to
    /// `store` under the target's name. On rejection nothing is changed.
    pub fn apply(&self, target: &mut Combatant, store: &mut dyn BoostStore) -> ActionResult<ItemOutcome> {
        let refuse = |reason: String| ActionError::ItemHadNoEffect {
            item: self.name.to_string(),
            reason,
        };

        let outcome = match self.effect {
            Heal(amount) => {
                if target.stats.hp >= target.stats.max_hp {
                    return Err(refuse(format!("{} is already at full HP!", target.name)));
                }
                ItemOutcome::Healed(target.heal(amount))
            }
            RestoreEnergy(amount) => {
                if target.stats.energy >= target.stats.max_energy {
                    return Err(refuse(format!("{} already has full MP!", target.name)));
                }
                ItemOutcome::EnergyRestored(target.restore_energy(amount))
            }
            StatBoost { stats, amount } => {
                if let Some(capped) = stats.iter().find(|&&kind| target.stats.temp_boost(kind) >= MAX_TEMP_BOOST) {
                    return Err(refuse(format!("{}'s {} can't be boosted further!", target.name, capped)));
                }
                target.stats = stats
                    .iter()
                    .fold(target.stats.clone(), |acc, &kind| acc.with_temp_boost(kind, amount));
                ItemOutcome::StatRaised(stats.to_vec())
            }
            MaxHpBoost(amount) => {
                let total_boost = store.add_boost(&target.name, BoostKind::Hp, amount);
                target.stats.max_hp += amount;
                target.stats.hp += amount;
                ItemOutcome::MaxHpRaised { amount, total_boost }
            }
            FullRestore => {
                let hp = target.stats.max_hp - target.stats.hp;
                let energy = target.stats.max_energy - target.stats.energy;
                if hp == 0 && energy == 0 {
                    return Err(refuse(format!("{} is already at full health and MP!", target.name)));
                }
                target.stats.hp = target.stats.max_hp;
                target.stats.energy = target.stats.max_energy;
                target.stats = target.stats.without_negative_boosts();
                ItemOutcome::FullyRestored { hp, energy }
            }
        };
        debug!(item = self.name, target = %target.name, ?outcome, "item applied");
        Ok(outcome)
    }
}

/// Item name to quantity. Entries never hold a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The kit every new player starts with.
    pub fn starting() -> Self {
        let mut inventory = Self::new();
        inventory.add("Healing Potion", 2);
        inventory.add("MP Elixir", 1);
        inventory.add("Attack Boost", 1);
        inventory.add("Speed Boost", 1);
        inventory
    }

    pub fn add(&mut self, name: &str, quantity: u32) {
        if quantity > 0 {
            *self.items.entry(name.to_string()).or_insert(0) += quantity;
        }
    }

    /// Removes one unit. Returns false if there was none.
    pub fn remove_one(&mut self, name: &str) -> bool {
        match self.items.get_mut(name) {
            Some(quantity) => {
                *quantity -= 1;
                if *quantity == 0 {
                    self.items.remove(name);
                }
                true
            }
            None => false,
        }
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str) -> bool {
        self.quantity(name) > 0
    }

    /// Held items with their table entries, optionally filtered by category.
    pub fn by_category(&self, category: Option<ItemCategory>) -> Vec<(&'static Item, u32)> {
        self.items
            .iter()
            .filter_map(|(name, &quantity)| find_item(name).map(|item| (item, quantity)))
            .filter(|(item, _)| category.map_or(true, |c| item.category == c))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(name, &quantity)| (name.as_str(), quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Compact binary snapshot for save files.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}
