use crate::battle::engine::TurnEngine;
use crate::battle::rng::ScriptedRng;
use crate::combatant::{Combatant, CombatantStats};
use crate::config::BattleConfig;
use crate::environment::{DayPhase, Environment, FixedClock, Weather, WeatherKind};
use crate::errors::BattleResult;
use schema::{ElementType, MoveData, MoveEffect};
use std::collections::BTreeMap;

/// A builder for test combatants with round-number defaults.
///
/// Defaults: 100 hp and energy (both full), 100 in every offensive and
/// defensive stat, speed 50, Human typed, energy regen 10.
///
/// # Example
/// ```ignore
/// let mika = TestCombatantBuilder::new("Mika")
///     .with_types(vec![ElementType::Catgirl])
///     .with_speed(95)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    max_hp: u32,
    max_energy: u32,
    attack: u32,
    special_attack: u32,
    defense: u32,
    special_defense: u32,
    speed: u32,
    types: Vec<ElementType>,
    energy_regen: u32,
    moves: Option<Vec<MoveData>>,
}

impl TestCombatantBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            max_hp: 100,
            max_energy: 100,
            attack: 100,
            special_attack: 100,
            defense: 100,
            special_defense: 100,
            speed: 50,
            types: vec![ElementType::Human],
            energy_regen: 10,
            moves: None,
        }
    }

    /// Sets max hp; the combatant starts at full health.
    pub fn with_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp;
        self
    }

    /// Sets max energy; the combatant starts full.
    pub fn with_energy(mut self, max_energy: u32) -> Self {
        self.max_energy = max_energy;
        self
    }

    pub fn with_offense(mut self, attack: u32, special_attack: u32) -> Self {
        self.attack = attack;
        self.special_attack = special_attack;
        self
    }

    pub fn with_defense(mut self, defense: u32, special_defense: u32) -> Self {
        self.defense = defense;
        self.special_defense = special_defense;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_types(mut self, types: Vec<ElementType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_regen(mut self, energy_regen: u32) -> Self {
        self.energy_regen = energy_regen;
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn build(self) -> Combatant {
        let moves = self.moves.unwrap_or_else(|| {
            vec![
                move_with("Jab", 30, ElementType::Human, MoveEffect::Physical),
                move_with("Daydream", 50, ElementType::Imagination, MoveEffect::Special),
            ]
        });
        Combatant {
            name: self.name,
            stats: CombatantStats {
                hp: self.max_hp,
                max_hp: self.max_hp,
                energy: self.max_energy,
                max_energy: self.max_energy,
                attack: self.attack,
                defense: self.defense,
                special_attack: self.special_attack,
                special_defense: self.special_defense,
                speed: self.speed,
                types: self.types,
                temp_boosts: BTreeMap::new(),
            },
            energy_regen: self.energy_regen,
            moves,
        }
    }
}

/// A plain move with 100 accuracy and a cost of 10.
pub fn move_with(name: &str, power: u32, move_type: ElementType, effect: MoveEffect) -> MoveData {
    MoveData {
        name: name.to_string(),
        power,
        move_type,
        accuracy: 100,
        effect,
        energy_cost: 10,
        is_special: false,
        is_ultimate: false,
    }
}

/// Windy weather boosts only Imagination and Catgirl; Morning only touches
/// speed. Tests that avoid those types and fix speeds get no environment
/// modifiers beyond the speed bump.
pub fn calm_environment() -> Environment {
    Environment::new(Weather::with_kind(WeatherKind::Windy, 3), DayPhase::Morning)
}

/// An engine in the calm environment at 08:00, drawing from `draws`.
/// Windy lasts three turns, so the first redraw happens at the end of turn 3.
pub fn create_test_engine(
    player: Combatant,
    opponent: Combatant,
    config: BattleConfig,
    draws: Vec<f64>,
) -> TurnEngine<ScriptedRng, FixedClock> {
    TurnEngine::with_environment(
        player,
        opponent,
        calm_environment(),
        config,
        ScriptedRng::new_for_test(draws),
        FixedClock(8),
    )
}

/// Asserts that a result is Ok and returns the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
