use crate::environment::Environment;
use schema::{ElementType, MoveData, MoveEffect, SKIP_TURN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;

/// Base score of an attacking move against the given defender types.
pub fn base_move_score(move_data: &MoveData, defender_types: &[ElementType], environment: &Environment) -> f64 {
    let mut score = f64::from(move_data.power);

    let effectiveness = ElementType::effectiveness_against(move_data.move_type, defender_types);
    score += effectiveness_bonus(effectiveness);

    let weather = environment.weather_multiplier(move_data.move_type);
    score += (weather - 1.0) * 50.0;

    score *= f64::from(move_data.accuracy) / 100.0;

    if move_data.energy_cost > 0 {
        score += f64::from(move_data.power) / f64::from(move_data.energy_cost) * 2.0;
    }
    score
}

/// Tiered bonus for a combined effectiveness multiplier.
///
/// The `< 0.5` tier is tested before `< 0.8` so double resistances take
/// the full -50.
pub fn effectiveness_bonus(effectiveness: f64) -> f64 {
    if effectiveness >= 2.0 {
        40.0
    } else if effectiveness >= 1.5 {
        25.0
    } else if effectiveness < 0.5 {
        -50.0
    } else if effectiveness < 0.8 {
        -30.0
    } else {
        0.0
    }
}

/// Score of skipping the turn for a combatant at these ratios.
pub fn skip_score(energy_ratio: f64, hp_ratio: f64) -> f64 {
    let mut score = 0.0;
    if energy_ratio < 0.3 {
        score += 40.0;
    } else if energy_ratio < 0.5 {
        score += 20.0;
    }
    if hp_ratio < 0.3 {
        score += 15.0;
    }
    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CounterStrategy {
    HighDamage,
    EnergyEfficient,
    Defensive,
    Disable,
    QuickAttack,
    TypeResistant,
}

impl CounterStrategy {
    /// Whether a move of ours fits this strategy.
    pub fn fits(self, move_data: &MoveData) -> bool {
        match self {
            CounterStrategy::HighDamage => move_data.power > 35,
            CounterStrategy::EnergyEfficient => {
                if move_data.energy_cost == 0 {
                    move_data.power > 0
                } else {
                    f64::from(move_data.power) / f64::from(move_data.energy_cost) > 1.5
                }
            }
            CounterStrategy::Defensive => {
                matches!(move_data.effect, MoveEffect::Heal | MoveEffect::Status | MoveEffect::Disable)
                    || move_data.power < 25
            }
            CounterStrategy::Disable => {
                matches!(move_data.effect, MoveEffect::Disable | MoveEffect::Stun | MoveEffect::Confuse)
            }
            CounterStrategy::QuickAttack => move_data.energy_cost < 20 && move_data.power > 15,
            CounterStrategy::TypeResistant => true,
        }
    }

    fn for_effect(effect: MoveEffect) -> Option<Self> {
        match effect {
            MoveEffect::Critical | MoveEffect::Devastating | MoveEffect::Multi => Some(CounterStrategy::Defensive),
            MoveEffect::Heal => Some(CounterStrategy::HighDamage),
            MoveEffect::Status => Some(CounterStrategy::Disable),
            MoveEffect::Stun => Some(CounterStrategy::QuickAttack),
            _ => None,
        }
    }
}

/// Weighted counter strategies against a predicted opponent move.
///
/// `opponent_moves` is the opponent's roster; a prediction outside it
/// (other than skipping) yields no strategies.
pub fn counter_strategies(
    predicted: &str,
    opponent_moves: &[MoveData],
    own_moves: &[MoveData],
) -> BTreeMap<CounterStrategy, f64> {
    let mut strategies = BTreeMap::new();

    if predicted == SKIP_TURN {
        strategies.insert(CounterStrategy::HighDamage, 40.0);
        strategies.insert(CounterStrategy::EnergyEfficient, 20.0);
        return strategies;
    }

    let Some(threat) = opponent_moves.iter().find(|m| m.name == predicted) else {
        return strategies;
    };

    if threat.power > 40 {
        strategies.insert(CounterStrategy::Defensive, 30.0);
        strategies.insert(CounterStrategy::Disable, 25.0);
    }

    if own_moves
        .iter()
        .any(|own| ElementType::type_effectiveness(threat.move_type, own.move_type) < 1.0)
    {
        strategies.insert(CounterStrategy::TypeResistant, 35.0);
    }

    if let Some(strategy) = CounterStrategy::for_effect(threat.effect) {
        strategies.insert(strategy, 25.0);
    }

    strategies
}

/// Sum of the strategy weights a move fits.
pub fn strategy_bonus(move_data: &MoveData, strategies: &BTreeMap<CounterStrategy, f64>) -> f64 {
    strategies
        .iter()
        .filter(|(strategy, _)| strategy.fits(move_data))
        .map(|(_, weight)| weight)
        .sum()
}
