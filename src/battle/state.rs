use crate::environment::{DayPhase, WeatherKind};
use crate::items::{ItemOutcome, Rarity};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    WaitingForPlayerAction,
    ResolvingPlayerMove,
    ResolvingOpponentMove,
    ApplyingEndOfTurn,
    Victory,
    Defeat,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Victory | GameState::Defeat)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Ongoing,
    Victory,
    Defeat,
}

/// Colour hint for a narration line. Renderers map these to their palette.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Neutral,
    Positive,
    Negative,
    Caution,
    Highlight,
    Weather,
    Phase,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },

    // Actions
    MoveUsed {
        attacker: String,
        move_name: String,
        damage: u32,
    },
    MoveMissed {
        attacker: String,
        move_name: String,
    },
    AttackDodged {
        speed: u32,
        chance: f64,
    },
    CriticalHit {
        chance: f64,
    },
    WeatherBoosted {
        percent: u32,
    },
    PhaseBoosted {
        phase: DayPhase,
    },
    Effectiveness {
        multiplier: f64,
    },
    TurnSkipped {
        combatant: String,
        regen: u32,
    },
    ActionRejected {
        combatant: String,
        move_name: String,
    },

    // Between-turn items
    ItemUsed {
        combatant: String,
        item: String,
        outcome: ItemOutcome,
    },
    ItemFailed {
        message: String,
    },
    ItemFound {
        item: String,
        rarity: Rarity,
    },

    // End of turn
    EnergyRegenerated {
        combatant: String,
        amount: u32,
    },
    WeatherChanged {
        weather: WeatherKind,
    },
    PredictionRevealed {
        move_name: String,
        correct: bool,
    },

    // Battle End
    CombatantFainted {
        combatant: String,
    },
    Forfeited {
        combatant: String,
    },
    BattleEnded {
        outcome: TurnOutcome,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),

            BattleEvent::MoveUsed {
                attacker,
                move_name,
                damage,
            } => Some(format!("{} used {}! Dealt {} damage.", attacker, move_name, damage)),
            BattleEvent::MoveMissed { attacker, move_name } => Some(format!("{}'s {} missed!", attacker, move_name)),
            BattleEvent::AttackDodged { speed, chance } => {
                Some(format!("Dodged with {} SPEED! ({:.1}% chance)", speed, chance))
            }
            BattleEvent::CriticalHit { chance } => Some(format!("Critical hit! ({:.1}% chance)", chance)),
            BattleEvent::WeatherBoosted { percent } => Some(format!("Weather boosted the move by {}%!", percent)),
            BattleEvent::PhaseBoosted { phase } => Some(format!("{} bonus! +15% damage", phase)),
            BattleEvent::Effectiveness { multiplier } => effectiveness_text(*multiplier).map(str::to_string),
            BattleEvent::TurnSkipped { combatant, regen } => Some(format!(
                "{} skipped their turn and regenerated {} MP!",
                combatant, regen
            )),
            BattleEvent::ActionRejected { move_name, .. } => Some(format!("Not enough MP to use {}!", move_name)),

            BattleEvent::ItemUsed { combatant, outcome, .. } => Some(match outcome {
                ItemOutcome::Healed(amount) => format!("{} recovered {} HP!", combatant, amount),
                ItemOutcome::EnergyRestored(amount) => format!("{} recovered {} MP!", combatant, amount),
                ItemOutcome::StatRaised(stats) => {
                    let names: Vec<String> = stats.iter().map(|s| s.to_string()).collect();
                    format!("{}'s {} rose!", combatant, names.join(" & "))
                }
                ItemOutcome::MaxHpRaised { amount, total_boost } => format!(
                    "{}'s max HP +{} permanently! (Total: +{})",
                    combatant, amount, total_boost
                ),
                ItemOutcome::FullyRestored { .. } => format!("{} was fully restored!", combatant),
            }),
            BattleEvent::ItemFailed { message } => Some(message.clone()),
            BattleEvent::ItemFound { item, rarity } => Some(format!("You found a {}! [{}]", item, rarity)),

            BattleEvent::EnergyRegenerated { .. } => None,
            BattleEvent::WeatherChanged { weather } => Some(weather.message().to_string()),
            BattleEvent::PredictionRevealed { move_name, correct } => Some(format!(
                "AI {} predicted your {}!",
                if *correct { "correctly" } else { "incorrectly" },
                move_name
            )),

            BattleEvent::CombatantFainted { combatant } => Some(format!("{} fainted!", combatant)),
            BattleEvent::Forfeited { combatant } => Some(format!("{} forfeited the battle.", combatant)),
            BattleEvent::BattleEnded { outcome } => match outcome {
                TurnOutcome::Victory => Some("VICTORY!".to_string()),
                TurnOutcome::Defeat => Some("DEFEAT...".to_string()),
                TurnOutcome::Ongoing => None,
            },
        }
    }

    pub fn tone(&self) -> MessageTone {
        match self {
            BattleEvent::TurnStarted { .. } | BattleEvent::MoveUsed { .. } => MessageTone::Neutral,
            BattleEvent::MoveMissed { .. } | BattleEvent::ActionRejected { .. } | BattleEvent::CombatantFainted { .. } => {
                MessageTone::Negative
            }
            BattleEvent::AttackDodged { .. } | BattleEvent::ItemFailed { .. } | BattleEvent::Forfeited { .. } => {
                MessageTone::Caution
            }
            BattleEvent::CriticalHit { .. } | BattleEvent::ItemFound { .. } => MessageTone::Highlight,
            BattleEvent::WeatherBoosted { .. } | BattleEvent::WeatherChanged { .. } => MessageTone::Weather,
            BattleEvent::PhaseBoosted { .. } => MessageTone::Phase,
            BattleEvent::Effectiveness { multiplier } => {
                if *multiplier > 1.0 {
                    MessageTone::Positive
                } else {
                    MessageTone::Caution
                }
            }
            BattleEvent::TurnSkipped { .. } | BattleEvent::EnergyRegenerated { .. } => MessageTone::Weather,
            BattleEvent::ItemUsed { outcome, .. } => match outcome {
                ItemOutcome::MaxHpRaised { .. } | ItemOutcome::FullyRestored { .. } => MessageTone::Highlight,
                _ => MessageTone::Positive,
            },
            BattleEvent::PredictionRevealed { correct, .. } => {
                if *correct {
                    MessageTone::Positive
                } else {
                    MessageTone::Caution
                }
            }
            BattleEvent::BattleEnded { outcome } => match outcome {
                TurnOutcome::Defeat => MessageTone::Negative,
                _ => MessageTone::Highlight,
            },
        }
    }
}

/// Narration for a total effectiveness multiplier; neutral hits are silent.
pub fn effectiveness_text(multiplier: f64) -> Option<&'static str> {
    if multiplier >= 2.0 {
        Some("It's super effective!")
    } else if multiplier >= 1.5 {
        Some("It's very effective!")
    } else if multiplier > 1.0 {
        Some("It's effective!")
    } else if multiplier < 0.5 {
        Some("It's not very effective at all...")
    } else if multiplier < 0.8 {
        Some("It's not very effective...")
    } else if multiplier < 1.0 {
        Some("It's somewhat resisted...")
    } else {
        None
    }
}

/// Append-only sink for battle narration.
///
/// ```rust,ignore
/// for (line, tone) in bus.lines() { /* render */ }
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Events from index `start` onwards.
    pub fn since(&self, start: usize) -> &[BattleEvent] {
        &self.events[start.min(self.events.len())..]
    }

    /// Visible narration lines paired with their tone.
    pub fn lines(&self) -> Vec<(String, MessageTone)> {
        self.events
            .iter()
            .filter_map(|event| event.format().map(|text| (text, event.tone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}
